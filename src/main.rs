use std::time::Instant;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use solana_agent_chat::client::GatewayClient;
use solana_agent_chat::config::Config;
use solana_agent_chat::error::{Result, SolanaAgentChatError};
use solana_agent_chat::interfaces::gateway::ChatGateway;
use solana_agent_chat::parser::{classify, Fragment};
use solana_agent_chat::render::terminal::{
    format_card, format_quick_actions, format_user_message, header, typing_indicator,
};
use solana_agent_chat::render::{
    fetch_sol_price, render, Card, CopyTracker, Explorer, Osc52Clipboard, RenderContext,
};
use solana_agent_chat::session::{ChatSession, SessionState, SubmitOutcome, EXAMPLE_QUERIES};

#[derive(Parser, Debug)]
#[command(name = "solana-agent-chat")]
#[command(about = "Terminal chat with a Solana agent")]
struct Cli {
    /// Gateway address (e.g. http://127.0.0.1:3000).
    #[arg(long, env = "SOLANA_AGENT_CHAT_GATEWAY", default_value = "http://127.0.0.1:3000")]
    gateway: String,

    /// File holding the private key, base58 or JSON byte array.
    #[arg(long, env = "SOLANA_AGENT_CHAT_KEY_FILE")]
    key_file: Option<String>,

    /// Config JSON; only the explorer settings are used here.
    #[arg(
        long,
        env = "SOLANA_AGENT_CHAT_CONFIG",
        default_value_t = solana_agent_chat::runtime_paths::default_config_path()
    )]
    config: String,
}

enum Command {
    Key,
    Cancel,
    Examples,
    Use(usize),
    Copy(usize),
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let rest = line.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let index = parts.next().and_then(|value| value.parse::<usize>().ok());
    Some(match (name, index) {
        ("key", _) => Command::Key,
        ("cancel", _) => Command::Cancel,
        ("examples", _) => Command::Examples,
        ("use", Some(index)) => Command::Use(index),
        ("copy", Some(index)) => Command::Copy(index),
        ("quit" | "exit", _) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    })
}

struct Repl {
    session: ChatSession,
    gateway: GatewayClient,
    explorer: Explorer,
    tracker: CopyTracker,
    clipboard: Osc52Clipboard<std::io::Stdout>,
    last_card: Option<Card>,
}

impl Repl {
    fn print_help(&self) {
        println!(
            "  {}",
            "Type a message and press Enter. Empty Enter sends a filled-in example.".dimmed()
        );
        println!(
            "  {}",
            "/key  /examples  /use <n>  /copy <n>  /cancel  /quit".dimmed()
        );
    }

    async fn render_agent_reply(&mut self, content: &str) {
        let fragment = classify(content);
        let mut ctx = RenderContext::new(self.explorer.clone());
        if matches!(fragment, Fragment::Balance { .. }) {
            if let Some(key) = self.session.private_key_base58() {
                let gateway: &dyn ChatGateway = &self.gateway;
                ctx = ctx.with_sol_price(fetch_sol_price(gateway, &key).await);
            }
        }
        let card = render(&fragment, &ctx);
        print!("{}", format_card(&card, &self.tracker, Instant::now()));
        self.last_card = Some(card);
    }

    async fn send_input(&mut self) {
        match self.session.begin_submit() {
            SubmitOutcome::Dispatched(request) => {
                print!("{}", format_user_message(&request.message));
                println!("  {}", typing_indicator());
                let result = self
                    .gateway
                    .send(&request.private_key, &request.message)
                    .await;
                let content = self
                    .session
                    .complete(request, result)
                    .map(|message| message.content.clone());
                if let Some(content) = content {
                    self.render_agent_reply(&content).await;
                }
            }
            SubmitOutcome::KeyRequired => {
                println!(
                    "  {}",
                    "Enter your Solana private key (base58, from Phantom or other wallets):"
                        .yellow()
                );
            }
            SubmitOutcome::Ignored => {}
        }
    }

    fn accept_key(&mut self, raw: &str) {
        match self.session.provide_key(raw) {
            Ok(()) => println!("  {}", "Connected".green()),
            Err(err) => println!("  {}", err.to_string().red()),
        }
    }

    fn copy(&mut self, index: usize) {
        let Some(card) = self.last_card.as_ref() else {
            println!("  {}", "Nothing to copy yet.".dimmed());
            return;
        };
        let Some(value) = index
            .checked_sub(1)
            .and_then(|i| card.copy_targets().get(i).map(|value| value.to_string()))
        else {
            println!("  {}", format!("No copy target {index}.").red());
            return;
        };
        let now = Instant::now();
        match self.tracker.copy_with(&mut self.clipboard, &value, now) {
            Ok(()) => print!("{}", format_card(card, &self.tracker, now)),
            Err(err) => println!("  {}", err.to_string().red()),
        }
    }

    /// Returns false once the user asked to leave.
    async fn handle_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if let Some(command) = parse_command(trimmed) {
            match command {
                Command::Quit => return false,
                Command::Key => {
                    self.session.open_key_prompt();
                    println!("  {}", "Enter your Solana private key:".yellow());
                }
                Command::Cancel => {
                    self.session.cancel_key_prompt();
                }
                Command::Examples => {
                    print!("{}", format_quick_actions(EXAMPLE_QUERIES));
                }
                Command::Use(index) => match index.checked_sub(1).and_then(|i| EXAMPLE_QUERIES.get(i)) {
                    Some(label) => {
                        self.session.apply_quick_action(label);
                        print!("{}", format_user_message(self.session.input()));
                        println!("  {}", "Press Enter to send.".dimmed());
                    }
                    None => println!("  {}", format!("No example {index}.").red()),
                },
                Command::Copy(index) => self.copy(index),
                Command::Unknown(raw) => {
                    println!("  {}", format!("Unknown command {raw}").red());
                    self.print_help();
                }
            }
            return true;
        }

        if self.session.state() == SessionState::AwaitingKey {
            if !trimmed.is_empty() {
                self.accept_key(trimmed);
            }
            return true;
        }

        if !trimmed.is_empty() {
            self.session.set_input(line);
        }
        self.send_input().await;
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    solana_agent_chat::logging::init_client_tracing();
    let cli = Cli::parse();

    let config = Config::load(Some(&cli.config))?;
    let mut repl = Repl {
        session: ChatSession::new(),
        gateway: GatewayClient::new(&cli.gateway),
        explorer: Explorer::new(
            config.solana.explorer_base_url.clone(),
            config.solana.network.clone(),
        ),
        tracker: CopyTracker::new(),
        clipboard: Osc52Clipboard::stdout(),
        last_card: None,
    };

    if let Some(path) = cli.key_file.as_deref() {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SolanaAgentChatError::Config(format!("cannot read key file {path}: {e}"))
        })?;
        repl.session.provide_key(&raw)?;
    }

    println!("{}", header(&config.solana.network, repl.session.has_key()));
    repl.print_help();
    print!("{}", format_quick_actions(EXAMPLE_QUERIES));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| SolanaAgentChatError::Runtime(format!("stdin: {e}")))?
    {
        if !repl.handle_line(&line).await {
            break;
        }
    }
    Ok(())
}
