use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SOLANA_AGENT_CHAT_LOG";

fn resolve_filter(default_filter: &str) -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter))
}

/// Server-side subscriber: verbose, with source locations and span timing.
pub fn init_tracing(component: &str) {
    let default_filter = format!("info,solana_agent_chat=debug,{component}=debug");

    let _ = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(&default_filter))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .compact()
        .try_init();
}

/// Client-side subscriber. Writes to stderr so it never interleaves with the
/// transcript on stdout.
pub fn init_client_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
