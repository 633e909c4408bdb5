use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use solana_agent_chat::parser::{classify, clean_reply, highlight};

const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
const SIGNATURE: &str =
    "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

fn bench_parser(c: &mut Criterion) {
    let replies = [
        (
            "balance",
            format!(r#"Here you go: {{"status":"success","balance":145.32,"wallet":"{WALLET}"}}"#),
        ),
        (
            "transaction",
            format!("Sent 0.0001 SOL to {WALLET}. Transaction ID: {SIGNATURE}"),
        ),
        (
            "token",
            format!(
                r#"Your token "Meta School" with symbol "MSC" and a supply of 1,000,000 was successfully deployed. The mint address is {WALLET}"#
            ),
        ),
        (
            "prose",
            "I will use the solana tool to check. Your wallet holds no SPL tokens yet. ".repeat(20),
        ),
    ];

    let mut group = c.benchmark_group("parser");
    for (name, reply) in &replies {
        group.bench_function(BenchmarkId::new("classify", name), |b| {
            b.iter(|| classify(reply))
        });
        group.bench_function(BenchmarkId::new("clean_reply", name), |b| {
            b.iter(|| clean_reply(reply))
        });
    }
    let transaction = &replies[1].1;
    group.bench_function("highlight_transaction", |b| {
        b.iter(|| highlight(transaction, None))
    });
    group.finish();
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
