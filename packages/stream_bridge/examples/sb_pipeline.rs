//! Feeds a list of lines through two adapters and collects the result.

use std::time::Duration;

use stream_bridge::{Adapter, Capacity, Completion, adapt, drain_timeout, to_stream};

fn main() {
    let lines = vec![
        "  the quick brown fox  ",
        "jumps over",
        "   the lazy dog",
    ];
    let line_count = lines.len();

    // A small buffer keeps the producer from running far ahead of the pipeline.
    let source = to_stream(lines, 1).into_receiver();

    let trimmed = adapt(source, |line: &str| line.trim().to_owned());

    let (trimmed_rx, _trimmed_worker) = trimmed.into_parts();
    let counted = Adapter::builder()
        .output_capacity(Capacity::Unbounded)
        .name("word-counter")
        .build()
        .adapt(trimmed_rx, |line: String| {
            let words = line.split_whitespace().count();
            (line, words)
        });

    let results = drain_timeout(&counted, line_count, Duration::from_secs(5))
        .expect("pipeline delivers one result per line");

    for (line, words) in &results {
        println!("{words} words: {line}");
    }

    assert_eq!(counted.join().expect("no transform panicked"), Completion::Finished);
}
