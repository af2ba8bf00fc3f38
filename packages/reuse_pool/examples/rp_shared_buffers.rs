//! A pool of byte buffers shared between threads.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use reuse_pool::Pool;

fn main() {
    let pool = Arc::new(Pool::new(|| Vec::<u8>::with_capacity(8 * 1024)));

    let workers = (0..4)
        .map(|worker_index| {
            let pool = Arc::clone(&pool);

            thread::spawn(move || {
                for message_index in 0..100 {
                    let mut buffer = pool.rent();
                    write!(buffer, "worker {worker_index} message {message_index}").unwrap();
                    assert!(buffer.starts_with(b"worker"));
                }
            })
        })
        .collect::<Vec<_>>();

    for worker in workers {
        worker.join().unwrap();
    }

    let stats = pool.stats();
    println!(
        "acquired {} buffers, constructed only {} of them",
        stats.acquired(),
        stats.misses
    );
}
