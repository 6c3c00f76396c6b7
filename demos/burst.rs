use chrono::Local;
use coalesce::{CoalescerBuilder, TokioHost};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

const CALLBACKS: u64 = 10_000;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let local = LocalSet::new();
    local
        .run_until(async {
            let timers = CoalescerBuilder::new().name("burst").build(TokioHost::new());
            let fired = Rc::new(Cell::new(0u64));
            let started = Instant::now();

            println!("[{}] scheduling {} callbacks over 2s", Local::now().format("%H:%M:%S%.3f"), CALLBACKS);
            for i in 0..CALLBACKS {
                let fired = fired.clone();
                let delay = (i * 7919) % 2_000;
                timers.schedule(move || fired.set(fired.get() + 1), delay);
            }

            while fired.get() < CALLBACKS {
                tokio::time::sleep(Duration::from_millis(250)).await;
                println!(
                    "[{}] fired {:>5} / {} (pending {})",
                    Local::now().format("%H:%M:%S%.3f"),
                    fired.get(),
                    CALLBACKS,
                    timers.len()
                );
            }

            let stats = timers.stats();
            println!("\n✅ Done in {:?}", started.elapsed());
            println!("   Host timers armed: {}", stats.arms);
            println!("   Batches drained:   {}", stats.batches);
            println!("   Callbacks fired:   {}", stats.fired);
        })
        .await;
}
