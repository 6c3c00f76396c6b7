use chrono::Local;
use coalesce::{CoalescerBuilder, TokioHost};
use std::time::Duration;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/config/coalescer.toml");

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let builder = CoalescerBuilder::with_toml(CONFIG_PATH)?;

    let local = LocalSet::new();
    local
        .run_until(async move {
            let timers = builder.build(TokioHost::new());

            for (label, delay) in [("first", 20), ("second", 22), ("third", 24), ("fourth", 60)] {
                timers.schedule(
                    move || println!("[{}] {} ({}ms)", Local::now().format("%H:%M:%S%.3f"), label, delay),
                    delay,
                );
            }
            println!("{} callbacks share {} deadlines", timers.len(), timers.registry().group_count());

            timers
                .schedule_in(|| println!("[{}] shorthand delay", Local::now().format("%H:%M:%S%.3f")), "100ms")
                .map_err(|e| e.to_string())?;

            tokio::time::sleep(Duration::from_millis(150)).await;
            println!("{:?}", timers.stats());
            Ok::<(), String>(())
        })
        .await?;

    Ok(())
}
