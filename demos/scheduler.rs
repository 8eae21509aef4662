use std::time::{Duration, Instant};

use retry_recover::{retry, retry_async, Failure, RetryOptions};

#[derive(Debug)]
struct Reschedule;

fn main() -> anyhow::Result<()> {
    // Blocking: tick five times, 200 ms apart. `retry` sleeps the thread, so
    // it runs before any runtime exists.
    let started = Instant::now();
    let mut on_error = |failure: Failure<Reschedule>| {
        if let Failure::Recovered(recovered) = failure {
            println!("tick panicked: {:?}", recovered.panic_message());
        }
    };
    retry(
        || {
            println!("tick at {:?}", started.elapsed());
            Err(Reschedule)
        },
        5,
        Some(&mut on_error),
        Some(Duration::from_millis(200)),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let polls = runtime.block_on(poll_until_ready());
    println!("ready after {polls} polls");

    Ok(())
}

/// Polls until the third attempt reports ready.
async fn poll_until_ready() -> u32 {
    let mut polls = 0u32;
    retry_async(
        &RetryOptions::unbounded().with_period(Duration::from_millis(100)),
        || {
            polls += 1;
            let ready = polls >= 3;
            async move {
                if ready {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("not ready"))
                }
            }
        },
        |failure| println!("poll failed: {failure}"),
    )
    .await;
    polls
}
