//! Worker Lifecycle
//!
//! A supervisor drives a worker through its lifecycle while other tasks wait
//! for the phases they care about.
//!
//! Key concepts:
//! - Waiting for a state to be entered and to be left
//! - Cancelling a wait with a token
//! - Releasing the set to unblock everyone
//!
//! Run with: cargo run --example worker_lifecycle

use state_gate::{state_enum, StateError, StateSet};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Lifecycle {
        Starting,
        Ready,
        Draining,
        Stopped,
    }
}

#[tokio::main]
async fn main() -> Result<(), StateError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Worker Lifecycle ===\n");

    let lifecycle = Arc::new(StateSet::new(
        Lifecycle::Starting,
        [Lifecycle::Ready, Lifecycle::Draining, Lifecycle::Stopped],
    )?);
    let shutdown = CancellationToken::new();

    let client = tokio::spawn({
        let lifecycle = Arc::clone(&lifecycle);
        let shutdown = shutdown.clone();
        async move {
            lifecycle.wait_for(&shutdown, &Lifecycle::Ready).await?;
            println!("client: worker is ready, sending requests");
            lifecycle
                .wait_for_exit(&shutdown, &Lifecycle::Ready)
                .await?;
            println!("client: worker left Ready, backing off");
            Ok::<_, StateError>(())
        }
    });

    let impatient = tokio::spawn({
        let lifecycle = Arc::clone(&lifecycle);
        async move {
            match lifecycle
                .wait_for_within(&Lifecycle::Stopped, Duration::from_millis(50))
                .await
            {
                Err(StateError::TimedOut(after)) => {
                    println!("monitor: gave up waiting for Stopped after {after:?}")
                }
                other => println!("monitor: {other:?}"),
            }
        }
    });

    let straggler = tokio::spawn({
        let lifecycle = Arc::clone(&lifecycle);
        async move {
            let outcome = lifecycle
                .wait_for(&CancellationToken::new(), &Lifecycle::Starting)
                .await;
            println!("straggler: {outcome:?}");
        }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    for next in [Lifecycle::Ready, Lifecycle::Draining, Lifecycle::Stopped] {
        lifecycle.transit(&next)?;
        println!("supervisor: now {:?}", lifecycle.current());
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    client.await.expect("client task panicked")?;
    impatient.await.expect("monitor task panicked");

    println!("\nPath: {:?}", lifecycle.history().get_path());

    // The straggler waits for a state that will never return.
    lifecycle.release();
    straggler.await.expect("straggler task panicked");

    println!("\n=== Example Complete ===");
    Ok(())
}
