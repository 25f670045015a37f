//! Line-mode follower
//!
//! Prints the mirrored board each time a new snapshot arrives.

use crate::game::Follower;
use crate::output::print_snapshot;
use crate::sync::Subscription;
use anyhow::Result;
use tracing::info;

/// Mirror snapshots until the subscription closes or Ctrl+C
///
/// # Errors
///
/// Returns an error if the Ctrl+C handler cannot be installed.
pub async fn run_watch(mut follower: Follower, subscription: Option<Subscription>) -> Result<()> {
    println!("👀 Following the master's board (Ctrl+C to stop)\n");
    if follower.applied() > 0 {
        print_snapshot(follower.view());
    }

    let Some(mut subscription) = subscription else {
        println!("No relay connection, nothing to follow.");
        return Ok(());
    };

    loop {
        tokio::select! {
            message = subscription.next() => match message {
                Some(envelope) => {
                    if follower.receive(&envelope) {
                        print_snapshot(follower.view());
                    }
                }
                None => {
                    println!("\nRelay connection closed.");
                    break;
                }
            },
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    info!(applied = follower.applied(), "watch finished");
    Ok(())
}
