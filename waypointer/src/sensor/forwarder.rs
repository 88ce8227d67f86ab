//! Tasks that pipe sensor streams into the reactor.
//!
//! Each stream gets its own task and its own cancellation token, so
//! position and heading can be stopped independently. Cancelling a
//! forwarder only stops further updates; the last value it delivered stays
//! in the reactor until something explicitly invalidates it.
//!
//! # Usage
//!
//! ```ignore
//! let position_cancel = CancellationToken::new();
//! let heading_cancel = CancellationToken::new();
//!
//! let positions = spawn_position_forwarder(&feed, reactor.clone(), position_cancel.clone());
//! let headings = spawn_heading_forwarder(&feed, reactor.clone(), heading_cancel.clone());
//!
//! // Compass switched off: heading stops, position keeps flowing
//! heading_cancel.cancel();
//! ```

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::reactor::{ReactorEvent, ReactorHandle};

use super::{SensorFeed, SensorStream};

/// Subscribe to position fixes and forward them to the reactor.
///
/// The subscription is made before this returns, so a fix already known to
/// the feed is the first thing forwarded.
pub fn spawn_position_forwarder<F>(
    feed: &F,
    reactor: ReactorHandle,
    cancellation: CancellationToken,
) -> JoinHandle<u64>
where
    F: SensorFeed + ?Sized,
{
    let stream = feed.position_updates();
    tokio::spawn(forward(
        stream,
        reactor,
        cancellation,
        "position",
        ReactorEvent::Position,
    ))
}

/// Subscribe to heading readings and forward them to the reactor.
pub fn spawn_heading_forwarder<F>(
    feed: &F,
    reactor: ReactorHandle,
    cancellation: CancellationToken,
) -> JoinHandle<u64>
where
    F: SensorFeed + ?Sized,
{
    let stream = feed.heading_updates();
    tokio::spawn(forward(
        stream,
        reactor,
        cancellation,
        "heading",
        ReactorEvent::Heading,
    ))
}

/// Forwarding loop. Resolves to the number of updates forwarded.
async fn forward<T>(
    mut stream: SensorStream<T>,
    reactor: ReactorHandle,
    cancellation: CancellationToken,
    channel: &'static str,
    to_event: fn(T) -> ReactorEvent,
) -> u64 {
    let mut forwarded: u64 = 0;

    loop {
        tokio::select! {
            biased;

            _ = cancellation.cancelled() => {
                debug!(channel, forwarded, "Sensor forwarder cancelled");
                break;
            }

            update = stream.next() => {
                let Some(update) = update else {
                    debug!(channel, forwarded, "Sensor stream ended");
                    break;
                };

                if reactor.send(to_event(update)).is_err() {
                    debug!(channel, forwarded, "Reactor closed, stopping forwarder");
                    break;
                }
                forwarded += 1;
            }
        }
    }

    forwarded
}
