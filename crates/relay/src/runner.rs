//! The event loop.
//!
//! Drives a [`MessageHandler`] from a stream of inbound messages until a
//! shutdown future resolves, then runs the goodbye sequence.

use bot_core::{ChatClient, InboundMessage};
use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::handler::{HandleResult, MessageHandler};

/// Run the handler over an inbound event stream until shutdown.
///
/// Events are handled strictly one at a time, matching the serialization
/// guarantee of the surrounding platform. When `shutdown` resolves, the
/// handler's shutdown sequence runs (nickname reset, goodbye, stats) and
/// this returns `Ok`. A stream that ends on its own is an error.
pub async fn run_with_shutdown<C, E, S>(
    handler: &MessageHandler<C>,
    events: E,
    shutdown: S,
) -> Result<(), RelayError>
where
    C: ChatClient,
    E: Stream<Item = InboundMessage>,
    S: std::future::Future<Output = ()>,
{
    info!("relay started");

    tokio::pin!(events);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("shutdown signal received");
                handler.shutdown().await;
                return Ok(());
            }

            event = events.next() => {
                match event {
                    Some(msg) => match handler.handle(&msg).await {
                        HandleResult::Replied { channel_id, .. } => {
                            debug!(%channel_id, "replied");
                        }
                        HandleResult::Command => {
                            debug!("command handled");
                        }
                        HandleResult::Skipped { reason } => {
                            debug!(reason, "skipped");
                        }
                        HandleResult::Failed(e) => {
                            // Log and keep serving
                            warn!("error handling message: {}", e);
                        }
                    },
                    None => {
                        warn!("message stream ended");
                        return Err(RelayError::StreamEnded);
                    }
                }
            }
        }
    }
}
