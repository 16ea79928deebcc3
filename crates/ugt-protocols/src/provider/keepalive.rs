//! Stall heartbeat for adapter streams.

use std::time::Duration;

use futures::StreamExt;

use super::FragmentStream;
use crate::types::StreamSignal;

/// Default silence before a keep-alive is emitted.
pub const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(15);

/// Yield [`StreamSignal::KeepAlive`] whenever `inner` has been silent for
/// `period` while still open.
pub fn with_keepalive(inner: FragmentStream, period: Duration) -> FragmentStream {
    Box::pin(async_stream::stream! {
        let mut inner = inner;
        loop {
            match tokio::time::timeout(period, inner.next()).await {
                Ok(Some(item)) => yield item,
                Ok(None) => break,
                Err(_) => yield Ok(StreamSignal::KeepAlive),
            }
        }
    })
}

#[cfg(test)]
#[path = "keepalive_tests.rs"]
mod tests;
