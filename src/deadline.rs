//! Caller-supplied deadline support for gateway calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{RagError, Result};

/// Run `fut` under an optional deadline.
///
/// When the deadline elapses the in-flight future is dropped and
/// [`RagError::Cancelled`] is returned.
pub(crate) async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| RagError::Cancelled)?,
        None => fut.await,
    }
}
