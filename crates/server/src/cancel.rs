//! Racing collaborator calls against request cancellation.

use crate::error::{EngineError, Result};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Await `call`, or give up with `Cancelled` as soon as `cancel` fires.
///
/// Cancellation wins when both are ready.
pub(crate) async fn run_cancellable<T, E, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    EngineError: From<E>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(EngineError::Cancelled),
        result = call => result.map_err(EngineError::from),
    }
}

/// `Cancelled` if `cancel` has already fired
pub(crate) fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(EngineError::Cancelled)
    } else {
        Ok(())
    }
}
