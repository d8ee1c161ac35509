use telehub_core::result::AppResult;
use telehub_metrics::OutcomeTimer;
use tracing::warn;

/// Finish `timer` with the outcome of `result`.
pub(crate) fn report<T>(timer: OutcomeTimer, result: &AppResult<T>, operation: &str) {
    if let Err(e) = timer.finish(result.is_ok()) {
        warn!(operation, error = %e, "Failed to record request outcome");
    }
}
