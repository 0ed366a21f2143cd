//! Debounce timers for automatic checks.

use tower_lsp::lsp_types::Url;
use tracing::debug;

use padlint_core::TimerRequest;

use crate::Backend;

/// Sleeps for the requested delay, then reports the timer to the session.
///
/// Timers are never cancelled; a superseded token is ignored when it fires.
pub fn spawn_debounced_check(backend: Backend, uri: Url, timer: TimerRequest) {
    debug!("Timer {} for {} in {:?}", timer.token.value(), uri, timer.delay);

    tokio::spawn(async move {
        tokio::time::sleep(timer.delay).await;
        backend.on_timer_fired(uri, timer.token).await;
    });
}
