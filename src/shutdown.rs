use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const RETRY_DELAY: Duration = Duration::from_millis(200);

/// Resolves on the first Ctrl-C or SIGTERM.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Keeps asking the dispatcher to stop until it accepts, then waits for it
/// to finish. A dispatcher that is still starting up refuses the request.
pub async fn stop_dispatcher<F, Fut, E>(mut shutdown: F)
where
    F: FnMut() -> Result<Fut, E>,
    Fut: Future<Output = ()>,
    E: Display,
{
    loop {
        match shutdown() {
            Ok(done) => {
                log::info!("Waiting for in-flight updates to finish...");
                done.await;
                return;
            }
            Err(e) => {
                log::debug!("Dispatcher refused shutdown, retrying: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
