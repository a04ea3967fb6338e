use tokio::signal;

/// Resolves when the process receives Ctrl+C (SIGINT) or, on unix, SIGTERM.
///
/// Meant to be handed to [`CancellationSignal::spawn_trigger`], which turns it
/// into exactly one cancellation. If a handler cannot be installed, that
/// source is logged and ignored rather than cancelling the run.
///
/// [`CancellationSignal::spawn_trigger`]: drainpool::CancellationSignal::spawn_trigger
pub async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                core::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = core::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            core::future::pending::<()>().await;
        }
    };

    let name = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };

    tracing::warn!("Received signal: {name}. Shutting down gracefully...");
}
