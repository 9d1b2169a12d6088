use tokio::signal;

/// Resolves on Ctrl+C so the server can drain in-flight requests. If the
/// handler cannot be installed the server simply runs until killed.
pub async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("unable to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }

    #[cfg(not(windows))]
    println!();
    tracing::info!("Ctrl+C received, shutting down.");
}
