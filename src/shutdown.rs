use tokio_util::sync::CancellationToken;

/// Install a Ctrl-C handler for the scheduling loop.
///
/// Returns a `CancellationToken` that is cancelled when the signal arrives.
/// The loop stops launching and exits; already-running job processes are
/// left alone, since a launched job cannot be cancelled.
pub fn install_shutdown_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let handler_token = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl-C, stopping the scheduling loop");
            handler_token.cancel();
        }
    });

    token
}
