use tokio::signal;
use tracing::info;

/// Which signal asked the process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

/// Resolves on the first ctrl-c or, on unix, SIGTERM. Fails when a handler
/// cannot be installed.
pub async fn shutdown_signal() -> std::io::Result<StopSignal> {
    #[cfg(unix)]
    let terminated = {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        async move { terminate.recv().await }
    };

    #[cfg(not(unix))]
    let terminated = std::future::pending::<Option<()>>();

    let stop = tokio::select! {
        result = signal::ctrl_c() => {
            result?;
            StopSignal::Interrupt
        }
        _ = terminated => StopSignal::Terminate,
    };
    info!("Received {:?}, stopping", stop);
    Ok(stop)
}
