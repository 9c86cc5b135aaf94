use tokio_util::sync::CancellationToken;

#[cfg(target_family = "unix")]
use tokio::signal::unix::SignalKind;

#[cfg(target_family = "unix")]
async fn unix_signal() {
    let listen = |kind: SignalKind| async move {
        match tokio::signal::unix::signal(kind) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!(?error, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = listen(SignalKind::terminate()) => (),
        () = listen(SignalKind::quit()) => (),
    }
}

async fn shutdown_signal() {
    #[cfg(target_family = "unix")]
    let second_signal = unix_signal();
    #[cfg(not(target_family = "unix"))]
    let second_signal = std::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => (),
        () = second_signal => (),
    }

    info!("received shutdown signal");
}

#[derive(Clone)]
pub struct Receiver {
    inner: CancellationToken,
}

impl Receiver {
    pub async fn wait(self) {
        self.inner.cancelled_owned().await;
    }
}

#[must_use]
pub fn shutdown() -> Receiver {
    let notifier = CancellationToken::new();

    {
        let notifier = notifier.clone();

        tokio::spawn(async move {
            shutdown_signal().await;
            notifier.cancel();
        });
    }

    Receiver { inner: notifier }
}
