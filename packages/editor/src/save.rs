//! # Debounced persistence
//!
//! Authoring surfaces touch the saver on every committed command; the
//! saver coalesces bursts and runs the save callback once the document has
//! been quiet for the configured window (trailing edge). `flush` forces a
//! pending save through immediately, and teardown guarantees no callback
//! fires afterwards.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::warn;

enum Msg {
    Touch,
    Flush(oneshot::Sender<()>),
    Shutdown { flush: bool, done: oneshot::Sender<()> },
}

pub struct DebouncedSaver {
    tx: mpsc::UnboundedSender<Msg>,
}

impl DebouncedSaver {
    /// Spawn the saver worker. `save` runs on the worker task each time the
    /// debounce window elapses with a pending touch.
    pub fn spawn<F>(window: Duration, mut save: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Msg>();

        tokio::spawn(async move {
            let mut deadline: Option<Instant> = None;

            loop {
                let timer = async {
                    match deadline {
                        Some(at) => sleep_until(at).await,
                        None => std::future::pending::<()>().await,
                    }
                };

                tokio::select! {
                    _ = timer => {
                        deadline = None;
                        save();
                    }
                    msg = rx.recv() => match msg {
                        Some(Msg::Touch) => {
                            // Trailing edge: every touch restarts the window
                            deadline = Some(Instant::now() + window);
                        }
                        Some(Msg::Flush(ack)) => {
                            if deadline.take().is_some() {
                                save();
                            }
                            let _ = ack.send(());
                        }
                        Some(Msg::Shutdown { flush, done }) => {
                            if flush && deadline.take().is_some() {
                                save();
                            }
                            let _ = done.send(());
                            return;
                        }
                        None => return,
                    }
                }
            }
        });

        Self { tx }
    }

    /// Record a change; the save fires once the window elapses quietly
    pub fn touch(&self) {
        if self.tx.send(Msg::Touch).is_err() {
            warn!("saver worker is gone; touch dropped");
        }
    }

    /// Run any pending save now and wait for it
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Msg::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    /// Stop the worker. With `flush` a pending save runs first; either way
    /// no save fires after this returns.
    pub async fn shutdown(self, flush: bool) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Msg::Shutdown { flush, done: ack }).is_ok() {
            let _ = done.await;
        }
    }
}
