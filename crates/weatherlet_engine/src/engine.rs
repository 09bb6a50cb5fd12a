use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use desklet_logging::{desklet_debug, desklet_warn};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::fetch::{fetch_text, FetchSettings, Fetcher, ReqwestFetcher};
use crate::{EngineEvent, FetchError, Generation};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

enum EngineCommand {
    StartFetch { generation: Generation, url: String },
    CancelFetch,
    Schedule { generation: Generation, delay: Duration },
    CancelTimer,
    Shutdown,
}

/// Owns the IO side of one desklet: a transport client, at most one
/// outstanding fetch and at most one pending timer.
///
/// Starting a fetch or arming a timer replaces (aborts) the previous one.
/// Completions are delivered on the receiver returned by the constructor.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let fetcher = ReqwestFetcher::new(settings)?;
        Self::with_fetcher(Arc::new(fetcher))
    }

    /// Builds an engine around an injected transport.
    pub fn with_fetcher(
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("weatherlet-io")
            .enable_all()
            .build()?;

        let worker = thread::Builder::new()
            .name("weatherlet-engine".to_string())
            .spawn(move || run_worker(runtime, fetcher, cmd_rx, event_tx))?;

        Ok((
            Self {
                cmd_tx,
                worker: Some(worker),
            },
            event_rx,
        ))
    }

    pub fn start_fetch(&self, generation: Generation, url: impl Into<String>) {
        self.send(EngineCommand::StartFetch {
            generation,
            url: url.into(),
        });
    }

    pub fn cancel_fetch(&self) {
        self.send(EngineCommand::CancelFetch);
    }

    pub fn schedule(&self, generation: Generation, delay: Duration) {
        self.send(EngineCommand::Schedule { generation, delay });
    }

    pub fn cancel_timer(&self) {
        self.send(EngineCommand::CancelTimer);
    }

    /// Aborts pending work and waits for the worker thread to exit.
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            desklet_warn!("Engine worker is gone; command dropped");
        }
    }

    fn stop_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.cmd_tx.send(EngineCommand::Shutdown);
            if worker.join().is_err() {
                desklet_warn!("Engine worker panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

fn run_worker(
    runtime: Runtime,
    fetcher: Arc<dyn Fetcher>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut fetch_task: Option<JoinHandle<()>> = None;
    let mut timer_task: Option<JoinHandle<()>> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::StartFetch { generation, url } => {
                abort(&mut fetch_task);
                desklet_debug!("Fetching generation={} url={}", generation, url);
                let fetcher = fetcher.clone();
                let event_tx = event_tx.clone();
                fetch_task = Some(runtime.spawn(async move {
                    let result = fetch_text(fetcher.as_ref(), &url).await;
                    let _ = event_tx.send(EngineEvent::FetchCompleted { generation, result });
                }));
            }
            EngineCommand::CancelFetch => abort(&mut fetch_task),
            EngineCommand::Schedule { generation, delay } => {
                abort(&mut timer_task);
                let event_tx = event_tx.clone();
                timer_task = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = event_tx.send(EngineEvent::TimerFired { generation });
                }));
            }
            EngineCommand::CancelTimer => abort(&mut timer_task),
            EngineCommand::Shutdown => break,
        }
    }

    abort(&mut fetch_task);
    abort(&mut timer_task);
    runtime.shutdown_background();
}

fn abort(task: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}
