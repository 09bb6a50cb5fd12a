use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use weatherlet_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher,
};

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(200);

/// Canned transport: answers every request with `body` after `delay`.
struct StubFetcher {
    body: Result<&'static str, u16>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubFetcher {
    fn ok(body: &'static str) -> Self {
        Self {
            body: Ok(body),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn status(code: u16) -> Self {
        Self {
            body: Err(code),
            ..Self::ok("")
        }
    }

    fn slow(body: &'static str, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok(body)
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match self.body {
            Ok(body) => Ok(FetchOutput {
                bytes: body.as_bytes().to_vec(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    status: 200,
                    content_type: Some("text/plain; charset=utf-8".to_string()),
                    byte_len: body.len() as u64,
                },
            }),
            Err(code) => Err(FetchError::new(
                FailureKind::HttpStatus(code),
                format!("status {code}"),
            )),
        }
    }
}

fn spawn(fetcher: StubFetcher) -> (EngineHandle, mpsc::Receiver<EngineEvent>, Arc<StubFetcher>) {
    desklet_logging::initialize_for_tests();
    let fetcher = Arc::new(fetcher);
    let (engine, events) = EngineHandle::with_fetcher(fetcher.clone()).expect("engine starts");
    (engine, events, fetcher)
}

#[test]
fn fetch_completion_carries_generation_and_text() {
    let (engine, events, _) = spawn(StubFetcher::ok("Temp: 72F\n"));
    engine.start_fetch(3, "http://x/report");

    match events.recv_timeout(WAIT).expect("completion") {
        EngineEvent::FetchCompleted { generation, result } => {
            assert_eq!(generation, 3);
            let fetched = result.expect("success");
            assert_eq!(fetched.text, "Temp: 72F\n");
            assert_eq!(fetched.metadata.final_url, "http://x/report");
        }
        other => panic!("unexpected event {other:?}"),
    }
    engine.shutdown();
}

#[test]
fn http_failure_is_reported_not_fatal() {
    let (engine, events, _) = spawn(StubFetcher::status(500));
    engine.start_fetch(1, "http://x");

    match events.recv_timeout(WAIT).expect("completion") {
        EngineEvent::FetchCompleted { result, .. } => {
            assert_eq!(result.unwrap_err().http_status(), Some(500));
        }
        other => panic!("unexpected event {other:?}"),
    }

    // The worker keeps serving after a failure.
    engine.start_fetch(2, "http://x");
    assert!(matches!(
        events.recv_timeout(WAIT),
        Ok(EngineEvent::FetchCompleted { generation: 2, .. })
    ));
}

#[test]
fn scheduled_timer_fires_once() {
    let (engine, events, _) = spawn(StubFetcher::ok(""));
    engine.schedule(4, Duration::from_millis(20));

    assert_eq!(
        events.recv_timeout(WAIT).expect("timer"),
        EngineEvent::TimerFired { generation: 4 }
    );
    assert!(events.recv_timeout(QUIET).is_err());
}

#[test]
fn cancelled_timer_never_fires() {
    let (engine, events, _) = spawn(StubFetcher::ok(""));
    engine.schedule(1, Duration::from_millis(50));
    engine.cancel_timer();

    assert!(events.recv_timeout(QUIET).is_err());
}

#[test]
fn rescheduling_replaces_pending_timer() {
    let (engine, events, _) = spawn(StubFetcher::ok(""));
    engine.schedule(1, Duration::from_millis(100));
    engine.schedule(2, Duration::from_millis(20));

    assert_eq!(
        events.recv_timeout(WAIT).expect("timer"),
        EngineEvent::TimerFired { generation: 2 }
    );
    assert!(events.recv_timeout(QUIET).is_err());
}

#[test]
fn cancelled_fetch_completion_is_dropped() {
    let (engine, events, fetcher) = spawn(StubFetcher::slow("late", Duration::from_millis(100)));
    engine.start_fetch(1, "http://x");
    std::thread::sleep(Duration::from_millis(20));
    engine.cancel_fetch();

    assert!(events.recv_timeout(QUIET + Duration::from_millis(100)).is_err());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn new_fetch_aborts_previous_one() {
    let (engine, events, _) = spawn(StubFetcher::slow("body", Duration::from_millis(80)));
    engine.start_fetch(1, "http://x");
    engine.start_fetch(2, "http://y");

    assert!(matches!(
        events.recv_timeout(WAIT),
        Ok(EngineEvent::FetchCompleted { generation: 2, .. })
    ));
    assert!(events.recv_timeout(QUIET).is_err());
}

#[test]
fn shutdown_stops_pending_work() {
    let (engine, events, _) = spawn(StubFetcher::ok(""));
    engine.schedule(1, Duration::from_millis(50));
    engine.shutdown();

    assert!(events.recv_timeout(QUIET).is_err());
}
