use std::sync::mpsc;
use std::thread;

use desklet_logging::desklet_debug;
use weatherlet_core::{Effect, FetchResult, Msg};
use weatherlet_engine::{EngineEvent, EngineHandle, FetchError, FetchedText};

/// Runs core effects against the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        events: mpsc::Receiver<EngineEvent>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        spawn_event_loop(events, msg_tx);
        Self { engine }
    }

    /// Runs effects in order. Returns true when the batch ends a
    /// reconfiguration; the caller must feed `Msg::ReconfigureApplied` back
    /// into `update` before taking the next queued message.
    #[must_use]
    pub fn run(&self, effects: Vec<Effect>) -> bool {
        let mut acknowledge = false;
        for effect in effects {
            match effect {
                Effect::CancelTimer => self.engine.cancel_timer(),
                Effect::CancelFetch => self.engine.cancel_fetch(),
                Effect::StartFetch { generation, url } => {
                    desklet_debug!("StartFetch generation={} url={}", generation, url);
                    self.engine.start_fetch(generation, url);
                }
                Effect::ScheduleRefresh { generation, delay } => {
                    desklet_debug!("ScheduleRefresh generation={} in {:?}", generation, delay);
                    self.engine.schedule(generation, delay);
                }
                Effect::AcknowledgeReconfigure => acknowledge = true,
            }
        }
        acknowledge
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

fn spawn_event_loop(events: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        for event in events {
            if msg_tx.send(to_msg(event)).is_err() {
                break;
            }
        }
    });
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FetchCompleted { generation, result } => Msg::FetchCompleted {
            generation,
            result: to_fetch_result(result),
        },
        EngineEvent::TimerFired { generation } => Msg::RefreshDue { generation },
    }
}

fn to_fetch_result(result: Result<FetchedText, FetchError>) -> FetchResult {
    match result {
        Ok(fetched) => FetchResult::Success(fetched.text),
        Err(err) => match err.http_status() {
            Some(code) => FetchResult::HttpError(code),
            None => {
                desklet_debug!("Transport failure kind={:?}", err.kind);
                FetchResult::TransportFailure(err.to_string())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use weatherlet_engine::{FailureKind, FetchMetadata, FetchSettings};

    use super::*;

    #[test]
    fn http_status_maps_to_http_error() {
        let err = FetchError::new(FailureKind::HttpStatus(404), "Not Found");
        assert_eq!(to_fetch_result(Err(err)), FetchResult::HttpError(404));
    }

    #[test]
    fn other_failures_map_to_transport_failure() {
        let err = FetchError::new(FailureKind::Timeout, "deadline");
        assert_eq!(
            to_fetch_result(Err(err)),
            FetchResult::TransportFailure("timeout: deadline".to_string())
        );
    }

    #[test]
    fn success_carries_decoded_text() {
        let fetched = FetchedText {
            text: "Temp: 72F".to_string(),
            encoding_label: "UTF-8".to_string(),
            metadata: FetchMetadata {
                original_url: "http://x".to_string(),
                final_url: "http://x".to_string(),
                status: 200,
                content_type: None,
                byte_len: 9,
            },
        };
        assert_eq!(
            to_fetch_result(Ok(fetched)),
            FetchResult::Success("Temp: 72F".to_string())
        );
    }

    #[test]
    fn timer_event_maps_to_refresh_due() {
        assert_eq!(
            to_msg(EngineEvent::TimerFired { generation: 7 }),
            Msg::RefreshDue { generation: 7 }
        );
    }

    #[test]
    fn run_reports_pending_acknowledgement() {
        let (msg_tx, msg_rx) = mpsc::channel();
        let (engine, events) = EngineHandle::new(FetchSettings::default()).unwrap();
        let runner = EffectRunner::new(engine, events, msg_tx);

        assert!(!runner.run(vec![Effect::CancelTimer]));
        assert!(runner.run(vec![Effect::CancelTimer, Effect::AcknowledgeReconfigure]));
        // The acknowledgement is never queued behind other messages.
        assert!(msg_rx.try_recv().is_err());
        runner.shutdown();
    }
}
