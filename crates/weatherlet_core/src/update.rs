use desklet_logging::{desklet_debug, desklet_info, desklet_warn};

use crate::{DeskletState, Effect, FetchFailure, FetchResult, Generation, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
///
/// The refresh cycle re-arms itself only after a fetch completes, so a slow
/// station can never cause overlapping requests.
pub fn update(mut state: DeskletState, msg: Msg) -> (DeskletState, Vec<Effect>) {
    if state.phase() == Phase::Stopped {
        desklet_debug!("Ignoring {} after teardown", msg.name());
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::ConfigChanged(config) => {
            if state.is_reconfiguring() {
                desklet_warn!("Configuration change ignored: previous change still being applied");
                return (state, Vec::new());
            }
            let fetch_outstanding = state.phase() == Phase::Fetching;
            let url = config.url.clone();
            let generation = state.apply_config(config);
            state.set_reconfiguring(true);
            state.begin_fetch();
            desklet_info!("Applied configuration generation={} url={}", generation, url);

            let mut effects = Vec::with_capacity(4);
            effects.push(Effect::CancelTimer);
            if fetch_outstanding {
                effects.push(Effect::CancelFetch);
            }
            effects.push(Effect::StartFetch { generation, url });
            effects.push(Effect::AcknowledgeReconfigure);
            effects
        }
        Msg::ReconfigureApplied => {
            state.set_reconfiguring(false);
            Vec::new()
        }
        Msg::RefreshDue { generation } => {
            if !is_current(&state, generation) || state.phase() != Phase::Idle {
                desklet_debug!(
                    "Ignoring stale refresh generation={} current={} phase={:?}",
                    generation,
                    state.generation(),
                    state.phase()
                );
                return (state, Vec::new());
            }
            match state.url() {
                Some(url) => {
                    let url = url.to_string();
                    state.begin_fetch();
                    vec![Effect::StartFetch { generation, url }]
                }
                None => Vec::new(),
            }
        }
        Msg::FetchCompleted { generation, result } => {
            if !is_current(&state, generation) || state.phase() != Phase::Fetching {
                desklet_debug!(
                    "Discarding fetch result for generation={} current={}",
                    generation,
                    state.generation()
                );
                return (state, Vec::new());
            }
            classify(&mut state, result);
            vec![Effect::ScheduleRefresh {
                generation,
                delay: state.delay(),
            }]
        }
        Msg::Teardown => {
            desklet_info!("Teardown requested");
            let fetch_outstanding = state.phase() == Phase::Fetching;
            state.stop();
            let mut effects = vec![Effect::CancelTimer];
            if fetch_outstanding {
                effects.push(Effect::CancelFetch);
            }
            effects
        }
    };

    (state, effects)
}

fn classify(state: &mut DeskletState, result: FetchResult) {
    match result {
        FetchResult::Success(text) => {
            if state.model().is_offline(&text) {
                desklet_info!("Station reports offline");
                state.publish_offline();
            } else {
                desklet_debug!("Online; updating {} measures", state.model().measures().len());
                state.publish_online(&text);
            }
        }
        FetchResult::HttpError(code) => {
            desklet_warn!("Fetch failed with http status {}", code);
            state.publish_error(FetchFailure::Http(code));
        }
        FetchResult::TransportFailure(message) => {
            desklet_warn!("Fetch failed: {}", message);
            state.publish_error(FetchFailure::Transport(message));
        }
    }
}

fn is_current(state: &DeskletState, generation: Generation) -> bool {
    generation == state.generation()
}
