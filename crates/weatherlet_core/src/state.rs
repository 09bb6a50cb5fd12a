use std::fmt;
use std::time::Duration;

use crate::measure::{MeasureValue, MeasurementModel};
use crate::view_model::{DeskletViewModel, DisplayValue, FooterView, MeasureRowView};
use crate::DeskletConfig;

/// Identifies one applied configuration. Completions and timer firings that
/// carry an older generation belong to a discarded cycle.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No configuration has been applied yet.
    #[default]
    Unconfigured,
    /// Waiting for the refresh timer.
    Idle,
    /// Exactly one fetch is outstanding.
    Fetching,
    /// Torn down; every further message is ignored.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderState {
    #[default]
    Normal,
    Offline,
    Error,
}

/// Classification of the last completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Online,
    Offline,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Http(u16),
    Transport(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Http(code) => write!(f, "http status {code}"),
            FetchFailure::Transport(message) => write!(f, "transport failure: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeskletState {
    phase: Phase,
    generation: Generation,
    reconfiguring: bool,
    config: Option<DeskletConfig>,
    model: MeasurementModel,
    header: HeaderState,
    last_outcome: Option<CycleOutcome>,
    last_failure: Option<FetchFailure>,
    values: Vec<DisplayValue>,
    footer: Option<DisplayValue>,
    dirty: bool,
}

impl DeskletState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_reconfiguring(&self) -> bool {
        self.reconfiguring
    }

    pub fn config(&self) -> Option<&DeskletConfig> {
        self.config.as_ref()
    }

    pub fn model(&self) -> &MeasurementModel {
        &self.model
    }

    pub fn view(&self) -> DeskletViewModel {
        let rows = self
            .model
            .measures()
            .iter()
            .zip(&self.values)
            .map(|(measure, value)| MeasureRowView {
                measure: measure.config.clone(),
                value: value.clone(),
            })
            .collect();
        let footer = self
            .model
            .footer()
            .zip(self.footer.as_ref())
            .map(|(footer, value)| FooterView {
                label: footer.label.to_string(),
                value: value.clone(),
            });

        DeskletViewModel {
            phase: self.phase,
            header: self.header,
            last_outcome: self.last_outcome,
            last_failure: self.last_failure.clone(),
            rows,
            footer,
            generation: self.generation,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn url(&self) -> Option<&str> {
        self.config.as_ref().map(|c| c.url.as_str())
    }

    pub(crate) fn delay(&self) -> Duration {
        self.config
            .as_ref()
            .map(DeskletConfig::delay)
            .unwrap_or_default()
    }

    /// Swaps in a freshly built model and resets every slot to "Loading...".
    pub(crate) fn apply_config(&mut self, config: DeskletConfig) -> Generation {
        self.model = MeasurementModel::from_config(&config);
        self.values = self
            .model
            .measures()
            .iter()
            .map(|m| {
                if m.config.is_separator {
                    DisplayValue::Separator
                } else {
                    DisplayValue::Loading
                }
            })
            .collect();
        self.footer = self.model.footer().map(|_| DisplayValue::Loading);
        self.config = Some(config);
        self.header = HeaderState::Normal;
        self.last_outcome = None;
        self.last_failure = None;
        self.generation += 1;
        self.dirty = true;
        self.generation
    }

    pub(crate) fn set_reconfiguring(&mut self, reconfiguring: bool) {
        self.reconfiguring = reconfiguring;
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.phase = Phase::Fetching;
    }

    pub(crate) fn publish_online(&mut self, text: &str) {
        self.values = self
            .model
            .build_display_values(text)
            .into_iter()
            .map(to_display)
            .collect();
        self.footer = self.model.footer_value(text).map(to_display);
        self.finish_cycle(HeaderState::Normal, CycleOutcome::Online, None);
    }

    /// Measure values keep whatever they showed before.
    pub(crate) fn publish_offline(&mut self) {
        self.finish_cycle(HeaderState::Offline, CycleOutcome::Offline, None);
    }

    /// Measure values keep whatever they showed before.
    pub(crate) fn publish_error(&mut self, failure: FetchFailure) {
        self.finish_cycle(HeaderState::Error, CycleOutcome::Errored, Some(failure));
    }

    pub(crate) fn stop(&mut self) {
        self.phase = Phase::Stopped;
        self.reconfiguring = false;
    }

    fn finish_cycle(
        &mut self,
        header: HeaderState,
        outcome: CycleOutcome,
        failure: Option<FetchFailure>,
    ) {
        self.header = header;
        self.last_outcome = Some(outcome);
        self.last_failure = failure;
        self.phase = Phase::Idle;
        self.dirty = true;
    }
}

fn to_display(value: MeasureValue) -> DisplayValue {
    match value {
        MeasureValue::Separator => DisplayValue::Separator,
        MeasureValue::Matched(text) => DisplayValue::Value(text),
        MeasureValue::NoMatch => DisplayValue::Empty,
    }
}
