use crate::{CycleOutcome, FetchFailure, Generation, HeaderState, MeasureConfig, Phase};

pub const LOADING_TEXT: &str = "Loading...";
pub const OFFLINE_TEXT: &str = "Offline";

/// What a renderer shows in a value slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayValue {
    /// Nothing has been published since the last (re)configuration.
    #[default]
    Loading,
    Value(String),
    /// The last online cycle found no value for this slot.
    Empty,
    Separator,
}

impl DisplayValue {
    /// Text for the value label; separators have none.
    pub fn text(&self) -> Option<&str> {
        match self {
            DisplayValue::Loading => Some(LOADING_TEXT),
            DisplayValue::Value(value) => Some(value),
            DisplayValue::Empty => Some(""),
            DisplayValue::Separator => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeskletViewModel {
    pub phase: Phase,
    pub header: HeaderState,
    pub last_outcome: Option<CycleOutcome>,
    pub last_failure: Option<FetchFailure>,
    pub rows: Vec<MeasureRowView>,
    pub footer: Option<FooterView>,
    pub generation: Generation,
    pub dirty: bool,
}

impl DeskletViewModel {
    /// `(label, value)` pairs for non-separator rows, in display order.
    pub fn labeled_values(&self) -> Vec<(&str, Option<&str>)> {
        self.rows
            .iter()
            .filter(|row| row.value != DisplayValue::Separator)
            .map(|row| (row.measure.label.as_str(), row.value.text()))
            .collect()
    }
}

/// One measure row; the config rides along for its layout flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureRowView {
    pub measure: MeasureConfig,
    pub value: DisplayValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub label: String,
    pub value: DisplayValue,
}
