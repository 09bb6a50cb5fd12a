//! Weatherlet core: extraction pipeline and the pure refresh state machine.
mod config;
mod effect;
pub mod entities;
mod measure;
mod msg;
mod pattern;
mod state;
mod update;
mod view_model;

pub use config::{ConfigError, DeskletConfig, MeasureConfig, DEFAULT_DELAY_SECONDS};
pub use effect::Effect;
pub use entities::{decode, decode_entities};
pub use measure::{
    FooterConfig, Measure, MeasureSet, MeasureValue, MeasurementModel, FOOTER_LABEL,
};
pub use msg::{FetchResult, Msg};
pub use pattern::{extract_first_group, matches, Pattern};
pub use state::{CycleOutcome, DeskletState, FetchFailure, Generation, HeaderState, Phase};
pub use update::update;
pub use view_model::{
    DeskletViewModel, DisplayValue, FooterView, MeasureRowView, LOADING_TEXT, OFFLINE_TEXT,
};
