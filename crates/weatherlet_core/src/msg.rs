use crate::{DeskletConfig, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Settings were loaded or edited.
    ConfigChanged(DeskletConfig),
    /// The host finished running the effects of the last `ConfigChanged`.
    ReconfigureApplied,
    /// The refresh timer armed for `generation` fired.
    RefreshDue { generation: Generation },
    /// The fetch started for `generation` finished.
    FetchCompleted {
        generation: Generation,
        result: FetchResult,
    },
    /// The desklet was removed from the desktop.
    Teardown,
}

impl Msg {
    /// Variant name, for logging without dumping page bodies.
    pub fn name(&self) -> &'static str {
        match self {
            Msg::ConfigChanged(_) => "ConfigChanged",
            Msg::ReconfigureApplied => "ReconfigureApplied",
            Msg::RefreshDue { .. } => "RefreshDue",
            Msg::FetchCompleted { .. } => "FetchCompleted",
            Msg::Teardown => "Teardown",
        }
    }
}

/// Outcome of one fetch as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success(String),
    HttpError(u16),
    /// The request never produced a response; the message is for logs only.
    TransportFailure(String),
}
