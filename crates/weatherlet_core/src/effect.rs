use std::time::Duration;

use crate::Generation;

/// Side effects requested by [`crate::update`]; the host runs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Drop the pending refresh timer, if any.
    CancelTimer,
    /// Abandon the outstanding fetch, if any. Its completion must not be delivered.
    CancelFetch,
    /// Issue exactly one GET of `url`; report back with `Msg::FetchCompleted`.
    StartFetch { generation: Generation, url: String },
    /// Arm a one-shot timer; report back with `Msg::RefreshDue`.
    ScheduleRefresh {
        generation: Generation,
        delay: Duration,
    },
    /// Reply with `Msg::ReconfigureApplied` once the preceding effects ran.
    AcknowledgeReconfigure,
}
