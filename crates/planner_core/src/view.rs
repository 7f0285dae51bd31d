//! View collaborator contract.
//!
//! Renderers receive a finished `CycleReport` and never mutate it; the event
//! source feeds clicks back through `InteractionContext::click`.

use crate::service::interaction::CycleReport;

/// Renders one interaction cycle result.
pub trait ViewRenderer {
    type Error;

    fn render(&mut self, report: &CycleReport) -> Result<(), Self::Error>;
}

/// Announcement line for the number of days everybody can attend.
pub fn common_days_announcement(count: usize) -> String {
    match count {
        0 => "No common day yet.".to_string(),
        1 => "1 common day found.".to_string(),
        n => format!("{n} common days found."),
    }
}
