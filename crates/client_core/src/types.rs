use std::collections::HashMap;

use shared::{
    domain::{AppointmentId, InterviewerId, PanelId},
    protocol::{Appointment, Day, Interviewer},
};

/// The complete in-memory view state at a point in time.
///
/// Owned exclusively by the [`DashboardClient`](crate::DashboardClient);
/// everything else receives clones.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub loading: bool,
    pub focus: Option<PanelId>,
    pub days: Vec<Day>,
    pub appointments: HashMap<AppointmentId, Appointment>,
    pub interviewers: HashMap<InterviewerId, Interviewer>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            loading: true,
            focus: None,
            days: Vec::new(),
            appointments: HashMap::new(),
            interviewers: HashMap::new(),
        }
    }
}

impl Snapshot {
    pub fn is_ready(&self) -> bool {
        !self.loading
    }

    /// Single-selection focus toggle: picking the focused panel again clears
    /// the focus, picking any other panel replaces it.
    pub fn toggled_focus(&self, id: PanelId) -> Option<PanelId> {
        if self.focus == Some(id) {
            None
        } else {
            Some(id)
        }
    }
}
