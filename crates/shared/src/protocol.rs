use serde::{Deserialize, Serialize};

use crate::domain::{AppointmentId, DayId, InterviewerId};

/// A booked interview slot: who is being interviewed, and by whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub student: String,
    pub interviewer: InterviewerId,
}

/// One schedulable slot. `interview` is `None` while the slot is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub time: String,
    #[serde(default)]
    pub interview: Option<Interview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interviewer {
    pub id: InterviewerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A day of the schedule. `appointments` preserves the backend's slot order;
/// `spots` is the backend's count of still-open slots for the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: DayId,
    pub name: String,
    pub appointments: Vec<AppointmentId>,
    pub spots: u32,
}

/// Messages arriving over the push channel.
///
/// Only `SET_INTERVIEW` is meaningful to the dashboard; every other type tag
/// lands on `Other` so unrecognized traffic is dropped instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PushMessage {
    SetInterview {
        id: AppointmentId,
        interview: Option<Interview>,
    },
    #[serde(other)]
    Other,
}
