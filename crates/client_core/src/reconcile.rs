use shared::{domain::AppointmentId, protocol::Interview};

use crate::types::Snapshot;

/// Applies a single appointment patch to a snapshot.
///
/// Returns a new snapshot equal to the input in every field except
/// `appointments[id].interview`, which becomes `interview`. Ids not present
/// in the snapshot are ignored and the input is returned unchanged; the push
/// source is not authenticated against the current fetch.
pub fn apply_interview(
    snapshot: &Snapshot,
    id: AppointmentId,
    interview: Option<Interview>,
) -> Snapshot {
    if !snapshot.appointments.contains_key(&id) {
        return snapshot.clone();
    }

    let mut next = snapshot.clone();
    if let Some(appointment) = next.appointments.get_mut(&id) {
        appointment.interview = interview;
    }
    next
}
