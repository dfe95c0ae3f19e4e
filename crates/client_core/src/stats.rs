//! The four summary statistics shown on the dashboard, derived from the
//! current snapshot. Ties are broken by day order and per-day slot order so
//! the values are stable across renders.

use shared::domain::PanelId;

use crate::types::Snapshot;

pub const PANEL_TOTAL_INTERVIEWS: PanelId = PanelId(1);
pub const PANEL_LEAST_POPULAR_SLOT: PanelId = PanelId(2);
pub const PANEL_MOST_POPULAR_DAY: PanelId = PanelId(3);
pub const PANEL_INTERVIEWS_PER_DAY: PanelId = PanelId(4);

const EMPTY_VALUE: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct StatPanel {
    pub id: PanelId,
    pub label: &'static str,
    pub value: String,
}

/// The four panels, in display order.
pub fn summary_panels(snapshot: &Snapshot) -> Vec<StatPanel> {
    vec![
        StatPanel {
            id: PANEL_TOTAL_INTERVIEWS,
            label: "Total Interviews",
            value: total_interviews(snapshot).to_string(),
        },
        StatPanel {
            id: PANEL_LEAST_POPULAR_SLOT,
            label: "Least Popular Time Slot",
            value: least_popular_time_slot(snapshot)
                .unwrap_or_else(|| EMPTY_VALUE.to_string()),
        },
        StatPanel {
            id: PANEL_MOST_POPULAR_DAY,
            label: "Most Popular Day",
            value: most_popular_day(snapshot).unwrap_or_else(|| EMPTY_VALUE.to_string()),
        },
        StatPanel {
            id: PANEL_INTERVIEWS_PER_DAY,
            label: "Interviews Per Day",
            value: format!("{:.1}", interviews_per_day(snapshot)),
        },
    ]
}

/// The panels to render: all four, or just the focused one.
pub fn visible_panels(snapshot: &Snapshot) -> Vec<StatPanel> {
    let panels = summary_panels(snapshot);
    match snapshot.focus {
        Some(focus) => panels.into_iter().filter(|panel| panel.id == focus).collect(),
        None => panels,
    }
}

pub fn total_interviews(snapshot: &Snapshot) -> usize {
    snapshot
        .appointments
        .values()
        .filter(|appointment| appointment.interview.is_some())
        .count()
}

/// The slot label with the fewest booked interviews, first-seen wins ties.
pub fn least_popular_time_slot(snapshot: &Snapshot) -> Option<String> {
    let mut slots: Vec<(String, usize)> = Vec::new();
    for day in &snapshot.days {
        for id in &day.appointments {
            let Some(appointment) = snapshot.appointments.get(id) else {
                continue;
            };
            let booked = usize::from(appointment.interview.is_some());
            match slots
                .iter_mut()
                .find(|(time, _)| *time == appointment.time)
            {
                Some((_, count)) => *count += booked,
                None => slots.push((appointment.time.clone(), booked)),
            }
        }
    }

    let mut least: Option<(String, usize)> = None;
    for (time, count) in slots {
        let replace = match &least {
            Some((_, least_count)) => count < *least_count,
            None => true,
        };
        if replace {
            least = Some((time, count));
        }
    }
    least.map(|(time, _)| time)
}

/// The day name with the most booked interviews, first day wins ties.
pub fn most_popular_day(snapshot: &Snapshot) -> Option<String> {
    let mut most: Option<(&str, usize)> = None;
    for day in &snapshot.days {
        let booked = day
            .appointments
            .iter()
            .filter_map(|id| snapshot.appointments.get(id))
            .filter(|appointment| appointment.interview.is_some())
            .count();
        let replace = match most {
            Some((_, most_booked)) => booked > most_booked,
            None => true,
        };
        if replace {
            most = Some((&day.name, booked));
        }
    }
    most.map(|(name, _)| name.to_string())
}

pub fn interviews_per_day(snapshot: &Snapshot) -> f64 {
    if snapshot.days.is_empty() {
        return 0.0;
    }
    total_interviews(snapshot) as f64 / snapshot.days.len() as f64
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use shared::{
        domain::{AppointmentId, DayId, InterviewerId},
        protocol::{Appointment, Day, Interview},
    };

    use super::*;

    fn slot(id: i64, time: &str, student: Option<&str>) -> Appointment {
        Appointment {
            id: AppointmentId(id),
            time: time.to_string(),
            interview: student.map(|student| Interview {
                student: student.to_string(),
                interviewer: InterviewerId(1),
            }),
        }
    }

    fn day(id: i64, name: &str, appointments: &[i64]) -> Day {
        Day {
            id: DayId(id),
            name: name.to_string(),
            appointments: appointments.iter().map(|&id| AppointmentId(id)).collect(),
            spots: 0,
        }
    }

    fn sample_snapshot() -> Snapshot {
        // Monday:  12pm booked, 1pm open
        // Tuesday: 12pm booked, 1pm booked
        // Wednesday: 2pm booked
        let appointments: HashMap<_, _> = [
            slot(1, "12pm", Some("Archie")),
            slot(2, "1pm", None),
            slot(3, "12pm", Some("Lydia")),
            slot(4, "1pm", Some("Chad")),
            slot(5, "2pm", Some("Jamal")),
        ]
        .into_iter()
        .map(|appointment| (appointment.id, appointment))
        .collect();

        Snapshot {
            loading: false,
            focus: None,
            days: vec![
                day(1, "Monday", &[1, 2]),
                day(2, "Tuesday", &[3, 4]),
                day(3, "Wednesday", &[5]),
            ],
            appointments,
            interviewers: HashMap::new(),
        }
    }

    #[test]
    fn counts_total_interviews() {
        assert_eq!(total_interviews(&sample_snapshot()), 4);
    }

    #[test]
    fn least_popular_slot_has_fewest_bookings() {
        // 12pm has 2 bookings, 1pm has 1, 2pm has 1; 1pm is seen first.
        assert_eq!(
            least_popular_time_slot(&sample_snapshot()),
            Some("1pm".to_string())
        );
    }

    #[test]
    fn most_popular_day_has_most_bookings() {
        assert_eq!(
            most_popular_day(&sample_snapshot()),
            Some("Tuesday".to_string())
        );
    }

    #[test]
    fn most_popular_day_tie_goes_to_the_first_day() {
        let mut snapshot = sample_snapshot();
        // book Monday's open slot so Monday and Tuesday both have 2
        snapshot
            .appointments
            .get_mut(&AppointmentId(2))
            .expect("slot 2")
            .interview = Some(Interview {
            student: "Maria".to_string(),
            interviewer: InterviewerId(2),
        });

        assert_eq!(most_popular_day(&snapshot), Some("Monday".to_string()));
    }

    #[test]
    fn interviews_per_day_averages_over_all_days() {
        let value = interviews_per_day(&sample_snapshot());
        assert!((value - 4.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_schedule_renders_placeholder_values() {
        let snapshot = Snapshot {
            loading: false,
            ..Snapshot::default()
        };
        let panels = summary_panels(&snapshot);
        assert_eq!(panels.len(), 4);
        assert_eq!(panels[0].value, "0");
        assert_eq!(panels[1].value, "-");
        assert_eq!(panels[2].value, "-");
        assert_eq!(panels[3].value, "0.0");
    }

    #[test]
    fn panels_carry_stable_ids_and_labels() {
        let panels = summary_panels(&sample_snapshot());
        assert_eq!(
            panels
                .iter()
                .map(|panel| (panel.id, panel.label))
                .collect::<Vec<_>>(),
            vec![
                (PanelId(1), "Total Interviews"),
                (PanelId(2), "Least Popular Time Slot"),
                (PanelId(3), "Most Popular Day"),
                (PanelId(4), "Interviews Per Day"),
            ]
        );
    }

    #[test]
    fn focusing_filters_to_a_single_panel() {
        let mut snapshot = sample_snapshot();
        snapshot.focus = Some(PANEL_MOST_POPULAR_DAY);

        let visible = visible_panels(&snapshot);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].label, "Most Popular Day");

        snapshot.focus = None;
        assert_eq!(visible_panels(&snapshot).len(), 4);
    }
}
