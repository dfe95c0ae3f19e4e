use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use shared::{
    domain::{AppointmentId, InterviewerId, PanelId},
    protocol::{Appointment, Day, Interview, Interviewer, PushMessage},
};
use tokio::{
    sync::{broadcast, mpsc, Mutex},
    task::JoinHandle,
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

pub mod error;
mod focus_store;
mod reconcile;
pub mod stats;
pub mod types;

pub use error::ConnectError;
pub use focus_store::{DurableFocusStore, EphemeralFocusStore, FocusStore};
pub use reconcile::apply_interview;
pub use types::Snapshot;

const EVENT_CHANNEL_CAPACITY: usize = 1024;
const PATCH_CHANNEL_CAPACITY: usize = 256;

/// Notifications fanned out to dashboard subscribers.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// The bulk fetch completed and the snapshot left `loading`.
    ScheduleLoaded,
    /// A push patch changed one appointment's interview.
    AppointmentUpdated { id: AppointmentId },
    FocusChanged(Option<PanelId>),
    ConnectionClosed,
    Error(String),
}

struct DashboardState {
    snapshot: Snapshot,
    /// Patches received before the bulk fetch completed, in arrival order.
    pending_patches: Vec<(AppointmentId, Option<Interview>)>,
}

struct PushConnection {
    reader_task: JoinHandle<()>,
    reconcile_task: JoinHandle<()>,
}

impl PushConnection {
    fn abort(&self) {
        self.reader_task.abort();
        self.reconcile_task.abort();
    }

    fn is_finished(&self) -> bool {
        self.reader_task.is_finished() && self.reconcile_task.is_finished()
    }
}

/// Owns the dashboard view state and keeps it current.
///
/// The snapshot is populated once by [`load_schedule`](Self::load_schedule)
/// and then maintained by patches arriving over the push channel opened by
/// [`connect`](Self::connect). Each patch flows through the pure
/// [`apply_interview`] reconciler; patches that arrive while the schedule is
/// still loading are buffered and applied in arrival order once the fetch
/// completes.
pub struct DashboardClient {
    http: Client,
    server_url: String,
    focus_store: Arc<dyn FocusStore>,
    inner: Mutex<DashboardState>,
    push_connection: Mutex<Option<PushConnection>>,
    events: broadcast::Sender<DashboardEvent>,
}

impl DashboardClient {
    pub fn new(server_url: impl Into<String>, focus_store: Arc<dyn FocusStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            http: Client::new(),
            server_url: server_url.into(),
            focus_store,
            inner: Mutex::new(DashboardState {
                snapshot: Snapshot::default(),
                pending_patches: Vec::new(),
            }),
            push_connection: Mutex::new(None),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.lock().await.snapshot.clone()
    }

    /// Restores the saved focus, then populates the snapshot from the three
    /// bulk endpoints.
    ///
    /// The join is all-or-nothing: if any request fails the snapshot stays
    /// in `loading` and the failure is both emitted as an event and returned.
    pub async fn load_schedule(&self) -> Result<()> {
        self.restore_saved_focus().await;

        let loaded = tokio::try_join!(
            self.fetch_days(),
            self.fetch_appointments(),
            self.fetch_interviewers(),
        );
        let (days, appointments, interviewers) = match loaded {
            Ok(parts) => parts,
            Err(err) => {
                let _ = self
                    .events
                    .send(DashboardEvent::Error(format!("schedule fetch failed: {err:#}")));
                return Err(err);
            }
        };

        info!(
            day_count = days.len(),
            appointment_count = appointments.len(),
            interviewer_count = interviewers.len(),
            "schedule loaded"
        );

        let mut guard = self.inner.lock().await;
        guard.snapshot.days = days;
        guard.snapshot.appointments = appointments;
        guard.snapshot.interviewers = interviewers;
        guard.snapshot.loading = false;
        let _ = self.events.send(DashboardEvent::ScheduleLoaded);

        let buffered = std::mem::take(&mut guard.pending_patches);
        if !buffered.is_empty() {
            debug!(
                patch_count = buffered.len(),
                "applying patches buffered during load"
            );
        }
        for (id, interview) in buffered {
            self.apply_patch_locked(&mut guard, id, interview);
        }

        Ok(())
    }

    /// Toggles the focused statistic panel and persists the result.
    ///
    /// Selecting the focused panel again clears the focus; selecting a
    /// different panel replaces it.
    pub async fn select_panel(&self, id: PanelId) -> Result<()> {
        let next = {
            let mut guard = self.inner.lock().await;
            let next = guard.snapshot.toggled_focus(id);
            guard.snapshot.focus = next;
            next
        };
        let _ = self.events.send(DashboardEvent::FocusChanged(next));
        self.focus_store
            .save_focus(next)
            .await
            .context("failed to persist focus selection")?;
        Ok(())
    }

    /// Opens the push channel and starts applying live updates.
    ///
    /// The connection is a scoped resource: it stays open until
    /// [`disconnect`](Self::disconnect) or until the server closes it. No
    /// reconnection is attempted.
    pub async fn connect(self: &Arc<Self>) -> std::result::Result<(), ConnectError> {
        let ws_url = push_endpoint(&self.server_url)?;
        let (ws_stream, _) = connect_async(&ws_url)
            .await
            .map_err(|err| ConnectError::Connect(format!("{ws_url}: {err}")))?;
        let (_, mut ws_reader) = ws_stream.split();

        let (patch_tx, mut patch_rx) =
            mpsc::channel::<(AppointmentId, Option<Interview>)>(PATCH_CHANNEL_CAPACITY);

        let events = self.events.clone();
        let reader_task = tokio::spawn(async move {
            while let Some(frame) = ws_reader.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<PushMessage>(&text) {
                        Ok(PushMessage::SetInterview { id, interview }) => {
                            if patch_tx.send((id, interview)).await.is_err() {
                                break;
                            }
                        }
                        Ok(PushMessage::Other) => {
                            debug!("ignoring push message with unrecognized type tag");
                        }
                        Err(err) => {
                            debug!("ignoring undecodable push message: {err}");
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        let _ = events.send(DashboardEvent::Error(format!(
                            "push channel receive failed: {err}"
                        )));
                        break;
                    }
                }
            }
            let _ = events.send(DashboardEvent::ConnectionClosed);
        });

        let client = Arc::clone(self);
        let reconcile_task = tokio::spawn(async move {
            while let Some((id, interview)) = patch_rx.recv().await {
                client.apply_patch(id, interview).await;
            }
        });

        let previous = self.push_connection.lock().await.replace(PushConnection {
            reader_task,
            reconcile_task,
        });
        if let Some(previous) = previous {
            previous.abort();
        }
        info!(url = %ws_url, "push channel connected");
        Ok(())
    }

    /// Releases the push channel, if one is open.
    pub async fn disconnect(&self) {
        if let Some(connection) = self.push_connection.lock().await.take() {
            let was_live = !connection.is_finished();
            connection.abort();
            if was_live {
                let _ = self.events.send(DashboardEvent::ConnectionClosed);
            }
        }
    }

    async fn restore_saved_focus(&self) {
        match self.focus_store.load_focus().await {
            Ok(Some(panel)) => {
                self.inner.lock().await.snapshot.focus = Some(panel);
                let _ = self.events.send(DashboardEvent::FocusChanged(Some(panel)));
            }
            Ok(None) => {}
            Err(err) => {
                warn!("failed to read saved focus; starting unfocused: {err:#}");
            }
        }
    }

    async fn apply_patch(&self, id: AppointmentId, interview: Option<Interview>) {
        let mut guard = self.inner.lock().await;
        if guard.snapshot.loading {
            debug!(
                appointment_id = id.0,
                "buffering patch until the schedule load completes"
            );
            guard.pending_patches.push((id, interview));
            return;
        }
        self.apply_patch_locked(&mut guard, id, interview);
    }

    fn apply_patch_locked(
        &self,
        state: &mut DashboardState,
        id: AppointmentId,
        interview: Option<Interview>,
    ) {
        if !state.snapshot.appointments.contains_key(&id) {
            debug!(appointment_id = id.0, "ignoring patch for unknown appointment");
            return;
        }
        state.snapshot = reconcile::apply_interview(&state.snapshot, id, interview);
        let _ = self.events.send(DashboardEvent::AppointmentUpdated { id });
    }

    async fn fetch_days(&self) -> Result<Vec<Day>> {
        let days = self
            .http
            .get(format!("{}/api/days", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(days)
    }

    async fn fetch_appointments(&self) -> Result<HashMap<AppointmentId, Appointment>> {
        let appointments = self
            .http
            .get(format!("{}/api/appointments", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(appointments)
    }

    async fn fetch_interviewers(&self) -> Result<HashMap<InterviewerId, Interviewer>> {
        let interviewers = self
            .http
            .get(format!("{}/api/interviewers", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(interviewers)
    }
}

fn push_endpoint(server_url: &str) -> std::result::Result<String, ConnectError> {
    let ws_base = if server_url.starts_with("https://") {
        server_url.replacen("https://", "wss://", 1)
    } else if server_url.starts_with("http://") {
        server_url.replacen("http://", "ws://", 1)
    } else {
        return Err(ConnectError::InvalidServerUrl(server_url.to_string()));
    };
    Ok(format!("{ws_base}/ws"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
