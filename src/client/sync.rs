use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, warn};

use crate::client::api::{ClientError, RosterClient};
use crate::models::RosterSnapshot;
use crate::render::{self, RenderedRoster};

/// How long a status message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

pub const LOAD_FAILURE_TEXT: &str = "Failed to load activities. Please try again later.";
pub const SIGNUP_FAILURE_TEXT: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_FAILURE_TEXT: &str = "Failed to unregister. Please try again.";
pub const BUSY_TEXT: &str = "A request is already in progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

impl StatusMessage {
    fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < MESSAGE_TTL
    }
}

/// Enabled state of the mutation form. Clones share the same flag, so every
/// view bound to one form sees it disabled while a request is in flight.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    busy: Arc<AtomicBool>,
}

impl FormState {
    pub fn is_enabled(&self) -> bool {
        !self.busy.load(Ordering::Acquire)
    }

    /// Disables the form until the returned guard is dropped. `None` while
    /// another submission holds it.
    pub fn try_begin(&self) -> Option<SubmitGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Re-enables the form on drop, including when the submitting future is
/// cancelled.
#[derive(Debug)]
pub struct SubmitGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The server applied the change and the roster was reloaded.
    Applied,
    /// The server refused the change; its detail is the visible message.
    Rejected,
    /// The request never completed.
    NetworkFailure,
    /// Another submission was in flight; nothing was sent.
    Busy,
}

/// What the activity list area currently shows.
#[derive(Debug, Clone, Default)]
pub enum RosterView {
    #[default]
    NotLoaded,
    Loaded {
        roster: RosterSnapshot,
        rendered: RenderedRoster,
    },
    LoadFailed(String),
}

/// Local view of the roster as of the last fetch.
///
/// The list and the activity selector are only ever replaced wholesale from
/// a fresh `GET /activities`; nothing is patched locally after a mutation.
pub struct SyncSession {
    client: RosterClient,
    form: FormState,
    view: RosterView,
    message: Option<StatusMessage>,
}

impl SyncSession {
    pub fn new(client: RosterClient) -> Self {
        Self::with_form(client, FormState::default())
    }

    pub fn with_form(client: RosterClient, form: FormState) -> Self {
        Self {
            client,
            form,
            view: RosterView::NotLoaded,
            message: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn view(&self) -> &RosterView {
        &self.view
    }

    pub fn roster(&self) -> Option<&RosterSnapshot> {
        match &self.view {
            RosterView::Loaded { roster, .. } => Some(roster),
            _ => None,
        }
    }

    pub fn selector_options(&self) -> &[String] {
        match &self.view {
            RosterView::Loaded { rendered, .. } => &rendered.selector_options,
            _ => &[],
        }
    }

    pub fn visible_message(&self) -> Option<&StatusMessage> {
        self.visible_message_at(Instant::now())
    }

    pub fn visible_message_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.message.as_ref().filter(|m| m.is_visible_at(now))
    }

    /// Fetches the full roster and rebuilds the list and selector from it.
    pub async fn load(&mut self) -> bool {
        let roster = match self.client.fetch_roster().await {
            Ok(roster) => roster,
            Err(e) => {
                error!("Error fetching activities: {}", e);
                self.view = RosterView::LoadFailed(LOAD_FAILURE_TEXT.to_string());
                return false;
            }
        };

        match render::render_roster(&roster) {
            Ok(rendered) => {
                self.view = RosterView::Loaded { roster, rendered };
                true
            }
            Err(e) => {
                error!("Error rendering activities: {}", e);
                self.view = RosterView::LoadFailed(LOAD_FAILURE_TEXT.to_string());
                false
            }
        }
    }

    pub async fn submit_signup(&mut self, activity_name: &str, email: &str) -> MutationOutcome {
        let Some(_guard) = self.form.try_begin() else {
            self.show(BUSY_TEXT, MessageKind::Info);
            return MutationOutcome::Busy;
        };
        let result = self.client.signup(activity_name, email).await;
        self.settle(result, SIGNUP_FAILURE_TEXT).await
    }

    /// First step of an unregister. Nothing is sent until the returned
    /// confirmation is confirmed.
    pub fn request_unregister(
        &mut self,
        activity_name: &str,
        email: &str,
    ) -> UnregisterConfirmation<'_> {
        UnregisterConfirmation {
            session: self,
            activity_name: activity_name.to_string(),
            email: email.to_string(),
        }
    }

    async fn submit_unregister(&mut self, activity_name: &str, email: &str) -> MutationOutcome {
        let Some(_guard) = self.form.try_begin() else {
            self.show(BUSY_TEXT, MessageKind::Info);
            return MutationOutcome::Busy;
        };
        let result = self.client.unregister(activity_name, email).await;
        self.settle(result, UNREGISTER_FAILURE_TEXT).await
    }

    async fn settle(
        &mut self,
        result: Result<String, ClientError>,
        network_failure_text: &str,
    ) -> MutationOutcome {
        match result {
            Ok(message) => {
                self.show(message, MessageKind::Success);
                self.load().await;
                MutationOutcome::Applied
            }
            Err(ClientError::Rejected { status, detail }) => {
                warn!(status = %status, "roster request rejected: {}", detail);
                self.show(detail, MessageKind::Error);
                MutationOutcome::Rejected
            }
            Err(e) => {
                error!("roster request failed: {}", e);
                self.show(network_failure_text, MessageKind::Error);
                MutationOutcome::NetworkFailure
            }
        }
    }

    fn show(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.message = Some(StatusMessage::new(text, kind));
    }
}

/// A pending unregister awaiting an explicit yes or no.
#[must_use = "an unregister is only sent once confirmed"]
pub struct UnregisterConfirmation<'a> {
    session: &'a mut SyncSession,
    activity_name: String,
    email: String,
}

impl UnregisterConfirmation<'_> {
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to unregister {} from {}?",
            self.email, self.activity_name
        )
    }

    pub async fn confirm(self) -> MutationOutcome {
        self.session
            .submit_unregister(&self.activity_name, &self.email)
            .await
    }

    pub fn decline(self) {}
}
