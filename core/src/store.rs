//! Observable profile state and the operations that mutate it.
//!
//! # Design
//! `ProfileStore` owns one [`StoreState`] behind a `tokio::sync::watch`
//! channel; the presentation layer subscribes and renders. Every operation
//! follows the same frame:
//!
//! 1. local gates (input validation) that never touch the network,
//! 2. `begin`: clear `error`/`message`, raise `busy`,
//! 3. one or more gateway calls, each raced against the store's
//!    cancellation scope,
//! 4. a terminal state write, after which the [`BusyGuard`] lowers `busy`.
//!
//! Network failures stop at this boundary: they are logged and turned into
//! the user-facing `error` string. Informational aborts (an email that is
//! already taken) land on `message` instead.
//!
//! A call made while another one is in flight is rejected rather than
//! interleaved; the check-and-set happens inside a single channel write.
//! Once the scope is cancelled the store goes quiet: in-flight chains are
//! abandoned at their current await point and the only write left is the
//! busy release. A local input failure reported while another operation is
//! in flight is rejected the same way as an overlapping call.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ApiError, ValidationError};
use crate::transport::{Transport, UsersGateway};
use crate::types::{PictureUpload, Profile, Session};
use crate::validation::{validate_picture, ProfileForm};

pub const LOAD_FAILED: &str = "Error loading profile";
pub const EMAIL_CHECK_FAILED: &str = "Validate Email Existance failed";
pub const EMAIL_IN_USE: &str = "This email is already being used.";
pub const EMAIL_TIED_TO_ACCOUNT: &str = "This email is tied to your account.";
pub const UPDATE_FAILED: &str = "Update profile failed";
pub const DELETE_FAILED: &str = "Error deleting profile";
pub const DELETED: &str = "Profile deleted successfully!";
pub const UPLOAD_FAILED: &str = "Error uploading profile picture";
pub const UPLOADED: &str = "Profile picture updated successfully!";
pub const RESET_FAILED: &str = "Error sending password reset";
pub const RESET_SENT: &str = "Password reset email sent!";

/// Where the consumer is sent after its profile is deleted.
pub const LOGIN_PATH: &str = "/login";

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub profile: Option<Profile>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub busy: bool,
}

/// How an operation settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran to its success path.
    Completed,
    /// A gate stopped the chain; the reason is on `message`.
    Aborted,
    /// A network call failed; the reason is on `error`.
    Failed,
    /// Local input was rejected before any request; the reason is on `error`.
    Invalid,
    /// Another operation was still in flight. State untouched.
    Rejected,
    /// The store's scope was cancelled. Only `busy` is written from that point.
    Cancelled,
}

/// Which address the update chain asks the availability endpoint about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityCheck {
    /// The email of the profile currently held by the store.
    #[default]
    StoredEmail,
    /// The email the user is submitting.
    EditedEmail,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub availability_check: AvailabilityCheck,
}

/// Hard navigation triggered by the store. Routing itself belongs to the host.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Navigator that only records the request in the log.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        info!(path, "Redirect requested");
    }
}

/// Lowers `busy` when dropped, whichever way the operation exits,
/// cancellation included.
struct BusyGuard<'a> {
    state: &'a watch::Sender<StoreState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.busy = false);
    }
}

pub struct ProfileStore<T> {
    gateway: UsersGateway<T>,
    state: watch::Sender<StoreState>,
    scope: CancellationToken,
    navigator: Arc<dyn Navigator>,
    options: StoreOptions,
}

impl<T: Transport> ProfileStore<T> {
    pub fn new(gateway: UsersGateway<T>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            gateway,
            state,
            scope: CancellationToken::new(),
            navigator: Arc::new(LogNavigator),
            options: StoreOptions::default(),
        }
    }

    /// Tie the store to an outer lifetime. The store holds a child of
    /// `scope`, so tearing the store down never cancels the outer token.
    pub fn with_scope(mut self, scope: CancellationToken) -> Self {
        self.scope = scope.child_token();
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn scope(&self) -> CancellationToken {
        self.scope.clone()
    }

    /// End the consumer's lifetime: pending chains are abandoned.
    pub fn teardown(&self) {
        info!("Store torn down");
        self.scope.cancel();
    }

    #[instrument(skip_all, fields(user_id = session.user_id))]
    pub async fn load_user_profile(&self, session: &Session) -> Outcome {
        let _busy = match self.begin("load_user_profile") {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        match self.guarded(self.gateway.fetch_profile(session.user_id)).await {
            None => Outcome::Cancelled,
            Some(Ok(profile)) => {
                info!("Profile loaded");
                self.apply(|s| s.profile = Some(profile));
                Outcome::Completed
            }
            Some(Err(e)) => {
                self.apply(|s| s.profile = None);
                self.fail(LOAD_FAILED, &e)
            }
        }
    }

    /// Validate `form`, then run the availability check and the update as
    /// one chain. The update is never sent unless the check succeeded and
    /// reported the address as free.
    #[instrument(skip_all, fields(user_id = session.user_id))]
    pub async fn update_profile(&self, session: &Session, form: &ProfileForm) -> Outcome {
        let current = self.state.borrow().profile.clone();
        let Some(current) = current else {
            return self.reject_input(ValidationError::ProfileNotLoaded);
        };
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => return self.reject_input(e),
        };
        let email = match self.options.availability_check {
            AvailabilityCheck::StoredEmail => current.email,
            AvailabilityCheck::EditedEmail => request.email.clone().unwrap_or_default(),
        };

        let _busy = match self.begin("update_profile") {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };

        debug!(%email, "Checking email availability");
        let availability = match self.guarded(self.gateway.check_email_exists(&email)).await {
            None => return Outcome::Cancelled,
            Some(Ok(availability)) => availability,
            Some(Err(e)) => return self.fail(EMAIL_CHECK_FAILED, &e),
        };
        if availability.exists && availability.user_id == session.user_id {
            return self.inform(EMAIL_TIED_TO_ACCOUNT);
        }
        if availability.exists {
            return self.inform(EMAIL_IN_USE);
        }

        debug!(?request, "Sending profile update");
        match self.guarded(self.gateway.update_profile(session.user_id, &request)).await {
            None => Outcome::Cancelled,
            Some(Ok(profile)) => {
                info!("Profile updated");
                self.apply(|s| s.profile = Some(profile));
                Outcome::Completed
            }
            Some(Err(e)) => self.fail(UPDATE_FAILED, &e),
        }
    }

    /// On success the consumer is redirected to the login page.
    #[instrument(skip_all, fields(user_id = session.user_id))]
    pub async fn delete_profile(&self, session: &Session) -> Outcome {
        let _busy = match self.begin("delete_profile") {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        match self.guarded(self.gateway.delete_profile(session.user_id)).await {
            None => Outcome::Cancelled,
            Some(Ok(())) => {
                info!("Profile deleted");
                self.apply(|s| {
                    s.profile = None;
                    s.message = Some(DELETED.to_string());
                });
                self.navigator.redirect(LOGIN_PATH);
                Outcome::Completed
            }
            Some(Err(e)) => self.fail(DELETE_FAILED, &e),
        }
    }

    /// Only the picture URL is merged onto the last known profile.
    #[instrument(skip_all, fields(user_id = session.user_id))]
    pub async fn upload_profile_picture(&self, session: &Session, picture: Option<&PictureUpload>) -> Outcome {
        let picture = match validate_picture(picture) {
            Ok(picture) => picture,
            Err(e) => return self.reject_input(e),
        };
        let _busy = match self.begin("upload_profile_picture") {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        match self
            .guarded(self.gateway.upload_profile_picture(session.user_id, picture))
            .await
        {
            None => Outcome::Cancelled,
            Some(Ok(uploaded)) => {
                info!(url = %uploaded.profile_picture_url, "Profile picture uploaded");
                self.apply(|s| {
                    if let Some(profile) = s.profile.as_mut() {
                        profile.profile_picture_url = uploaded.profile_picture_url;
                    }
                    s.message = Some(UPLOADED.to_string());
                });
                Outcome::Completed
            }
            Some(Err(e)) => self.fail(UPLOAD_FAILED, &e),
        }
    }

    #[instrument(skip_all, fields(user_id = session.user_id))]
    pub async fn send_password_reset(&self, session: &Session) -> Outcome {
        let _busy = match self.begin("send_password_reset") {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };
        match self.guarded(self.gateway.request_password_reset(session.user_id)).await {
            None => Outcome::Cancelled,
            Some(Ok(())) => {
                info!("Password reset requested");
                self.apply(|s| s.message = Some(RESET_SENT.to_string()));
                Outcome::Completed
            }
            Some(Err(e)) => self.fail(RESET_FAILED, &e),
        }
    }

    /// Reset status and raise `busy`, unless the store is gone or busy.
    fn begin(&self, operation: &'static str) -> Result<BusyGuard<'_>, Outcome> {
        if self.scope.is_cancelled() {
            return Err(Outcome::Cancelled);
        }
        let started = self.state.send_if_modified(|s| {
            if s.busy {
                return false;
            }
            s.error = None;
            s.message = None;
            s.busy = true;
            true
        });
        if !started {
            warn!(operation, "Rejected: another operation is in flight");
            return Err(Outcome::Rejected);
        }
        Ok(BusyGuard { state: &self.state })
    }

    /// Await `call` unless the scope is cancelled first.
    async fn guarded<F: Future>(&self, call: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.scope.cancelled() => {
                warn!("Chain abandoned: scope cancelled");
                None
            }
            output = call => Some(output),
        }
    }

    fn apply(&self, mutate: impl FnOnce(&mut StoreState)) {
        if self.scope.is_cancelled() {
            return;
        }
        self.state.send_modify(mutate);
    }

    fn fail(&self, reason: &'static str, err: &ApiError) -> Outcome {
        error!(error = %err, "{reason}");
        self.apply(|s| s.error = Some(reason.to_string()));
        Outcome::Failed
    }

    fn inform(&self, reason: &'static str) -> Outcome {
        warn!(reason, "Update aborted");
        self.apply(|s| s.message = Some(reason.to_string()));
        Outcome::Aborted
    }

    /// Report a local input failure, unless another operation owns the
    /// status channels right now.
    fn reject_input(&self, err: ValidationError) -> Outcome {
        if self.scope.is_cancelled() {
            return Outcome::Cancelled;
        }
        let reported = self.state.send_if_modified(|s| {
            if s.busy {
                return false;
            }
            s.error = Some(err.to_string());
            s.message = None;
            true
        });
        if !reported {
            warn!(error = %err, "Rejected: another operation is in flight");
            return Outcome::Rejected;
        }
        warn!(error = %err, "Input rejected");
        Outcome::Invalid
    }
}

impl<T> Drop for ProfileStore<T> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
