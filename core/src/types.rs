//! Domain DTOs for the users API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates. Wire
//! names are camelCase.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a user account, owned by the session.
pub type UserId = u64;

/// A user's profile as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub profile_picture_url: String,
}

/// Request payload for updating the caller's profile. `None` is sent as
/// `null` and means "no change requested".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Result of an email availability lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailAvailability {
    pub exists: bool,
    pub user_id: UserId,
}

/// Response of a profile picture upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    pub profile_picture_url: String,
}

/// Request payload for triggering a password-reset email.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub user_id: UserId,
}

/// The signed-in user on whose behalf store operations run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// A picture selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
