//! Async transport seam and the gateway that drives it.
//!
//! # Design
//! The core never opens a socket. A [`Transport`] executes one
//! `HttpRequest` and hands back the `HttpResponse`; [`UsersGateway`] pairs
//! each `ProfileClient::build_*` with its `parse_*` around that round-trip.
//! Non-2xx statuses are data at the transport level and become `ApiError`
//! only in the parse step.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::ProfileClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{EmailAvailability, PictureUpload, Profile, ProfilePicture, UpdateProfile, UserId};

/// Executes HTTP round-trips on behalf of the core.
///
/// Implementations return `Err(ApiError::Transport)` only when no response
/// was obtained at all; 4xx/5xx responses are returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request).await
    }
}

/// Typed async access to the users API.
#[derive(Debug, Clone)]
pub struct UsersGateway<T> {
    client: ProfileClient,
    transport: T,
}

impl<T: Transport> UsersGateway<T> {
    pub fn new(client: ProfileClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ProfileClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "Sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "Received response");
        Ok(response)
    }

    pub async fn fetch_profile(&self, user_id: UserId) -> Result<Profile, ApiError> {
        let response = self.send(self.client.build_fetch_profile(user_id)).await?;
        self.client.parse_fetch_profile(response)
    }

    pub async fn check_email_exists(&self, email: &str) -> Result<EmailAvailability, ApiError> {
        let response = self.send(self.client.build_check_email(email)).await?;
        self.client.parse_check_email(response)
    }

    pub async fn update_profile(&self, user_id: UserId, input: &UpdateProfile) -> Result<Profile, ApiError> {
        let request = self.client.build_update_profile(user_id, input)?;
        let response = self.send(request).await?;
        self.client.parse_update_profile(response)
    }

    pub async fn delete_profile(&self, profile_id: UserId) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_profile(profile_id)).await?;
        self.client.parse_delete_profile(response)
    }

    pub async fn upload_profile_picture(
        &self,
        user_id: UserId,
        picture: &PictureUpload,
    ) -> Result<ProfilePicture, ApiError> {
        let request = self.client.build_upload_profile_picture(user_id, picture);
        let response = self.send(request).await?;
        self.client.parse_upload_profile_picture(response)
    }

    pub async fn request_password_reset(&self, user_id: UserId) -> Result<(), ApiError> {
        let request = self.client.build_password_reset(user_id)?;
        let response = self.send(request).await?;
        self.client.parse_password_reset(response)
    }
}
