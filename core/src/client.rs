//! Stateless HTTP request builder and response parser for the users API.
//!
//! # Design
//! `ProfileClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! [`UsersGateway`](crate::transport::UsersGateway) glues the two halves
//! together over a transport.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{FormPart, HttpMethod, HttpRequest, HttpResponse, MultipartBody};
use crate::types::{EmailAvailability, PasswordReset, PictureUpload, Profile, ProfilePicture, UpdateProfile, UserId};

/// Header carrying the acting user for endpoints whose path has no user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Synchronous, stateless client for the users API.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    base_url: String,
}

impl ProfileClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_fetch_profile(&self, user_id: UserId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/users/profile/{user_id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_check_email(&self, email: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/users/check-email/{}", self.base_url, urlencoding::encode(email)),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_update_profile(&self, user_id: UserId, input: &UpdateProfile) -> Result<HttpRequest, ApiError> {
        let mut req = json_request(HttpMethod::Post, format!("{}/users/profile", self.base_url), input)?;
        req.headers.push((USER_ID_HEADER.to_string(), user_id.to_string()));
        Ok(req)
    }

    pub fn build_delete_profile(&self, profile_id: UserId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/users/profile/delete/{profile_id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_upload_profile_picture(&self, user_id: UserId, picture: &PictureUpload) -> HttpRequest {
        let body = MultipartBody::encode(&[
            FormPart::Text {
                name: "userId".to_string(),
                value: user_id.to_string(),
            },
            FormPart::File {
                name: "profilePicture".to_string(),
                file_name: picture.file_name.clone(),
                content_type: picture.content_type.clone(),
                bytes: picture.bytes.clone(),
            },
        ]);
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/users/profile/picture/", self.base_url),
            headers: vec![("content-type".to_string(), body.content_type())],
            body: Some(body.bytes),
        }
    }

    pub fn build_password_reset(&self, user_id: UserId) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Post,
            format!("{}/auth/reset-password", self.base_url),
            &PasswordReset { user_id },
        )
    }

    pub fn parse_fetch_profile(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_check_email(&self, response: HttpResponse) -> Result<EmailAvailability, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_update_profile(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_delete_profile(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_upload_profile_picture(&self, response: HttpResponse) -> Result<ProfilePicture, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    /// The response body is ignored on success.
    pub fn parse_password_reset(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn json_request<T: Serialize>(method: HttpMethod, path: String, input: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_vec(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
