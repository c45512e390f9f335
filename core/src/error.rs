//! Error types for the profile API client.
//!
//! # Design
//! `ApiError` is the network error family: anything that went wrong between
//! building a request and holding a parsed payload. `NotFound` gets a
//! dedicated variant because callers frequently distinguish "the resource does
//! not exist" from "the server returned an unexpected status." Local input
//! problems never reach the network and live in [`ValidationError`].

use thiserror::Error;

/// Errors returned by `ProfileClient` parse methods and by transports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Client-side input rejections. The `Display` text is what the user sees.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Error loading profile")]
    ProfileNotLoaded,
    #[error("First name is invalid!")]
    FirstName,
    #[error("Email is invalid!")]
    Email,
    #[error("Phone number is invalid!")]
    Phone,
    #[error("You must have an image if you want to upload!")]
    MissingPicture,
    #[error("File size must be less than 5MB")]
    PictureTooLarge { size: usize },
    #[error("Only image files are allowed")]
    NotAnImage { content_type: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is set but empty")]
    Empty { var: &'static str },
    #[error("{var} must start with http:// or https://, got {value:?}")]
    Scheme { var: &'static str, value: String },
}
