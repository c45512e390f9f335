//! User-profile API client and state store.
//!
//! # Overview
//! `ProfileClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). A
//! [`Transport`] supplied by the host executes the round-trips, and
//! [`ProfileStore`] sequences them into the user-facing operations: load,
//! update, delete, picture upload and password reset.
//!
//! # Design
//! - `ProfileClient` is stateless; it holds only `base_url`.
//! - Each API operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable without a server.
//! - `ProfileStore` publishes a `StoreState` over a watch channel, releases
//!   `busy` on every exit path, and abandons pending work when its
//!   cancellation scope ends.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::ProfileClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{AvailabilityCheck, Navigator, Outcome, ProfileStore, StoreOptions, StoreState};
pub use transport::{Transport, UsersGateway};
pub use types::{EmailAvailability, PictureUpload, Profile, ProfilePicture, Session, UpdateProfile, UserId};
pub use validation::ProfileForm;
