use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Above the client's 5MB picture limit; axum's default is 2MB.
const BODY_LIMIT: usize = 8 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub profile_picture_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAvailability {
    pub exists: bool,
    pub user_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    pub profile_picture_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub user_id: u64,
}

#[derive(Debug, Default)]
pub struct Db {
    pub users: RwLock<HashMap<u64, Profile>>,
    pub password_resets: RwLock<Vec<u64>>,
}

impl Db {
    pub fn with_users(users: impl IntoIterator<Item = (u64, Profile)>) -> Arc<Self> {
        Arc::new(Self {
            users: RwLock::new(users.into_iter().collect()),
            password_resets: RwLock::default(),
        })
    }
}

pub fn app() -> Router {
    app_with(Arc::default())
}

pub fn app_with(db: Arc<Db>) -> Router {
    Router::new()
        .route("/users/profile/{user_id}", get(get_profile))
        .route("/users/check-email/{email}", get(check_email))
        .route("/users/profile", post(update_profile))
        .route("/users/profile/delete/{profile_id}", delete(delete_profile))
        .route("/users/profile/picture/", post(upload_picture))
        .route("/auth/reset-password", post(reset_password))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(db)
}

/// A single demo account for manual runs.
pub fn demo_db() -> Arc<Db> {
    Db::with_users([(
        313456,
        Profile {
            first_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "5551234567".to_string(),
            profile_picture_url: String::new(),
        },
    )])
}

pub async fn run(listener: TcpListener, db: Arc<Db>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

async fn get_profile(State(db): State<Arc<Db>>, Path(user_id): Path<u64>) -> Result<Json<Profile>, StatusCode> {
    let users = db.users.read().await;
    users.get(&user_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn check_email(State(db): State<Arc<Db>>, Path(email): Path<String>) -> Json<EmailAvailability> {
    let users = db.users.read().await;
    let owner = users
        .iter()
        .find(|(_, p)| p.email.eq_ignore_ascii_case(&email))
        .map(|(id, _)| *id);
    debug!(%email, ?owner, "check-email");
    Json(EmailAvailability {
        exists: owner.is_some(),
        user_id: owner.unwrap_or(0),
    })
}

async fn update_profile(
    State(db): State<Arc<Db>>,
    headers: HeaderMap,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<Profile>, StatusCode> {
    let user_id: u64 = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let mut users = db.users.write().await;
    if let Some(email) = &input.email {
        let taken = users
            .iter()
            .any(|(id, p)| *id != user_id && p.email.eq_ignore_ascii_case(email));
        if taken {
            return Err(StatusCode::CONFLICT);
        }
    }
    let profile = users.get_mut(&user_id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(first_name) = input.first_name {
        profile.first_name = first_name;
    }
    if let Some(email) = input.email {
        profile.email = email;
    }
    if let Some(phone) = input.phone {
        profile.phone = phone;
    }
    info!(user_id, "profile updated");
    Ok(Json(profile.clone()))
}

async fn delete_profile(State(db): State<Arc<Db>>, Path(profile_id): Path<u64>) -> StatusCode {
    let mut users = db.users.write().await;
    match users.remove(&profile_id) {
        Some(_) => {
            info!(profile_id, "profile deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn upload_picture(
    State(db): State<Arc<Db>>,
    mut multipart: Multipart,
) -> Result<Json<ProfilePicture>, StatusCode> {
    let mut user_id: Option<u64> = None;
    let mut file_name: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        match field.name() {
            Some("userId") => {
                let text = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                user_id = Some(text.trim().parse().map_err(|_| StatusCode::BAD_REQUEST)?);
            }
            Some("profilePicture") => {
                let name = field.file_name().unwrap_or("picture").to_string();
                let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                if bytes.is_empty() {
                    return Err(StatusCode::BAD_REQUEST);
                }
                file_name = Some(name);
            }
            _ => {}
        }
    }
    let (Some(user_id), Some(file_name)) = (user_id, file_name) else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let mut users = db.users.write().await;
    let profile = users.get_mut(&user_id).ok_or(StatusCode::NOT_FOUND)?;
    profile.profile_picture_url = format!("/uploads/{user_id}/{}-{file_name}", Uuid::new_v4().simple());
    info!(user_id, url = %profile.profile_picture_url, "picture stored");
    Ok(Json(ProfilePicture {
        profile_picture_url: profile.profile_picture_url.clone(),
    }))
}

async fn reset_password(State(db): State<Arc<Db>>, Json(input): Json<PasswordReset>) -> StatusCode {
    if !db.users.read().await.contains_key(&input.user_id) {
        return StatusCode::NOT_FOUND;
    }
    db.password_resets.write().await.push(input.user_id);
    info!(user_id = input.user_id, "password reset queued");
    StatusCode::ACCEPTED
}
