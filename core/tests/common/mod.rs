//! Scripted in-memory transport shared by the store tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use profile_core::store::Navigator;
use profile_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Profile, ProfileClient, Transport, UsersGateway};
use tokio::sync::Notify;

pub const BASE_URL: &str = "http://api.test";

/// What the transport does with the next request.
pub enum Reply {
    Respond(HttpResponse),
    Fail(&'static str),
    /// Answer only after the notify fires.
    Held(Arc<Notify>, HttpResponse),
    /// Never answer.
    Hang,
}

pub fn ok(body: impl Into<String>) -> Reply {
    Reply::Respond(HttpResponse::new(200, body))
}

pub fn status(code: u16) -> Reply {
    Reply::Respond(HttpResponse::new(code, ""))
}

pub fn profile_json(first_name: &str, email: &str, phone: &str, url: &str) -> String {
    serde_json::json!({
        "firstName": first_name,
        "email": email,
        "phone": phone,
        "profilePictureUrl": url,
    })
    .to_string()
}

pub fn profile(first_name: &str, email: &str, phone: &str, url: &str) -> Profile {
    Profile {
        first_name: first_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        profile_picture_url: url.to_string(),
    }
}

pub fn availability(exists: bool, user_id: u64) -> Reply {
    ok(serde_json::json!({ "exists": exists, "userId": user_id }).to_string())
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        })
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `(method, path without base url)` for every request seen so far.
    pub fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path.trim_start_matches(BASE_URL).to_string()))
            .collect()
    }

    pub async fn wait_for_requests(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.requests.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("requests never arrived");
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front().expect("unscripted request");
        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(reason) => Err(ApiError::Transport(reason.to_string())),
            Reply::Held(notify, response) => {
                notify.notified().await;
                Ok(response)
            }
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub fn gateway(transport: &Arc<ScriptedTransport>) -> UsersGateway<Arc<ScriptedTransport>> {
    UsersGateway::new(ProfileClient::new(BASE_URL), transport.clone())
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub paths: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}
