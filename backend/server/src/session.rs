use std::{collections::HashMap, time::Duration};

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "sessionid";
const TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub student_id: u64,
    pub student_name: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// A clock that moved backwards leaves the session alive.
    fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.created_at)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }
}

/// Logged-in students keyed by an opaque cookie token. Sessions older than the
/// ttl read as absent and are dropped on the next login.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, student_id: u64, student_name: String) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        let now = Utc::now();
        let session = Session {
            student_id,
            student_name,
            created_at: now,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.expired(now, self.ttl));
        sessions.insert(token.clone(), session);

        token
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        let now = Utc::now();

        self.sessions
            .read()
            .await
            .get(token)
            .filter(|session| !session.expired(now, self.ttl))
            .cloned()
    }

    pub async fn destroy(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, ttl: Duration) -> HeaderValue {
    // tokens are alphanumeric
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    ))
    .unwrap_or_else(|_| expired_cookie())
}

pub fn expired_cookie() -> HeaderValue {
    HeaderValue::from_static("sessionid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
