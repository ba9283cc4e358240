//! The single tracked avatar session and the store that owns it.

use crate::avatar::NewSession;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tokio::sync::Mutex;

/// The active avatar-streaming context, as returned to the browser client.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    /// Opaque WebRTC negotiation payload from the provider.
    pub sdp: Value,
    /// Opaque list of ICE servers from the provider.
    pub ice_servers: Value,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    started: Instant,
}

impl Session {
    pub fn new(remote: NewSession) -> Self {
        Self {
            session_id: remote.session_id,
            sdp: remote.sdp,
            ice_servers: remote.ice_servers,
            created_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Whole seconds since the session was created, measured on the monotonic clock.
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

/// Owns the at-most-one `Session` of the process.
///
/// The lock is only held to read or swap the value, never across a
/// provider call.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `session` the current one, returning the session it replaced.
    pub async fn replace(&self, session: Session) -> Option<Session> {
        self.current.lock().await.replace(session)
    }

    /// Forgets the current session.
    pub async fn clear(&self) -> Option<Session> {
        self.current.lock().await.take()
    }

    /// A copy of the current session, if any.
    pub async fn snapshot(&self) -> Option<Session> {
        self.current.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remote(id: &str) -> NewSession {
        NewSession {
            session_id: id.to_string(),
            sdp: json!({"type": "offer", "sdp": "v=0"}),
            ice_servers: json!([{"urls": ["stun:stun.example.org"]}]),
        }
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let session = Session::new(remote("sess-1"));
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["sessionId"], "sess-1");
        assert_eq!(value["sdp"]["type"], "offer");
        assert!(value["iceServers"].is_array());
        assert!(value["createdAt"].is_string());
        assert!(value.get("started").is_none());
    }

    #[test]
    fn test_fresh_session_uptime_is_zero() {
        let session = Session::new(remote("sess-1"));
        assert_eq!(session.uptime_secs(), 0);
    }

    #[tokio::test]
    async fn test_store_replaces_session() {
        let store = SessionStore::new();
        assert!(store.snapshot().await.is_none());

        assert!(store.replace(Session::new(remote("first"))).await.is_none());
        let previous = store.replace(Session::new(remote("second"))).await;
        assert_eq!(previous.unwrap().session_id, "first");

        let current = store.snapshot().await.unwrap();
        assert_eq!(current.session_id, "second");

        assert_eq!(store.clear().await.unwrap().session_id, "second");
        assert!(store.snapshot().await.is_none());
    }
}
