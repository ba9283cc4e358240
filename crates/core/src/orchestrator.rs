//! Session Orchestrator
//!
//! Drives the single avatar session: start, speak, chat, stop and status.
//! Every operation makes at most two sequential outbound calls and never
//! retries. Calls that act on the session (start, speak, stop and the
//! delivery half of chat) run one at a time. Generating a chat reply and
//! reading the status wait on neither.

use crate::{
    avatar::AvatarProvider,
    error::DemoError,
    generation::{GenerationProvider, restaurant_prompt},
    session::{Session, SessionStore},
};
use std::{str::FromStr, sync::Arc};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// What `chat` does when the generated reply cannot be handed to the avatar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// A failed delivery fails the whole chat; the reply is not returned.
    #[default]
    Strict,
    /// A failed delivery is logged and the reply is returned anyway.
    BestEffort,
}

impl FromStr for DeliveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "best-effort" | "best_effort" => Ok(Self::BestEffort),
            other => Err(format!("'{}' is not a delivery policy", other)),
        }
    }
}

/// Point-in-time view of the session returned by `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub session_id: String,
    pub uptime_secs: u64,
}

pub struct Orchestrator {
    avatar: Arc<dyn AvatarProvider>,
    generator: Arc<dyn GenerationProvider>,
    store: SessionStore,
    /// Held across provider calls that act on the session.
    ops: Mutex<()>,
    delivery: DeliveryPolicy,
}

impl Orchestrator {
    pub fn new(
        avatar: Arc<dyn AvatarProvider>,
        generator: Arc<dyn GenerationProvider>,
        delivery: DeliveryPolicy,
    ) -> Self {
        Self {
            avatar,
            generator,
            store: SessionStore::new(),
            ops: Mutex::new(()),
            delivery,
        }
    }

    /// Opens a remote session and makes it the current one.
    ///
    /// An existing session is replaced without being stopped remotely.
    pub async fn start(&self) -> Result<Session, DemoError> {
        let _op = self.ops.lock().await;
        info!("Starting avatar session...");

        let remote = self.avatar.create_session().await?;
        let session = Session::new(remote);

        if let Some(previous) = self.store.replace(session.clone()).await {
            warn!(
                replaced = %previous.session_id,
                "Replacing active session without stopping it remotely"
            );
        }
        info!(session_id = %session.session_id, "Avatar session created");
        Ok(session)
    }

    /// Sends a "talk" task for `text` to the current session.
    pub async fn speak(&self, text: &str) -> Result<(), DemoError> {
        let _op = self.ops.lock().await;
        let session = self
            .store
            .snapshot()
            .await
            .ok_or(DemoError::NoActiveSession)?;

        info!(session_id = %session.session_id, text, "Avatar speaking");
        self.avatar.talk(&session.session_id, text).await?;
        Ok(())
    }

    /// Generates a reply to `message` and, with a session active, has the avatar speak it.
    ///
    /// The reply goes to whichever session is current once generation finishes.
    pub async fn chat(&self, message: &str) -> Result<String, DemoError> {
        info!(customer = message, "Customer message");

        let reply = self.generator.generate(&restaurant_prompt(message)).await?;
        info!(reply = %reply, "Generated reply");

        let _op = self.ops.lock().await;
        if let Some(session) = self.store.snapshot().await {
            self.deliver(&session.session_id, &reply).await?;
        }
        Ok(reply)
    }

    async fn deliver(&self, session_id: &str, reply: &str) -> Result<(), DemoError> {
        match (self.avatar.talk(session_id, reply).await, self.delivery) {
            (Ok(()), _) => Ok(()),
            (Err(e), DeliveryPolicy::BestEffort) => {
                warn!(session_id, error = %e, "Reply delivery failed; returning reply anyway");
                Ok(())
            }
            (Err(e), DeliveryPolicy::Strict) => Err(e.into()),
        }
    }

    /// Stops the current session remotely and forgets it.
    ///
    /// A no-op when there is no session. If the remote call fails the session is kept.
    pub async fn stop(&self) -> Result<(), DemoError> {
        let _op = self.ops.lock().await;
        let Some(session) = self.store.snapshot().await else {
            return Ok(());
        };

        self.avatar.stop_session(&session.session_id).await?;
        self.store.clear().await;
        info!(session_id = %session.session_id, "Session stopped");
        Ok(())
    }

    pub async fn status(&self) -> Option<SessionStatus> {
        self.store.snapshot().await.map(|s| SessionStatus {
            uptime_secs: s.uptime_secs(),
            session_id: s.session_id,
        })
    }
}
