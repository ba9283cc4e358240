//! Credential Probe
//!
//! One read-only call against each external provider, reported as pass/fail.
//! Nothing here is shared with the API server's session state.

use avatar_demo_core::{
    avatar::{AvatarProvider, HeyGenClient},
    config::{AvatarConfig, ConfigError, GenerationConfig},
    error::ProviderError,
    generation::{GeminiClient, GenerationProvider},
};
use reqwest::Client;
use std::fmt;
use tracing::{debug, warn};

/// Prompt sent to the generation provider to prove the key works.
pub const PROBE_PROMPT: &str = "Say hello";

/// Result of checking a single provider.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// The provider answered; the lines are informational details to print.
    Pass(Vec<String>),
    /// The provider call failed with this message.
    Fail(String),
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub avatar: CheckOutcome,
    pub generation: CheckOutcome,
}

impl ProbeReport {
    pub fn all_passed(&self) -> bool {
        self.avatar.passed() && self.generation.passed()
    }

    pub fn checks(&self) -> [(&'static str, &CheckOutcome); 2] {
        [("HeyGen", &self.avatar), ("Gemini", &self.generation)]
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, outcome) in self.checks() {
            let verdict = if outcome.passed() { "PASS" } else { "FAIL" };
            writeln!(f, "{}: {}", name, verdict)?;
        }
        if self.all_passed() {
            write!(f, "All services ready.")
        } else {
            write!(f, "Fix failed services before running the demo.")
        }
    }
}

/// Reads the avatar provider's credit balance.
pub async fn check_avatar(provider: &dyn AvatarProvider, avatar_id: &str) -> CheckOutcome {
    match provider.credit_balance().await {
        Ok(balance) => {
            let remaining = balance
                .remaining
                .map(|r| r.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            debug!(%remaining, "Avatar provider reachable");
            CheckOutcome::Pass(vec![
                format!("Credits remaining: {}", remaining),
                format!("Avatar ID: {}", avatar_id),
            ])
        }
        Err(e) => {
            warn!(error = %e, "Avatar provider check failed");
            CheckOutcome::Fail(e.message())
        }
    }
}

/// Runs a minimal generation request.
///
/// Any 2xx answer proves the key, even one without usable reply text.
pub async fn check_generation(provider: &dyn GenerationProvider) -> CheckOutcome {
    match provider.generate(PROBE_PROMPT).await {
        Ok(_) => CheckOutcome::Pass(Vec::new()),
        Err(ProviderError::Malformed(reason)) => {
            debug!(%reason, "Generation provider answered without reply text");
            CheckOutcome::Pass(vec!["Response had no reply text".to_string()])
        }
        Err(e) => {
            warn!(error = %e, "Generation provider check failed");
            CheckOutcome::Fail(e.message())
        }
    }
}

/// Checks both providers, one after the other.
pub async fn run_checks(
    avatar: &dyn AvatarProvider,
    avatar_id: &str,
    generator: &dyn GenerationProvider,
) -> ProbeReport {
    let avatar = check_avatar(avatar, avatar_id).await;
    let generation = check_generation(generator).await;
    ProbeReport { avatar, generation }
}

/// Checks each provider whose settings loaded; a provider whose settings
/// did not load fails on its own without affecting the other.
pub async fn run_probe(
    http: &Client,
    avatar: Result<AvatarConfig, ConfigError>,
    generation: Result<GenerationConfig, ConfigError>,
) -> ProbeReport {
    let avatar = match avatar {
        Ok(config) => {
            let client = HeyGenClient::from_config(http.clone(), &config);
            check_avatar(&client, &config.avatar_id).await
        }
        Err(e) => config_failure("avatar", e),
    };
    let generation = match generation {
        Ok(config) => check_generation(&GeminiClient::from_config(http.clone(), &config)).await,
        Err(e) => config_failure("generation", e),
    };
    ProbeReport { avatar, generation }
}

fn config_failure(provider: &str, error: ConfigError) -> CheckOutcome {
    warn!(provider, error = %error, "Provider settings not loaded");
    CheckOutcome::Fail(error.to_string())
}
