use std::sync::Arc;

use shared::domain::User;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{error::GatewayError, gateway::HobbyGateway};

/// Current-user identity for one page lifetime.
///
/// The first lookup costs one round trip; concurrent first callers wait on
/// the same lookup. A backend "not logged in" answer is remembered, a failed
/// round trip is not.
pub struct SessionContext {
    gateway: Arc<dyn HobbyGateway>,
    resolved: Mutex<Option<Option<User>>>,
}

impl SessionContext {
    pub fn new(gateway: Arc<dyn HobbyGateway>) -> Self {
        Self {
            gateway,
            resolved: Mutex::new(None),
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        let mut guard = self.resolved.lock().await;
        if let Some(resolved) = guard.as_ref() {
            return resolved.clone();
        }

        match self.gateway.current_user().await {
            Ok(user) => {
                info!(user_id = user.id.0, username = %user.username, "session resolved");
                *guard = Some(Some(user.clone()));
                Some(user)
            }
            Err(GatewayError::Rejected(rejection)) => {
                info!(reason = %rejection, "no current user; treating visitor as logged out");
                *guard = Some(None);
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to resolve current user");
                None
            }
        }
    }

    pub async fn is_resolved(&self) -> bool {
        self.resolved.lock().await.is_some()
    }

    pub async fn invalidate(&self) {
        *self.resolved.lock().await = None;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
