//! Mutation handlers: one gateway call, then refresh what it changed.

use std::sync::Arc;

use futures::join;
use shared::domain::{Hobby, HobbyId, MeetingId};
use tracing::{error, info, warn};

use crate::{
    error::GatewayError,
    gateway::HobbyGateway,
    renderers::Renderers,
    session::SessionContext,
    views::{Alerter, InputView},
};

pub const ADD_HOBBY_FALLBACK: &str = "Failed to add hobby";
pub const REMOVE_HOBBY_FALLBACK: &str = "Failed to remove hobby";
pub const CANCEL_ONE_ON_ONE_FALLBACK: &str = "Failed to cancel one-on-one";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// The backend declined; carries the text that was alerted.
    Rejected(String),
    /// Transport or decode failure; logged only.
    Failed,
}

pub struct MutationHandlers {
    gateway: Arc<dyn HobbyGateway>,
    session: Arc<SessionContext>,
    renderers: Arc<Renderers>,
    hobby_input: Arc<dyn InputView>,
    alerter: Arc<dyn Alerter>,
}

impl MutationHandlers {
    pub fn new(
        gateway: Arc<dyn HobbyGateway>,
        session: Arc<SessionContext>,
        renderers: Arc<Renderers>,
        hobby_input: Arc<dyn InputView>,
        alerter: Arc<dyn Alerter>,
    ) -> Self {
        Self {
            gateway,
            session,
            renderers,
            hobby_input,
            alerter,
        }
    }

    /// Submits whatever the hobby input currently holds.
    pub async fn submit_hobby(&self) -> MutationOutcome {
        let name = self.hobby_input.value();
        self.add_hobby(&name).await
    }

    /// Name validation is left to the backend.
    pub async fn add_hobby(&self, name: &str) -> MutationOutcome {
        match self.gateway.add_hobby(name).await {
            Ok(hobby_id) => {
                info!(hobby_id = hobby_id.0, name, "hobby added");
                self.renderers.hobby_list.append(&Hobby {
                    id: hobby_id,
                    name: name.to_string(),
                    user_count: None,
                });
                self.hobby_input.clear();
                self.renderers.refresh_aggregates().await;
                MutationOutcome::Applied
            }
            Err(err) => self.surface("add_hobby", &err, ADD_HOBBY_FALLBACK),
        }
    }

    pub async fn remove_hobby(&self, hobby_id: HobbyId) -> MutationOutcome {
        match self.gateway.remove_hobby(hobby_id).await {
            Ok(()) => {
                info!(hobby_id = hobby_id.0, "hobby removed");
                match self.session.current_user().await {
                    Some(user) => {
                        join!(
                            self.renderers.hobby_list.render(user.id),
                            self.renderers.refresh_aggregates()
                        );
                    }
                    None => {
                        self.renderers.refresh_aggregates().await;
                    }
                }
                MutationOutcome::Applied
            }
            Err(err) => self.surface("remove_hobby", &err, REMOVE_HOBBY_FALLBACK),
        }
    }

    pub async fn cancel_one_on_one(&self, meeting_id: MeetingId) -> MutationOutcome {
        match self.gateway.cancel_one_on_one(meeting_id).await {
            Ok(()) => {
                info!(meeting_id = meeting_id.0, "one-on-one cancelled");
                match self.session.current_user().await {
                    Some(user) => {
                        join!(
                            self.renderers.one_on_ones.render(user.id),
                            self.renderers.never_met.refresh()
                        );
                    }
                    None => {
                        self.renderers.never_met.refresh().await;
                    }
                }
                MutationOutcome::Applied
            }
            Err(err) => self.surface("cancel_one_on_one", &err, CANCEL_ONE_ON_ONE_FALLBACK),
        }
    }

    fn surface(
        &self,
        operation: &'static str,
        err: &GatewayError,
        fallback: &str,
    ) -> MutationOutcome {
        match err.rejection() {
            Some(rejection) => {
                let message = rejection.message_or(fallback).to_string();
                warn!(operation, %message, "backend rejected mutation");
                self.alerter.alert(&message);
                MutationOutcome::Rejected(message)
            }
            None => {
                error!(operation, error = %err, "mutation request failed");
                MutationOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/handlers_tests.rs"]
mod tests;
