//! The home page: one session, its renderers, pagination and handlers.

use std::sync::Arc;

use futures::join;
use shared::domain::User;
use tracing::{debug, error, info};

use crate::{
    gateway::{Aggregate, HobbyGateway},
    handlers::{MutationHandlers, MutationOutcome},
    pagination::{PaginationBindings, PaginationController},
    renderers::{
        AggregateRenderer, DisplayZone, HobbyListRenderer, OneOnOneRenderer, Renderers,
    },
    session::SessionContext,
    views::{Alerter, InputView, ListView, RowAction, TextView},
};

pub struct HomeBindings {
    pub hobby_list: Arc<dyn ListView>,
    pub hobby_input: Arc<dyn InputView>,
    pub popular: PaginationBindings,
    pub one_on_ones: Arc<dyn ListView>,
    pub most_common_user: Arc<dyn TextView>,
    pub never_met: Arc<dyn TextView>,
    pub alerter: Arc<dyn Alerter>,
}

pub struct HomePage {
    gateway: Arc<dyn HobbyGateway>,
    session: Arc<SessionContext>,
    renderers: Arc<Renderers>,
    pagination: PaginationController,
    handlers: MutationHandlers,
}

impl HomePage {
    pub fn new(gateway: Arc<dyn HobbyGateway>, bindings: HomeBindings) -> Self {
        Self::with_display_zone(gateway, bindings, DisplayZone::Local)
    }

    pub fn with_display_zone(
        gateway: Arc<dyn HobbyGateway>,
        bindings: HomeBindings,
        zone: DisplayZone,
    ) -> Self {
        let session = Arc::new(SessionContext::new(Arc::clone(&gateway)));
        let renderers = Arc::new(Renderers {
            hobby_list: HobbyListRenderer::new(Arc::clone(&gateway), bindings.hobby_list),
            one_on_ones: OneOnOneRenderer::with_zone(
                Arc::clone(&gateway),
                bindings.one_on_ones,
                zone,
            ),
            most_common_user: AggregateRenderer::new(
                Arc::clone(&gateway),
                bindings.most_common_user,
                Aggregate::MostCommonUser,
            ),
            never_met: AggregateRenderer::new(
                Arc::clone(&gateway),
                bindings.never_met,
                Aggregate::MostCommonUserNeverMet,
            ),
        });
        let pagination = PaginationController::new(Arc::clone(&gateway), bindings.popular);
        let handlers = MutationHandlers::new(
            Arc::clone(&gateway),
            Arc::clone(&session),
            Arc::clone(&renderers),
            bindings.hobby_input,
            bindings.alerter,
        );

        Self {
            gateway,
            session,
            renderers,
            pagination,
            handlers,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn handlers(&self) -> &MutationHandlers {
        &self.handlers
    }

    /// Page load: the first popular-hobbies page, plus the user's own views
    /// when someone is logged in.
    pub async fn load(&self) -> Option<User> {
        let (user, _) = join!(self.session.current_user(), self.pagination.load_page(1));
        self.render_user_views(user.as_ref()).await;
        user
    }

    /// Re-fetches every view, keeping the current page.
    pub async fn refresh(&self) -> Option<User> {
        let (user, _) = join!(self.session.current_user(), self.pagination.reload());
        self.render_user_views(user.as_ref()).await;
        user
    }

    async fn render_user_views(&self, user: Option<&User>) {
        let Some(user) = user else {
            debug!("no session; user views not rendered");
            return;
        };
        join!(
            self.renderers.hobby_list.render(user.id),
            self.renderers.one_on_ones.render(user.id),
            self.renderers.refresh_aggregates()
        );
    }

    /// Runs the handler bound to an inline row control.
    pub async fn activate(&self, action: RowAction) -> MutationOutcome {
        match action {
            RowAction::RemoveHobby(hobby_id) => self.handlers.remove_hobby(hobby_id).await,
            RowAction::CancelOneOnOne(meeting_id) => {
                self.handlers.cancel_one_on_one(meeting_id).await
            }
        }
    }

    /// Ends the backend session, forgets the cached user and blanks the
    /// views that belonged to them.
    pub async fn logout(&self) -> MutationOutcome {
        if let Err(err) = self.gateway.logout().await {
            error!(error = %err, "logout request failed");
            return MutationOutcome::Failed;
        }
        self.session.invalidate().await;
        self.renderers.reset();
        info!("logged out");
        MutationOutcome::Applied
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
