//! List and aggregate renderers. Each owns exactly one view.
//!
//! A renderer fetches first and only then rebuilds its view, without
//! suspending between the clear and the last append. Failures leave the
//! view as it was.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, Utc};
use futures::join;
use shared::domain::{Hobby, OneOnOne, Page, UserId};
use tracing::{debug, info, warn};

use crate::{
    error::GatewayError,
    fence::Generation,
    gateway::{Aggregate, HobbyGateway},
    views::{Content, Link, ListView, Row, RowAction, TextView},
};

const MEETING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Applied { rows: usize },
    /// A newer request for the same view was issued while this one ran.
    Stale,
    Failed,
}

impl RenderOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

pub fn hobby_row(hobby: &Hobby) -> Row {
    Row {
        text: hobby.name.clone(),
        link: None,
        action: Some(RowAction::RemoveHobby(hobby.id)),
    }
}

pub fn popular_hobby_row(hobby: &Hobby) -> Row {
    let user_count = hobby.user_count.unwrap_or_default();
    Row {
        text: String::new(),
        link: Some(Link::new(
            format!("/hobby/{}", hobby.id),
            format!("{} ({user_count} users)", hobby.name),
        )),
        action: None,
    }
}

/// Where meeting times are shown. `Local` resolves the offset for each
/// instant, so meetings on either side of a daylight-saving change read right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    pub fn format(self, instant: &DateTime<Utc>) -> String {
        match self {
            Self::Local => instant
                .with_timezone(&Local)
                .format(MEETING_TIME_FORMAT)
                .to_string(),
            Self::Fixed(offset) => instant
                .with_timezone(&offset)
                .format(MEETING_TIME_FORMAT)
                .to_string(),
        }
    }
}

impl From<FixedOffset> for DisplayZone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

/// The meeting time is shown in `zone`; the record keeps its UTC instant.
pub fn one_on_one_row(meeting: &OneOnOne, zone: &DisplayZone) -> Row {
    Row {
        text: zone.format(&meeting.date),
        link: Some(Link::user_profile(&meeting.other_user.username)),
        action: Some(RowAction::CancelOneOnOne(meeting.id)),
    }
}

fn replace_rows(view: &dyn ListView, rows: Vec<Row>) -> usize {
    let count = rows.len();
    view.clear();
    for row in rows {
        view.append(row);
    }
    count
}

/// Rebuilds the popular-hobbies list from an already fetched page.
pub fn render_popular_page(view: &dyn ListView, page: &Page) -> usize {
    view.clear();
    view.set_start(page.start_index);
    for hobby in &page.items {
        view.append(popular_hobby_row(hobby));
    }
    page.items.len()
}

fn log_read_failure(view: &'static str, err: &GatewayError) {
    if err.is_rejection() {
        info!(view, reason = %err, "backend declined read; view left unchanged");
    } else {
        warn!(view, error = %err, "failed to refresh view; view left unchanged");
    }
}

pub struct HobbyListRenderer {
    gateway: Arc<dyn HobbyGateway>,
    view: Arc<dyn ListView>,
    generation: Generation,
}

impl HobbyListRenderer {
    pub fn new(gateway: Arc<dyn HobbyGateway>, view: Arc<dyn ListView>) -> Self {
        Self {
            gateway,
            view,
            generation: Generation::default(),
        }
    }

    pub async fn render(&self, user_id: UserId) -> RenderOutcome {
        let ticket = self.generation.begin();
        let hobbies = match self.gateway.user_hobbies(user_id).await {
            Ok(hobbies) => hobbies,
            Err(err) => {
                log_read_failure("hobby_list", &err);
                return RenderOutcome::Failed;
            }
        };
        if !self.generation.is_current(ticket) {
            debug!(view = "hobby_list", "dropping superseded response");
            return RenderOutcome::Stale;
        }

        let rows = replace_rows(self.view.as_ref(), hobbies.iter().map(hobby_row).collect());
        debug!(view = "hobby_list", rows, "view rebuilt");
        RenderOutcome::Applied { rows }
    }

    /// Appends one row without a re-fetch. Any list fetch still in flight
    /// predates the new hobby and is superseded.
    pub fn append(&self, hobby: &Hobby) {
        self.generation.begin();
        self.view.append(hobby_row(hobby));
    }

    pub fn reset(&self) {
        self.generation.begin();
        self.view.clear();
    }
}

pub struct OneOnOneRenderer {
    gateway: Arc<dyn HobbyGateway>,
    view: Arc<dyn ListView>,
    zone: DisplayZone,
    generation: Generation,
}

impl OneOnOneRenderer {
    /// Renders meeting times in the machine's local time zone.
    pub fn new(gateway: Arc<dyn HobbyGateway>, view: Arc<dyn ListView>) -> Self {
        Self::with_zone(gateway, view, DisplayZone::Local)
    }

    pub fn with_zone(
        gateway: Arc<dyn HobbyGateway>,
        view: Arc<dyn ListView>,
        zone: DisplayZone,
    ) -> Self {
        Self {
            gateway,
            view,
            zone,
            generation: Generation::default(),
        }
    }

    pub async fn render(&self, user_id: UserId) -> RenderOutcome {
        let ticket = self.generation.begin();
        let meetings = match self.gateway.user_one_on_ones(user_id).await {
            Ok(meetings) => meetings,
            Err(err) => {
                log_read_failure("one_on_ones", &err);
                return RenderOutcome::Failed;
            }
        };
        if !self.generation.is_current(ticket) {
            debug!(view = "one_on_ones", "dropping superseded response");
            return RenderOutcome::Stale;
        }

        let rows = meetings
            .iter()
            .map(|meeting| one_on_one_row(meeting, &self.zone))
            .collect();
        let rows = replace_rows(self.view.as_ref(), rows);
        debug!(view = "one_on_ones", rows, "view rebuilt");
        RenderOutcome::Applied { rows }
    }

    pub fn reset(&self) {
        self.generation.begin();
        self.view.clear();
    }
}

pub struct AggregateRenderer {
    gateway: Arc<dyn HobbyGateway>,
    view: Arc<dyn TextView>,
    aggregate: Aggregate,
    generation: Generation,
}

impl AggregateRenderer {
    pub fn new(
        gateway: Arc<dyn HobbyGateway>,
        view: Arc<dyn TextView>,
        aggregate: Aggregate,
    ) -> Self {
        Self {
            gateway,
            view,
            aggregate,
            generation: Generation::default(),
        }
    }

    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    pub async fn refresh(&self) -> RenderOutcome {
        let view = self.aggregate.endpoint();
        let ticket = self.generation.begin();
        let user = match self.gateway.aggregate_user(self.aggregate).await {
            Ok(user) => user,
            Err(err) => {
                log_read_failure(view, &err);
                return RenderOutcome::Failed;
            }
        };
        if !self.generation.is_current(ticket) {
            debug!(view, "dropping superseded response");
            return RenderOutcome::Stale;
        }

        self.view.replace(Content::with_link(
            self.aggregate.caption(),
            Link::user_profile(&user.username),
        ));
        RenderOutcome::Applied { rows: 1 }
    }

    pub fn reset(&self) {
        self.generation.begin();
        self.view.replace(Content::default());
    }
}

/// The user-dependent renderers of the home page.
pub struct Renderers {
    pub hobby_list: HobbyListRenderer,
    pub one_on_ones: OneOnOneRenderer,
    pub most_common_user: AggregateRenderer,
    pub never_met: AggregateRenderer,
}

impl Renderers {
    pub async fn refresh_aggregates(&self) -> (RenderOutcome, RenderOutcome) {
        join!(self.most_common_user.refresh(), self.never_met.refresh())
    }

    pub fn reset(&self) {
        self.hobby_list.reset();
        self.one_on_ones.reset();
        self.most_common_user.reset();
        self.never_met.reset();
    }
}

#[cfg(test)]
#[path = "tests/renderers_tests.rs"]
mod tests;
