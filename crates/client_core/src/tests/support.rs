//! Scripted gateway and page fixture shared by the controller tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::StatusCode;
use shared::{
    domain::{Hobby, HobbyId, MeetingId, OneOnOne, Page, User, UserId, UserRef},
    error::Rejection,
};
use tokio::sync::Notify;

use crate::{
    error::{GatewayError, GatewayResult},
    gateway::{Aggregate, HobbyGateway},
    page::{HomeBindings, HomePage},
    pagination::PaginationBindings,
    renderers::DisplayZone,
    views::{MemoryInput, MemoryListView, MemoryTextView, MemoryToggle, RecordingAlerter},
};

pub(crate) const PAGE_SIZE: i64 = 15;

#[derive(Debug, Clone)]
pub(crate) enum Scripted<T> {
    Ok(T),
    Rejected(Option<String>),
    Unreachable,
}

impl<T: Clone> Scripted<T> {
    fn resolve(&self, endpoint: &'static str) -> GatewayResult<T> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Rejected(message) => Err(Rejection::new(endpoint, message.clone()).into()),
            Self::Unreachable => Err(GatewayError::Status {
                endpoint,
                status: StatusCode::BAD_GATEWAY,
            }),
        }
    }
}

pub(crate) fn ada() -> User {
    User {
        id: UserId(1),
        username: "ada".to_string(),
    }
}

pub(crate) fn hobby(id: i64, name: &str) -> Hobby {
    Hobby {
        id: HobbyId(id),
        name: name.to_string(),
        user_count: None,
    }
}

pub(crate) fn popular(id: i64, name: &str, user_count: u64) -> Hobby {
    Hobby {
        id: HobbyId(id),
        name: name.to_string(),
        user_count: Some(user_count),
    }
}

pub(crate) struct FakeGateway {
    pub current_user: Mutex<Scripted<User>>,
    pub aggregates: Mutex<HashMap<Aggregate, Scripted<UserRef>>>,
    pub hobbies: Mutex<Scripted<Vec<Hobby>>>,
    pub add_hobby: Mutex<Scripted<HobbyId>>,
    pub remove_hobby: Mutex<Scripted<()>>,
    pub pages: Mutex<HashMap<u32, Scripted<(Vec<Hobby>, u32)>>>,
    pub one_on_ones: Mutex<Scripted<Vec<OneOnOne>>>,
    pub cancel_one_on_one: Mutex<Scripted<()>>,
    pub logout: Mutex<Scripted<()>>,
    held_pages: Mutex<HashMap<u32, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub(crate) fn logged_in(user: User) -> Self {
        let aggregates = HashMap::from([
            (
                Aggregate::MostCommonUser,
                Scripted::Ok(UserRef {
                    username: "bob".to_string(),
                }),
            ),
            (
                Aggregate::MostCommonUserNeverMet,
                Scripted::Ok(UserRef {
                    username: "carol".to_string(),
                }),
            ),
        ]);
        Self {
            current_user: Mutex::new(Scripted::Ok(user)),
            aggregates: Mutex::new(aggregates),
            hobbies: Mutex::new(Scripted::Ok(Vec::new())),
            add_hobby: Mutex::new(Scripted::Ok(HobbyId(1))),
            remove_hobby: Mutex::new(Scripted::Ok(())),
            pages: Mutex::new(HashMap::new()),
            one_on_ones: Mutex::new(Scripted::Ok(Vec::new())),
            cancel_one_on_one: Mutex::new(Scripted::Ok(())),
            logout: Mutex::new(Scripted::Ok(())),
            held_pages: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn anonymous() -> Self {
        let gateway = Self::logged_in(ada());
        gateway.script(&gateway.current_user, Scripted::Rejected(None));
        gateway
    }

    pub(crate) fn script<T>(&self, slot: &Mutex<T>, value: T) {
        *slot.lock().unwrap() = value;
    }

    pub(crate) fn with_page(&self, page: u32, hobbies: Vec<Hobby>, total_pages: u32) {
        self.pages
            .lock()
            .unwrap()
            .insert(page, Scripted::Ok((hobbies, total_pages)));
    }

    pub(crate) fn with_aggregate(&self, aggregate: Aggregate, value: Scripted<UserRef>) {
        self.aggregates.lock().unwrap().insert(aggregate, value);
    }

    /// The page's response waits until the returned handle is notified.
    pub(crate) fn hold_page(&self, page: u32) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.held_pages
            .lock()
            .unwrap()
            .insert(page, Arc::clone(&gate));
        gate
    }

    pub(crate) fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split('/').next() == Some(endpoint))
            .count()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HobbyGateway for FakeGateway {
    async fn current_user(&self) -> GatewayResult<User> {
        self.record("get_current_user".to_string());
        self.current_user.lock().unwrap().resolve("get_current_user")
    }

    async fn aggregate_user(&self, aggregate: Aggregate) -> GatewayResult<UserRef> {
        self.record(aggregate.endpoint().to_string());
        self.aggregates
            .lock()
            .unwrap()
            .get(&aggregate)
            .cloned()
            .unwrap_or(Scripted::Rejected(None))
            .resolve(aggregate.endpoint())
    }

    async fn user_hobbies(&self, user_id: UserId) -> GatewayResult<Vec<Hobby>> {
        self.record(format!("get_user_hobbies/{user_id}"));
        self.hobbies.lock().unwrap().resolve("get_user_hobbies")
    }

    async fn add_hobby(&self, name: &str) -> GatewayResult<HobbyId> {
        self.record(format!("add_hobby/{name}"));
        self.add_hobby.lock().unwrap().resolve("add_hobby")
    }

    async fn remove_hobby(&self, hobby_id: HobbyId) -> GatewayResult<()> {
        self.record(format!("remove_hobby/{hobby_id}"));
        self.remove_hobby.lock().unwrap().resolve("remove_hobby")
    }

    async fn popular_hobbies(&self, page: u32) -> GatewayResult<Page> {
        self.record(format!("popular_hobbies/{page}"));
        let gate = self.held_pages.lock().unwrap().remove(&page);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let scripted = self
            .pages
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or(Scripted::Ok((Vec::new(), 1)));
        let (items, total_pages) = scripted.resolve("popular_hobbies")?;
        Ok(Page {
            page_number: page,
            items,
            start_index: (i64::from(page) - 1) * PAGE_SIZE + 1,
            total_pages,
        })
    }

    async fn user_one_on_ones(&self, user_id: UserId) -> GatewayResult<Vec<OneOnOne>> {
        self.record(format!("get_user_one_on_ones/{user_id}"));
        self.one_on_ones
            .lock()
            .unwrap()
            .resolve("get_user_one_on_ones")
    }

    async fn cancel_one_on_one(&self, meeting_id: MeetingId) -> GatewayResult<()> {
        self.record(format!("cancel_one_on_one/{meeting_id}"));
        self.cancel_one_on_one
            .lock()
            .unwrap()
            .resolve("cancel_one_on_one")
    }

    async fn logout(&self) -> GatewayResult<()> {
        self.record("logout".to_string());
        self.logout.lock().unwrap().resolve("logout")
    }
}

/// Concrete views behind a fixture page, for assertions.
pub(crate) struct Screen {
    pub hobby_list: Arc<MemoryListView>,
    pub hobby_input: Arc<MemoryInput>,
    pub popular: Arc<MemoryListView>,
    pub page_number: Arc<MemoryTextView>,
    pub previous: Arc<MemoryToggle>,
    pub next: Arc<MemoryToggle>,
    pub one_on_ones: Arc<MemoryListView>,
    pub most_common_user: Arc<MemoryTextView>,
    pub never_met: Arc<MemoryTextView>,
    pub alerts: Arc<RecordingAlerter>,
}

impl Screen {
    pub(crate) fn new() -> Self {
        Self {
            hobby_list: Arc::new(MemoryListView::unordered()),
            hobby_input: Arc::new(MemoryInput::default()),
            popular: Arc::new(MemoryListView::ordered()),
            page_number: Arc::new(MemoryTextView::default()),
            previous: Arc::new(MemoryToggle::default()),
            next: Arc::new(MemoryToggle::default()),
            one_on_ones: Arc::new(MemoryListView::unordered()),
            most_common_user: Arc::new(MemoryTextView::default()),
            never_met: Arc::new(MemoryTextView::default()),
            alerts: Arc::new(RecordingAlerter::default()),
        }
    }

    pub(crate) fn pagination_bindings(&self) -> PaginationBindings {
        PaginationBindings {
            list: self.popular.clone(),
            page_number: self.page_number.clone(),
            previous: self.previous.clone(),
            next: self.next.clone(),
        }
    }

    pub(crate) fn bindings(&self) -> HomeBindings {
        HomeBindings {
            hobby_list: self.hobby_list.clone(),
            hobby_input: self.hobby_input.clone(),
            popular: self.pagination_bindings(),
            one_on_ones: self.one_on_ones.clone(),
            most_common_user: self.most_common_user.clone(),
            never_met: self.never_met.clone(),
            alerter: self.alerts.clone(),
        }
    }
}

pub(crate) fn utc_plus_two() -> DisplayZone {
    DisplayZone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap())
}

pub(crate) fn home_fixture(gateway: Arc<FakeGateway>) -> (HomePage, Screen) {
    let screen = Screen::new();
    let page = HomePage::with_display_zone(gateway, screen.bindings(), utc_plus_two());
    (page, screen)
}
