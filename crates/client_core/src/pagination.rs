use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use shared::domain::Page;
use tracing::{debug, warn};

use crate::{
    fence::Generation,
    gateway::HobbyGateway,
    renderers::render_popular_page,
    views::{Content, ListView, TextView, ToggleView},
};

pub struct PaginationBindings {
    pub list: Arc<dyn ListView>,
    pub page_number: Arc<dyn TextView>,
    pub previous: Arc<dyn ToggleView>,
    pub next: Arc<dyn ToggleView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    Applied(Page),
    Stale,
    Failed,
}

/// Drives the popular-hobbies listing. Pages are 1-based; only the lower
/// bound is enforced here, the server clamps the upper one.
pub struct PaginationController {
    gateway: Arc<dyn HobbyGateway>,
    bindings: PaginationBindings,
    current_page: AtomicU32,
    generation: Generation,
}

impl PaginationController {
    pub fn new(gateway: Arc<dyn HobbyGateway>, bindings: PaginationBindings) -> Self {
        Self {
            gateway,
            bindings,
            current_page: AtomicU32::new(1),
            generation: Generation::default(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::SeqCst)
    }

    pub async fn load_page(&self, page: u32) -> PageLoad {
        let page = page.max(1);
        self.current_page.store(page, Ordering::SeqCst);
        let ticket = self.generation.begin();

        let loaded = match self.gateway.popular_hobbies(page).await {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(page, error = %err, "failed to load popular hobbies");
                return PageLoad::Failed;
            }
        };
        if !self.generation.is_current(ticket) {
            debug!(page, "dropping superseded popular hobbies page");
            return PageLoad::Stale;
        }

        let rows = render_popular_page(self.bindings.list.as_ref(), &loaded);
        self.bindings
            .page_number
            .replace(Content::text(loaded.page_number.to_string()));
        self.bindings.previous.set_enabled(loaded.has_previous());
        self.bindings.next.set_enabled(loaded.has_next());
        debug!(
            page,
            rows,
            total_pages = loaded.total_pages,
            "popular hobbies page applied"
        );
        PageLoad::Applied(loaded)
    }

    /// No-op on the first page.
    pub async fn previous(&self) -> Option<PageLoad> {
        let before = self
            .current_page
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |page| {
                (page > 1).then(|| page - 1)
            })
            .ok()?;
        Some(self.load_page(before - 1).await)
    }

    /// Saturates at the highest page number instead of wrapping.
    pub async fn next(&self) -> PageLoad {
        let before = self
            .current_page
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |page| {
                Some(page.saturating_add(1))
            })
            .unwrap_or_else(|page| page);
        self.load_page(before.saturating_add(1)).await
    }

    /// Reloads whatever page is current.
    pub async fn reload(&self) -> PageLoad {
        self.load_page(self.current_page()).await
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
