use std::sync::atomic::{AtomicU64, Ordering};

/// Issued when a view starts a request; only the newest ticket may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Per-view request generation counter.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    pub fn begin(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
