//! Client-side view/controller layer for the hobbies home page.
//!
//! A [`HomePage`] binds a small set of views to the backend's JSON gateway:
//! the session context resolves the visitor once, renderers rebuild one view
//! each, the pagination controller drives the popular-hobbies listing and
//! mutation handlers refresh whatever their change affected.

pub mod error;
pub mod fence;
pub mod gateway;
pub mod handlers;
pub mod page;
pub mod pagination;
pub mod renderers;
pub mod session;
pub mod views;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{Aggregate, HobbyGateway, HttpGateway};
pub use handlers::{MutationHandlers, MutationOutcome};
pub use page::{HomeBindings, HomePage};
pub use pagination::{PageLoad, PaginationBindings, PaginationController};
pub use renderers::{DisplayZone, RenderOutcome, Renderers};
pub use session::SessionContext;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
