//! promptlog-web: HTTP front for the call-and-log service.
//!
//! Exposes a single route, `/api/openai`, which forwards the `keyword`
//! query parameter to the provider and returns the provider's body once
//! the exchange has been written to the audit log.

pub mod router;
pub mod handlers;
pub mod state;

pub use router::build_router;
pub use state::{AppState, SharedState};
