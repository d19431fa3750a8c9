//! promptlog-common: Shared types, errors, and the audit storage seam used
//! across all promptlog crates.

pub mod error;
pub mod audit;
pub mod caller;
pub mod headers;

// Re-export commonly used types
pub use audit::{AuditRecord, AuditStore};
pub use caller::{resolve_client_ip, CallerContext};
pub use error::{ApiError, PromptlogError, Result};
pub use headers::dump_headers;
