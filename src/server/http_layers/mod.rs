mod method_guard;
mod requests_logging;

pub use method_guard::{reject_mutating_methods, METHOD_OVERRIDE_HEADER};
pub use requests_logging::{log_requests, RequestsLoggingLevel};
