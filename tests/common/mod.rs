//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
#[allow(unused_imports)]
pub use constants::*;
pub use fixtures::ScriptedMovieDatabase;
pub use server::TestServer;
