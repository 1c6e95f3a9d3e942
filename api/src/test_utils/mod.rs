//! Test utilities
//!
//! Fixtures plus `InMemoryStore`, a single stateful stand-in for every
//! repository port and the user directory. Services under test share one
//! store so cascades and unique constraints behave as in PostgreSQL.
//!
//! Router tests go through `router`, which drives the real handlers and
//! PostgreSQL adapters over SeaORM's mock connection.

pub mod fixtures;
pub mod mocks;
pub mod router;

pub use fixtures::*;
pub use mocks::*;
