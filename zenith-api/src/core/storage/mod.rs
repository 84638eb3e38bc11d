//! Experience log storage
//!
//! ## Available Backends
//!
//! - `sqlite`: durable SQLite file (default)
//! - `memory`: in-process map, used by tests and `storage.backend = "memory"`

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryExperienceStore;
pub use sqlite::SqliteExperienceStore;
pub use traits::*;
