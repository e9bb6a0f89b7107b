//! Infrastructure layer: entity stores, id allocation and demo data.

pub mod repositories;
pub mod seed;
pub mod sequence;
pub mod store;

pub use repositories::Repositories;
pub use seed::{SeedSummary, seed_demo};
pub use sequence::{IdSequence, IdSequences};
pub use store::{InMemoryStore, Store};
