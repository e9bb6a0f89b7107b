//! `marketplace-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod pagination;
pub mod slug;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, OrderId, ProductId, RateId, UserId};
pub use pagination::{DEFAULT_PER_PAGE, Page, PageRequest, paginate};
pub use slug::{Slug, slugify};
