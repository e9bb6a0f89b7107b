//! Catalog domain: categories, product listings, ratings and filters.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod category;
pub mod filter;
pub mod product;
pub mod rate;

pub use category::{Category, NewSubCategory};
pub use filter::{PriceRange, ProductFilter};
pub use product::{Condition, NewProduct, Product, ProductPatch};
pub use rate::{NewRate, Rate, RatePatch, Stars, average_stars};
