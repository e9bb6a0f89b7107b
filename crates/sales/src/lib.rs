//! Sales domain: orders placed against product listings.

pub mod order;

pub use order::{NewOrder, Order};
