//! Sequential integer id allocation.

use std::sync::atomic::{AtomicU64, Ordering};

use marketplace_core::{CategoryId, OrderId, ProductId, RateId, UserId};

/// Monotonic id counter starting at 1.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(1)),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// One sequence per entity kind.
#[derive(Debug, Default)]
pub struct IdSequences {
    users: IdSequence,
    categories: IdSequence,
    products: IdSequence,
    rates: IdSequence,
    orders: IdSequence,
}

impl IdSequences {
    pub fn user(&self) -> UserId {
        UserId::new(self.users.next_id())
    }

    pub fn category(&self) -> CategoryId {
        CategoryId::new(self.categories.next_id())
    }

    pub fn product(&self) -> ProductId {
        ProductId::new(self.products.next_id())
    }

    pub fn rate(&self) -> RateId {
        RateId::new(self.rates.next_id())
    }

    pub fn order(&self) -> OrderId {
        OrderId::new(self.orders.next_id())
    }
}
