//! The set of stores the API works against.

use std::sync::Arc;

use marketplace_auth::User;
use marketplace_products::{Category, Product, Rate};
use marketplace_sales::Order;

use crate::sequence::IdSequences;
use crate::store::{InMemoryStore, Store};

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn Store<User>>,
    pub categories: Arc<dyn Store<Category>>,
    pub products: Arc<dyn Store<Product>>,
    pub rates: Arc<dyn Store<Rate>>,
    pub orders: Arc<dyn Store<Order>>,
    pub ids: Arc<IdSequences>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryStore::<User>::new()),
            categories: Arc::new(InMemoryStore::<Category>::new()),
            products: Arc::new(InMemoryStore::<Product>::new()),
            rates: Arc::new(InMemoryStore::<Rate>::new()),
            orders: Arc::new(InMemoryStore::<Order>::new()),
            ids: Arc::new(IdSequences::default()),
        }
    }
}

impl core::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Repositories")
            .field("users", &self.users.count())
            .field("categories", &self.categories.count())
            .field("products", &self.products.count())
            .field("rates", &self.rates.count())
            .field("orders", &self.orders.count())
            .finish()
    }
}
