//! Application services: store lookups and write operations behind the routes.
//!
//! Authorization is not done here; handlers call `crate::authz` between
//! resolving the target and invoking a write.

use chrono::Utc;

use marketplace_auth::{PolicyEngine, Principal, RoleChanged, RoleTier, User};
use marketplace_core::{CategoryId, ProductId, Slug, UserId};
use marketplace_infra::{Repositories, Store};
use marketplace_products::{
    Category, NewProduct, NewRate, NewSubCategory, Product, ProductFilter, ProductPatch, Rate, RatePatch,
    average_stars,
};
use marketplace_sales::Order;

use crate::app::dto::{CollectedProduct, ProductWithRates, Profile};
use crate::app::errors::ApiError;

/// Most ids accepted by one collect request.
pub const MAX_COLLECT_IDS: usize = 500;

/// Product slugs that would collide with static `/product/...` routes.
const RESERVED_PRODUCT_SLUGS: [&str; 6] = ["ids", "list", "find", "sub", "collect", "filter"];
const RESERVED_CATEGORY_SLUGS: [&str; 2] = ["ids", "list"];

pub struct AppServices {
    pub repos: Repositories,
    pub policy: PolicyEngine,
}

impl AppServices {
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos,
            policy: PolicyEngine::default(),
        }
    }

    // -------------------------
    // Lookups
    // -------------------------

    pub fn user(&self, id: UserId) -> Result<User, ApiError> {
        self.repos
            .users
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format_args!("user {id}")))
    }

    pub fn users(&self) -> Vec<User> {
        self.repos.users.list()
    }

    pub fn product(&self, slug: &str) -> Result<Product, ApiError> {
        let not_found = || ApiError::not_found(format_args!("product '{slug}'"));
        let slug = Slug::parse(slug).map_err(|_| not_found())?;
        self.repos
            .products
            .find_one(&|p| p.slug == slug)
            .ok_or_else(not_found)
    }

    pub fn base_categories(&self) -> Vec<Category> {
        self.repos.categories.find(&|c| c.is_base())
    }

    pub fn sub_categories(&self) -> Vec<Category> {
        self.repos.categories.find(&|c| c.is_sub())
    }

    pub fn sub_category(&self, slug: &str) -> Result<Category, ApiError> {
        let not_found = || ApiError::not_found(format_args!("sub category '{slug}'"));
        let slug = Slug::parse(slug).map_err(|_| not_found())?;
        self.repos
            .categories
            .find_one(&|c| c.is_sub() && c.slug == slug)
            .ok_or_else(not_found)
    }

    pub fn products(&self) -> Vec<Product> {
        self.repos.products.list()
    }

    /// Products in `category`, optionally narrowed by a filter.
    pub fn products_in(&self, category: CategoryId, filter: Option<&ProductFilter>) -> Vec<Product> {
        self.repos
            .products
            .find(&|p| p.category_id == category && filter.is_none_or(|f| f.matches(p)))
    }

    pub fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        if query.trim().is_empty() {
            return Err(ApiError::Validation("search query 'q' is required".to_string()));
        }
        Ok(self.repos.products.find(&|p| p.matches_search(query)))
    }

    /// A user's listings, newest first.
    pub fn products_of(&self, owner: UserId) -> Vec<Product> {
        let mut products = self.repos.products.find(&|p| p.user_id == owner);
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        products
    }

    /// A user's orders, newest first.
    pub fn orders_of(&self, buyer: UserId) -> Vec<Order> {
        let mut orders = self.repos.orders.find(&|o| o.user_id == buyer);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders
    }

    pub fn rates_for(&self, product: ProductId) -> Vec<Rate> {
        self.repos.rates.find(&|r| r.product_id == product)
    }

    pub fn with_rates(&self, product: Product) -> ProductWithRates {
        let rates = self.rates_for(product.id);
        let average_stars = average_stars(&rates);
        ProductWithRates {
            product,
            rates,
            average_stars,
        }
    }

    /// Load products by a comma-separated id list, in request order. Unknown
    /// ids are skipped.
    pub fn collect(&self, raw_ids: &str, with_rates: bool) -> Result<Vec<CollectedProduct>, ApiError> {
        let parts: Vec<&str> = raw_ids.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        if parts.len() > MAX_COLLECT_IDS {
            return Err(ApiError::PayloadTooLarge(format!(
                "at most {MAX_COLLECT_IDS} ids per request, got {}",
                parts.len()
            )));
        }

        let ids = parts
            .into_iter()
            .map(|raw| raw.parse::<ProductId>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids
            .into_iter()
            .filter_map(|id| self.repos.products.get(&id))
            .map(|p| {
                if with_rates {
                    CollectedProduct::WithRates(self.with_rates(p))
                } else {
                    CollectedProduct::Plain(p)
                }
            })
            .collect())
    }

    /// A rating of `product` by id (taken from the path).
    pub fn rate(&self, product: &Product, raw_id: &str) -> Result<Rate, ApiError> {
        let not_found = || ApiError::not_found(format_args!("rate '{raw_id}' of product '{}'", product.slug));
        let id = raw_id.parse().map_err(|_| not_found())?;
        self.repos
            .rates
            .get(&id)
            .filter(|r| r.product_id == product.id)
            .ok_or_else(not_found)
    }

    /// Profile counters. Staff looking at their own profile get site-wide totals.
    pub fn profile(&self, viewer: &Principal, user: User) -> Profile {
        let site_wide = viewer.id() == user.id && viewer.role_tier().is_staff();
        let (products_count, orders_count) = if site_wide {
            (self.repos.products.count(), self.repos.orders.count())
        } else {
            (
                self.repos.products.count_where(&|p| p.user_id == user.id),
                self.repos.orders.count_where(&|o| o.user_id == user.id),
            )
        };

        Profile {
            user,
            products_count,
            orders_count,
        }
    }

    // -------------------------
    // Writes
    // -------------------------

    pub fn create_sub_category(&self, input: NewSubCategory) -> Result<Category, ApiError> {
        let parent = self
            .repos
            .categories
            .get(&input.parent_id)
            .ok_or_else(|| ApiError::not_found(format_args!("category {}", input.parent_id)))?;

        let slug = Slug::from_name(&input.name)?.unique_by(|s| {
            RESERVED_CATEGORY_SLUGS.contains(&s.as_str())
                || self.repos.categories.find_one(&|c| c.slug == *s).is_some()
        });
        let category = Category::sub(self.repos.ids.category(), &parent, &input.name, slug)?;

        let slug = category.slug.clone();
        self.repos
            .categories
            .insert_unique(category.clone(), &|c| c.slug == slug)?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "sub category created");
        Ok(category)
    }

    pub fn create_product(&self, owner: UserId, input: NewProduct) -> Result<Product, ApiError> {
        self.ensure_sub_category(input.category_id)?;

        let slug = Slug::from_name(&input.name)?.unique_by(|s| {
            RESERVED_PRODUCT_SLUGS.contains(&s.as_str()) || self.repos.products.find_one(&|p| p.slug == *s).is_some()
        });
        let product = Product::create(self.repos.ids.product(), owner, slug, input, Utc::now())?;

        let slug = product.slug.clone();
        self.repos
            .products
            .insert_unique(product.clone(), &|p| p.slug == slug)?;

        tracing::info!(product_id = %product.id, owner_id = %owner, slug = %product.slug, "product created");
        Ok(product)
    }

    pub fn patch_product(&self, product: &Product, patch: ProductPatch) -> Result<Product, ApiError> {
        if let Some(category_id) = patch.category_id {
            self.ensure_sub_category(category_id)?;
        }

        let mut patch = Some(patch);
        let updated = self.repos.products.update(&product.id, &mut |p| match patch.take() {
            Some(patch) => p.apply_patch(patch, Utc::now()),
            None => Ok(()),
        })?;

        tracing::info!(product_id = %updated.id, "product updated");
        Ok(updated)
    }

    /// Remove a listing and its ratings. Orders keep referring to it.
    pub fn delete_product(&self, product: &Product) -> Result<(), ApiError> {
        self.repos
            .products
            .remove(&product.id)
            .ok_or_else(|| ApiError::not_found(format_args!("product '{}'", product.slug)))?;

        let rates = self.rates_for(product.id);
        for rate in &rates {
            self.repos.rates.remove(&rate.id);
        }

        tracing::info!(product_id = %product.id, removed_rates = rates.len(), "product deleted");
        Ok(())
    }

    /// Rate a product. One rating per user per product.
    pub fn create_rate(&self, product: &Product, author: UserId, input: NewRate) -> Result<Rate, ApiError> {
        let rate = Rate::create(self.repos.ids.rate(), product.id, author, input, Utc::now())?;

        self.repos
            .rates
            .insert_unique(rate.clone(), &|r| r.product_id == product.id && r.user_id == author)
            .map_err(|_| ApiError::Conflict(format!("user {author} already rated product '{}'", product.slug)))?;

        tracing::info!(rate_id = %rate.id, product_id = %product.id, "rate created");
        Ok(rate)
    }

    pub fn patch_rate(&self, rate: &Rate, patch: RatePatch) -> Result<Rate, ApiError> {
        let mut patch = Some(patch);
        let updated = self.repos.rates.update(&rate.id, &mut |r| match patch.take() {
            Some(patch) => r.apply_patch(patch, Utc::now()),
            None => Ok(()),
        })?;
        Ok(updated)
    }

    pub fn patch_role(&self, actor: &Principal, target: UserId, role: RoleTier) -> Result<RoleChanged, ApiError> {
        let mut changed = None;
        self.repos.users.update(&target, &mut |user| {
            changed = Some(user.change_role(actor, role));
            Ok(())
        })?;

        let changed = changed.ok_or_else(|| ApiError::not_found(format_args!("user {target}")))?;
        tracing::info!(
            user_id = %changed.user_id,
            from = %changed.from,
            to = %changed.to,
            changed_by = %changed.changed_by,
            "user role changed"
        );
        Ok(changed)
    }

    fn ensure_sub_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        let category = self
            .repos
            .categories
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format_args!("category {id}")))?;
        if !category.is_sub() {
            return Err(ApiError::Invariant(format!(
                "products must be listed in a sub category, '{}' is a base category",
                category.slug
            )));
        }
        Ok(category)
    }
}
