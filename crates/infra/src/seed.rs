//! Deterministic demo data.
//!
//! Layout (ids are allocated in this order, so they are stable):
//! - user 1 is an admin, user 2 a super admin, users 3..=60 are members
//! - members 3..=22 sell products, 23..=32 rate them, 33..=42 place orders
//! - 3 base categories with 2 sub categories each

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use marketplace_auth::{RoleTier, User};
use marketplace_core::{CategoryId, DomainError, Slug, UserId};
use marketplace_products::{Category, Condition, NewProduct, NewRate, Product, Rate};
use marketplace_sales::{NewOrder, Order};

use crate::Repositories;

pub const MEMBER_COUNT: u64 = 58;
pub const PRODUCT_COUNT: u64 = 180;
const SELLERS: u64 = 20;
const RATED_PRODUCTS: u64 = 40;
const ORDERS: u64 = 30;

const CATALOG: [(&str, [(&str, [&str; 3]); 2]); 3] = [
    (
        "Electronics",
        [
            ("Phones", ["Apple", "Samsung", "Nokia"]),
            ("Laptops", ["Lenovo", "Dell", "Asus"]),
        ],
    ),
    (
        "Fashion",
        [
            ("Shirts", ["Uniqlo", "Zara", "Levis"]),
            ("Shoes", ["Nike", "Adidas", "Puma"]),
        ],
    ),
    (
        "Home",
        [
            ("Furniture", ["Ikea", "Muuto", "Hay"]),
            ("Kitchen", ["Tefal", "Bosch", "Smeg"]),
        ],
    ),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: usize,
    pub categories: usize,
    pub products: usize,
    pub rates: usize,
    pub orders: usize,
}

/// Fill empty repositories with the demo marketplace.
pub fn seed_demo(repos: &Repositories, now: DateTime<Utc>) -> Result<SeedSummary, DomainError> {
    if repos.users.count() > 0 {
        return Err(DomainError::conflict("repositories already contain data"));
    }

    let mut summary = SeedSummary::default();
    let start = now - Duration::days(30);

    let staff = [
        ("Site Admin", "admin@example.com", RoleTier::Admin),
        ("Super User", "super@example.com", RoleTier::Super),
    ];
    for (name, email, role) in staff {
        repos.users.insert(User::new(repos.ids.user(), name, email, role, start)?)?;
        summary.users += 1;
    }
    for n in 1..=MEMBER_COUNT {
        let id = repos.ids.user();
        let user = User::new(
            id,
            &format!("Member {}", id),
            &format!("member{}@example.com", id),
            RoleTier::Member,
            start + Duration::minutes(n as i64),
        )?;
        repos.users.insert(user)?;
        summary.users += 1;
    }

    let mut subs: Vec<(CategoryId, &str, [&str; 3])> = Vec::new();
    for (base_name, children) in CATALOG {
        let base = Category::base(repos.ids.category(), base_name, Slug::from_name(base_name)?)?;
        repos.categories.insert(base.clone())?;
        summary.categories += 1;

        for (sub_name, brands) in children {
            let sub = Category::sub(repos.ids.category(), &base, sub_name, Slug::from_name(sub_name)?)?;
            subs.push((sub.id, sub_name, brands));
            repos.categories.insert(sub)?;
            summary.categories += 1;
        }
    }

    let mut products = Vec::new();
    for i in 1..=PRODUCT_COUNT {
        let (category_id, kind, brands) = subs[(i as usize) % subs.len()];
        let brand = brands[(i as usize / subs.len()) % brands.len()];
        let name = format!("{brand} {kind} {i}");
        let input = NewProduct {
            category_id,
            name: name.clone(),
            brand: brand.to_string(),
            price: 1_000 + (i * 137) % 90_000,
            condition: if i % 2 == 0 { Condition::New } else { Condition::Used },
            description: format!("Demo listing for {name}."),
        };
        let owner = UserId::new(3 + i % SELLERS);
        let product = Product::create(
            repos.ids.product(),
            owner,
            Slug::from_name(&name)?,
            input,
            start + Duration::hours(i as i64),
        )?;
        products.push(product.clone());
        repos.products.insert(product)?;
        summary.products += 1;
    }

    for (i, product) in products.iter().take(RATED_PRODUCTS as usize).enumerate() {
        let i = i as u64;
        let rate = Rate::create(
            repos.ids.rate(),
            product.id,
            UserId::new(23 + i % 10),
            NewRate {
                stars: (1 + i % 5) as u8,
                comment: Some(format!("Rating #{}", i + 1)),
            },
            product.created_at + Duration::days(1),
        )?;
        repos.rates.insert(rate)?;
        summary.rates += 1;
    }

    for i in 0..ORDERS {
        let product = &products[((i * 7) % PRODUCT_COUNT) as usize];
        let mut order = Order::place(
            repos.ids.order(),
            UserId::new(33 + i % 10),
            product,
            NewOrder {
                product_id: product.id,
                quantity: (1 + i % 3) as u32,
                address: format!("{} Market Street", i + 1),
            },
            product.created_at + Duration::days(2),
        )?;
        if i % 3 == 0 {
            order.mark_sent()?;
        }
        repos.orders.insert(order)?;
        summary.orders += 1;
    }

    tracing::info!(
        users = summary.users,
        categories = summary.categories,
        products = summary.products,
        rates = summary.rates,
        orders = summary.orders,
        "seeded demo data"
    );
    Ok(summary)
}
