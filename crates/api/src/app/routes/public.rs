//! Unauthenticated informational endpoints.

use axum::Json;
use chrono::Utc;

use crate::app::dto::{Banner, Quote};

const QUOTES: [(&str, &str); 6] = [
    ("Simplicity is the ultimate sophistication.", "Leonardo da Vinci"),
    ("Well begun is half done.", "Aristotle"),
    ("Act only according to that maxim whereby you can, at the same time, will that it should become a universal law.", "Immanuel Kant"),
    ("It is quality rather than quantity that matters.", "Seneca"),
    ("Knowing is not enough; we must apply.", "Johann Wolfgang von Goethe"),
    ("Very little is needed to make a happy life.", "Marcus Aurelius"),
];

pub async fn banner() -> Json<Banner> {
    Json(Banner {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn inspire() -> Json<Quote> {
    let idx = Utc::now().timestamp().unsigned_abs() as usize % QUOTES.len();
    let (quote, author) = QUOTES[idx];
    Json(Quote { quote, author })
}
