use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketplace_core::{CategoryId, DomainError, Entity, ProductId, Slug, UserId};

const MAX_NAME_LEN: usize = 255;
const MAX_BRAND_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 5000;

/// Item condition. Serialized as `1` (new) / `0` (used).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Condition {
    Used = 0,
    New = 1,
}

impl TryFrom<u8> for Condition {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Condition::Used),
            1 => Ok(Condition::New),
            other => Err(DomainError::validation(format!(
                "unknown condition {other} (expected 0 or 1)"
            ))),
        }
    }
}

impl From<Condition> for u8 {
    fn from(value: Condition) -> Self {
        value as u8
    }
}

impl core::str::FromStr for Condition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u8 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid condition '{s}'")))?;
        Condition::try_from(raw)
    }
}

/// A product listed for sale by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Seller; the owner for update/delete checks.
    pub user_id: UserId,
    /// Always a sub category.
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub brand: String,
    /// Price in the smallest currency unit.
    pub price: u64,
    pub condition: Condition,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for listing a new product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub brand: String,
    pub price: u64,
    pub condition: Condition,
    #[serde(default)]
    pub description: String,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    pub category_id: Option<CategoryId>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<u64>,
    pub condition: Option<Condition>,
    pub description: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Product {
    /// Validate `input` and build the listing. The caller picks a unique slug.
    pub fn create(
        id: ProductId,
        owner: UserId,
        slug: Slug,
        input: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            user_id: owner,
            category_id: input.category_id,
            name: validate_text("name", &input.name, MAX_NAME_LEN)?,
            slug,
            brand: validate_text("brand", &input.brand, MAX_BRAND_LEN)?,
            price: validate_price(input.price)?,
            condition: input.condition,
            description: validate_description(&input.description)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Validation happens before any field changes, so a
    /// rejected patch leaves the product as it was. The slug is kept stable.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if patch.is_empty() {
            return Err(DomainError::validation("patch contains no changes"));
        }

        let name = patch
            .name
            .as_deref()
            .map(|n| validate_text("name", n, MAX_NAME_LEN))
            .transpose()?;
        let brand = patch
            .brand
            .as_deref()
            .map(|b| validate_text("brand", b, MAX_BRAND_LEN))
            .transpose()?;
        let price = patch.price.map(validate_price).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;

        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(brand) = brand {
            self.brand = brand;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
        if let Some(description) = description {
            self.description = description;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Case-insensitive substring match on slug or name.
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.slug.as_str().contains(&needle) || self.name.to_lowercase().contains(&needle)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > max {
        return Err(DomainError::validation(format!("{field} exceeds {max} characters")));
    }
    Ok(value.to_string())
}

fn validate_price(price: u64) -> Result<u64, DomainError> {
    if price == 0 {
        return Err(DomainError::validation("price must be positive"));
    }
    Ok(price)
}

fn validate_description(description: &str) -> Result<String, DomainError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::validation("description is too long"));
    }
    Ok(description.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn new_product() -> NewProduct {
        NewProduct {
            category_id: CategoryId::new(3),
            name: "Galaxy S21 Ultra".into(),
            brand: "Samsung".into(),
            price: 89_900,
            condition: Condition::New,
            description: "Barely used".into(),
        }
    }

    fn product() -> Product {
        Product::create(
            ProductId::new(1),
            UserId::new(7),
            Slug::parse("galaxy-s21-ultra").unwrap(),
            new_product(),
            test_time(),
        )
        .unwrap()
    }

    #[test]
    fn create_keeps_owner_and_timestamps() {
        let p = product();
        assert_eq!(p.user_id, UserId::new(7));
        assert_eq!(p.created_at, test_time());
        assert_eq!(p.updated_at, test_time());
    }

    #[test]
    fn create_rejects_empty_name() {
        let mut input = new_product();
        input.name = "  ".into();
        let err = Product::create(ProductId::new(1), UserId::new(7), Slug::parse("x").unwrap(), input, test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_zero_price() {
        let mut input = new_product();
        input.price = 0;
        assert!(
            Product::create(ProductId::new(1), UserId::new(7), Slug::parse("x").unwrap(), input, test_time()).is_err()
        );
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let mut p = product();
        let later = test_time() + chrono::Duration::hours(1);
        p.apply_patch(
            ProductPatch {
                price: Some(79_900),
                ..ProductPatch::default()
            },
            later,
        )
        .unwrap();

        assert_eq!(p.price, 79_900);
        assert_eq!(p.name, "Galaxy S21 Ultra");
        assert_eq!(p.slug.as_str(), "galaxy-s21-ultra");
        assert_eq!(p.updated_at, later);
    }

    #[test]
    fn rejected_patch_leaves_product_untouched() {
        let mut p = product();
        let before = p.clone();
        let err = p
            .apply_patch(
                ProductPatch {
                    name: Some("New name".into()),
                    price: Some(0),
                    ..ProductPatch::default()
                },
                test_time(),
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(p, before);
    }

    #[test]
    fn empty_patch_is_rejected() {
        let mut p = product();
        assert!(p.apply_patch(ProductPatch::default(), test_time()).is_err());
    }

    #[test]
    fn search_matches_slug_or_name_ignoring_case() {
        let p = product();
        assert!(p.matches_search("GALAXY"));
        assert!(p.matches_search("s21-ultra"));
        assert!(!p.matches_search("iphone"));
        assert!(!p.matches_search("  "));
    }

    #[test]
    fn condition_round_trips_as_integer() {
        assert_eq!(serde_json::to_string(&Condition::New).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Condition>("0").unwrap(), Condition::Used);
        assert!(serde_json::from_str::<Condition>("2").is_err());
        assert_eq!("1".parse::<Condition>().unwrap(), Condition::New);
        assert!("new".parse::<Condition>().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// A product always matches a search for any part of its own name.
            #[test]
            fn name_fragment_always_matches(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                start in 0usize..40,
                len in 1usize..10,
            ) {
                let mut input = new_product();
                input.name = name.clone();
                let p = Product::create(ProductId::new(1), UserId::new(1), Slug::parse("p").unwrap(), input, test_time()).unwrap();

                let chars: Vec<char> = p.name.chars().collect();
                let start = start.min(chars.len() - 1);
                let end = (start + len).min(chars.len());
                let fragment: String = chars[start..end].iter().collect();
                prop_assume!(!fragment.trim().is_empty());

                prop_assert!(p.matches_search(&fragment));
            }

            /// Patching never changes the owner or slug.
            #[test]
            fn patch_preserves_identity(price in 1u64..1_000_000, brand in "[A-Za-z]{1,20}") {
                let mut p = product();
                p.apply_patch(ProductPatch { price: Some(price), brand: Some(brand), ..ProductPatch::default() }, test_time()).unwrap();
                prop_assert_eq!(p.user_id, UserId::new(7));
                prop_assert_eq!(p.slug.as_str(), "galaxy-s21-ultra");
                prop_assert_eq!(p.price, price);
            }
        }
    }
}
