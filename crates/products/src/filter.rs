//! Catalog filters applied to the products of one sub category.

use core::str::FromStr;

use marketplace_core::DomainError;

use crate::{Condition, Product};

/// Inclusive price range parsed from `min-max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn new(min: u64, max: u64) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::validation(format!(
                "price range minimum {min} is above maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, price: u64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

impl FromStr for PriceRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::validation(format!("price range '{s}' must look like min-max"));
        let (min, max) = s.split_once('-').ok_or_else(malformed)?;
        let min = min.trim().parse().map_err(|_| malformed())?;
        let max = max.trim().parse().map_err(|_| malformed())?;
        Self::new(min, max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Any of the listed brands, compared case-insensitively.
    Brands(Vec<String>),
    Condition(Condition),
    Price(PriceRange),
}

impl ProductFilter {
    /// Parse a comma-separated brand list (`apple,samsung`).
    pub fn brands(raw: &str) -> Result<Self, DomainError> {
        let brands: Vec<String> = raw
            .split(',')
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty())
            .collect();
        if brands.is_empty() {
            return Err(DomainError::validation("brand list cannot be empty"));
        }
        Ok(Self::Brands(brands))
    }

    pub fn condition(raw: &str) -> Result<Self, DomainError> {
        raw.parse().map(Self::Condition)
    }

    pub fn price(raw: &str) -> Result<Self, DomainError> {
        raw.parse().map(Self::Price)
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::Brands(brands) => {
                let brand = product.brand.to_lowercase();
                brands.iter().any(|b| *b == brand)
            }
            ProductFilter::Condition(c) => product.condition == *c,
            ProductFilter::Price(range) => range.contains(product.price),
        }
    }
}
