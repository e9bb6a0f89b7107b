//! Product ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketplace_core::{DomainError, Entity, ProductId, RateId, UserId};

const MAX_COMMENT_LEN: usize = 2000;

/// Star rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "stars must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }
}

impl From<Stars> for u8 {
    fn from(value: Stars) -> Self {
        value.0
    }
}

/// A user's rating of a product. At most one per (user, product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub id: RateId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub stars: Stars,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for rating a product. `stars` is checked when the rate is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewRate {
    pub stars: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RatePatch {
    pub stars: Option<u8>,
    pub comment: Option<String>,
}

impl Rate {
    pub fn create(
        id: RateId,
        product_id: ProductId,
        user_id: UserId,
        input: NewRate,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            product_id,
            user_id,
            stars: Stars::try_from(input.stars)?,
            comment: validate_comment(input.comment)?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_patch(&mut self, patch: RatePatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if patch == RatePatch::default() {
            return Err(DomainError::validation("patch contains no changes"));
        }

        let stars = patch.stars.map(Stars::try_from).transpose()?;
        let comment = match patch.comment {
            Some(c) => Some(validate_comment(Some(c))?),
            None => None,
        };

        if let Some(stars) = stars {
            self.stars = stars;
        }
        if let Some(comment) = comment {
            self.comment = comment;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Rate {
    type Id = RateId;

    fn id(&self) -> RateId {
        self.id
    }
}

/// Mean star rating, `None` when there are no rates.
pub fn average_stars<'a>(rates: impl IntoIterator<Item = &'a Rate>) -> Option<f64> {
    let (sum, count) = rates
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r.stars.get()), count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

fn validate_comment(comment: Option<String>) -> Result<Option<String>, DomainError> {
    match comment {
        None => Ok(None),
        Some(c) if c.chars().count() > MAX_COMMENT_LEN => Err(DomainError::validation("comment is too long")),
        Some(c) => {
            let c = c.trim();
            Ok((!c.is_empty()).then(|| c.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(stars: u8) -> Rate {
        Rate::create(
            RateId::new(1),
            ProductId::new(2),
            UserId::new(3),
            NewRate { stars, comment: Some(" solid ".into()) },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_trims_comment() {
        assert_eq!(rate(4).comment.as_deref(), Some("solid"));
    }

    #[test]
    fn stars_outside_range_are_rejected() {
        for bad in [0u8, 6, 255] {
            let err = Rate::create(
                RateId::new(1),
                ProductId::new(2),
                UserId::new(3),
                NewRate { stars: bad, comment: None },
                Utc::now(),
            )
            .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn patch_can_clear_comment() {
        let mut r = rate(4);
        r.apply_patch(RatePatch { stars: Some(2), comment: Some(String::new()) }, Utc::now())
            .unwrap();
        assert_eq!(r.stars.get(), 2);
        assert_eq!(r.comment, None);
    }

    #[test]
    fn bad_patch_keeps_previous_stars() {
        let mut r = rate(4);
        assert!(r.apply_patch(RatePatch { stars: Some(9), comment: None }, Utc::now()).is_err());
        assert_eq!(r.stars.get(), 4);
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert_eq!(average_stars(&Vec::<Rate>::new()), None);
        let rates = [rate(5), rate(2)];
        assert_eq!(average_stars(&rates), Some(3.5));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stars_accepts_exactly_one_to_five(value in any::<u8>()) {
                prop_assert_eq!(Stars::try_from(value).is_ok(), (1..=5).contains(&value));
            }

            #[test]
            fn average_stays_in_range(stars in proptest::collection::vec(1u8..=5, 1..50)) {
                let rates: Vec<Rate> = stars.iter().map(|s| rate(*s)).collect();
                let avg = average_stars(&rates).unwrap();
                prop_assert!((1.0..=5.0).contains(&avg));
            }
        }
    }
}
