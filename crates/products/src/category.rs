//! Category tree: base categories and their sub categories (one level deep).

use serde::{Deserialize, Serialize};

use marketplace_core::{CategoryId, DomainError, Entity, Slug};

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// `None` for a base category.
    #[serde(rename = "category_id")]
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub slug: Slug,
}

impl Category {
    pub fn base(id: CategoryId, name: &str, slug: Slug) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            parent_id: None,
            name: validate_name(name)?,
            slug,
        })
    }

    /// Build a sub category under `parent`, which must itself be a base category.
    pub fn sub(id: CategoryId, parent: &Category, name: &str, slug: Slug) -> Result<Self, DomainError> {
        if !parent.is_base() {
            return Err(DomainError::invariant(format!(
                "category '{}' is a sub category and cannot have children",
                parent.slug
            )));
        }

        Ok(Self {
            id,
            parent_id: Some(parent.id),
            name: validate_name(name)?,
            slug,
        })
    }

    pub fn is_base(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_sub(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// Request payload for creating a sub category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSubCategory {
    pub name: String,
    #[serde(alias = "category_id")]
    pub parent_id: CategoryId,
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("category name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation("category name is too long"));
    }
    Ok(name.to_string())
}
