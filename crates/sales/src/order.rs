use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketplace_core::{DomainError, Entity, OrderId, ProductId, UserId};
use marketplace_products::Product;

const MAX_QUANTITY: u32 = 1000;

/// An order for one product. `user_id` is the buyer and the owner for view checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub address: String,
    /// `quantity * price` at the time of ordering, in minor units.
    pub total: u64,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub quantity: u32,
    pub address: String,
}

impl Order {
    /// Place an order for `product`. Sellers cannot buy their own listings.
    pub fn place(
        id: OrderId,
        buyer: UserId,
        product: &Product,
        input: NewOrder,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if input.product_id != product.id {
            return Err(DomainError::invariant("order product does not match listing"));
        }
        if product.user_id == buyer {
            return Err(DomainError::invariant("sellers cannot order their own products"));
        }
        if input.quantity == 0 || input.quantity > MAX_QUANTITY {
            return Err(DomainError::validation(format!(
                "quantity must be between 1 and {MAX_QUANTITY}"
            )));
        }
        let address = input.address.trim();
        if address.is_empty() {
            return Err(DomainError::validation("address cannot be empty"));
        }
        let total = product
            .price
            .checked_mul(u64::from(input.quantity))
            .ok_or_else(|| DomainError::invariant("order total overflows"))?;

        Ok(Self {
            id,
            user_id: buyer,
            product_id: product.id,
            quantity: input.quantity,
            address: address.to_string(),
            total,
            sent: false,
            created_at: now,
        })
    }

    pub fn mark_sent(&mut self) -> Result<(), DomainError> {
        if self.sent {
            return Err(DomainError::conflict(format!("order {} was already sent", self.id)));
        }
        self.sent = true;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}
