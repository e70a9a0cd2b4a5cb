use serde::{Deserialize, Serialize};

use crate::{PricingError, PricingResult};

/// Discount rule attached to a ticket category.
///
/// Modeled as a sum type so a percentage value can never ride along on a
/// fixed-amount entry. A `TicketOffer` without a discount simply carries
/// `None`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "type", content = "value")]
pub enum Discount {
    /// Percentage off the unit price, exclusive bounds: 0 < value < 100.
    Percentage(f64),
    /// Flat amount off the unit price, exclusive bounds: 0 < amount < unit price.
    Fixed(f64),
}

impl Discount {
    /// Authoring-time validation. The pricing calculations assume discounts
    /// are valid; rejecting a bad rule happens here, in the event-creation
    /// flow, never silently at purchase time.
    pub fn validate(&self, unit_price: f64) -> PricingResult<()> {
        match *self {
            Discount::Percentage(p) => {
                if p <= 0.0 || p >= 100.0 {
                    return Err(PricingError::InvalidDiscount(format!(
                        "percentage must be between 0 and 100 exclusive, got {}",
                        p
                    )));
                }
            }
            Discount::Fixed(f) => {
                if f <= 0.0 || f >= unit_price {
                    return Err(PricingError::InvalidDiscount(format!(
                        "fixed amount must be between 0 and the unit price ({}) exclusive, got {}",
                        unit_price, f
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One purchasable ticket category for an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketOffer {
    /// Category label, e.g. "Individual". Single-tier online events carry
    /// an implicit "General" category.
    pub name: String,
    pub unit_price: f64,
    pub discount: Option<Discount>,
    /// Upper bound on purchasable quantity. Not decremented client-side;
    /// the backend reserves inventory only at submission.
    pub available_quantity: u32,
}

impl TicketOffer {
    pub fn new(name: impl Into<String>, unit_price: f64, available_quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            discount: None,
            available_quantity,
        }
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Post-discount unit price. Returns the full unit price when no
    /// discount is attached.
    ///
    /// A non-positive result means the discount rule was misconfigured;
    /// that is caught by `Discount::validate` at authoring time, not
    /// clamped here.
    pub fn effective_price(&self) -> f64 {
        match self.discount {
            None => self.unit_price,
            Some(Discount::Percentage(p)) => self.unit_price * (1.0 - p / 100.0),
            Some(Discount::Fixed(f)) => self.unit_price - f,
        }
    }

    /// A discount counts as active only when it actually lowers the price
    /// and the discounted price stays strictly positive.
    pub fn discount_active(&self) -> bool {
        if self.discount.is_none() {
            return false;
        }
        let effective = self.effective_price();
        effective > 0.0 && effective < self.unit_price
    }
}
