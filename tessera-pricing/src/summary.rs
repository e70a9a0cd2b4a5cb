use serde::{Deserialize, Serialize};
use tessera_shared::money;

use crate::offer::TicketOffer;
use crate::{PricingError, PricingResult};

/// One entry in the buyer's cart, keyed by offer name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionLine {
    pub offer_name: String,
    pub quantity: u32,
}

impl SelectionLine {
    pub fn new(offer_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            offer_name: offer_name.into(),
            quantity,
        }
    }
}

/// Computed order preview. Never persisted; the backend recomputes the
/// authoritative total at submission and the confirmation screen displays
/// that value verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceSummary {
    /// Full-price total across all lines, before any discount.
    pub subtotal: f64,
    pub total_discount: f64,
    /// Always `subtotal - total_discount`, floored at 0.
    pub grand_total: f64,
}

impl PriceSummary {
    pub fn zero() -> Self {
        Self {
            subtotal: 0.0,
            total_discount: 0.0,
            grand_total: 0.0,
        }
    }

    /// Copy with every amount rounded to 2 decimal places, for handing to
    /// the view. Accumulation stays at full precision; only this edge
    /// rounds.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: money::round_display(self.subtotal),
            total_discount: money::round_display(self.total_discount),
            grand_total: money::round_display(self.grand_total),
        }
    }
}

/// Line total for one cart entry: discounted price when the discount is
/// active and beneficial, full price otherwise. Quantity 0 yields 0.
pub fn line_total(line: &SelectionLine, offer: &TicketOffer) -> f64 {
    let unit = if offer.discount_active() {
        offer.effective_price()
    } else {
        offer.unit_price
    };
    f64::from(line.quantity) * unit
}

/// The ticket catalog for a single event, as the pricing preview sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferSet {
    pub offers: Vec<TicketOffer>,
    /// Free events carry exactly one zero-price offer; no line-item
    /// arithmetic applies to them.
    pub free_event: bool,
}

impl OfferSet {
    pub fn new(offers: Vec<TicketOffer>) -> Self {
        Self {
            offers,
            free_event: false,
        }
    }

    pub fn free(offer: TicketOffer) -> Self {
        Self {
            offers: vec![offer],
            free_event: true,
        }
    }

    fn find(&self, name: &str) -> PricingResult<&TicketOffer> {
        self.offers
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| PricingError::UnknownOffer(name.to_string()))
    }

    /// Soft availability check over the cart. The bound is a UI concern:
    /// nothing is reserved until the backend accepts the submission.
    pub fn validate_selection(&self, selection: &[SelectionLine]) -> PricingResult<()> {
        for line in selection {
            let offer = self.find(&line.offer_name)?;
            if line.quantity > offer.available_quantity {
                return Err(PricingError::QuantityUnavailable {
                    offer: offer.name.clone(),
                    requested: line.quantity,
                    available: offer.available_quantity,
                });
            }
        }
        Ok(())
    }

    /// Compute the order preview for a selection.
    ///
    /// Each line resolves its offer by name; an unmatched name is a hard
    /// error. Categories are summed independently, with no cross-category
    /// discount stacking. Accumulation runs at full precision; callers
    /// round via [`PriceSummary::rounded`] when handing values to the view.
    pub fn summarize(&self, selection: &[SelectionLine]) -> PricingResult<PriceSummary> {
        if self.free_event {
            return Ok(PriceSummary::zero());
        }

        let mut subtotal = 0.0;
        let mut total_discount = 0.0;

        for line in selection {
            let offer = self.find(&line.offer_name)?;
            let quantity = f64::from(line.quantity);

            subtotal += quantity * offer.unit_price;
            if offer.discount_active() {
                total_discount += quantity * (offer.unit_price - offer.effective_price());
            }
        }

        let grand_total = (subtotal - total_discount).max(0.0);

        Ok(PriceSummary {
            subtotal,
            total_discount,
            grand_total,
        })
    }
}
