//! Quantity stepper.
//!
//! The add-to-cart button keeps a local pending quantity, independent of
//! [`CartState`](crate::carts::models::CartState), that is clamped to the
//! orderable range and reset to one after a successful add. The stepper is
//! that widget's state, minus the rendering.

use crate::carts::models::{MAX_QUANTITY, MIN_QUANTITY, clamp_quantity};

/// Pending quantity for a single add-to-cart control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper {
    quantity: u32,
}

impl Default for QuantityStepper {
    fn default() -> Self {
        Self {
            quantity: MIN_QUANTITY,
        }
    }
}

impl QuantityStepper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The quantity currently shown.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Whether the increment control is enabled.
    #[must_use]
    pub fn can_increment(&self) -> bool {
        self.quantity < MAX_QUANTITY
    }

    /// Whether the decrement control is enabled.
    #[must_use]
    pub fn can_decrement(&self) -> bool {
        self.quantity > MIN_QUANTITY
    }

    /// Step up, saturating at the maximum.
    pub fn increment(&mut self) {
        self.quantity = clamp_quantity(self.quantity.saturating_add(1));
    }

    /// Step down, saturating at the minimum.
    pub fn decrement(&mut self) {
        self.quantity = clamp_quantity(self.quantity.saturating_sub(1));
    }

    /// Set a typed-in quantity, clamped into range.
    pub fn set(&mut self, quantity: u32) {
        self.quantity = clamp_quantity(quantity);
    }

    /// Back to one, as after a successful add.
    pub fn reset(&mut self) {
        self.quantity = MIN_QUANTITY;
    }
}
