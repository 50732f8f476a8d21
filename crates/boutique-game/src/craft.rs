//! Crafting-flow helpers.
//!
//! The drawing UI itself is external; the driver only seeds it. When the
//! player crafts *for* somebody -- from the customer book or a
//! make-to-order reservation -- the form starts on that customer's
//! preferences so a young player lands on a match by default.

use boutique_core::customer::Preference;
use boutique_core::id::CustomerId;
use boutique_core::item::{Color, PriceLevel, Shape};

/// Who the player is crafting for.
///
/// `Static` points into the customer catalog (crafting between waves);
/// `Runtime` points at a customer in the live wave roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerRef {
    Static(CustomerId),
    Runtime(CustomerId),
}

/// Starting values for the crafting form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CraftPrefill {
    pub shape: Shape,
    pub color: Color,
    pub price: PriceLevel,
    /// Warning flag: the chosen price exceeds the customer's budget.
    /// Recompute with [`over_budget`] as the player moves the price.
    pub over_budget: bool,
}

/// Seeds the crafting form from a customer's preferences.
///
/// The first wanted shape wins (fallback shirt). The first wanted color
/// the player has unlocked wins; a customer whose wanted colors are all
/// locked gets the first unlocked color instead. Price starts at the
/// customer's budget ceiling.
pub fn prefill(wants: &Preference, unlocked_colors: &[Color]) -> CraftPrefill {
    let shape = wants.shapes.first().copied().unwrap_or(Shape::Shirt);
    let color = if wants.colors.is_empty() {
        Color::Pink
    } else {
        wants
            .colors
            .iter()
            .copied()
            .find(|color| unlocked_colors.contains(color))
            .or_else(|| unlocked_colors.first().copied())
            .unwrap_or(Color::Pink)
    };
    let price = wants.max_price;
    CraftPrefill {
        shape,
        color,
        price,
        over_budget: over_budget(price, wants),
    }
}

/// True when `price` would bust the customer's budget.
pub fn over_budget(price: PriceLevel, wants: &Preference) -> bool {
    price > wants.max_price
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_core::test_utils::wants;

    #[test]
    fn prefill_takes_first_wanted_shape_and_color() {
        let wants = wants(
            &[Shape::Dress, Shape::Skirt],
            &[Color::Purple, Color::Blue],
            PriceLevel::Two,
        );
        let unlocked = [Color::Pink, Color::Blue, Color::Purple];

        let form = prefill(&wants, &unlocked);
        assert_eq!(form.shape, Shape::Dress);
        assert_eq!(form.color, Color::Purple);
        assert_eq!(form.price, PriceLevel::Two);
        assert!(!form.over_budget);
    }

    #[test]
    fn prefill_skips_colors_the_player_has_not_unlocked() {
        let wants = wants(&[], &[Color::Red, Color::Blue], PriceLevel::Three);
        let unlocked = [Color::Pink, Color::Blue];

        // Red is locked, blue is the first wanted color in reach.
        assert_eq!(prefill(&wants, &unlocked).color, Color::Blue);
    }

    #[test]
    fn prefill_with_no_wanted_color_in_reach_takes_first_unlocked() {
        let wants = wants(&[], &[Color::Red], PriceLevel::One);
        let unlocked = [Color::Pink, Color::Blue];

        assert_eq!(prefill(&wants, &unlocked).color, Color::Pink);
    }

    #[test]
    fn prefill_falls_back_to_shirt_and_pink() {
        let anything = Preference::anything(PriceLevel::Three);
        let form = prefill(&anything, &[]);

        assert_eq!(form.shape, Shape::Shirt);
        assert_eq!(form.color, Color::Pink);
        assert_eq!(form.price, PriceLevel::Three);
    }

    #[test]
    fn over_budget_only_above_the_ceiling() {
        let wants = wants(&[], &[], PriceLevel::Two);
        assert!(!over_budget(PriceLevel::One, &wants));
        assert!(!over_budget(PriceLevel::Two, &wants));
        assert!(over_budget(PriceLevel::Three, &wants));
    }
}
