//! Purchase matching: does an item satisfy a customer's preference?
//!
//! Checks run in a fixed order (price, shape, color, pattern) and stop at
//! the first failure, so the rejection reason always names the most
//! fundamental mismatch. Empty preference lists are wildcards.

use crate::customer::Preference;
use crate::item::{ClothingItem, Color, Pattern, Shape};
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an item failed to match a customer's preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchFailure {
    /// Item priced above the customer's maximum.
    TooExpensive,
    /// Customer wants one of these shapes.
    WrongShape(Vec<Shape>),
    /// Customer wants one of these colors.
    WrongColor(Vec<Color>),
    /// Customer wants one of these patterns.
    WrongPattern(Vec<Pattern>),
}

impl fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchFailure::TooExpensive => write!(f, "Too expensive!"),
            MatchFailure::WrongShape(shapes) => {
                write!(f, "Wanted {}", join_or(shapes.iter().map(|s| s.label())))
            }
            MatchFailure::WrongColor(colors) => {
                write!(
                    f,
                    "Wanted {} color",
                    join_or(colors.iter().map(|c| c.label()))
                )
            }
            MatchFailure::WrongPattern(patterns) => {
                write!(
                    f,
                    "Wanted {} pattern",
                    join_or(patterns.iter().map(|p| p.label()))
                )
            }
        }
    }
}

fn join_or<'a>(mut labels: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    if let Some(first) = labels.next() {
        out.push_str(first);
    }
    for label in labels {
        out.push_str(" or ");
        out.push_str(label);
    }
    out
}

/// Outcome of evaluating one item against one preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Match,
    Reject(MatchFailure),
}

impl MatchOutcome {
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Match)
    }
}

/// Evaluate an item against a preference.
pub fn evaluate(item: &ClothingItem, wants: &Preference) -> MatchOutcome {
    if item.price > wants.max_price {
        return MatchOutcome::Reject(MatchFailure::TooExpensive);
    }
    if !wants.shapes.is_empty() && !wants.shapes.contains(&item.shape) {
        return MatchOutcome::Reject(MatchFailure::WrongShape(wants.shapes.clone()));
    }
    if !wants.colors.is_empty() && !wants.colors.contains(&item.color) {
        return MatchOutcome::Reject(MatchFailure::WrongColor(wants.colors.clone()));
    }
    if !wants.patterns.is_empty() && !wants.patterns.contains(&item.pattern) {
        return MatchOutcome::Reject(MatchFailure::WrongPattern(wants.patterns.clone()));
    }
    MatchOutcome::Match
}

/// True when any item on the rack would satisfy the preference.
///
/// Scans the rack view rather than the full inventory: the affordance should
/// reflect what the customer can actually be sold.
pub fn has_matching_item(rack: &[ClothingItem], wants: &Preference) -> bool {
    rack.iter().any(|item| evaluate(item, wants).is_match())
}

/// Coins credited for a successful sale.
///
/// VIPs pay double the base price; the tip jar bonus is added on top.
#[inline]
pub fn payout(base: u32, is_vip: bool, tip_bonus: u32) -> u32 {
    let paid = if is_vip { base * 2 } else { base };
    paid + tip_bonus
}

/// Short thought-bubble text hinting at what a customer wants.
///
/// Picks one wanted shape and/or color so repeat visits phrase the wish
/// differently. A fully open preference reads "anything!".
pub fn preference_hint(wants: &Preference, rng: &mut GameRng) -> String {
    let shape = rng.pick(&wants.shapes).map(|s| s.label());
    let color = rng.pick(&wants.colors).map(|c| c.label());
    match (shape, color) {
        (Some(shape), Some(color)) => format!("a {color} {shape}"),
        (Some(shape), None) => format!("a {shape}"),
        (None, Some(color)) => format!("something {color}"),
        (None, None) => "anything!".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::PriceLevel;

    fn item(shape: Shape, color: Color, pattern: Pattern, price: PriceLevel) -> ClothingItem {
        ClothingItem {
            id: crate::id::ItemId(0),
            shape,
            color,
            pattern,
            doodles: Vec::new(),
            price,
            created_at_ms: 0,
        }
    }

    fn wants_nothing_specific(max_price: PriceLevel) -> Preference {
        Preference::anything(max_price)
    }

    // -----------------------------------------------------------------------
    // Evaluation order and wildcards
    // -----------------------------------------------------------------------

    #[test]
    fn empty_preference_matches_anything_within_budget() {
        let wants = wants_nothing_specific(PriceLevel::One);
        let cheap = item(Shape::Skirt, Color::Orange, Pattern::Dots, PriceLevel::One);
        assert!(evaluate(&cheap, &wants).is_match());
    }

    #[test]
    fn price_is_checked_before_attributes() {
        // Wrong shape AND over budget: the price failure wins.
        let wants = Preference {
            shapes: vec![Shape::Dress],
            colors: vec![],
            patterns: vec![],
            max_price: PriceLevel::One,
        };
        let pricey = item(Shape::Shirt, Color::Pink, Pattern::None, PriceLevel::Three);
        assert_eq!(
            evaluate(&pricey, &wants),
            MatchOutcome::Reject(MatchFailure::TooExpensive)
        );
    }

    #[test]
    fn shape_checked_before_color() {
        let wants = Preference {
            shapes: vec![Shape::Dress],
            colors: vec![Color::Pink],
            patterns: vec![],
            max_price: PriceLevel::Three,
        };
        let wrong_both = item(Shape::Pants, Color::Green, Pattern::None, PriceLevel::One);
        assert_eq!(
            evaluate(&wrong_both, &wants),
            MatchOutcome::Reject(MatchFailure::WrongShape(vec![Shape::Dress]))
        );
    }

    #[test]
    fn color_checked_before_pattern() {
        let wants = Preference {
            shapes: vec![],
            colors: vec![Color::Pink],
            patterns: vec![Pattern::Stars],
            max_price: PriceLevel::Three,
        };
        let wrong_both = item(Shape::Shirt, Color::Blue, Pattern::Dots, PriceLevel::One);
        assert_eq!(
            evaluate(&wrong_both, &wants),
            MatchOutcome::Reject(MatchFailure::WrongColor(vec![Color::Pink]))
        );
    }

    #[test]
    fn pattern_mismatch_rejected_last() {
        let wants = Preference {
            shapes: vec![],
            colors: vec![],
            patterns: vec![Pattern::Hearts, Pattern::Stars],
            max_price: PriceLevel::Three,
        };
        let plain = item(Shape::Dress, Color::Pink, Pattern::None, PriceLevel::One);
        assert_eq!(
            evaluate(&plain, &wants),
            MatchOutcome::Reject(MatchFailure::WrongPattern(vec![
                Pattern::Hearts,
                Pattern::Stars
            ]))
        );
    }

    #[test]
    fn at_budget_price_is_acceptable() {
        let wants = wants_nothing_specific(PriceLevel::Two);
        let exact = item(Shape::Shirt, Color::Blue, Pattern::None, PriceLevel::Two);
        assert!(evaluate(&exact, &wants).is_match());
    }

    // -----------------------------------------------------------------------
    // Rejection messages
    // -----------------------------------------------------------------------

    #[test]
    fn rejection_messages() {
        assert_eq!(MatchFailure::TooExpensive.to_string(), "Too expensive!");
        assert_eq!(
            MatchFailure::WrongShape(vec![Shape::Dress, Shape::Skirt]).to_string(),
            "Wanted dress or skirt"
        );
        assert_eq!(
            MatchFailure::WrongColor(vec![Color::Pink]).to_string(),
            "Wanted pink color"
        );
        assert_eq!(
            MatchFailure::WrongPattern(vec![Pattern::Stripes, Pattern::Dots]).to_string(),
            "Wanted stripes or dots pattern"
        );
    }

    // -----------------------------------------------------------------------
    // Rack scan
    // -----------------------------------------------------------------------

    #[test]
    fn rack_scan_finds_a_match_anywhere_on_the_rack() {
        let wants = Preference {
            shapes: vec![Shape::Skirt],
            colors: vec![],
            patterns: vec![],
            max_price: PriceLevel::Three,
        };
        let rack = vec![
            item(Shape::Shirt, Color::Blue, Pattern::None, PriceLevel::One),
            item(Shape::Skirt, Color::Green, Pattern::None, PriceLevel::One),
        ];
        assert!(has_matching_item(&rack, &wants));
        assert!(!has_matching_item(&rack[..1], &wants));
        assert!(!has_matching_item(&[], &wants));
    }

    // -----------------------------------------------------------------------
    // Payout
    // -----------------------------------------------------------------------

    #[test]
    fn payout_doubles_for_vips_before_tip() {
        assert_eq!(payout(10, false, 0), 10);
        assert_eq!(payout(10, true, 0), 20);
        assert_eq!(payout(10, true, 3), 23);
        assert_eq!(payout(15, false, 2), 17);
    }

    // -----------------------------------------------------------------------
    // Hints
    // -----------------------------------------------------------------------

    #[test]
    fn hint_for_open_preference() {
        let mut rng = GameRng::new(7);
        let wants = wants_nothing_specific(PriceLevel::Three);
        assert_eq!(preference_hint(&wants, &mut rng), "anything!");
    }

    #[test]
    fn hint_combines_color_and_shape() {
        let mut rng = GameRng::new(7);
        let wants = Preference {
            shapes: vec![Shape::Dress],
            colors: vec![Color::Pink],
            patterns: vec![],
            max_price: PriceLevel::Three,
        };
        assert_eq!(preference_hint(&wants, &mut rng), "a pink dress");
    }

    #[test]
    fn hint_with_only_one_axis() {
        let mut rng = GameRng::new(7);
        let shape_only = Preference {
            shapes: vec![Shape::Pants],
            colors: vec![],
            patterns: vec![],
            max_price: PriceLevel::Two,
        };
        assert_eq!(preference_hint(&shape_only, &mut rng), "a pants");

        let color_only = Preference {
            shapes: vec![],
            colors: vec![Color::Yellow],
            patterns: vec![],
            max_price: PriceLevel::Two,
        };
        assert_eq!(preference_hint(&color_only, &mut rng), "something yellow");
    }

    #[test]
    fn hint_is_deterministic_for_a_seeded_rng() {
        let wants = Preference {
            shapes: vec![Shape::Shirt, Shape::Dress, Shape::Pants],
            colors: vec![Color::Pink, Color::Blue],
            patterns: vec![],
            max_price: PriceLevel::Three,
        };
        let a = preference_hint(&wants, &mut GameRng::new(42));
        let b = preference_hint(&wants, &mut GameRng::new(42));
        assert_eq!(a, b);
    }
}
