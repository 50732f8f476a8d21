//! Post-wave coaching line.
//!
//! One line of child-friendly advice picked from the wave's sale log for
//! the results screen. A perfect wave wins, then the most actionable
//! failure reason, then plain encouragement.

use boutique_core::matching::MatchFailure;
use boutique_core::session::WaveResult;

/// Picks the advice line for a finished wave.
pub fn wave_tip(result: &WaveResult) -> &'static str {
    let successes = result.sales.iter().filter(|sale| sale.success).count();
    let failures: Vec<_> = result.sales.iter().filter(|sale| !sale.success).collect();

    if failures.is_empty() && successes > 0 {
        return "⭐ Perfect! You matched everything!";
    }
    if failures
        .iter()
        .any(|sale| matches!(sale.reason, Some(MatchFailure::TooExpensive)))
    {
        return "💡 Some items were too pricey. Try lower prices!";
    }
    if failures.iter().any(|sale| sale.reason.is_some()) {
        return "💡 Watch the thought bubbles to see what customers want!";
    }
    if successes == 0 {
        return "💪 Keep trying! Match colors and shapes to thought bubbles!";
    }
    "👍 Good job! Keep practicing!"
}

// ===========================================================================
// Tests
// ===========================================================================
