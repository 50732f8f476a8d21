use fixed::types::{I16F16, I32F32};

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Used for patience, decay rates, probabilities, and the clock
/// accumulator — everything on the simulation path. Deterministic across
/// platforms, unlike floats.
pub type Fixed64 = I32F32;

/// Q16.16 fixed-point for compact storage (doodle coordinates, etc.).
pub type Fixed32 = I16F16;

/// Ticks are the atomic unit of session time (one tick = one second).
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in the
/// tick loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display, never in the tick loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Convert an f64 to Fixed32. Use only for initialization.
#[inline]
pub fn f64_to_fixed32(v: f64) -> Fixed32 {
    Fixed32::from_num(v)
}

/// Convert Fixed32 to f64. Use only for display.
#[inline]
pub fn fixed32_to_f64(v: Fixed32) -> f64 {
    v.to_num::<f64>()
}
