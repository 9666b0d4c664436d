//! Math utilities
//!
//! Re-exports glam with the few helpers the client needs

pub use glam::*;

/// Linear blend from `from` to `to` at fraction `t`.
///
/// `t` is clamped to `[0, 1]`, and both ends are returned bit-exact
/// (`lerp` alone can round at `t == 1`).
pub fn blend(from: DVec2, to: DVec2, t: f64) -> DVec2 {
    if t <= 0.0 {
        from
    } else if t >= 1.0 {
        to
    } else {
        from.lerp(to, t)
    }
}
