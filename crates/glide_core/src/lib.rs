//! Glide Core
//!
//! Leaf utilities shared by the client crates:
//! - Monotonic clocks (real and manually driven)
//! - 2D math

pub mod math;
pub mod time;

pub use glam;

/// Client version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
