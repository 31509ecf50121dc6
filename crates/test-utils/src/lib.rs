//! Shared test utilities for the snapshot animation workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic tile generators with verifiable values
//! - Fixture writers that lay out rank files the way the simulation does
//! - Approximate float assertions
//!
//! # Usage
//!
//! ```ignore
//! use test_utils::{RunSpec, assert_approx_eq};
//!
//! let dir = RunSpec::new(3, 2, 10, 5, 4).temp_dir();
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
