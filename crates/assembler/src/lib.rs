//! Full-domain reconstruction from per-rank snapshot tiles.
//!
//! The simulation decomposes its grid along x: rank 0 owns the leftmost
//! slice, increasing ranks sit to its right. [`assemble`] reads every rank
//! file of one timestep and concatenates the tiles in rank order into a
//! [`GlobalFrame`].

pub mod assemble;
pub mod frame;
pub mod manifest;

pub use assemble::assemble;
pub use frame::{stitch, GlobalFrame};
pub use manifest::{count_ranks, TimestepManifest};
