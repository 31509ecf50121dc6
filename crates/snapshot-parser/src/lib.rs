//! Decoder for per-rank binary snapshot dumps.
//!
//! Each rank of the simulation writes one file per timestep consisting of
//! three unformatted records (see [`record`]):
//!
//! 1. `(time, gamma)` as two 32-bit floats
//! 2. `(nx, ny, nvar, step)` as four 32-bit integers
//! 3. `nx * ny * nvar` 32-bit floats, logically shaped `(nvar, ny, nx)`
//!
//! Values are read in native byte order, matching the writer.

pub mod record;
pub mod snapshot;

pub use record::{write_record, RecordReader, MARKER_LEN};
pub use snapshot::{decode, encode, read_snapshot, write_snapshot, Snapshot};
