//! Snapshot decoding and encoding.

use bytes::{BufMut, Bytes, BytesMut};
use snapshot_common::{FormatError, FrameError, FrameResult};
use std::path::Path;
use tracing::debug;

use crate::record::{write_record, RecordReader};

/// Decoded content of one rank's file for one timestep.
///
/// `payload` is laid out as `(nvar, ny, nx)` with `x` varying fastest:
/// element `(v, y, x)` lives at `v * ny * nx + y * nx + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time: f32,
    pub gamma: f32,
    pub nx: i32,
    pub ny: i32,
    pub nvar: i32,
    pub step: i32,
    pub payload: Vec<f32>,
}

impl Snapshot {
    /// Build a snapshot, checking that the payload matches the dimensions.
    pub fn new(
        time: f32,
        gamma: f32,
        (nx, ny, nvar): (i32, i32, i32),
        step: i32,
        payload: Vec<f32>,
    ) -> Result<Self, FormatError> {
        let expected = element_count(nx, ny, nvar)?;
        if payload.len() != expected {
            return Err(FormatError::PayloadLength {
                expected,
                found: payload.len(),
            });
        }
        Ok(Self {
            time,
            gamma,
            nx,
            ny,
            nvar,
            step,
            payload,
        })
    }

    /// Local width (x extent).
    pub fn width(&self) -> usize {
        self.nx as usize
    }

    /// Local height (y extent).
    pub fn height(&self) -> usize {
        self.ny as usize
    }

    pub fn num_vars(&self) -> usize {
        self.nvar as usize
    }

    /// Logical shape `(nvar, ny, nx)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.num_vars(), self.height(), self.width())
    }

    /// All values of one variable, row-major `(ny, nx)`.
    pub fn variable(&self, var: usize) -> &[f32] {
        let plane = self.width() * self.height();
        &self.payload[var * plane..(var + 1) * plane]
    }

    /// One row `y` of variable `var`.
    pub fn row(&self, var: usize, y: usize) -> &[f32] {
        let nx = self.width();
        let start = (var * self.height() + y) * nx;
        &self.payload[start..start + nx]
    }

    pub fn value(&self, var: usize, y: usize, x: usize) -> f32 {
        self.row(var, y)[x]
    }
}

fn element_count(nx: i32, ny: i32, nvar: i32) -> Result<usize, FormatError> {
    let invalid = || FormatError::InvalidDimensions { nx, ny, nvar };
    if nx < 0 || ny < 0 || nvar < 0 {
        return Err(invalid());
    }
    (nx as usize)
        .checked_mul(ny as usize)
        .and_then(|n| n.checked_mul(nvar as usize))
        .ok_or_else(invalid)
}

/// Decode the three records of a snapshot file.
pub fn decode(data: Bytes) -> Result<Snapshot, FormatError> {
    let mut reader = RecordReader::new(data);

    let header = reader.read_f32_exact(2)?;
    let dims = reader.read_i32_exact(4)?;
    let (nx, ny, nvar, step) = (dims[0], dims[1], dims[2], dims[3]);

    let expected = element_count(nx, ny, nvar)?;
    let payload = reader.read_f32_record()?;
    if payload.len() != expected {
        return Err(FormatError::PayloadLength {
            expected,
            found: payload.len(),
        });
    }

    Ok(Snapshot {
        time: header[0],
        gamma: header[1],
        nx,
        ny,
        nvar,
        step,
        payload,
    })
}

/// Encode a snapshot into the three-record layout read by [`decode`].
pub fn encode(snapshot: &Snapshot) -> Result<Bytes, FormatError> {
    let mut out = BytesMut::with_capacity(snapshot.payload.len() * 4 + 64);

    let mut header = BytesMut::with_capacity(8);
    header.put_f32_ne(snapshot.time);
    header.put_f32_ne(snapshot.gamma);
    write_record(&mut out, &header)?;

    let mut dims = BytesMut::with_capacity(16);
    for value in [snapshot.nx, snapshot.ny, snapshot.nvar, snapshot.step] {
        dims.put_i32_ne(value);
    }
    write_record(&mut out, &dims)?;

    let mut data = BytesMut::with_capacity(snapshot.payload.len() * 4);
    for &value in &snapshot.payload {
        data.put_f32_ne(value);
    }
    write_record(&mut out, &data)?;

    Ok(out.freeze())
}

/// Read and decode a snapshot file.
pub fn read_snapshot(path: &Path) -> FrameResult<Snapshot> {
    let data = std::fs::read(path).map_err(|e| FrameError::io(path, e))?;
    debug!(path = ?path, bytes = data.len(), "Read snapshot file");
    decode(Bytes::from(data)).map_err(|e| FrameError::format(path, e))
}

/// Encode and write a snapshot file.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> FrameResult<()> {
    let data = encode(snapshot).map_err(|e| FrameError::format(path, e))?;
    std::fs::write(path, &data).map_err(|e| FrameError::io(path, e))
}
