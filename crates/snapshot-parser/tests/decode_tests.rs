//! File-level tests for snapshot decoding.

use bytes::{BufMut, Bytes, BytesMut};
use snapshot_common::{ErrorKind, FormatError, FrameError};
use snapshot_parser::{decode, encode, read_snapshot, write_record, write_snapshot, Snapshot};

fn density_tile(nx: i32, ny: i32, nvar: i32, step: i32) -> Snapshot {
    let len = (nx * ny * nvar) as usize;
    let payload = (0..len).map(|i| 1.0 + i as f32 / 100.0).collect();
    Snapshot::new(step as f32 * 0.1, 1.4, (nx, ny, nvar), step, payload).unwrap()
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_file_round_trip_preserves_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output_00003.00001");
    let snap = density_tile(10, 5, 4, 3);

    write_snapshot(&path, &snap).unwrap();
    let decoded = read_snapshot(&path).unwrap();

    assert_eq!(decoded.time, snap.time);
    assert_eq!(decoded.gamma, snap.gamma);
    assert_eq!((decoded.nx, decoded.ny, decoded.nvar), (10, 5, 4));
    assert_eq!(decoded.step, 3);
    assert_eq!(decoded.payload, snap.payload);
}

#[test]
fn test_empty_payload_round_trip() {
    let snap = Snapshot::new(0.0, 5.0 / 3.0, (0, 5, 4), 0, vec![]).unwrap();
    assert_eq!(decode(encode(&snap).unwrap()).unwrap(), snap);
}

// ============================================================================
// Truncation and marker errors
// ============================================================================

#[test]
fn test_truncated_at_every_record_boundary() {
    let full = encode(&density_tile(3, 2, 1, 0)).unwrap();
    // Cutting inside each of the three records must be a truncation.
    for cut in [0, 2, 10, 17, 30, 45, full.len() - 1] {
        let err = decode(full.slice(0..cut)).unwrap_err();
        assert!(
            matches!(err, FormatError::Truncated { .. }),
            "cut at {cut} gave {err:?}"
        );
    }
}

#[test]
fn test_dimension_record_must_hold_four_integers() {
    for ints in [3usize, 5] {
        let mut header = BytesMut::new();
        header.put_f32_ne(0.0);
        header.put_f32_ne(1.4);

        let mut dims = BytesMut::new();
        for v in [2i32, 2, 1, 0, 7].iter().take(ints) {
            dims.put_i32_ne(*v);
        }

        let mut out = BytesMut::new();
        write_record(&mut out, &header).unwrap();
        write_record(&mut out, &dims).unwrap();
        write_record(&mut out, &[0u8; 16]).unwrap();

        assert_eq!(
            decode(out.freeze()).unwrap_err(),
            FormatError::MetadataShape {
                record: 1,
                expected: 16,
                found: ints * 4
            }
        );
    }
}

#[test]
fn test_corrupt_trailing_marker_is_distinct_from_truncation() {
    let mut raw = encode(&density_tile(3, 2, 1, 0)).unwrap().to_vec();
    // Trailing marker of the first record lives at bytes 12..16.
    raw[12..16].copy_from_slice(&9u32.to_ne_bytes());
    let err = decode(Bytes::from(raw)).unwrap_err();
    assert_eq!(
        err,
        FormatError::MarkerMismatch {
            record: 0,
            leading: 8,
            trailing: 9
        }
    );
}

#[test]
fn test_read_truncated_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output_00000.00000");
    let full = encode(&density_tile(4, 4, 2, 0)).unwrap();
    std::fs::write(&path, &full[..full.len() - 10]).unwrap();

    let err = read_snapshot(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    match err {
        FrameError::Format { path: p, source } => {
            assert_eq!(p, path);
            assert!(matches!(source, FormatError::Truncated { record: 2, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_snapshot(&dir.path().join("output_00000.00000")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
