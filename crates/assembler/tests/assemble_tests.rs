//! Tests for reading and stitching rank tiles from disk.

use assembler::{assemble, TimestepManifest};
use snapshot_common::{ErrorKind, FormatError, FrameError};
use test_utils::{assert_approx_eq, encoded_value, remove_tile, truncate_tile, write_tile, Pattern, RunSpec};

// ============================================================================
// Stitching
// ============================================================================

#[test]
fn test_stitched_width_and_column_mapping() {
    let (k, w) = (4usize, 6usize);
    let fixture = RunSpec::new(1, k as u32, w, 3, 2).with_pattern(Pattern::Positional);
    let dir = fixture.temp_dir();

    let frame = assemble(dir.path(), "output", 0, k as u32).unwrap().unwrap();
    assert_eq!(frame.width(), k * w);
    assert_eq!(frame.tile_widths(), &[w; 4]);

    // Global column c comes from local column c % w of rank c / w.
    for var in 0..2 {
        for y in 0..3 {
            for c in 0..k * w {
                let rank = c / w;
                let local = c % w;
                let tile = fixture.tile(0, rank as u32);
                assert_eq!(frame.value(var, y, c), tile.value(var, y, local));
                assert_eq!(frame.value(var, y, c), encoded_value(var, y, c));
            }
        }
    }
}

#[test]
fn test_concrete_scenario_shape() {
    let fixture = RunSpec::new(3, 2, 10, 5, 4);
    let dir = fixture.temp_dir();
    let manifest = TimestepManifest::scan(dir.path(), "output");
    assert_eq!(manifest.num_ranks(), 2);

    for timestep in 0..3 {
        let frame = assemble(dir.path(), "output", timestep, manifest.num_ranks())
            .unwrap()
            .unwrap();
        assert_eq!(frame.shape(), (4, 5, 20));
        assert_eq!(frame.step, timestep as i32);
        assert_approx_eq!(frame.time, timestep as f32 * 0.01, 1e-6);
        assert_approx_eq!(frame.gamma, 1.4, 1e-6);
    }
}

// ============================================================================
// Missing files
// ============================================================================

#[test]
fn test_absent_master_means_no_timestep() {
    let fixture = RunSpec::new(2, 2, 4, 4, 1);
    let dir = fixture.temp_dir();
    assert!(assemble(dir.path(), "output", 2, 2).unwrap().is_none());
}

#[test]
fn test_missing_middle_rank_is_missing_tile() {
    let fixture = RunSpec::new(1, 3, 4, 4, 1);
    let dir = fixture.temp_dir();
    remove_tile(dir.path(), "output", 0, 1);

    let err = assemble(dir.path(), "output", 0, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTile);
    assert!(matches!(
        err,
        FrameError::MissingTile {
            timestep: 0,
            rank: 1,
            ..
        }
    ));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_truncated_slave_is_format_error() {
    let fixture = RunSpec::new(1, 2, 4, 4, 1);
    let dir = fixture.temp_dir();
    truncate_tile(dir.path(), "output", 0, 1, 30);

    let err = assemble(dir.path(), "output", 0, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_step_mismatch_reported_against_slave_file() {
    let fixture = RunSpec::new(1, 2, 4, 4, 1);
    let dir = fixture.temp_dir();
    let mut wrong = fixture.tile(0, 1);
    wrong.step = 9;
    write_tile(dir.path(), "output", 0, 1, &wrong);

    match assemble(dir.path(), "output", 0, 2).unwrap_err() {
        FrameError::Format { path, source } => {
            assert!(path.ends_with("output_00000.00001"));
            assert_eq!(
                source,
                FormatError::TileMismatch {
                    rank: 1,
                    field: "step",
                    expected: 0,
                    found: 9
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_extra_rank_files_beyond_manifest_are_ignored() {
    let fixture = RunSpec::new(1, 3, 2, 2, 1);
    let dir = fixture.temp_dir();
    let frame = assemble(dir.path(), "output", 0, 2).unwrap().unwrap();
    assert_eq!(frame.width(), 4);
}
