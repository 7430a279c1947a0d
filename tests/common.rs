//! Test utilities & fixtures.
//! Provides access to integration test data under `tests/test-data-int`.

use chrono::{NaiveDate, NaiveDateTime};
use merchant_board::merchant::ScheduleIndex;
use merchant_board::source::envelope;
use std::path::{Path, PathBuf};

/// Return the path to the static integration test fixture directory.
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test-data-int")
}

/// Path of the week snapshot fixture (route payload shape).
pub fn snapshot_path() -> PathBuf {
    fixture_root().join("merchants.json")
}

/// Index built from the week snapshot fixture.
#[allow(dead_code)]
pub fn fixture_index() -> ScheduleIndex {
    let body = std::fs::read_to_string(snapshot_path()).expect("read fixture");
    ScheduleIndex::from_snapshot(envelope::decode(&body).expect("decode fixture"))
}

/// Copy the snapshot fixture into a temp dir so tests can rewrite it.
#[allow(dead_code)]
pub fn writable_snapshot() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("merchants.json");
    std::fs::copy(snapshot_path(), &path).expect("copy fixture");
    (tmp, path)
}

/// Wall-clock instant in the week of Sunday 2024-06-02.
/// `day` counts from that Sunday, so 0 = Sunday and 6 = Saturday.
#[allow(dead_code)]
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 2 + day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid instant")
}
