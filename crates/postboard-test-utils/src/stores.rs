use tempfile::TempDir;

use postboard_blob_fs::FsBlobStore;
use postboard_storage_sqlite::SqlitePostStore;

pub struct TestStores {
    pub post_store: SqlitePostStore,
    pub blob_store: FsBlobStore,
    /// Hold the TempDir to keep it alive for the test's duration.
    pub _tempdir: TempDir,
}

/// Create a fresh set of test stores backed by a tempdir.
///
/// The SQLite database lives in `test.db` and the blob store writes to a
/// `blobs/` subdirectory inside the same tempdir.
pub async fn create_test_stores() -> TestStores {
    let tempdir = TempDir::new().expect("failed to create tempdir");
    let db_path = tempdir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let post_store = SqlitePostStore::connect(&db_url)
        .await
        .expect("failed to connect post store");

    let blobs_path = tempdir.path().join("blobs");
    let blob_store =
        FsBlobStore::new(blobs_path.to_str().unwrap()).expect("failed to create blob store");

    TestStores {
        post_store,
        blob_store,
        _tempdir: tempdir,
    }
}
