use std::fs;

use super::*;

struct Fixture {
    _dir: tempfile::TempDir,
    source: DropSource,
    reference_rx: Arc<BoundedQueue<Table>>,
    log_rx: Arc<BoundedQueue<Table>>,
    request_rx: Arc<BoundedQueue<Table>>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    for sub in ["csv", "log", "request"] {
        fs::create_dir(dir.path().join(sub)).unwrap();
    }

    let reference_rx = Arc::new(BoundedQueue::new(16));
    let log_rx = Arc::new(BoundedQueue::new(16));
    let request_rx = Arc::new(BoundedQueue::new(16));

    let source = DropSource::new(
        DropSourceConfig {
            reference_dir: dir.path().join("csv"),
            log_dir: dir.path().join("log"),
            request_dir: dir.path().join("request"),
            reference_files: vec!["products.csv".into(), "stock.csv".into()],
            delimiter: ';',
        },
        Arc::clone(&reference_rx),
        Arc::clone(&log_rx),
        Arc::clone(&request_rx),
    );

    Fixture {
        _dir: dir,
        source,
        reference_rx,
        log_rx,
        request_rx,
    }
}

#[tokio::test]
async fn test_time_tick_ingests_reference_and_log_files() {
    let f = fixture();
    fs::write(
        f.source.config.reference_dir.join("products.csv"),
        "id;name;price\n2000001;lamp;19.5\n",
    )
    .unwrap();
    fs::write(
        f.source.config.log_dir.join("1log_simulation.txt"),
        "timestamp;type;content;extra_1;extra_2\n1;User;x;ZOOM;P1\n",
    )
    .unwrap();

    f.source.on_time_tick().await;

    let reference = f.reference_rx.pop().await.unwrap();
    assert_eq!(reference.row_count(), 1);
    let log = f.log_rx.pop().await.unwrap();
    assert_eq!(log.cell_str(0, "extra_1").unwrap(), "ZOOM");
    assert!(f.request_rx.is_empty());

    let snapshot = f.source.metrics().snapshot();
    assert_eq!(snapshot.files_ingested, 2);
    assert_eq!(snapshot.rows_ingested, 2);
}

#[tokio::test]
async fn test_files_are_processed_once() {
    let f = fixture();
    fs::write(
        f.source.config.log_dir.join("a.txt"),
        "timestamp;type\n1;User\n",
    )
    .unwrap();

    f.source.on_time_tick().await;
    f.source.on_time_tick().await;

    assert_eq!(f.log_rx.len(), 1);
    assert_eq!(f.source.metrics().snapshot().files_ingested, 1);
}

#[tokio::test]
async fn test_unexpected_reference_files_are_ignored() {
    let f = fixture();
    fs::write(
        f.source.config.reference_dir.join("random.csv"),
        "a;b\n1;2\n",
    )
    .unwrap();

    f.source.on_time_tick().await;
    assert!(f.reference_rx.is_empty());
}

#[tokio::test]
async fn test_request_tick_scans_request_dir_only() {
    let f = fixture();
    fs::write(
        f.source.config.request_dir.join("query.txt"),
        "timestamp;type\n9;User\n",
    )
    .unwrap();
    fs::write(
        f.source.config.log_dir.join("ignored.txt"),
        "timestamp;type\n1;User\n",
    )
    .unwrap();

    f.source.on_request_tick().await;

    assert_eq!(f.request_rx.len(), 1);
    assert!(f.log_rx.is_empty());
}

#[tokio::test]
async fn test_unreadable_file_is_skipped() {
    let f = fixture();
    // A header-only file decodes to an empty table; a directory named like
    // a file is not a regular file and is ignored entirely
    fs::create_dir(f.source.config.log_dir.join("subdir.txt")).unwrap();
    fs::write(f.source.config.log_dir.join("empty.txt"), "").unwrap();

    f.source.on_time_tick().await;

    assert!(f.log_rx.is_empty());
    assert_eq!(f.source.metrics().snapshot().decode_errors, 1);
}

#[tokio::test]
async fn test_missing_directory_logs_and_continues() {
    let f = fixture();
    fs::remove_dir(&f.source.config.log_dir).unwrap();

    // Must not panic; the reference directory still scans
    f.source.on_time_tick().await;
    assert!(f.log_rx.is_empty());
}
