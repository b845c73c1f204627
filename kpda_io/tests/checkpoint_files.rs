//! File-level checkpoint tests.

use kpda_io::*;
use tempfile::TempDir;

#[test]
fn save_and_load_through_the_filesystem() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let weights: Vec<u8> = (0..=255).collect();
    let record = CheckpointRecord::new(10, Some(1e-3), 0.0421, "outwear", weights);
    let path = checkpoint_path(dir, "outwear", 10);
    save_to_file(&record, &path).unwrap();

    assert!(path.ends_with("kpt_outwear_010.ckpt"));
    let loaded = load_from_file(&path).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn latest_checkpoint_resumes_highest_epoch() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    for (epoch, best) in [(3usize, 0.9), (10, 0.5), (12, 0.4)] {
        let record = CheckpointRecord::new(epoch, Some(1e-4), best, "trousers", vec![epoch as u8]);
        save_to_file(&record, checkpoint_path(dir, "trousers", epoch)).unwrap();
    }

    let latest = find_latest_checkpoint(dir, "trousers").unwrap().unwrap();
    let record = load_from_file(latest).unwrap();
    assert_eq!(record.epoch, 12);
    assert_eq!(record.best_loss, 0.4);
    assert_eq!(record.weights, vec![12]);
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = load_from_file(temp_dir.path().join("nope.ckpt")).unwrap_err();
    assert!(matches!(err, KpdaIoError::Io(_)));
}

#[test]
fn loading_an_empty_file_reports_truncation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.ckpt");
    std::fs::write(&path, b"").unwrap();

    let err = load_from_file(&path).unwrap_err();
    assert_eq!(err, KpdaIoError::Truncated { section: "header" });
}
