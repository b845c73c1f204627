//! Checkpoint and log file naming inside a save directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File extension used for checkpoints.
pub const CHECKPOINT_EXTENSION: &str = "ckpt";

/// `kpt_<tag>_<epoch:03>.ckpt`
pub fn checkpoint_file_name(tag: &str, epoch: usize) -> String {
    format!("kpt_{}_{:03}.{}", tag, epoch, CHECKPOINT_EXTENSION)
}

/// `kpt_<tag>_train_log.txt`
pub fn train_log_file_name(tag: &str) -> String {
    format!("kpt_{}_train_log.txt", tag)
}

/// Epoch encoded in a checkpoint file name for `tag`, if the name matches.
pub fn parse_checkpoint_epoch(file_name: &str, tag: &str) -> Option<usize> {
    let stem = file_name
        .strip_prefix("kpt_")?
        .strip_prefix(tag)?
        .strip_prefix('_')?
        .strip_suffix(CHECKPOINT_EXTENSION)?
        .strip_suffix('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Path of the checkpoint for `tag` and `epoch` inside `dir`.
pub fn checkpoint_path(dir: &Path, tag: &str, epoch: usize) -> PathBuf {
    dir.join(checkpoint_file_name(tag, epoch))
}

/// Highest-epoch checkpoint for `tag` in `dir`.
///
/// Returns `Ok(None)` if the directory holds no matching checkpoint.
///
/// # Errors
/// Returns `Io` if the directory cannot be listed.
pub fn find_latest_checkpoint(dir: &Path, tag: &str) -> Result<Option<PathBuf>> {
    let mut latest: Option<(usize, PathBuf)> = None;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(epoch) = parse_checkpoint_epoch(name, tag) {
            if latest.as_ref().map_or(true, |(best, _)| epoch > *best) {
                latest = Some((epoch, path));
            }
        }
    }

    Ok(latest.map(|(_, path)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        assert_eq!(checkpoint_file_name("blouse", 7), "kpt_blouse_007.ckpt");
        assert_eq!(checkpoint_file_name("dress", 1234), "kpt_dress_1234.ckpt");
        assert_eq!(train_log_file_name("skirt"), "kpt_skirt_train_log.txt");
    }

    #[test]
    fn test_parse_checkpoint_epoch() {
        assert_eq!(parse_checkpoint_epoch("kpt_blouse_007.ckpt", "blouse"), Some(7));
        assert_eq!(parse_checkpoint_epoch("kpt_blouse_120.ckpt", "blouse"), Some(120));
        assert_eq!(parse_checkpoint_epoch("kpt_blouse_007.ckpt", "dress"), None);
        assert_eq!(parse_checkpoint_epoch("kpt_blouse_train_log.txt", "blouse"), None);
        assert_eq!(parse_checkpoint_epoch("kpt_blouse_.ckpt", "blouse"), None);
        assert_eq!(parse_checkpoint_epoch("kpt_blouse_-1.ckpt", "blouse"), None);
    }

    #[test]
    fn test_find_latest_checkpoint() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        for epoch in [5, 10, 3] {
            fs::write(checkpoint_path(dir, "blouse", epoch), b"").unwrap();
        }
        fs::write(checkpoint_path(dir, "dress", 99), b"").unwrap();
        fs::write(dir.join(train_log_file_name("blouse")), b"").unwrap();

        let latest = find_latest_checkpoint(dir, "blouse").unwrap().unwrap();
        assert!(latest.ends_with("kpt_blouse_010.ckpt"));

        assert!(find_latest_checkpoint(dir, "trousers").unwrap().is_none());
        assert!(find_latest_checkpoint(&dir.join("missing"), "blouse").is_err());
    }
}
