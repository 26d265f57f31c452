/// Top-N largest files from an item listing.
use crate::model::ItemRecord;
use serde::Serialize;
use std::path::PathBuf;

/// A single entry in the "largest files" results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestFile {
    pub path: PathBuf,
    /// Path relative to the listing root.
    pub relative_path: PathBuf,
    pub size: u64,
}

/// The `n` largest regular files, largest first (equal sizes by path).
///
/// Uses `select_nth_unstable_by` to bring the top-N to the front before
/// sorting only those, so large listings are not fully sorted.
pub fn largest_files(items: &[ItemRecord], n: usize) -> Vec<LargestFile> {
    if n == 0 {
        return Vec::new();
    }

    let mut files: Vec<&ItemRecord> = items.iter().filter(|i| i.is_file()).collect();
    let by_size_desc = |a: &&ItemRecord, b: &&ItemRecord| {
        b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path))
    };

    if files.len() > n {
        files.select_nth_unstable_by(n - 1, by_size_desc);
        files.truncate(n);
    }
    files.sort_unstable_by(by_size_desc);

    files
        .into_iter()
        .map(|item| LargestFile {
            path: item.path.clone(),
            relative_path: item.relative_path.clone(),
            size: item.size,
        })
        .collect()
}
