/// File age analysis — find old/stale files that haven't been modified recently.
use crate::model::ItemRecord;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

const SECS_PER_DAY: u64 = 24 * 3600;

/// A file identified as old/stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleFile {
    pub path: PathBuf,
    pub size: u64,
    #[serde(with = "crate::model::timestamp")]
    pub last_modified: SystemTime,
    pub age_days: u64,
}

/// Find files not modified in the `min_age_days` days before `now`,
/// sorted by size descending.
///
/// Returns an empty vec immediately when `max_results == 0`, which also
/// avoids an integer underflow (`max_results - 1` wrapping to `usize::MAX`)
/// that would panic inside `select_nth_unstable_by`.
pub fn find_stale_files(
    items: &[ItemRecord],
    min_age_days: u64,
    max_results: usize,
    now: SystemTime,
) -> Vec<StaleFile> {
    if max_results == 0 {
        return Vec::new();
    }

    let threshold = Duration::from_secs(min_age_days.saturating_mul(SECS_PER_DAY));

    let mut stale: Vec<StaleFile> = items
        .iter()
        .filter(|item| item.is_file())
        .filter_map(|item| {
            let modified = item.modified?;
            let age = now.duration_since(modified).ok()?;
            (age >= threshold).then(|| StaleFile {
                path: item.path.clone(),
                size: item.size,
                last_modified: modified,
                age_days: age.as_secs() / SECS_PER_DAY,
            })
        })
        .collect();

    let by_size_desc =
        |a: &StaleFile, b: &StaleFile| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path));

    // Partial sort: O(n) select + O(k log k) sort of top-k, vs O(n log n) full sort.
    if stale.len() > max_results {
        stale.select_nth_unstable_by(max_results - 1, by_size_desc);
        stale.truncate(max_results);
    }
    stale.sort_unstable_by(by_size_desc);
    stale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKind;
    use compact_str::CompactString;

    const DAY: u64 = 24 * 3600;

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_000 * DAY)
    }

    fn file_with_age(name: &str, size: u64, days_ago: u64) -> ItemRecord {
        ItemRecord {
            name: CompactString::new(name),
            path: PathBuf::from(format!("/r/{name}")),
            relative_path: PathBuf::from(name),
            depth: 1,
            kind: ItemKind::File,
            extension: CompactString::default(),
            size,
            modified: Some(now() - Duration::from_secs(days_ago * DAY + 1)),
            created: None,
            mime_type: None,
            entry_count: None,
            error: None,
        }
    }

    #[test]
    fn stale_file_older_than_threshold_is_returned() {
        let items = vec![file_with_age("old.log", 500, 400)];
        let result = find_stale_files(&items, 365, 10, now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].size, 500);
        assert_eq!(result[0].age_days, 400);
    }

    #[test]
    fn recent_file_is_excluded() {
        let items = vec![file_with_age("new.txt", 1024, 10)];
        assert!(find_stale_files(&items, 365, 10, now()).is_empty());
    }

    /// The largest stale file comes first and `max_results` caps the list.
    #[test]
    fn sorted_by_size_and_capped() {
        let items: Vec<ItemRecord> = (0..5u64)
            .map(|i| file_with_age(&format!("f{i}.bak"), (i + 1) * 100, 400))
            .collect();

        let result = find_stale_files(&items, 365, 2, now());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].size, 500);
        assert_eq!(result[1].size, 400);
    }

    #[test]
    fn folders_are_excluded() {
        let mut folder = file_with_age("OldDir", 0, 400);
        folder.kind = ItemKind::Folder;
        assert!(find_stale_files(&[folder], 0, 100, now()).is_empty());
    }

    /// `max_results == 0` must return an empty vec without panicking.
    #[test]
    fn zero_max_results_does_not_panic() {
        let items = vec![file_with_age("old.log", 1024, 400)];
        assert!(find_stale_files(&items, 0, 0, now()).is_empty());
    }

    /// A day count too large to express in seconds matches nothing.
    #[test]
    fn huge_min_age_matches_nothing() {
        let items = vec![file_with_age("ancient.log", 1, 999)];
        assert!(find_stale_files(&items, u64::MAX, 10, now()).is_empty());
        assert!(find_stale_files(&items, u64::MAX / 1_000, 10, now()).is_empty());
    }

    /// Equal sizes at the cutoff keep the lexicographically first paths.
    #[test]
    fn equal_sizes_at_cutoff_keep_first_paths() {
        let items: Vec<ItemRecord> = ["e", "b", "d", "a", "c"]
            .iter()
            .map(|name| file_with_age(name, 100, 400))
            .collect();

        let result = find_stale_files(&items, 365, 2, now());
        let paths: Vec<PathBuf> = result.into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec![PathBuf::from("/r/a"), PathBuf::from("/r/b")]);
    }

    #[test]
    fn file_without_modified_is_ignored() {
        let mut item = file_with_age("no_time.bin", 999, 400);
        item.modified = None;
        assert!(find_stale_files(&[item], 0, 100, now()).is_empty());
    }
}
