/// Flat item inventory using `jwalk`.
///
/// Produces one [`ItemRecord`] per entry below the root, in sorted
/// depth-first order, for tabular listings and tree outlines. Unlike the
/// aggregator this keeps unreadable entries as rows flagged with an error so
/// the listing shows where they are.
use crate::error::Result;
use crate::model::{extension_of, ItemKind, ItemRecord};
use crate::scanner::aggregate::validate_root;
use compact_str::CompactString;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Knobs for [`list_items`].
#[derive(Debug, Clone, Default)]
pub struct InventoryOptions {
    /// Deepest level to list; 1 lists only the root's direct entries.
    pub max_depth: Option<usize>,
    /// Read directories on a rayon pool sized by the CPU count.
    pub parallel: bool,
}

/// List every entry below `root`.
pub fn list_items(root: &Path, options: &InventoryOptions) -> Result<Vec<ItemRecord>> {
    validate_root(root)?;
    let start = Instant::now();

    let parallelism = if options.parallel {
        jwalk::Parallelism::RayonNewPool(num_cpus::get())
    } else {
        jwalk::Parallelism::Serial
    };
    let mut walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(parallelism);
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut records: Vec<ItemRecord> = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                // jwalk errors are typically unreadable directories.
                let message = err.to_string();
                debug!("Inventory error: {message}");
                if let Some(path) = err.path() {
                    flag_error(&mut records, root, path, message);
                }
                continue;
            }
        };

        let path = entry.path();
        if path == root {
            continue;
        }

        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            ItemKind::Folder
        } else if file_type.is_file() {
            ItemKind::File
        } else {
            ItemKind::Other
        };
        records.push(describe(root, &path, kind));
    }

    info!(
        "Listed {} items under {} in {:?}",
        records.len(),
        root.display(),
        start.elapsed()
    );
    Ok(records)
}

/// Build the record for one entry, reading its metadata.
fn describe(root: &Path, path: &Path, kind: ItemKind) -> ItemRecord {
    let mut record = blank_record(root, path, kind);

    match fs::symlink_metadata(path) {
        Ok(meta) => {
            if kind == ItemKind::File {
                record.size = meta.len();
            }
            record.modified = meta.modified().ok();
            record.created = meta.created().ok();
        }
        Err(err) => record.error = Some(err.to_string()),
    }

    if kind == ItemKind::File {
        record.mime_type = sniff_mime(path);
    }

    if kind == ItemKind::Folder {
        match fs::read_dir(path) {
            Ok(entries) => record.entry_count = Some(entries.count() as u64),
            Err(err) => {
                record.error.get_or_insert_with(|| err.to_string());
            }
        }
    }

    record
}

/// MIME type from the file's magic bytes, if they match a known signature.
fn sniff_mime(path: &Path) -> Option<CompactString> {
    match infer::get_from_path(path) {
        Ok(kind) => kind.map(|t| CompactString::new(t.mime_type())),
        Err(err) => {
            debug!("Cannot sniff {}: {err}", path.display());
            None
        }
    }
}

fn blank_record(root: &Path, path: &Path, kind: ItemKind) -> ItemRecord {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let extension = match kind {
        ItemKind::File => CompactString::new(extension_of(&name)),
        ItemKind::Folder | ItemKind::Other => CompactString::default(),
    };

    ItemRecord {
        depth: relative_path.components().count(),
        name: CompactString::new(&name),
        path: path.to_path_buf(),
        relative_path,
        kind,
        extension,
        size: 0,
        modified: None,
        created: None,
        mime_type: None,
        entry_count: None,
        error: None,
    }
}

/// Attach a walk error to the row for `path`, adding a placeholder folder
/// row if the walker never yielded the entry itself.
fn flag_error(records: &mut Vec<ItemRecord>, root: &Path, path: &Path, message: String) {
    if let Some(existing) = records.iter_mut().rev().find(|r| r.path == path) {
        existing.entry_count = None;
        existing.error.get_or_insert(message);
        return;
    }
    if path == root {
        return;
    }
    let mut placeholder = blank_record(root, path, ItemKind::Folder);
    placeholder.error = Some(message);
    records.push(placeholder);
}
