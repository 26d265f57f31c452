/// One row of the item inventory: a single file or folder with its metadata.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// What kind of filesystem object an inventory row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
    /// Symlinks, sockets, devices and other special entries.
    Other,
}

impl ItemKind {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Folder => "Folder",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// File or folder name only.
    pub name: CompactString,
    pub path: PathBuf,
    /// Path relative to the listing root.
    pub relative_path: PathBuf,
    /// 1 for direct children of the root.
    pub depth: usize,
    pub kind: ItemKind,
    /// Extension with leading dot, empty for folders and extension-less files.
    pub extension: CompactString,
    /// Logical size in bytes. Always 0 for folders.
    pub size: u64,
    #[serde(default, with = "crate::model::timestamp::option")]
    pub modified: Option<SystemTime>,
    /// Birth time, where the platform records one.
    #[serde(default, with = "crate::model::timestamp::option")]
    pub created: Option<SystemTime>,
    /// Files only: MIME type sniffed from the leading bytes of the content.
    /// `None` when the content matches no known signature or could not be read.
    #[serde(default)]
    pub mime_type: Option<CompactString>,
    /// Folders only: number of direct entries. `None` if it could not be listed.
    pub entry_count: Option<u64>,
    /// Set when the entry's metadata could not be read. The row is kept so
    /// the listing shows where errors occurred.
    pub error: Option<String>,
}

impl ItemRecord {
    pub fn is_file(&self) -> bool {
        self.kind == ItemKind::File
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
