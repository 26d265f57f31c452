/// File type views over an [`AggregateReport`]'s extension histogram.
///
/// - [`extension_shares`] turns the histogram into labelled slices with
///   percentages, ready for a table or pie chart.
/// - [`category_breakdown`] groups extensions into broad categories
///   (Documents, Images, Code, ...).
use crate::model::size::percent_of;
use crate::model::{AggregateReport, NO_EXTENSION};
use serde::Serialize;
use std::collections::HashMap;

/// Label shown for the empty-extension bucket.
pub const NO_EXTENSION_LABEL: &str = "No extension";

/// Broad file type categories for visual grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileCategory {
    Documents,
    Images,
    Video,
    Audio,
    Archives,
    Code,
    Executables,
    System,
    Other,
}

impl FileCategory {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Code => "Code",
            Self::Executables => "Executables",
            Self::System => "System",
            Self::Other => "Other",
        }
    }
}

/// File count for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: FileCategory,
    pub file_count: u64,
    pub percent: f64,
}

/// One histogram bucket with its display label and share of all files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionShare {
    /// The raw histogram key (with leading dot, or empty).
    pub extension: String,
    /// `extension`, or [`NO_EXTENSION_LABEL`] for the empty bucket.
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

/// Categorise a file extension into a broad category.
///
/// Accepts the extension with or without its leading dot. Matching is
/// case-insensitive; extensions longer than 16 bytes are `Other`.
pub fn categorise_extension(ext: &str) -> FileCategory {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    if ext.len() > 16 {
        return FileCategory::Other;
    }

    match ext.to_ascii_lowercase().as_str() {
        "doc" | "docx" | "pdf" | "txt" | "rtf" | "odt" | "xls" | "xlsx" | "ppt" | "pptx"
        | "csv" | "md" | "epub" => FileCategory::Documents,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tiff" | "tif"
        | "psd" | "raw" | "cr2" | "nef" | "heic" | "heif" => FileCategory::Images,
        "mp4" | "mkv" | "avi" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpg" | "mpeg" | "3gp" => {
            FileCategory::Video
        }
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "opus" => FileCategory::Audio,
        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "zst" | "cab" | "iso" | "dmg" => {
            FileCategory::Archives
        }
        "rs" | "py" | "js" | "ts" | "jsx" | "tsx" | "c" | "cpp" | "h" | "hpp" | "cs" | "java"
        | "go" | "rb" | "php" | "swift" | "kt" | "scala" | "html" | "css" | "scss" | "json"
        | "xml" | "yaml" | "yml" | "toml" | "sql" | "sh" | "bat" | "ps1" => FileCategory::Code,
        "exe" | "msi" | "dll" | "so" | "dylib" | "app" | "com" | "scr" => FileCategory::Executables,
        "sys" | "drv" | "inf" | "cat" | "log" | "etl" | "dat" | "reg" | "tmp" | "bak" => {
            FileCategory::System
        }
        _ => FileCategory::Other,
    }
}

/// Histogram buckets as labelled shares, largest first (ties by label).
pub fn extension_shares(report: &AggregateReport) -> Vec<ExtensionShare> {
    let mut shares: Vec<ExtensionShare> = report
        .extension_histogram
        .iter()
        .map(|(ext, &count)| ExtensionShare {
            extension: ext.to_string(),
            label: if ext.as_str() == NO_EXTENSION {
                NO_EXTENSION_LABEL.to_string()
            } else {
                ext.to_string()
            },
            count,
            percent: percent_of(count, report.file_count),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    shares
}

/// Per-category file counts, largest first.
pub fn category_breakdown(report: &AggregateReport) -> Vec<CategoryStats> {
    // Nine categories.
    let mut counts: HashMap<FileCategory, u64> = HashMap::with_capacity(9);
    for (ext, &count) in &report.extension_histogram {
        *counts.entry(categorise_extension(ext)).or_insert(0) += count;
    }

    let mut results: Vec<CategoryStats> = counts
        .into_iter()
        .map(|(category, file_count)| CategoryStats {
            category,
            file_count,
            percent: percent_of(file_count, report.file_count),
        })
        .collect();
    results.sort_by(|a, b| {
        b.file_count
            .cmp(&a.file_count)
            .then_with(|| a.category.label().cmp(b.category.label()))
    });
    results
}
