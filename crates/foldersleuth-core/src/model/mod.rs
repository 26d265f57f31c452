/// Data model for FolderSleuth.
///
/// Re-exports the report value objects, the per-item inventory record and
/// supporting types.
pub mod item;
pub mod report;
pub mod size;
pub mod timestamp;

pub use item::{ItemKind, ItemRecord};
pub use report::{
    extension_of, AggregateReport, ExtensionHistogram, ItemStamp, PartialReport, TieBreak,
    NO_EXTENSION,
};
