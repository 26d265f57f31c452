/// Analysis modules — post-scan views over reports and item listings.

pub mod age;
pub mod file_types;
pub mod top_files;

pub use age::{find_stale_files, StaleFile};
pub use file_types::{
    categorise_extension, category_breakdown, extension_shares, CategoryStats, ExtensionShare,
    FileCategory,
};
pub use top_files::{largest_files, LargestFile};
