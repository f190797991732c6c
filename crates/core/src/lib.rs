mod apply;
mod config;
mod exif_reader;
mod metadata;
mod pattern;
mod planner;

#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;

pub use apply::{apply_plan, ApplyOptions, ApplyResult, EntryOutcome, EntryStatus, TransferError};
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use exif_reader::read_photo_metadata;
pub use metadata::{MetadataValue, PhotoMetadata};
pub use pattern::{parse_pattern, render_pattern, PatternPart, UNKNOWN};
pub use planner::{
    detect_collisions, generate_plan, resolve_destination, MovePlan, PlanOptions, ResolvedEntry,
    ScanStats,
};

/// 既定のパスパターン。
pub const DEFAULT_PATTERN: &str = "d(yyyy)/d(yyyy-MM)/d(yyyy-MM-dd)/d(yyyy-MM-dd_H-mm-ss)";
