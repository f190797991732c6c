use crate::exif_reader::read_photo_metadata;
use crate::metadata::PhotoMetadata;
use crate::pattern::{parse_pattern, render_pattern, PatternPart};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub pattern: String,
}

/// 1ファイル分の確定済み移動元/移動先。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub source: PathBuf,
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanStats {
    pub scanned_files: usize,
    pub jpg_files: usize,
    pub skipped_non_jpg: usize,
    pub skipped_unreadable: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovePlan {
    pub pattern: String,
    pub entries: Vec<ResolvedEntry>,
    /// 2件以上が同じ移動先を指す場合だけ件数が入る。
    pub collisions: BTreeMap<PathBuf, usize>,
    pub stats: ScanStats,
}

pub fn generate_plan(options: &PlanOptions) -> Result<MovePlan> {
    if !options.source.is_dir() {
        anyhow::bail!("移動元フォルダが存在しません: {}", options.source.display());
    }
    if !options.dest.is_dir() {
        anyhow::bail!("移動先フォルダが存在しません: {}", options.dest.display());
    }

    let parts = parse_pattern(&options.pattern);
    let mut stats = ScanStats::default();
    let jpg_files = collect_jpg_files(&options.source, &mut stats);

    let mut entries = Vec::with_capacity(jpg_files.len());
    for source in jpg_files {
        // メタデータを読めないファイルは黙って除外する。
        let metadata = match read_photo_metadata(&source) {
            Ok(metadata) => metadata,
            Err(_) => {
                stats.skipped_unreadable += 1;
                continue;
            }
        };

        let dest = resolve_destination(&parts, &options.pattern, &options.dest, &source, &metadata);
        entries.push(ResolvedEntry { source, dest });
    }

    let collisions = detect_collisions(&entries);

    Ok(MovePlan {
        pattern: options.pattern.clone(),
        entries,
        collisions,
        stats,
    })
}

/// パターン描画結果に拡張子規則を適用して移動先を確定する。
///
/// パターンが `/` で終わる場合は元のファイル名をそのまま連結し、
/// そうでなければ元の拡張子を小文字化して連結する。
pub fn resolve_destination(
    parts: &[PatternPart],
    pattern: &str,
    dest_root: &Path,
    source: &Path,
    metadata: &PhotoMetadata,
) -> PathBuf {
    let rendered = render_pattern(parts, metadata);

    let suffix = if pattern.ends_with('/') {
        let name = source
            .file_name()
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{rendered}{name}")
    } else {
        let extension = source
            .extension()
            .map(|v| format!(".{}", v.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        format!("{rendered}{extension}")
    };

    dest_root.join(suffix)
}

/// 移動先ごとの出現数を数え、2件以上のものだけを残す。
pub fn detect_collisions(entries: &[ResolvedEntry]) -> BTreeMap<PathBuf, usize> {
    let mut counts = BTreeMap::<PathBuf, usize>::new();
    for entry in entries {
        *counts.entry(entry.dest.clone()).or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}

fn collect_jpg_files(root: &Path, stats: &mut ScanStats) -> Vec<PathBuf> {
    let mut out = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        // 読めないエントリは黙って握りつぶす。
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        stats.scanned_files += 1;

        if is_jpg(path) {
            stats.jpg_files += 1;
            out.push(path.to_path_buf());
        } else {
            stats.skipped_non_jpg += 1;
        }
    }

    out
}

fn is_jpg(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
        })
        .unwrap_or(false)
}
