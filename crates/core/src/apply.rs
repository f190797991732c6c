use crate::planner::MovePlan;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// 移動ではなくコピーする。
    pub copy: bool,
    /// 既存の移動先ファイルを上書きする。
    pub overwrite: bool,
    /// 解決と報告のみ行い、ファイルシステムには触れない。
    pub dry_run: bool,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("移動先が既に存在します: {0}")]
    DestinationExists(PathBuf),
    #[error("移動先フォルダを作成できませんでした: {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: io::Error,
    },
    #[error("コピーに失敗しました: {from} -> {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error("移動に失敗しました: {from} -> {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

#[derive(Debug)]
pub enum EntryStatus {
    Transferred,
    SkippedCollision,
    DryRun,
    Failed(TransferError),
}

#[derive(Debug)]
pub struct EntryOutcome {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub status: EntryStatus,
}

#[derive(Debug, Default)]
pub struct ApplyResult {
    pub outcomes: Vec<EntryOutcome>,
    pub transferred: usize,
    pub skipped_collisions: usize,
    pub failed: usize,
}

/// 計画を順に実行する。衝突している移動先は全てスキップし、
/// 1件の失敗は記録して処理を続ける。ロールバックは行わない。
pub fn apply_plan(plan: &MovePlan, options: &ApplyOptions) -> ApplyResult {
    let mut result = ApplyResult::default();

    for entry in &plan.entries {
        let status = if plan.collisions.contains_key(&entry.dest) {
            result.skipped_collisions += 1;
            EntryStatus::SkippedCollision
        } else if options.dry_run {
            EntryStatus::DryRun
        } else {
            match transfer(&entry.source, &entry.dest, options) {
                Ok(()) => {
                    result.transferred += 1;
                    EntryStatus::Transferred
                }
                Err(err) => {
                    result.failed += 1;
                    EntryStatus::Failed(err)
                }
            }
        };

        result.outcomes.push(EntryOutcome {
            source: entry.source.clone(),
            dest: entry.dest.clone(),
            status,
        });
    }

    result
}

fn transfer(source: &Path, dest: &Path, options: &ApplyOptions) -> Result<(), TransferError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|err| TransferError::CreateDir {
            path: parent.to_path_buf(),
            source: err,
        })?;
    }

    if !options.overwrite && dest.exists() {
        return Err(TransferError::DestinationExists(dest.to_path_buf()));
    }

    if options.copy {
        fs::copy(source, dest).map_err(|err| TransferError::Copy {
            from: source.to_path_buf(),
            to: dest.to_path_buf(),
            source: err,
        })?;
        return Ok(());
    }

    move_file(source, dest)
}

/// まずrenameを試し、デバイスをまたぐ場合はコピーと削除で代替する。
fn move_file(source: &Path, dest: &Path) -> Result<(), TransferError> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }

    fs::copy(source, dest).map_err(|err| TransferError::Move {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: err,
    })?;
    fs::remove_file(source).map_err(|err| TransferError::Move {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: err,
    })?;
    Ok(())
}
