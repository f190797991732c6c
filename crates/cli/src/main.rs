use anyhow::Result;
use clap::{CommandFactory, Parser};
use movexif_core::{
    apply_plan, generate_plan, load_config, ApplyOptions, EntryStatus, MovePlan, PlanOptions,
};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "movexif")]
#[command(about = "EXIFの撮影日時を使い、パターンに従って写真を移動します")]
struct Cli {
    /// 走査する移動元フォルダ
    source: PathBuf,

    /// 移動先のルートフォルダ
    dest: PathBuf,

    /// 移動先を決めるパスパターン (既定: d(yyyy)/d(yyyy-MM)/d(yyyy-MM-dd)/d(yyyy-MM-dd_H-mm-ss))
    #[arg(short = 'p', value_name = "PATTERN")]
    pattern: Option<String>,

    /// 移動せずコピーする
    #[arg(long, short = 'c')]
    copy: bool,

    /// 既存の移動先ファイルを上書きする
    #[arg(long)]
    overwrite: bool,

    /// 実際には移動せず、解決結果と衝突だけを表示する
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();

    require_dir(&cli.source);
    require_dir(&cli.dest);

    if let Err(e) = run(cli) {
        eprintln!("エラー: {e:#}");
        std::process::exit(1);
    }
}

/// 移動元/移動先の存在チェック。見つからなければ使い方を表示して終了コード2で抜ける。
fn require_dir(path: &Path) {
    if path.is_dir() {
        return;
    }
    let mut cmd = Cli::command();
    let _ = cmd.print_help();
    eprintln!("\nエラー: {}: フォルダが存在しません", path.display());
    std::process::exit(2);
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config()?;
    let pattern = cli.pattern.clone().unwrap_or(config.pattern);

    let plan = generate_plan(&PlanOptions {
        source: cli.source,
        dest: cli.dest,
        pattern,
    })?;

    report_plan(&plan);

    let options = ApplyOptions {
        copy: cli.copy || config.copy_default,
        overwrite: cli.overwrite || config.overwrite_default,
        dry_run: cli.dry_run,
    };
    let result = apply_plan(&plan, &options);

    for outcome in &result.outcomes {
        if let EntryStatus::Failed(err) = &outcome.status {
            eprintln!("エラー: {err}");
        }
    }

    if !plan.collisions.is_empty() {
        let affected: usize = plan.collisions.values().sum();
        print_warn("\n警告: 同じ移動先を指すファイルがあります。データが失われるためスキップしました。");
        print_warn(&format!(
            "{}件が対象です (全{}件中)。",
            affected,
            plan.entries.len()
        ));
    }

    if options.dry_run {
        println!("\n--dry-run のため、ファイルは移動していません。");
    }

    Ok(())
}

fn report_plan(plan: &MovePlan) {
    let use_color = atty::is(atty::Stream::Stdout);

    for entry in &plan.entries {
        let source = display_relative(&entry.source);
        let dest = display_relative(&entry.dest);
        if !use_color {
            println!("{source} -> {dest}");
        } else if plan.collisions.contains_key(&entry.dest) {
            println!("{} -> {}", source, dest.red());
        } else {
            println!("{} -> {}", source, dest.green());
        }
    }
}

fn print_warn(msg: &str) {
    if atty::is(atty::Stream::Stdout) {
        println!("{}", msg.yellow());
    } else {
        println!("{msg}");
    }
}

/// カレントディレクトリからの相対表示。変換できなければそのまま表示する。
fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
