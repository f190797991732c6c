use assert_cmd::Command;
use movexif_core::fixtures;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn movexif() -> Command {
    Command::cargo_bin("movexif-cli").expect("binary must build")
}

fn setup_dirs(base: &Path) -> (PathBuf, PathBuf) {
    let source = base.join("in");
    let dest = base.join("out");
    fs::create_dir_all(&source).expect("mkdir");
    fs::create_dir_all(&dest).expect("mkdir");
    (source, dest)
}

#[test]
fn missing_arguments_exit_with_2() {
    let output = movexif().output().expect("spawn binary");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "unexpected stderr: {stderr}");
}

#[test]
fn missing_pattern_value_exits_with_2() {
    let td = tempdir().expect("tempdir");
    let (source, dest) = setup_dirs(td.path());

    let output = movexif()
        .arg(&source)
        .arg(&dest)
        .arg("-p")
        .output()
        .expect("spawn binary");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn nonexistent_source_exits_with_2() {
    let td = tempdir().expect("tempdir");
    let dest = td.path().join("out");
    fs::create_dir_all(&dest).expect("mkdir");

    let output = movexif()
        .arg(td.path().join("missing"))
        .arg(&dest)
        .output()
        .expect("spawn binary");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("フォルダが存在しません"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn help_prints_usage_and_exits_cleanly() {
    let output = movexif().arg("--help").output().expect("spawn binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-p"), "unexpected stdout: {stdout}");
    assert!(stdout.contains("--dry-run"), "unexpected stdout: {stdout}");
}

#[test]
fn moves_file_into_pattern_path() {
    let td = tempdir().expect("tempdir");
    let (source, dest) = setup_dirs(td.path());
    let photo = source.join("photo.JPG");
    fixtures::write_jpeg_with_capture_time(&photo, Some("2020:01:02 03:04:05"), None)
        .expect("fixture");

    let output = movexif()
        .arg(&source)
        .arg(&dest)
        .output()
        .expect("spawn binary");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let moved = dest.join("2020/2020-01/2020-01-02/2020-01-02_3-04-05.jpg");
    assert!(moved.exists(), "expected {}", moved.display());
    assert!(!photo.exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(" -> "), "unexpected stdout: {stdout}");
}

#[test]
fn copy_keeps_the_source_file() {
    let td = tempdir().expect("tempdir");
    let (source, dest) = setup_dirs(td.path());
    let photo = source.join("photo.jpg");
    fixtures::write_jpeg_with_capture_time(&photo, Some("2020:01:02 03:04:05"), None)
        .expect("fixture");

    movexif()
        .arg(&source)
        .arg(&dest)
        .arg("--copy")
        .assert()
        .success();

    assert!(photo.exists());
    assert!(dest
        .join("2020/2020-01/2020-01-02/2020-01-02_3-04-05.jpg")
        .exists());
}

#[test]
fn custom_pattern_with_trailing_separator_keeps_name() {
    let td = tempdir().expect("tempdir");
    let (source, dest) = setup_dirs(td.path());
    let photo = source.join("photo.JPG");
    fixtures::write_jpeg_with_capture_time(&photo, Some("2020:01:02 03:04:05"), None)
        .expect("fixture");

    movexif()
        .arg(&source)
        .arg(&dest)
        .arg("-p")
        .arg("d(yyyy)/")
        .assert()
        .success();

    assert!(dest.join("2020/photo.JPG").exists());
}

#[test]
fn identical_timestamps_collide_and_nothing_moves() {
    let td = tempdir().expect("tempdir");
    let (source, dest) = setup_dirs(td.path());
    let first = source.join("a.jpg");
    let second = source.join("b.jpg");
    fixtures::write_jpeg_with_capture_time(&first, Some("2020:01:02 03:04:05"), None)
        .expect("fixture");
    fixtures::write_jpeg_with_capture_time(&second, Some("2020:01:02 03:04:05"), None)
        .expect("fixture");

    let output = movexif()
        .arg(&source)
        .arg(&dest)
        .output()
        .expect("spawn binary");
    assert!(output.status.success());

    assert!(first.exists());
    assert!(second.exists());
    assert!(!dest
        .join("2020/2020-01/2020-01-02/2020-01-02_3-04-05.jpg")
        .exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("警告"), "unexpected stdout: {stdout}");
    assert!(stdout.contains("2件"), "unexpected stdout: {stdout}");
}

#[test]
fn dry_run_reports_but_moves_nothing() {
    let td = tempdir().expect("tempdir");
    let (source, dest) = setup_dirs(td.path());
    let photo = source.join("photo.jpg");
    fixtures::write_jpeg_with_capture_time(&photo, Some("2020:01:02 03:04:05"), None)
        .expect("fixture");

    let output = movexif()
        .arg(&source)
        .arg(&dest)
        .arg("--dry-run")
        .output()
        .expect("spawn binary");
    assert!(output.status.success());

    assert!(photo.exists());
    assert!(!dest.join("2020").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(" -> "), "unexpected stdout: {stdout}");
    assert!(stdout.contains("--dry-run"), "unexpected stdout: {stdout}");
}

#[test]
fn files_without_exif_are_silently_skipped() {
    let td = tempdir().expect("tempdir");
    let (source, dest) = setup_dirs(td.path());
    fs::write(source.join("broken.jpg"), b"not a jpeg").expect("write");

    let output = movexif()
        .arg(&source)
        .arg(&dest)
        .output()
        .expect("spawn binary");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains(" -> "), "unexpected stdout: {stdout}");
}
