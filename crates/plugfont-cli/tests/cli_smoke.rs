//! CLI Smoke Tests
//!
//! Runs the built `plugfont` binary against Noto Sans written to a temporary
//! file, with system fonts disabled so results do not depend on the machine.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn temp_path(name: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("plugfont_test_{}_{}_{}", std::process::id(), id, name))
}

fn noto_sans() -> PathBuf {
    let path = temp_path("NotoSans-Regular.ttf");
    fs::write(&path, ttf_noto_sans::REGULAR).unwrap();
    path
}

fn plugfont(args: &[&str]) -> Output {
    let font = noto_sans();
    let output = Command::new(env!("CARGO_BIN_EXE_plugfont"))
        .arg("--no-system-fonts")
        .arg("--font")
        .arg(&font)
        .args(args)
        .output()
        .expect("Failed to execute plugfont");
    let _ = fs::remove_file(font);
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_plugfont"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("measure"));
}

#[test]
fn test_families_lists_installed_font() {
    let output = plugfont(&["families"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Noto Sans"));
}

#[test]
fn test_describe() {
    let output = plugfont(&["describe", "--size", "20", "--italic"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("face:               Noto Sans"));
    assert!(text.contains("size:               20"));
    assert!(text.contains("italic:             true"));
}

#[test]
fn test_measure() {
    let empty = plugfont(&["measure", ""]);
    assert_eq!(stdout(&empty).trim(), "0");

    let hello = plugfont(&["measure", "-s", "24", "Hello"]);
    assert!(hello.status.success());
    let width: i32 = stdout(&hello).trim().parse().unwrap();
    assert!(width > 24);
}

#[test]
fn test_hit_lists_monotonic_offsets() {
    let output = plugfont(&["hit", "-s", "16", "abc"]);
    assert!(output.status.success());
    let offsets: Vec<i32> = stdout(&output)
        .lines()
        .map(|line| line.split('\t').nth(1).unwrap().parse().unwrap())
        .collect();
    assert_eq!(offsets.len(), 4);
    assert_eq!(offsets[0], 0);
    assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_hit_index_out_of_range_fails() {
    let output = plugfont(&["hit", "abc", "--index", "9"]);
    assert!(!output.status.success());
}

#[test]
fn test_render_writes_png() {
    let out = temp_path("render.png");
    let output = plugfont(&["render", "-s", "32", "Hi", "-o", out.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let _ = fs::remove_file(out);
}

#[test]
fn test_render_rejects_bad_color() {
    let out = temp_path("bad.png");
    let output = plugfont(&["render", "Hi", "-o", out.to_str().unwrap(), "-c", "nope"]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_missing_font_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_plugfont"))
        .args(["--no-system-fonts", "--font", "/nonexistent/font.ttf", "families"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
