use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deckgen"))
        .args(args)
        .env_remove("DECKGEN_OUTPUT_DIR")
        .env_remove("DECKGEN_TIER")
        .env_remove("DECKGEN_NAMING")
        .env_remove("DECKGEN_IMAGE_DIR")
        .output()
        .expect("Failed to execute command")
}

fn write_outline(dir: &Path, content: &str) -> String {
    let path = dir.join("outline.txt");
    fs::write(&path, content).expect("Failed to write outline");
    path.to_string_lossy().to_string()
}

fn count_files_with_pattern(dir: &Path, pattern: &str) -> usize {
    let glob_pattern = format!("{}/{}", dir.to_string_lossy(), pattern);
    glob::glob(&glob_pattern)
        .expect("Failed to read glob pattern")
        .filter_map(Result::ok)
        .count()
}

#[test]
fn test_build_command_writes_deck() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let outline = write_outline(
        temp_dir.path(),
        "Slide 1: Quarterly Review\n- Subtitle: Q3\nSlide 2: Highlights\n- Revenue up\n",
    );
    let out_dir = temp_dir.path().join("decks");

    let output = run_command(&[
        "build",
        "-i",
        &outline,
        "-o",
        out_dir.to_str().unwrap(),
        "--tier",
        "gold",
        "--naming",
        "overwrite",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let expected = out_dir.join("Quarterly_Review.pptx");
    assert!(expected.exists(), "PPTX file was not created");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Quarterly_Review.pptx"));
}

#[test]
fn test_build_without_headers_uses_fallback() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let outline = write_outline(temp_dir.path(), "no structure at all\n");
    let out_dir = temp_dir.path().join("decks");

    let output = run_command(&["build", "-i", &outline, "-o", out_dir.to_str().unwrap()]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(count_files_with_pattern(&out_dir, "Untitled_Slide-*.pptx"), 1);
}

#[test]
fn test_build_reject_malformed_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let outline = write_outline(temp_dir.path(), "- stray\nSlide 1: Intro\n");
    let out_dir = temp_dir.path().join("decks");

    let output = run_command(&[
        "build",
        "-i",
        &outline,
        "-o",
        out_dir.to_str().unwrap(),
        "--reject-malformed",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 1"), "unexpected stderr: {}", stderr);
    assert_eq!(count_files_with_pattern(&out_dir, "*.pptx"), 0);
}

#[test]
fn test_parse_command_prints_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let outline = write_outline(
        temp_dir.path(),
        "Slide 1: Intro\nSlide 2: Project Timeline\n- 2020: Start\n",
    );

    let output = run_command(&["parse", "-i", &outline]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let slides: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let slides = slides.as_array().expect("array of slides");
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0]["kind"], "title");
    assert_eq!(slides[1]["kind"], "timeline");
    assert_eq!(slides[1]["bullets"][0], "2020: Start");
}

#[test]
fn test_extract_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let source = temp_dir.path().join("notes.md");
    fs::write(&source, "Some notes").unwrap();

    let output = run_command(&["extract", "-i", source.to_str().unwrap()]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Some notes");
}

#[test]
fn test_missing_input_fails() {
    let output = run_command(&["build", "-i", "/nonexistent/outline.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_generate_without_api_key_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_deckgen"))
        .args(["generate", "--topic", "Rust"])
        .env_remove("GOOGLE_API_KEY")
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("GOOGLE_API_KEY"));
}
