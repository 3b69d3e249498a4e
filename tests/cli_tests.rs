use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn squarecut() -> Command {
    let mut cmd = Command::cargo_bin("squarecut").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_flags() {
    squarecut()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--crop-percent"))
        .stdout(predicate::str::contains("--max-duration"))
        .stdout(predicate::str::contains("--audio"));
}

#[test]
fn test_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("nested").join("out.mp4");

    squarecut()
        .arg("--input")
        .arg(temp_dir.path().join("missing.mp4"))
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!output.parent().unwrap().exists());
}

#[test]
fn test_crop_percent_out_of_range_creates_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.mp4");
    std::fs::write(&input, b"not really a video").unwrap();
    let output = temp_dir.path().join("nested").join("out.mp4");

    squarecut()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--crop-percent", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));

    assert!(!output.parent().unwrap().exists());
}

#[test]
fn test_negative_size_is_invalid_argument() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.mp4");
    std::fs::write(&input, b"not really a video").unwrap();

    squarecut()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp_dir.path().join("out.mp4"))
        .args(["--size", "-10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_unreadable_source_is_processing_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.mp4");
    std::fs::write(&input, b"not really a video").unwrap();

    squarecut()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp_dir.path().join("out.mp4"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Cropped video saved to").not());
}

#[test]
fn test_crf_out_of_range_rejected_by_parser() {
    squarecut().args(["--crf", "99"]).assert().failure();
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("squarecut.toml");
    std::fs::write(&config, "[defaults]\nbogus = 1\n").unwrap();

    squarecut()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}
