mod common;

use assert_cmd::Command;
use common::{create_mixed_batch, create_temp_directory, write_corrupt, write_image};
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("img-compress").unwrap();
    cmd.env_remove("IMG_COMPRESS_METHOD")
        .env_remove("IMG_COMPRESS_QUALITY");
    cmd
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-width"))
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn test_missing_args() {
    cmd().assert().failure().code(2);
}

#[test]
fn test_missing_output_dir_arg() {
    let temp_dir = create_temp_directory();
    cmd().arg(temp_dir.path()).assert().failure().code(2);
}

#[test]
fn test_list_methods() {
    cmd()
        .arg("--list-methods")
        .assert()
        .success()
        .stdout(predicate::str::contains("jpeg-quality"))
        .stdout(predicate::str::contains("png-optimize"))
        .stdout(predicate::str::contains("webp-convert"))
        .stdout(predicate::str::contains("size-reduction"))
        .stdout(predicate::str::contains("advanced-lossy"));
}

#[test]
fn test_nonexistent_input_is_config_error() {
    let temp_dir = create_temp_directory();
    cmd()
        .arg(temp_dir.path().join("missing"))
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Input path not found"));
}

#[test]
fn test_invalid_quality_is_config_error() {
    let temp_dir = create_temp_directory();
    let input = write_image(&temp_dir.path().join("a.png"), 16, 16);
    let out = temp_dir.path().join("out");

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["-q", "0"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid quality value: 0"));

    assert!(!out.exists(), "no output may be created on a config error");
}

#[test]
fn test_unknown_method_is_config_error() {
    let temp_dir = create_temp_directory();
    let input = write_image(&temp_dir.path().join("a.png"), 16, 16);

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .args(["-m", "zip"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown compression method: zip"));
}

#[test]
fn test_bounds_rejected_for_jpeg_quality() {
    let temp_dir = create_temp_directory();
    let input = write_image(&temp_dir.path().join("a.png"), 16, 16);

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .args(["-m", "jpeg", "--max-width", "100"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_single_file_compression() {
    let temp_dir = create_temp_directory();
    let input = write_image(&temp_dir.path().join("photo.png"), 64, 48);
    let out = temp_dir.path().join("out");

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["-m", "jpeg-quality", "-q", "70"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successful: 1"));

    assert!(out.join("photo_compressed.jpg").is_file());
}

#[test]
fn test_method_from_environment() {
    let temp_dir = create_temp_directory();
    let input = write_image(&temp_dir.path().join("photo.png"), 32, 32);
    let out = temp_dir.path().join("out");

    cmd()
        .env("IMG_COMPRESS_METHOD", "webp")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("photo_compressed.webp").is_file());
}

#[test]
fn test_batch_with_failure_exits_nonzero() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    create_mixed_batch(&input);

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Successful: 3"))
        .stdout(predicate::str::contains("Failed: 1"))
        .stderr(predicate::str::contains("DecodeError"));
}

#[test]
fn test_batch_with_failure_warn_policy() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    create_mixed_batch(&input);
    let out = temp_dir.path().join("out");

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["--on-failure", "warn"])
        .assert()
        .success();

    assert!(out.join("a_compressed.jpg").is_file());
    assert!(out.join("b_compressed.jpg").is_file());
    assert!(out.join("c_compressed.jpg").is_file());
    assert!(!out.join("d_compressed.jpg").exists());
    assert!(!out.join("anim_compressed.jpg").exists());
}

#[test]
fn test_json_report() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    write_image(&input.join("ok.png"), 40, 40);
    write_corrupt(&input.join("broken.png"));

    let output = cmd()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .args(["-m", "png-optimize", "--json", "--on-failure", "warn"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["total_jobs"], 2);
    assert_eq!(report["summary"]["processed"], 1);
    assert_eq!(report["summary"]["failed"], 1);

    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    // sorted: broken.png before ok.png
    assert_eq!(results[0]["outcome"]["status"], "failed");
    assert_eq!(results[0]["outcome"]["kind"], "DecodeError");
    assert_eq!(results[1]["outcome"]["status"], "compressed");
    assert_eq!(results[1]["job"]["method"]["method"], "png-optimize");
}

#[test]
fn test_empty_directory_succeeds() {
    let temp_dir = create_temp_directory();
    let input = temp_dir.path().join("empty");
    std::fs::create_dir(&input).unwrap();

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .assert()
        .success()
        .stderr(predicate::str::contains("No image files found"));
}

#[test]
fn test_quiet_suppresses_summary() {
    let temp_dir = create_temp_directory();
    let input = write_image(&temp_dir.path().join("photo.png"), 16, 16);

    cmd()
        .arg(&input)
        .arg("-o")
        .arg(temp_dir.path().join("out"))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
