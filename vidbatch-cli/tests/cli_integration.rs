use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use tempfile::{TempDir, tempdir};

const MISSING_ENCODER: &str = "/nonexistent/bin/ffmpeg";

// Helper function to get the path to the compiled binary
fn vidbatch_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vidbatch").expect("Failed to find vidbatch binary");
    cmd.env_remove("VIDBATCH_ENCODER")
        .env_remove("VIDBATCH_NTFY_TOPIC")
        .env("NO_COLOR", "1");
    cmd
}

/// Input directory with two clips and a config file pointing at it.
fn setup(extra_toml: &str) -> Result<(TempDir, TempDir), Box<dyn Error>> {
    let input = tempdir()?;
    let output = tempdir()?;
    fs::write(input.path().join("a.mov"), b"clip a")?;
    fs::write(input.path().join("b.mov"), b"clip b")?;

    let config = format!(
        "encoder_path = \"{MISSING_ENCODER}\"\n\
         input_mask = \"{}\"\n\
         output_dir = \"{}\"\n\
         {extra_toml}",
        input.path().join("*.mov").display(),
        output.path().display()
    );
    fs::write(input.path().join("batch.toml"), config)?;
    Ok((input, output))
}

fn config_path(input: &TempDir) -> String {
    input.path().join("batch.toml").display().to_string()
}

#[test]
fn test_help_lists_subcommands() {
    vidbatch_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("encode").and(contains("plan")));
}

#[test]
fn test_plan_prints_chain_and_mapping() -> Result<(), Box<dyn Error>> {
    let (input, output) = setup(
        "denoise = true\nsharpen = true\n[scale]\nenabled = true\nexpr = \"scale=1280:-1\"\n",
    )?;

    vidbatch_cmd()
        .args(["plan", "--config", &config_path(&input)])
        .assert()
        .success()
        .stdout(contains("scale=1280:-1,hqdn3d=3.0:2.0:4.0:4.0,unsharp=5:5:0.8:5:5:0.0"))
        .stdout(contains("-crf 23"))
        .stdout(contains("a.mov"))
        .stdout(contains(output.path().join("b.mp4").display().to_string()));

    // Nothing is encoded by a plan.
    assert!(!output.path().join("a.mp4").exists());
    Ok(())
}

#[test]
fn test_plan_json_with_overrides() -> Result<(), Box<dyn Error>> {
    let (input, output) = setup("")?;
    fs::write(output.path().join("a.mp4"), b"already there")?;

    let assert = vidbatch_cmd()
        .args([
            "plan",
            "--json",
            "--config",
            &config_path(&input),
            "--codec",
            "h264_nvenc",
            "-q",
            "22",
        ])
        .assert()
        .success();

    let document: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let codec_args: Vec<&str> = document["plan"]["codec_args"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(codec_args.windows(2).any(|w| w == ["-cq:v", "22"]));
    assert_eq!(document["plan"]["hardware_encode"], serde_json::Value::Bool(true));
    assert_eq!(document["plan"]["hwaccel_args"].as_array().map(Vec::len), Some(0));

    let files = document["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["skip"], serde_json::Value::Bool(true));
    assert_eq!(files[1]["skip"], serde_json::Value::Bool(false));
    assert!(document["concat_output"].is_null());
    Ok(())
}

#[test]
fn test_encode_missing_config_file_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing.toml");

    vidbatch_cmd()
        .args(["encode", "--no-log-file", "--config"])
        .arg(&missing)
        .assert()
        .code(1)
        .stdout(contains("Batch not started"))
        .stdout(contains("missing.toml"));
    Ok(())
}

#[test]
fn test_encode_missing_encoder_is_a_precondition_failure() -> Result<(), Box<dyn Error>> {
    let (input, output) = setup("")?;
    let fresh = output.path().join("fresh");

    vidbatch_cmd()
        .args(["encode", "--config", &config_path(&input), "-o"])
        .arg(&fresh)
        .assert()
        .code(1)
        .stdout(contains("not found"));

    // Neither the output directory nor its default logs/ directory is created.
    assert!(!fresh.exists());
    Ok(())
}

#[test]
fn test_plan_reports_shared_output_path() -> Result<(), Box<dyn Error>> {
    let (input, _output) = setup("")?;
    fs::write(input.path().join("a.mkv"), b"clip a again")?;
    let mask = input.path().join("*.m?v").display().to_string();

    vidbatch_cmd()
        .args(["plan", "--config", &config_path(&input), "-i", &mask])
        .assert()
        .code(1)
        .stdout(contains("Batch not started"))
        .stdout(contains("a.mkv").and(contains("a.mov")));
    Ok(())
}

#[test]
fn test_encode_writes_run_log_to_log_dir() -> Result<(), Box<dyn Error>> {
    let (input, _output) = setup("")?;
    let logs = tempdir()?;

    vidbatch_cmd()
        .args(["encode", "--config", &config_path(&input), "--log-dir"])
        .arg(logs.path())
        .assert()
        .code(1);

    let log_files: Vec<_> = fs::read_dir(logs.path())?
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("vidbatch_run_") && name.ends_with(".log"))
        .collect();
    assert_eq!(log_files.len(), 1);

    let content = fs::read_to_string(logs.path().join(&log_files[0]))?;
    assert!(content.contains("not found"));
    assert!(!content.contains('\u{1b}'));
    Ok(())
}

#[test]
fn test_encode_no_matching_files_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let mask = dir.path().join("*.mkv").display().to_string();

    vidbatch_cmd()
        .args(["encode", "--no-log-file", "--encoder", MISSING_ENCODER, "-i", &mask])
        .assert()
        .code(1)
        .stdout(contains("Batch not started"));
    Ok(())
}

#[test]
fn test_quality_out_of_range_is_rejected() {
    vidbatch_cmd()
        .args(["encode", "-i", "*.mov", "-q", "99"])
        .assert()
        .failure()
        .stderr(contains("99"));
}

#[test]
fn test_no_hwaccel_flag_reaches_plan() -> Result<(), Box<dyn Error>> {
    let (input, _output) = setup("[hwaccel]\nenabled = true\nmethod = \"cuda\"\n")?;

    vidbatch_cmd()
        .args(["plan", "--no-hwaccel", "--config", &config_path(&input)])
        .assert()
        .success()
        .stdout(predicates::str::is_match(r"Hwaccel args:\s+none")?);
    Ok(())
}
