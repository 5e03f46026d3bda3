//! Integration tests for patchbay-cli.
//!
//! Tests run the built binary and check its output and the files it writes.

use std::process::Command;

use tempfile::TempDir;

/// Helper to get the path to the `patchbay` binary built by cargo.
fn patchbay_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_patchbay"))
}

// ---------------------------------------------------------------------------
// `patchbay kinds` / `patchbay patches`
// ---------------------------------------------------------------------------

#[test]
fn cli_kinds_lists_every_kind() {
    let output = patchbay_bin()
        .arg("kinds")
        .output()
        .expect("failed to run patchbay kinds");
    assert!(output.status.success(), "patchbay kinds failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for kind in [
        "VCO", "LFO", "VCA", "SLEW", "PAN", "RECTIFIER", "DELAY", "OUTPUT",
    ] {
        assert!(stdout.contains(kind), "kinds listing should contain '{kind}'");
    }
}

#[test]
fn cli_kinds_shows_parameters() {
    let output = patchbay_bin().args(["kinds", "delay"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("delayTime"));
    assert!(stdout.contains("0.25"));

    let output = patchbay_bin().args(["kinds", "reverb"]).output().unwrap();
    assert!(!output.status.success(), "unknown kind should fail");
}

#[test]
fn cli_patches_lists_factory_patches() {
    let output = patchbay_bin().arg("patches").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["default", "feedback_fm", "slew_loop", "dub_delay"] {
        assert!(stdout.contains(name), "missing factory patch '{name}'");
    }
}

#[test]
fn cli_patches_show_prints_document() {
    let output = patchbay_bin()
        .args(["patches", "show", "feedback_fm"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[[modules]]"));
    assert!(stdout.contains("modulator.out"));
}

#[test]
fn cli_patches_export_round_trips_through_validate() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dub.json");

    let output = patchbay_bin()
        .args(["patches", "export", "dub_delay"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(path.exists());

    let output = patchbay_bin()
        .arg("validate")
        .arg(&path)
        .arg("--strict")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("OK"));
}

// ---------------------------------------------------------------------------
// `patchbay validate` / `patchbay inspect`
// ---------------------------------------------------------------------------

#[test]
fn cli_validate_reports_warnings_and_errors() {
    let temp_dir = TempDir::new().unwrap();

    let sloppy = temp_dir.path().join("sloppy.toml");
    std::fs::write(
        &sloppy,
        r#"
[[modules]]
id = "osc"
kind = "VCO"
params = { pitch = 3 }

[[modules]]
id = "out"
kind = "OUTPUT"

[[connections]]
from = "osc.out"
to = "out.in"
"#,
    )
    .unwrap();

    let output = patchbay_bin().arg("validate").arg(&sloppy).output().unwrap();
    assert!(output.status.success(), "warnings alone should not fail");
    assert!(String::from_utf8_lossy(&output.stdout).contains("pitch"));

    let output = patchbay_bin()
        .arg("validate")
        .arg(&sloppy)
        .arg("--strict")
        .output()
        .unwrap();
    assert!(!output.status.success());

    let broken = temp_dir.path().join("broken.json");
    std::fs::write(
        &broken,
        r#"{"modules": [{"id": "out", "kind": "OUTPUT"}],
            "connections": [{"from": "ghost.out", "to": "out.in"}]}"#,
    )
    .unwrap();
    let output = patchbay_bin().arg("validate").arg(&broken).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));
}

#[test]
fn cli_inspect_shows_feedback() {
    let output = patchbay_bin()
        .args(["inspect", "feedback_fm"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[cycle]"));
    assert!(stdout.contains("modulator.out -> carrier.fm"));
    assert!(stdout.contains("Sink:      out"));
}

#[test]
fn cli_inspect_json() {
    let output = patchbay_bin()
        .args(["inspect", "default", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["acyclicLen"], 5);
    assert_eq!(value["sink"], "out");
    assert_eq!(value["order"].as_array().unwrap().len(), 5);
    assert!(value["feedbackEdges"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// `patchbay render`
// ---------------------------------------------------------------------------

#[test]
fn cli_render_writes_stereo_float_wav() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.wav");

    let output = patchbay_bin()
        .args(["render", "default"])
        .arg(&path)
        .args(["--duration", "0.5", "--sample-rate", "44100"])
        .output()
        .expect("failed to run patchbay render");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let reader = hound::WavReader::open(&path).expect("should open rendered file");
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(spec.sample_format, hound::SampleFormat::Float);

    let samples: Vec<f32> = reader.into_samples::<f32>().map(Result::unwrap).collect();
    assert_eq!(samples.len(), 2 * 22050);
    assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    assert!(samples.iter().any(|&s| s != 0.0));
}

#[test]
fn cli_render_uses_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings = temp_dir.path().join("settings.toml");
    std::fs::write(&settings, "[engine]\nsample_rate = 32000\n").unwrap();
    let path = temp_dir.path().join("out.wav");

    let output = patchbay_bin()
        .args(["render", "slew_loop"])
        .arg(&path)
        .args(["--duration", "0.25", "--config"])
        .arg(&settings)
        .output()
        .unwrap();
    assert!(output.status.success());

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 32000);
    assert_eq!(reader.len(), 2 * 8000);
}

#[test]
fn cli_render_rejects_bad_graph() {
    let temp_dir = TempDir::new().unwrap();
    let graph = temp_dir.path().join("bad.json");
    std::fs::write(&graph, r#"{"modules": [{"id": "x", "kind": "REVERB"}]}"#).unwrap();
    let path = temp_dir.path().join("out.wav");

    let output = patchbay_bin()
        .arg("render")
        .arg(&graph)
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("REVERB"));
}

#[test]
fn cli_render_unknown_graph_name() {
    let temp_dir = TempDir::new().unwrap();
    let output = patchbay_bin()
        .args(["render", "no_such_patch"])
        .arg(temp_dir.path().join("out.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no_such_patch"));
}
