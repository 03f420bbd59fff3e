use std::io::Write;
use std::process::{Command, Stdio};

fn printpass() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_printpass"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("printpass.toml");
    std::fs::write(
        &path,
        format!(
            "[analyzer]\npreview_dir = {:?}\n\n[devices]\nregistry_path = {:?}\n\n[jobs]\nstore_path = {:?}\nmax_keep = 2\n",
            dir.join("previews"),
            dir.join("devices.json"),
            dir.join("jobs.json")
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_analyze_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let output = printpass()
        .arg("--config")
        .arg(&config)
        .args(["analyze", "--file"])
        .arg(dir.path().join("missing.gcode"))
        .args(["--jobid", "5"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.get("error").is_some());
}

#[test]
fn test_tips_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let mut child = printpass()
        .arg("--config")
        .arg(&config)
        .arg("tips")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"friendlyName": "Shop MK3", "currentStatus": "Error"}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim_end(),
        "⚠️ Critical Error: 'Shop MK3' has encountered an error. Check printer display and resolve immediately."
    );
}

#[test]
fn test_device_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let add = printpass()
        .arg("--config")
        .arg(&config)
        .args([
            "devices",
            "add",
            r#"{"device_id": "mk4-01", "device_model": "Prusa MK4", "friendly_name": "Left"}"#,
        ])
        .output()
        .unwrap();
    assert!(add.status.success());
    assert!(dir.path().join("devices.json").is_file());

    let list = printpass()
        .arg("--config")
        .arg(&config)
        .args(["devices", "list", "--json"])
        .output()
        .unwrap();
    let devices: serde_json::Value = serde_json::from_slice(&list.stdout).unwrap();
    assert_eq!(devices[0]["friendly_name"], "Left");

    let missing = printpass()
        .arg("--config")
        .arg(&config)
        .args(["devices", "delete", "ghost"])
        .output()
        .unwrap();
    assert!(!missing.status.success());
}

#[test]
fn test_job_retention() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    for day in 1..=3 {
        let job = format!(
            r#"{{"device_id": "x1-01", "status": "completed", "end_time": "2025-11-0{}T12:00:00Z"}}"#,
            day
        );
        let add = printpass()
            .arg("--config")
            .arg(&config)
            .args(["jobs", "add", &job])
            .output()
            .unwrap();
        assert!(add.status.success());
    }

    let dry_run = printpass()
        .arg("--config")
        .arg(&config)
        .args(["jobs", "cleanup", "--dry-run"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&dry_run.stdout).unwrap();
    assert_eq!(report["max_keep"], 2);
    assert_eq!(report["removed"][0]["job_id"], 1);

    let cleanup = printpass()
        .arg("--config")
        .arg(&config)
        .args(["jobs", "cleanup"])
        .output()
        .unwrap();
    assert!(cleanup.status.success());

    let list = printpass()
        .arg("--config")
        .arg(&config)
        .args(["jobs", "list", "--json"])
        .output()
        .unwrap();
    let jobs: serde_json::Value = serde_json::from_slice(&list.stdout).unwrap();
    let ids: Vec<_> = jobs.as_array().unwrap().iter().map(|j| j["job_id"].clone()).collect();
    assert_eq!(ids, [3, 2]);
}
