//! Command execution.

use anyhow::{Context, Result};
use serde_json::json;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

use printpass_core::PrinterSnapshot;
use printpass_devicedb::{Device, DeviceManager, DeviceUpdate};
use printpass_gcode::{analyze_file, ThumbnailOptions};
use printpass_jobdb::{JobStore, PrintJob};
use printpass_settings::Config;
use printpass_tips::{TipEngine, FALLBACK_TIP};

use super::commands::{CliCommand, DeviceAction, JobAction};
use super::output::{write_device_table, write_job_table};

/// Execute one command against stdout and stdin.
pub fn run(command: CliCommand, config: &Config) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    let mut input = io::stdin().lock();

    match command {
        CliCommand::Analyze {
            file,
            jobid,
            out_dir,
        } => analyze(&mut out, config, &file, &jobid, out_dir),
        CliCommand::Tips { file, explain } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => read_all(&mut input)?,
            };
            tips(&mut out, &text, explain)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Devices { action } => {
            let manager = DeviceManager::load(&config.devices.registry_path)?;
            devices(&mut out, &mut input, &manager, action)?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Jobs { action } => {
            let store = JobStore::load(&config.jobs.store_path)?;
            jobs(&mut out, &mut input, &store, config, action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_all(input: &mut impl Read) -> Result<String> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

fn thumbnail_options(config: &Config, out_dir: Option<PathBuf>) -> ThumbnailOptions {
    ThumbnailOptions::new(out_dir.unwrap_or_else(|| config.analyzer.preview_dir.clone()))
        .with_url_prefix(config.analyzer.preview_url_prefix.clone())
}

/// Analyze `file` and print the analysis JSON; on failure print
/// `{"error": ...}` and report exit status 1.
pub fn analyze(
    out: &mut impl Write,
    config: &Config,
    file: &Path,
    job_id: &str,
    out_dir: Option<PathBuf>,
) -> Result<ExitCode> {
    match analyze_file(file, &thumbnail_options(config, out_dir), job_id) {
        Ok(analysis) => {
            writeln!(out, "{}", serde_json::to_string(&analysis)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Analysis of {} failed: {:#}", file.display(), e);
            writeln!(out, "{}", json!({ "error": format!("{:#}", e) }))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Evaluate the built-in tip rules for a JSON snapshot.
pub fn tips(out: &mut impl Write, snapshot_json: &str, explain: bool) -> Result<()> {
    let snapshot: PrinterSnapshot =
        serde_json::from_str(snapshot_json).context("Invalid printer snapshot")?;
    let engine = TipEngine::default();

    if explain {
        let report = match engine.evaluate_match(&snapshot) {
            Some(tip) => serde_json::to_value(tip)?,
            None => json!({ "rule_id": null, "priority": null, "text": FALLBACK_TIP }),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{}", engine.evaluate(&snapshot))?;
    }
    Ok(())
}

fn json_argument(json: Option<String>, input: &mut impl Read) -> Result<String> {
    match json {
        Some(json) => Ok(json),
        None => read_all(input),
    }
}

/// Run a registry action, saving the file after any change.
pub fn devices(
    out: &mut impl Write,
    input: &mut impl Read,
    manager: &DeviceManager,
    action: DeviceAction,
) -> Result<()> {
    match action {
        DeviceAction::List { json } => {
            let devices = manager.list();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&devices)?)?;
            } else {
                write_device_table(out, &devices)?;
            }
        }
        DeviceAction::Get { device_id } => {
            let device = manager.get(&device_id)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&device)?)?;
        }
        DeviceAction::Add { json } => {
            let device: Device = serde_json::from_str(&json_argument(json, input)?)
                .context("Invalid device JSON")?;
            let device_id = manager.add(device)?;
            manager.save()?;
            writeln!(out, "{}", json!({ "status": "success", "device_id": device_id }))?;
        }
        DeviceAction::Update { device_id, json } => {
            let patch: DeviceUpdate = serde_json::from_str(&json_argument(json, input)?)
                .context("Invalid update JSON")?;
            manager.update(&device_id, &patch)?;
            manager.save()?;
            writeln!(out, "{}", json!({ "status": "success", "updated_id": device_id }))?;
        }
        DeviceAction::Delete { device_id } => {
            manager.delete(&device_id)?;
            manager.save()?;
            writeln!(out, "{}", json!({ "status": "success", "deleted_id": device_id }))?;
        }
    }
    Ok(())
}

/// Run a job store action, saving the file after any change.
pub fn jobs(
    out: &mut impl Write,
    input: &mut impl Read,
    store: &JobStore,
    config: &Config,
    action: JobAction,
) -> Result<()> {
    match action {
        JobAction::List { json } => {
            let jobs = store.list();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&jobs)?)?;
            } else {
                write_job_table(out, &jobs)?;
            }
        }
        JobAction::Get { job_id } => {
            let job = store.get(job_id)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&job)?)?;
        }
        JobAction::Add { json } => {
            let job: PrintJob = serde_json::from_str(&json_argument(json, input)?)
                .context("Invalid job JSON")?;
            let job_id = store.add(job)?;
            store.save()?;
            writeln!(out, "{}", json!({ "status": "success", "job_id": job_id }))?;
        }
        JobAction::Analyze {
            job_id,
            file,
            out_dir,
        } => {
            // fail before writing a thumbnail for an unknown job
            store.get(job_id)?;
            let options = thumbnail_options(config, out_dir);
            let analysis = analyze_file(&file, &options, &job_id.to_string())?;
            store.attach_analysis(job_id, analysis.clone())?;
            store.save()?;
            writeln!(out, "{}", serde_json::to_string(&analysis)?)?;
        }
        JobAction::Delete { job_id } => {
            store.delete(job_id)?;
            store.save()?;
            writeln!(out, "{}", json!({ "status": "success", "deleted_id": job_id }))?;
        }
        JobAction::Cleanup { keep, dry_run } => {
            let report = store.cleanup(keep.unwrap_or(config.jobs.max_keep), dry_run);
            if !dry_run && !report.removed.is_empty() {
                store.save()?;
            }
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_analyze_missing_file_prints_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let code = analyze(
            &mut out,
            &Config::new(),
            &dir.path().join("absent.gcode"),
            "9",
            Some(dir.path().to_path_buf()),
        )
        .unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        let value: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert!(value["error"].as_str().unwrap().contains("absent.gcode"));
    }

    #[test]
    fn test_analyze_prints_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("job.gcode");
        std::fs::write(&file, "; filament used [g] = 3.5\nG28\n").unwrap();

        let mut out = Vec::new();
        let code = analyze(&mut out, &Config::new(), &file, "12", Some(dir.path().to_path_buf()))
            .unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        let value: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert!(value["thumbnail_url"].is_null());
        assert_eq!(value["parsed_data"]["filament_used_g"], 3.5);
        assert!(value["per_part_analysis"].is_null());
    }

    #[test]
    fn test_tips_explain() {
        let mut out = Vec::new();
        tips(&mut out, r#"{"currentStatus": "Cooling"}"#, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(value["rule_id"], "COOLING_POST_PRINT");
        assert_eq!(value["priority"], 21);
    }

    #[test]
    fn test_tips_rejects_bad_json() {
        assert!(tips(&mut Vec::new(), "not json", false).is_err());
    }

    #[test]
    fn test_device_commands_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.json");
        let manager = DeviceManager::new(&path);
        let mut stdin = Cursor::new(r#"{"device_id": "mk4-01", "device_model": "Prusa MK4"}"#);

        let mut out = Vec::new();
        devices(&mut out, &mut stdin, &manager, DeviceAction::Add { json: None }).unwrap();
        assert!(output(out).contains("\"device_id\":\"mk4-01\""));

        let mut out = Vec::new();
        devices(
            &mut out,
            &mut Cursor::new(""),
            &manager,
            DeviceAction::Update {
                device_id: "mk4-01".to_string(),
                json: Some(r#"{"location": "Lab 2"}"#.to_string()),
            },
        )
        .unwrap();

        let reloaded = DeviceManager::load(&path).unwrap();
        assert_eq!(
            reloaded.get("mk4-01").unwrap().location.as_deref(),
            Some("Lab 2")
        );

        let result = devices(
            &mut Vec::new(),
            &mut Cursor::new(""),
            &manager,
            DeviceAction::Get {
                device_id: "ghost".to_string(),
            },
        );
        assert!(result.is_err());
    }

    fn completed(device_id: &str, end: &str) -> PrintJob {
        serde_json::from_value(serde_json::json!({
            "device_id": device_id,
            "status": "completed",
            "end_time": end
        }))
        .unwrap()
    }

    #[test]
    fn test_job_cleanup_dry_run_then_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let store = JobStore::new(&path);
        store.add(completed("mk4-01", "2025-11-01T08:00:00Z")).unwrap();
        store.add(completed("mk4-01", "2025-11-02T08:00:00Z")).unwrap();
        store.add(completed("mk4-01", "2025-11-03T08:00:00Z")).unwrap();
        let config = Config::new();

        let mut out = Vec::new();
        let action = JobAction::Cleanup {
            keep: Some(1),
            dry_run: true,
        };
        jobs(&mut out, &mut Cursor::new(""), &store, &config, action).unwrap();
        let report: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(report["removed"].as_array().unwrap().len(), 2);
        assert_eq!(store.len(), 3);
        assert!(!path.exists());

        let action = JobAction::Cleanup {
            keep: Some(1),
            dry_run: false,
        };
        jobs(&mut Vec::new(), &mut Cursor::new(""), &store, &config, action).unwrap();
        let reloaded = JobStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get(3).is_ok());
    }

    #[test]
    fn test_job_analyze_stores_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("job.gcode");
        std::fs::write(&file, "; nozzle_diameter = 0.4\nG28\n").unwrap();
        let store = JobStore::new(dir.path().join("jobs.json"));
        let mut stdin = Cursor::new(r#"{"device_id": "x1-01"}"#);
        jobs(&mut Vec::new(), &mut stdin, &store, &Config::new(), JobAction::Add { json: None })
            .unwrap();

        let action = JobAction::Analyze {
            job_id: 1,
            file,
            out_dir: Some(dir.path().to_path_buf()),
        };
        jobs(&mut Vec::new(), &mut Cursor::new(""), &store, &Config::new(), action).unwrap();

        let reloaded = JobStore::load(dir.path().join("jobs.json")).unwrap();
        let analysis = reloaded.get(1).unwrap().gcode_analysis_data.unwrap();
        assert_eq!(analysis.parsed_data.nozzle_diameter, Some(0.4));
    }

    #[test]
    fn test_job_analyze_unknown_job() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path().join("jobs.json"));
        let action = JobAction::Analyze {
            job_id: 9,
            file: dir.path().join("job.gcode"),
            out_dir: None,
        };
        assert!(jobs(&mut Vec::new(), &mut Cursor::new(""), &store, &Config::new(), action).is_err());
    }
}
