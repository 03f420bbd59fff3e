//! Table output for the device listing.

use std::io::{self, Write};

use printpass_devicedb::Device;
use printpass_jobdb::PrintJob;

/// Print devices as a formatted table.
pub fn write_device_table(out: &mut impl Write, devices: &[Device]) -> io::Result<()> {
    writeln!(
        out,
        "{:<16} {:<20} {:<20} {:<16} {:<11} SIZE",
        "DEVICE_ID", "MODEL", "NAME", "LOCATION", "BED"
    )?;
    for d in devices {
        let bed = match (d.bed_width, d.bed_depth) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            "{:<16} {:<20} {:<20} {:<16} {:<11} {}",
            truncate(&d.device_id, 16),
            truncate(&d.device_model, 20),
            truncate(d.friendly_name.as_deref().unwrap_or("-"), 20),
            truncate(d.location.as_deref().unwrap_or("-"), 16),
            bed,
            d.printer_size_category.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

/// Print jobs as a formatted table.
pub fn write_job_table(out: &mut impl Write, jobs: &[PrintJob]) -> io::Result<()> {
    writeln!(
        out,
        "{:<8} {:<16} {:<24} {:<10} {:<20} {:>8} ANALYZED",
        "JOB_ID", "DEVICE", "FILENAME", "STATUS", "ENDED", "KWH"
    )?;
    for job in jobs {
        let ended = job
            .end_time
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        let kwh = job
            .kwh_consumed
            .map_or_else(|| "-".to_string(), |k| format!("{:.3}", k));
        writeln!(
            out,
            "{:<8} {:<16} {:<24} {:<10} {:<20} {:>8} {}",
            job.job_id,
            truncate(&job.device_id, 16),
            truncate(job.filename.as_deref().unwrap_or("-"), 24),
            job.status.as_str(),
            ended,
            kwh,
            if job.gcode_analysis_data.is_some() { "yes" } else { "no" },
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
