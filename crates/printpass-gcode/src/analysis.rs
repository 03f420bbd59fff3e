//! Combined job analysis
//!
//! Runs thumbnail extraction, slicer metadata parsing and per-part analysis
//! over one G-code file and gathers the results into the document stored
//! with the print job.

use std::borrow::Cow;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::file_io::read_gcode_file;
use crate::metadata::{parse_slicer_metadata, SlicerMetadata};
use crate::parts::{analyze_per_part_volume, PerPartAnalysis};
use crate::thumbnail::{extract_thumbnail, ThumbnailOptions};

/// Analysis document for one print job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcodeAnalysis {
    /// URL of the extracted preview image
    pub thumbnail_url: Option<String>,
    /// Values read from the slicer comment block
    pub parsed_data: SlicerMetadata,
    /// Per-part energy split
    pub per_part_analysis: Option<PerPartAnalysis>,
}

/// Analyse G-code text for the job `job_id`
///
/// Never fails: each part of the analysis degrades to an empty value on bad
/// input. Writes the preview image as a side effect when one is found.
/// Windows line endings are accepted.
pub fn analyze_gcode(content: &str, options: &ThumbnailOptions, job_id: &str) -> GcodeAnalysis {
    let content: Cow<'_, str> = if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(content)
    };

    let analysis = GcodeAnalysis {
        thumbnail_url: extract_thumbnail(&content, options, job_id),
        parsed_data: parse_slicer_metadata(&content),
        per_part_analysis: analyze_per_part_volume(&content),
    };

    info!(
        job_id,
        thumbnail = analysis.thumbnail_url.is_some(),
        duration_seconds = analysis.parsed_data.duration_seconds,
        parts = analysis
            .per_part_analysis
            .as_ref()
            .map_or(0, |p| p.parts.len()),
        "G-code analysed"
    );
    analysis
}

/// Read and analyse a G-code file
///
/// # Errors
/// Only reading the file can fail.
pub fn analyze_file(
    path: impl AsRef<Path>,
    options: &ThumbnailOptions,
    job_id: &str,
) -> Result<GcodeAnalysis> {
    let content = read_gcode_file(path)?;
    Ok(analyze_gcode(&content, options, job_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_document() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analyze_gcode("G28\n", &ThumbnailOptions::new(dir.path()), "1");

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "thumbnail_url": null,
                "parsed_data": {
                    "duration_seconds": null,
                    "filament_used_g": null,
                    "nozzle_diameter": null,
                    "filament_diameter": null
                },
                "per_part_analysis": null
            })
        );
    }
}
