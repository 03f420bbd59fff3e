//! JSON-file-backed print job store

use parking_lot::RwLock;
use printpass_gcode::GcodeAnalysis;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{JobError, JobResult};
use crate::model::PrintJob;

/// Completed jobs kept by default: 12 passport pages of 12 rows
pub const DEFAULT_MAX_JOBS_TO_KEEP: usize = 144;

/// Outcome of a retention pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub dry_run: bool,
    pub max_keep: usize,
    /// Completed jobs before the pass
    pub total_completed: usize,
    /// Completed jobs left afterwards (or that would be, on a dry run)
    pub remaining_completed: usize,
    /// Jobs removed (or that would be), newest first
    pub removed: Vec<PrintJob>,
}

/// Newest end time first; jobs without one count as oldest, ties by id
fn newest_first(a: &PrintJob, b: &PrintJob) -> Ordering {
    match (a.end_time, b.end_time) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.job_id.cmp(&a.job_id))
}

/// Print jobs keyed by `job_id`.
///
/// Changes are held in memory until [`JobStore::save`] writes the file.
#[derive(Debug)]
pub struct JobStore {
    path: PathBuf,
    jobs: RwLock<BTreeMap<u64, PrintJob>>,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            jobs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load the store at `path`; a missing file gives an empty store.
    pub fn load(path: impl Into<PathBuf>) -> JobResult<Self> {
        let store = Self::new(path);
        if !store.path.exists() {
            debug!("No job store at {}", store.path.display());
            return Ok(store);
        }

        let load_error = |reason: String| JobError::LoadError {
            path: store.path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(&store.path).map_err(|e| load_error(e.to_string()))?;
        let jobs: Vec<PrintJob> =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;

        store
            .jobs
            .write()
            .extend(jobs.into_iter().map(|job| (job.job_id, job)));
        debug!("Loaded {} jobs from {}", store.len(), store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store as a pretty JSON array ordered by id
    pub fn save(&self) -> JobResult<()> {
        let jobs: Vec<PrintJob> = self.jobs.read().values().cloned().collect();
        let content = serde_json::to_string_pretty(&jobs)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| JobError::SaveError(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// All jobs, most recently finished first
    pub fn list(&self) -> Vec<PrintJob> {
        let mut jobs: Vec<PrintJob> = self.jobs.read().values().cloned().collect();
        jobs.sort_by(newest_first);
        jobs
    }

    pub fn get(&self, job_id: u64) -> JobResult<PrintJob> {
        self.jobs
            .read()
            .get(&job_id)
            .cloned()
            .ok_or(JobError::NotFound(job_id))
    }

    /// Record a job under the next free id and return that id
    pub fn add(&self, mut job: PrintJob) -> JobResult<u64> {
        job.validate()?;

        let mut jobs = self.jobs.write();
        let id = jobs.last_key_value().map_or(1, |(last, _)| last + 1);
        job.job_id = id;
        jobs.insert(id, job);
        info!("Added print job {}", id);
        Ok(id)
    }

    /// Store the analysis document for a job, replacing any earlier one
    pub fn attach_analysis(&self, job_id: u64, analysis: GcodeAnalysis) -> JobResult<PrintJob> {
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(&job_id).ok_or(JobError::NotFound(job_id))?;
        job.gcode_analysis_data = Some(analysis);
        debug!("Attached G-code analysis to job {}", job_id);
        Ok(job.clone())
    }

    pub fn delete(&self, job_id: u64) -> JobResult<PrintJob> {
        let removed = self
            .jobs
            .write()
            .remove(&job_id)
            .ok_or(JobError::NotFound(job_id))?;
        info!("Deleted print job {}", job_id);
        Ok(removed)
    }

    /// Keep only the `max_keep` most recently finished completed jobs.
    ///
    /// Jobs in any other state are never touched. With `dry_run` the store is
    /// left as it is and the report lists what would go.
    pub fn cleanup(&self, max_keep: usize, dry_run: bool) -> CleanupReport {
        let mut jobs = self.jobs.write();

        let mut completed: Vec<&PrintJob> = jobs.values().filter(|j| j.is_completed()).collect();
        completed.sort_by(|a, b| newest_first(a, b));
        let total_completed = completed.len();
        let removed: Vec<PrintJob> = completed.into_iter().skip(max_keep).cloned().collect();

        if !dry_run {
            for job in &removed {
                jobs.remove(&job.job_id);
            }
        }

        if removed.is_empty() {
            debug!(total_completed, max_keep, "No job cleanup needed");
        } else {
            info!(
                removed = removed.len(),
                total_completed,
                max_keep,
                dry_run,
                "Print job retention applied"
            );
        }

        CleanupReport {
            dry_run,
            max_keep,
            total_completed,
            remaining_completed: total_completed - removed.len(),
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn completed_at(hour: i64) -> PrintJob {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        PrintJob::completed("mk4-01", base + Duration::hours(hour))
    }

    #[test]
    fn test_ids_are_sequential() {
        let store = JobStore::new("unused.json");
        let mut job = PrintJob::new("mk4-01");
        job.job_id = 99;
        assert_eq!(store.add(job).unwrap(), 1);
        assert_eq!(store.add(PrintJob::new("x1")).unwrap(), 2);
        store.delete(2).unwrap();
        assert_eq!(store.add(PrintJob::new("x1")).unwrap(), 2);
    }

    #[test]
    fn test_add_rejects_invalid_job() {
        let store = JobStore::new("unused.json");
        assert!(matches!(store.add(PrintJob::new("")), Err(JobError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let store = JobStore::new("unused.json");
        store.add(completed_at(1)).unwrap();
        store.add(PrintJob::new("mk4-01")).unwrap();
        store.add(completed_at(5)).unwrap();

        let ids: Vec<_> = store.list().into_iter().map(|j| j.job_id).collect();
        assert_eq!(ids, [3, 1, 2]);
    }

    #[test]
    fn test_cleanup_keeps_newest_completed() {
        let store = JobStore::new("unused.json");
        for hour in [3, 1, 4, 2] {
            store.add(completed_at(hour)).unwrap();
        }
        let mut running = PrintJob::new("mk4-01");
        running.status = JobStatus::Printing;
        store.add(running).unwrap();

        let report = store.cleanup(2, false);
        assert_eq!(report.total_completed, 4);
        assert_eq!(report.remaining_completed, 2);
        let removed: Vec<_> = report.removed.iter().map(|j| j.job_id).collect();
        assert_eq!(removed, [4, 2]);

        assert_eq!(store.len(), 3);
        assert!(store.get(5).is_ok());
        assert!(matches!(store.get(2), Err(JobError::NotFound(2))));
    }

    #[test]
    fn test_cleanup_dry_run_changes_nothing() {
        let store = JobStore::new("unused.json");
        for hour in 0..5 {
            store.add(completed_at(hour)).unwrap();
        }

        let report = store.cleanup(3, true);
        assert!(report.dry_run);
        assert_eq!(report.removed.len(), 2);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_cleanup_within_limit() {
        let store = JobStore::new("unused.json");
        store.add(completed_at(0)).unwrap();

        let report = store.cleanup(DEFAULT_MAX_JOBS_TO_KEEP, false);
        assert!(report.removed.is_empty());
        assert_eq!(report.remaining_completed, 1);
    }

    #[test]
    fn test_missing_end_time_is_removed_first() {
        let store = JobStore::new("unused.json");
        let mut undated = PrintJob::new("mk4-01");
        undated.status = JobStatus::Completed;
        store.add(undated).unwrap();
        store.add(completed_at(0)).unwrap();

        let report = store.cleanup(1, false);
        assert_eq!(report.removed[0].job_id, 1);
    }
}
