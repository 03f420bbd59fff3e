//! CLI command definitions using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// G-code analysis, smart tips and device registry for print passports
#[derive(Parser, Debug)]
#[command(name = "printpass", version, about)]
pub struct CliArgs {
    /// Configuration file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Analyze a G-code file and print the result as JSON
    Analyze {
        /// G-code file to analyze
        #[arg(long)]
        file: PathBuf,

        /// Job identifier, used as the thumbnail file name
        #[arg(long)]
        jobid: String,

        /// Thumbnail directory (default: analyzer.preview_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print the smart tip for a printer snapshot
    Tips {
        /// Snapshot JSON file (reads from stdin if not provided)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print the winning rule as JSON
        #[arg(long)]
        explain: bool,
    },

    /// Manage the device registry
    Devices {
        #[command(subcommand)]
        action: DeviceAction,
    },

    /// Manage print job records
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum DeviceAction {
    /// List all devices
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one device
    Get { device_id: String },

    /// Register a device
    Add {
        /// Device JSON (reads from stdin if not provided)
        json: Option<String>,
    },

    /// Change fields of a device
    Update {
        device_id: String,

        /// Fields to change as JSON (reads from stdin if not provided)
        json: Option<String>,
    },

    /// Remove a device
    Delete { device_id: String },
}

#[derive(Subcommand, Debug)]
pub enum JobAction {
    /// List jobs, most recently finished first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one job
    Get { job_id: u64 },

    /// Record a job
    Add {
        /// Job JSON (reads from stdin if not provided)
        json: Option<String>,
    },

    /// Analyze a G-code file and store the result with the job
    Analyze {
        job_id: u64,

        /// G-code file to analyze
        #[arg(long)]
        file: PathBuf,

        /// Thumbnail directory (default: analyzer.preview_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Remove a job
    Delete { job_id: u64 },

    /// Delete old completed jobs beyond the retention limit
    Cleanup {
        /// Completed jobs to keep (default: jobs.max_keep)
        #[arg(long)]
        keep: Option<usize>,

        /// Report what would be deleted without deleting
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
}
