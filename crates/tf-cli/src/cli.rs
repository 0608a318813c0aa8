//! Command-line argument definitions.

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgMatches, Parser};

/// Time log and work package processor.
///
/// Reads work logs with hierarchical work package trees and daily time
/// records, then reports work hour balances and time spent per work
/// package. Reports run in the order their flags are given.
#[derive(Debug, Parser)]
#[command(name = "timeflies", version, about, long_about = None)]
pub struct Cli {
    /// Work log files, read in order.
    #[arg(required_unless_present = "copyright")]
    pub files: Vec<PathBuf>,

    /// Report the must/have/leave/sick work hour balance.
    #[arg(short = 't', long)]
    pub tally_days: bool,

    /// Compare time at work with time booked on work packages.
    #[arg(short = 'c', long)]
    pub check_days: bool,

    /// Report hours worked per work package.
    #[arg(short = 'w', long)]
    pub work_packages: bool,

    /// Show the work package tree.
    #[arg(short = 's', long)]
    pub show_work_packages: bool,

    /// List all processed input files, imports included.
    #[arg(short = 'b', long)]
    pub bill_of_materials: bool,

    /// Comma separated filter list: `all`, `YYYY-MM` or
    /// `YYYY-MM-DD..YYYY-MM-DD` to select days, plus any of `day`, `week`
    /// and `month` to pick the balance rows of `-t`.
    #[arg(short = 'f', long, value_name = "LIST")]
    pub filter: Option<String>,

    /// Show activities in work package output.
    #[arg(short = 'a', long)]
    pub activities: bool,

    /// Show day comments in balance output.
    #[arg(short = 'C', long)]
    pub comments: bool,

    /// Spaces per work package tree level.
    #[arg(short = 'i', long, value_name = "N")]
    pub indent: Option<usize>,

    /// Emit reports as JSON where supported.
    #[arg(long)]
    pub json: bool,

    /// Show copyright information.
    #[arg(long)]
    pub copyright: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// A report to produce after reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    TallyDays,
    CheckDays,
    WorkPackages,
    ShowWorkPackages,
    BillOfMaterials,
}

impl Job {
    const ALL: [Self; 5] = [
        Self::TallyDays,
        Self::CheckDays,
        Self::WorkPackages,
        Self::ShowWorkPackages,
        Self::BillOfMaterials,
    ];

    /// Id of the flag requesting this job.
    const fn arg_id(self) -> &'static str {
        match self {
            Self::TallyDays => "tally_days",
            Self::CheckDays => "check_days",
            Self::WorkPackages => "work_packages",
            Self::ShowWorkPackages => "show_work_packages",
            Self::BillOfMaterials => "bill_of_materials",
        }
    }

    /// Requested jobs in command line order.
    pub fn from_matches(matches: &ArgMatches) -> Vec<Self> {
        let mut jobs: Vec<(usize, Self)> = Self::ALL
            .into_iter()
            .filter(|job| matches.value_source(job.arg_id()) == Some(ValueSource::CommandLine))
            .filter_map(|job| matches.index_of(job.arg_id()).map(|index| (index, job)))
            .collect();
        jobs.sort_by_key(|&(index, _)| index);
        jobs.into_iter().map(|(_, job)| job).collect()
    }
}
