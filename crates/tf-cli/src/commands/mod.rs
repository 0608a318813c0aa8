//! Report implementations, one module per job.

use std::io::Write;

use anyhow::Result;
use tf_core::Universe;

use crate::Job;

pub mod bill;
pub mod check;
pub mod packages;
pub mod tally;
pub mod util;

use util::FilterSpec;

/// Settings shared by all reports, merged from flags and configuration.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub filter: FilterSpec,
    /// Spaces per work package tree level.
    pub indent: usize,
    pub activities: bool,
    pub comments: bool,
    pub json: bool,
}

/// Writes the report for one job.
pub fn run<W: Write>(
    writer: &mut W,
    job: Job,
    universe: &Universe,
    options: &ReportOptions,
) -> Result<()> {
    tracing::debug!(?job, "running job");
    match job {
        Job::TallyDays => tally::run(writer, universe, options),
        Job::CheckDays => check::run(writer, universe, options),
        Job::WorkPackages => packages::run_summary(writer, universe, options),
        Job::ShowWorkPackages => packages::run_breakdown(writer, universe, options),
        Job::BillOfMaterials => bill::run(writer, universe, options),
    }
}
