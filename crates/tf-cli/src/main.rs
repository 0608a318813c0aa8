use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches};
use tf_cli::commands::{self, ReportOptions, util::FilterSpec};
use tf_cli::{Cli, Config, Job};
use tf_core::{Reader, Universe};
use tracing_subscriber::EnvFilter;

const COPYRIGHT: &str = "
  TimeFlies v. {version} is a time log and work package processor.

  Copyright (C) 2012 Joerg Bullmann (jb@heilancoo.net)

  This program is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  This program is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
";

fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    let jobs = Job::from_matches(&matches);

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.copyright {
        writeln!(
            out,
            "{}",
            COPYRIGHT.replace("{version}", env!("CARGO_PKG_VERSION"))
        )?;
    }
    if cli.files.is_empty() {
        return Ok(());
    }

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut universe = Universe::new();
    for path in &cli.files {
        Reader::new(&mut universe, &mut out).read(path);
    }

    let (filter, rejected) = FilterSpec::parse(cli.filter.as_deref().unwrap_or(&config.filter));
    for token in rejected {
        writeln!(out, "Bad time filter argument: {token}")?;
    }

    let options = ReportOptions {
        filter,
        indent: cli.indent.unwrap_or(config.indent),
        activities: cli.activities || config.activities,
        comments: cli.comments || config.comments,
        json: cli.json,
    };
    tracing::debug!(?jobs, ?options, "running reports");

    for job in jobs {
        commands::run(&mut out, job, &universe, &options)
            .with_context(|| format!("failed to write {job:?} report"))?;
    }
    out.flush().context("failed to flush output")?;

    Ok(())
}
