//! Line-oriented reader for work log files.
//!
//! # Grammar
//!
//! After stripping `# comments` and trailing whitespace, each line is one of:
//!
//! - blank: ends any work package block
//! - `wp <path> [effort]; <description>` (or `work-package ...`): starts a
//!   work package block; more deeply indented lines that follow are nested
//!   package definitions relative to the enclosing line
//! - `- <path> <duration>; <description>`: an activity on the current day
//! - `; <text>`: a comment on the current day
//! - `import <file>`: reads another file into the same universe
//! - anything else: comma-separated instructions (`day`, `off`, `leave`, ...),
//!   where a `; comment` at the end belongs to the last instruction
//!
//! Problems are reported to the sink as line-tagged diagnostics and never
//! stop the read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

use crate::day::{AdjustmentKind, Day, Directive, WeeklySchedule};
use crate::diagnostic::{Diagnostic, ImportSite, Sink, plural};
use crate::error::LineError;
use crate::package::{PackageId, is_valid_path};
use crate::time::{parse_date, parse_duration, parse_weekday};
use crate::universe::Universe;

/// Reads work log files into a shared [`Universe`].
///
/// Every top-level [`read`](Self::read) tidies the universe up afterwards and
/// emits an error/warning count line if anything was reported so far.
pub struct Reader<'a, S: Sink> {
    universe: &'a mut Universe,
    sink: &'a mut S,
}

/// A work package line that encloses more deeply indented ones.
#[derive(Debug, Clone, Copy)]
struct Bookmark {
    package: PackageId,
    indent: usize,
}

/// Per-file reading state, linked to the frame of the importing file.
struct Frame<'p> {
    display: String,
    path: PathBuf,
    absolute: PathBuf,
    line: usize,
    already_read: bool,
    parent: Option<&'p Frame<'p>>,
    stack: Vec<Bookmark>,
    previous_prefix: String,
}

impl<'p> Frame<'p> {
    fn new(
        path: &Path,
        absolute: PathBuf,
        already_read: bool,
        parent: Option<&'p Frame<'p>>,
    ) -> Self {
        Self {
            display: path.display().to_string(),
            path: path.to_path_buf(),
            absolute,
            line: 0,
            already_read,
            parent,
            stack: Vec::new(),
            previous_prefix: String::new(),
        }
    }

    /// This frame followed by its importers, innermost first.
    fn lineage(&self) -> impl Iterator<Item = &Frame<'p>> {
        std::iter::successors(Some(self), |frame| frame.parent)
    }

    fn depth(&self) -> usize {
        self.lineage().count() - 1
    }

    fn import_chain(&self) -> Vec<ImportSite> {
        self.lineage()
            .skip(1)
            .map(|frame| ImportSite {
                file: frame.display.clone(),
                line: frame.line,
            })
            .collect()
    }

    fn reset_stack(&mut self) {
        self.stack.clear();
        self.previous_prefix.clear();
    }

    fn in_package_block(&self) -> bool {
        !self.stack.is_empty()
    }
}

impl<'a, S: Sink> Reader<'a, S> {
    pub const fn new(universe: &'a mut Universe, sink: &'a mut S) -> Self {
        Self { universe, sink }
    }

    /// Reads a top-level file, then tidies up the universe.
    pub fn read(&mut self, path: impl AsRef<Path>) {
        self.read_file(path.as_ref(), None);
        self.universe.tidy_up();

        let mut counts = Vec::new();
        if self.universe.errors() > 0 {
            counts.push(plural(self.universe.errors(), "error"));
        }
        if self.universe.warnings() > 0 {
            counts.push(plural(self.universe.warnings(), "warning"));
        }
        if !counts.is_empty() {
            self.sink.emit(&format!("{}.", counts.join(", ")));
        }
    }

    fn read_file(&mut self, path: &Path, parent: Option<&Frame<'_>>) {
        let absolute = absolute_path(path);
        let already_read = self.universe.remember(absolute.clone());
        let mut frame = Frame::new(path, absolute, already_read, parent);

        if let Some(parent) = parent {
            let is_loop = parent
                .lineage()
                .any(|ancestor| ancestor.absolute == frame.absolute);
            if is_loop {
                self.report(parent, LineError::ImportLoop(frame.display));
                return;
            }
        }

        let file = match File::open(&frame.path) {
            Ok(file) => file,
            Err(source) => {
                let error = LineError::OpenFailed {
                    path: frame.display,
                    source,
                };
                match parent {
                    Some(parent) => self.report(parent, error),
                    None => self.sink.emit(&error.to_string()),
                }
                return;
            }
        };

        let depth = frame.depth();
        tracing::debug!(path = %frame.display, depth, already_read, "reading work log");
        self.universe.add_input_file(frame.display.clone(), depth);

        // Lines are decoded lossily so a stray non-UTF-8 byte only garbles
        // its own line.
        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            frame.line += 1;
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.strip_suffix('\n').unwrap_or(&line);
                    let line = line.strip_suffix('\r').unwrap_or(line);
                    self.process_line(&mut frame, line);
                }
                Err(e) => {
                    self.report(&frame, LineError::ReadFailed(e));
                    break;
                }
            }
        }
    }

    fn report(&mut self, frame: &Frame<'_>, error: LineError) {
        let diagnostic = Diagnostic {
            file: frame.display.clone(),
            line: frame.line,
            severity: error.severity(),
            message: error.to_string(),
            chain: frame.import_chain(),
        };
        tracing::trace!(%diagnostic, "reported");
        self.universe.count(diagnostic.severity);
        self.sink.emit(&diagnostic.to_string());
    }

    fn process_line(&mut self, frame: &mut Frame<'_>, raw: &str) {
        let line = strip_comment(raw);
        let indent = line.len() - line.trim_start().len();

        if indent == 0 || line.is_empty() {
            frame.reset_stack();
        }
        if line.is_empty() {
            return;
        }

        let result = if frame.in_package_block() {
            self.process_package(frame, line)
        } else if let Some(rest) = line.strip_prefix("wp ") {
            self.process_package(frame, rest.trim())
        } else if let Some(rest) = line.strip_prefix("work-package ") {
            self.process_package(frame, rest.trim())
        } else if let Some(rest) = line.strip_prefix("- ") {
            self.process_activity(frame, rest.trim());
            Ok(())
        } else if let Some(rest) = line.strip_prefix("; ") {
            self.process_comment(rest.trim())
        } else if let Some(rest) = line.strip_prefix("import ") {
            self.import(frame, rest.trim());
            Ok(())
        } else {
            self.process_instructions(frame, line);
            Ok(())
        };

        if let Err(error) = result {
            self.report(frame, error);
        }
    }

    /// `name.of.package [effort]; description`, possibly indented.
    fn process_package(&mut self, frame: &mut Frame<'_>, line: &str) -> Result<(), LineError> {
        let (spec, description) = split_comment(line);

        let indent = line.len() - line.trim_start().len();
        let prefix = &line[..indent];
        if prefix.contains(' ') && prefix.contains('\t') {
            return Err(LineError::MixedIndentation);
        }
        if !prefix.starts_with(frame.previous_prefix.as_str())
            && !frame.previous_prefix.starts_with(prefix)
        {
            return Err(LineError::BadIndentation);
        }
        frame.previous_prefix = prefix.to_string();

        let mut tokens = spec.split_whitespace();
        let path = tokens.next().unwrap_or_default();
        if !is_valid_path(path) {
            return Err(LineError::InvalidPackagePath(path.to_string()));
        }

        while frame.stack.last().is_some_and(|top| indent <= top.indent) {
            frame.stack.pop();
        }
        let packages = self.universe.packages_mut();
        let base = frame.stack.last().map_or(packages.root(), |top| top.package);
        let id = packages.find_or_create(base, path);
        frame.stack.push(Bookmark { package: id, indent });

        let package = packages.get_mut(id);
        if let Some(description) = description {
            package.description = Some(description.to_string());
        }
        if let Some(effort) = tokens.next() {
            package.effort = parse_duration(effort)
                .map_err(|_| LineError::InvalidEffort(effort.to_string()))?;
        }
        Ok(())
    }

    /// `- name.of.package duration; description`
    fn process_activity(&mut self, frame: &Frame<'_>, line: &str) {
        let (spec, description) = split_comment(line);
        let args: Vec<&str> = spec.split_whitespace().collect();

        let [path, duration, ..] = args[..] else {
            self.report(frame, LineError::IncompleteActivity);
            return;
        };
        if frame.already_read {
            self.report(frame, LineError::Redefinition("activity".to_string()));
            return;
        }

        let package = self.universe.work_package(path);
        if package.is_none() {
            self.report(frame, LineError::UnknownPackage(path.to_string()));
        }
        let hours = parse_duration(duration).ok();
        if hours.is_none() {
            self.report(frame, LineError::InvalidActivityDuration(duration.to_string()));
        }

        let (Some(package), Some(hours)) = (package, hours) else {
            return;
        };
        match self.universe.current_day() {
            Some(date) => {
                self.universe
                    .add_activity(date, package, hours, description.map(str::to_string));
            }
            None => self.report(frame, LineError::NoCurrentDay(format!("- {line}"))),
        }
    }

    fn process_comment(&mut self, comment: &str) -> Result<(), LineError> {
        let day = self
            .universe
            .current_day_mut()
            .ok_or_else(|| LineError::NoCurrentDay(format!("; {comment}")))?;
        day.add_comment(comment);
        Ok(())
    }

    fn import(&mut self, frame: &Frame<'_>, target: &str) {
        let target = Path::new(target);
        let resolved = if target.is_absolute() {
            target.to_path_buf()
        } else {
            frame
                .path
                .parent()
                .map_or_else(|| target.to_path_buf(), |dir| dir.join(target))
        };
        self.read_file(&resolved, Some(frame));
    }

    fn process_instructions(&mut self, frame: &Frame<'_>, line: &str) {
        let (instructions, comment) = split_comment(line);
        let morsels: Vec<&str> = instructions.split(',').collect();
        let last = morsels.len() - 1;

        for (idx, morsel) in morsels.into_iter().enumerate() {
            let instruction = tidy_whitespace(morsel);
            let comment = if idx == last { comment } else { None };
            if let Err(error) = self.process_instruction(frame, &instruction, comment) {
                self.report(frame, error);
            }
        }
    }

    fn process_instruction(
        &mut self,
        frame: &Frame<'_>,
        text: &str,
        comment: Option<&str>,
    ) -> Result<(), LineError> {
        let words: Vec<&str> = text.split(' ').collect();
        let (name, args) = (words[0], &words[1..]);

        match name {
            "day" => return self.process_day(frame, args),
            "leave-days" => return self.add_block(AdjustmentKind::Leave, text, args, comment),
            "sick-days" => return self.add_block(AdjustmentKind::Sick, text, args, comment),
            "must-hours" => {
                self.process_must_hours(frame, args);
                return Ok(());
            }
            "phol" | "public-holiday" => {
                self.current_day(text)?.set_public_holiday(comment);
                return Ok(());
            }
            _ => {}
        }

        if frame.already_read {
            return Err(LineError::Redefinition(name.to_string()));
        }

        match name {
            "reset" => self.current_day(text)?.add_directive(Directive::Reset),
            "add-leave" => self.add_directive(text, args, Directive::AddLeaveBalance)?,
            "balance-must" => self.add_directive(text, args, Directive::SetMustHours)?,
            "balance-have" => self.add_directive(text, args, Directive::SetHaveHours)?,
            "off" => self.adjust_day(AdjustmentKind::Off, text, args, comment)?,
            "sick" => self.adjust_day(AdjustmentKind::Sick, text, args, comment)?,
            "leave" => self.adjust_day(AdjustmentKind::Leave, text, args, comment)?,
            _ => return Err(LineError::UnknownInstruction(text.to_string())),
        }
        Ok(())
    }

    fn current_day(&mut self, text: &str) -> Result<&mut Day, LineError> {
        self.universe
            .current_day_mut()
            .ok_or_else(|| LineError::NoCurrentDay(text.to_string()))
    }

    /// `day <date> [<start> <stop>]`
    fn process_day(&mut self, frame: &Frame<'_>, args: &[&str]) -> Result<(), LineError> {
        let arguments = || LineError::DayArguments(args.join(" "));

        let date = parse_date(args.first().ok_or_else(arguments)?)?;
        let day = self.universe.select_day(date);

        let [_, start, stop] = args[..] else {
            return if args.len() == 1 { Ok(()) } else { Err(arguments()) };
        };
        let start = parse_duration(start).map_err(|_| LineError::BadStartTime(start.to_string()))?;
        let stop = parse_duration(stop).map_err(|_| LineError::BadEndTime(stop.to_string()))?;

        if frame.already_read {
            return Err(LineError::Redefinition("day".to_string()));
        }
        if !day.set_hours(start, stop) {
            return Err(LineError::DayRedefined(date));
        }
        Ok(())
    }

    /// `leave-days <first>..<last>` or `sick-days <first> <last>`.
    ///
    /// Marks every date in the range as a full day, weekends included, and
    /// leaves the current day as it was.
    fn add_block(
        &mut self,
        kind: AdjustmentKind,
        text: &str,
        args: &[&str],
        comment: Option<&str>,
    ) -> Result<(), LineError> {
        let (first, last) = match args {
            [range] => range
                .split_once("..")
                .ok_or_else(|| LineError::BlockArguments(text.to_string()))?,
            [first, last] => (*first, *last),
            _ => return Err(LineError::BlockArguments(text.to_string())),
        };
        let first = parse_date(first)?;
        let last = parse_date(last)?;

        let saved = self.universe.current_day();
        for date in first.iter_days().take_while(|date| *date <= last) {
            self.universe
                .select_day(date)
                .adjustment_mut(kind)
                .set_full_day(comment);
        }
        self.universe.set_current_day(saved);
        Ok(())
    }

    /// `must-hours mon..thu=8 fri=6`; weekdays not mentioned require nothing.
    ///
    /// Without a current day this sets the global schedule, otherwise an
    /// override that holds from the current day on.
    fn process_must_hours(&mut self, frame: &Frame<'_>, args: &[&str]) {
        let mut schedule = WeeklySchedule::empty();
        for arg in args {
            if let Err(error) = apply_must_hours(&mut schedule, arg) {
                self.report(frame, error);
            }
        }

        match self.universe.current_day_mut() {
            Some(day) => day.must_hours = Some(schedule),
            None => self.universe.set_must_hours(schedule),
        }
    }

    fn add_directive(
        &mut self,
        text: &str,
        args: &[&str],
        make: fn(f64) -> Directive,
    ) -> Result<(), LineError> {
        let day = self.current_day(text)?;
        let hours = match args {
            [] => return Err(LineError::MissingArgument(text.to_string())),
            [hours] => parse_time(hours, text)?,
            _ => return Err(LineError::TooManyArguments(text.to_string())),
        };
        day.add_directive(make(hours));
        Ok(())
    }

    /// `off <hours>`, `sick [<hours>]`, `leave [<hours>]`. Sick and leave
    /// without hours mark the full day.
    fn adjust_day(
        &mut self,
        kind: AdjustmentKind,
        text: &str,
        args: &[&str],
        comment: Option<&str>,
    ) -> Result<(), LineError> {
        let adjustment = self.current_day(text)?.adjustment_mut(kind);
        match args {
            [] if kind == AdjustmentKind::Off => {
                return Err(LineError::MissingArgument(text.to_string()));
            }
            [] => adjustment.set_full_day(comment),
            [hours] => adjustment.add(parse_time(hours, text)?, comment),
            _ => return Err(LineError::TooManyArguments(text.to_string())),
        }
        Ok(())
    }
}

fn apply_must_hours(schedule: &mut WeeklySchedule, arg: &str) -> Result<(), LineError> {
    let (days, hours) = arg
        .split_once('=')
        .ok_or_else(|| LineError::MustHoursArgument(arg.to_string()))?;

    let (first, last) = match days.split_once("..") {
        Some((first, last)) => (parse_weekday(first)?, parse_weekday(last)?),
        None => {
            let day = parse_weekday(days)?;
            (day, day)
        }
    };
    if last.num_days_from_monday() < first.num_days_from_monday() {
        return Err(LineError::MustHoursRange(days.to_string()));
    }

    let hours = parse_duration(hours).map_err(|_| LineError::MustHoursDuration {
        hours: hours.to_string(),
        days: days.to_string(),
    })?;

    let mut weekday = first;
    loop {
        schedule.set(weekday, hours);
        if weekday == last {
            break;
        }
        weekday = weekday.succ();
    }
    Ok(())
}

fn parse_time(value: &str, instruction: &str) -> Result<f64, LineError> {
    parse_duration(value).map_err(|_| LineError::BadTime {
        time: value.to_string(),
        instruction: instruction.to_string(),
    })
}

/// Drops everything from the first `#` and trailing whitespace.
fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code).trim_end()
}

/// Splits `text; comment` at the first semicolon. Empty comments count as
/// absent.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once(';') {
        Some((text, comment)) => {
            let comment = comment.trim();
            (text, (!comment.is_empty()).then_some(comment))
        }
        None => (line, None),
    }
}

/// Trims and collapses runs of whitespace to single spaces.
fn tidy_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Absolute form of `path` with `.` and `..` folded away lexically.
fn absolute_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
