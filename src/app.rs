use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::codec;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::output::{output_path, write_atomically};
use crate::transform::{filter_events, FilterConfig};
use crate::ui::{FileSelector, Notifier};

#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// No file was picked. Nothing is written and nothing is shown.
    Cancelled,
    Filtered(Report),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub input: PathBuf,
    pub output: PathBuf,
    pub total: usize,
    pub kept: usize,
    pub duplicates: usize,
    pub patterns_empty: bool,
}

impl Report {
    pub fn message(&self) -> String {
        let mut message = format!(
            "Filtered calendar created!\n\n\
             Events found: {}\n\
             Events kept: {}\n",
            self.total, self.kept
        );
        if self.duplicates > 0 {
            message.push_str(&format!("Duplicates removed: {}\n", self.duplicates));
        }
        message.push_str(&format!("\nSaved as:\n{}", self.output.display()));
        if self.patterns_empty {
            message.push_str(&format!(
                "\n\nNo courses are configured, so no events were kept. \
                 List them under `courses` in {}",
                Settings::default_path().display()
            ));
        }
        message
    }
}

/// Decode, filter and re-encode `text` read from `input`. Touches no files.
pub fn process(input: &Path, text: &str, config: &FilterConfig) -> Result<(String, Report)> {
    let mut calendar = codec::decode(text)?;
    let outcome = filter_events(std::mem::take(&mut calendar.events), config);
    calendar.events = outcome.events;

    let report = Report {
        input: input.to_path_buf(),
        output: output_path(input),
        total: outcome.total,
        kept: outcome.kept,
        duplicates: outcome.duplicates,
        patterns_empty: config.inclusion_patterns.is_empty(),
    };
    Ok((codec::encode(&calendar), report))
}

pub fn run(selector: &impl FileSelector, config: &FilterConfig) -> Result<Outcome> {
    let input = match selector.select_calendar() {
        Some(path) => path,
        None => {
            info!("no file selected");
            return Ok(Outcome::Cancelled);
        }
    };
    info!(path = %input.display(), "processing calendar");

    let text = std::fs::read_to_string(&input).map_err(|source| Error::Read {
        path: input.clone(),
        source,
    })?;
    let (encoded, report) = process(&input, &text, config)?;
    write_atomically(&report.output, &encoded)?;

    info!(
        total = report.total,
        kept = report.kept,
        output = %report.output.display(),
        "filtered calendar written"
    );
    Ok(Outcome::Filtered(report))
}

/// Runs once and reports the result through `ui`. A cancelled pick shows
/// nothing.
pub fn run_interactive<U>(ui: &U, config: Result<FilterConfig>) -> Result<Outcome>
where
    U: FileSelector + Notifier,
{
    let result = config.and_then(|config| run(ui, &config));
    match &result {
        Ok(Outcome::Filtered(report)) => ui.success(report),
        Ok(Outcome::Cancelled) => {}
        Err(err) => {
            error!("{}", err);
            ui.failure(err);
        }
    }
    result
}
