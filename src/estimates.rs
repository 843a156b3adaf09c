// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use std::io::Write;

use crate::error::{Error, Result};
use crate::ordered_map::OrderedMap;
use crate::settings::ConfigMap;

/// Separator of the columns of the estimates file.
const COLUMN_SEPARATOR: char = '/';
const NUM_COLUMNS: usize = 6;

/// Estimated encoding time and final size obtained with some settings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Estimate {
    /// Encoding time, as hours and minutes.
    pub time_display: String,
    /// Encoding time, in s.
    pub time_seconds: u64,
    /// Final size, with units.
    pub size_display: String,
    /// Final size, in bytes.
    pub size_bytes: u64,
    /// Escaped full settings used to encode the sample.
    pub full_settings: String,
}

/// Convert a measure into an integer, dropping the fractional part.
fn to_integer(value: f64, what: &str) -> Result<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_measure(&format!(
            "{what} must be a non-negative number, found {value}"
        )));
    }
    Ok(value as u64)
}

impl Estimate {
    /// Create an estimate from raw measures, fractional parts are dropped.
    ///
    /// Return [`Error::InvalidMeasure`] if a measure is negative or not finite.
    pub fn new(time_seconds: f64, size_bytes: f64, full_settings: String) -> Result<Self> {
        let time_seconds = to_integer(time_seconds, "time")?;
        let size_bytes = to_integer(size_bytes, "size")?;
        Ok(Self {
            time_display: crate::utils::duration_to_string(time_seconds),
            time_seconds,
            size_display: crate::utils::bytes_to_string(size_bytes),
            size_bytes,
            full_settings,
        })
    }

    /// Scale the encoding time and size of a sample to the whole source.
    ///
    /// Parameters:
    /// - `sample_time`: time to encode the sample, in s.
    /// - `sample_size`: size of the sample, in bytes.
    /// - `sample_duration`: duration of the sample, in s.
    /// - `source_duration`: duration of the source, in s.
    ///
    /// Return the estimated encoding time and final size of the source.
    pub fn extrapolate(
        sample_time: f64,
        sample_size: f64,
        sample_duration: f64,
        source_duration: f64,
    ) -> Result<(f64, f64)> {
        if !sample_duration.is_finite() || sample_duration <= 0.0 {
            return Err(Error::invalid_measure(&format!(
                "sample duration must be positive, found {sample_duration}"
            )));
        }
        if !source_duration.is_finite() || source_duration < 0.0 {
            return Err(Error::invalid_measure(&format!(
                "source duration must be non-negative, found {source_duration}"
            )));
        }
        let ratio = source_duration / sample_duration;
        Ok((sample_time * ratio, sample_size * ratio))
    }
}

/// Estimates indexed by the (unescaped) diff settings that produced them.
pub type EstimatesTable = OrderedMap<Estimate>;

/// Parse one line of the estimates file.
///
/// The key and full settings columns may contain `/`, escaped as `\/`.
fn parse_line(line: &str) -> Result<(String, Estimate)> {
    let parts = crate::settings::split_unescaped(line, COLUMN_SEPARATOR)
        .into_iter()
        .map(|x| x.trim())
        .collect::<Vec<_>>();
    if parts.len() < NUM_COLUMNS {
        return Err(Error::corrupt(
            line,
            &format!("expected {} fields, found {}", NUM_COLUMNS, parts.len()),
        ));
    }
    let number = |field: &str| {
        field
            .parse::<u64>()
            .map_err(|_| Error::corrupt(line, &format!("invalid number {field:?}")))
    };
    let text = |field: &str| crate::settings::unescape(field, &[COLUMN_SEPARATOR]);
    Ok((
        text(parts[0]),
        Estimate {
            time_display: parts[1].to_string(),
            time_seconds: number(parts[2])?,
            size_display: parts[3].to_string(),
            size_bytes: number(parts[4])?,
            full_settings: text(parts[NUM_COLUMNS - 1..].join("/").as_str()),
        },
    ))
}

/// Render the table with the keys padded so that the columns are aligned.
fn format_table(table: &EstimatesTable) -> String {
    let text = |field: &str| crate::settings::escape(field, &[COLUMN_SEPARATOR]);
    let width = table.keys().map(|k| text(k).chars().count()).max().unwrap_or(0);
    let mut ret = String::new();
    for (key, estimate) in table.iter() {
        ret.push_str(&format!(
            "{:width$} / {} / {} / {} / {} / {}\n",
            text(key),
            estimate.time_display,
            estimate.time_seconds,
            estimate.size_display,
            estimate.size_bytes,
            text(estimate.full_settings.as_str()),
        ));
    }
    ret
}

/// Estimates file of a samples directory.
///
/// Every change reads the whole file and writes it again, hence only one
/// writer at a time is supported.
#[derive(Debug, Clone)]
pub struct EstimatesStore {
    path: std::path::PathBuf,
}

impl EstimatesStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read all the estimates. A missing file is an empty table.
    pub fn read(&self) -> Result<EstimatesTable> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(EstimatesTable::new()),
            Err(err) => return Err(err.into()),
        };
        let mut table = EstimatesTable::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let (key, estimate) = parse_line(line)?;
            table.insert_or_update(&key, estimate);
        }
        Ok(table)
    }

    /// Replace the file with the given table.
    pub fn write(&self, table: &EstimatesTable) -> Result<()> {
        let mut f = crate::utils::create_output_file(&self.path)?;
        f.write_all(format_table(table).as_bytes())?;
        log::debug!("written {} estimates to {}", table.len(), self.path.display());
        Ok(())
    }

    /// Record the estimates for a sample.
    ///
    /// Parameters:
    /// - `diff_settings`: the settings that identify the sample.
    /// - `time_seconds`: the estimated encoding time, in s.
    /// - `size_bytes`: the estimated final size, in bytes.
    /// - `settings`: all the settings used to encode the sample.
    ///
    /// Previous estimates of the same sample are replaced in place,
    /// new ones are appended.
    pub fn update(
        &self,
        diff_settings: &ConfigMap,
        time_seconds: f64,
        size_bytes: f64,
        settings: &ConfigMap,
    ) -> Result<Estimate> {
        let mut table = self.read()?;
        let key = crate::render::render(diff_settings, false)?;
        let estimate = Estimate::new(
            time_seconds,
            size_bytes,
            crate::render::render(settings, true)?,
        )?;
        log::info!(
            "{}: estimated time {}, estimated size {}",
            key,
            estimate.time_display,
            estimate.size_display
        );
        table.insert_or_update(&key, estimate.clone());
        self.write(&table)?;
        Ok(estimate)
    }

    /// Return the estimates of a sample, if recorded.
    pub fn get(&self, diff_settings: &ConfigMap) -> Result<Option<Estimate>> {
        let key = crate::render::render(diff_settings, false)?;
        Ok(self.read()?.get(&key).cloned())
    }

    /// Remove the estimates of a sample, e.g., when it is deleted.
    /// The file is left untouched if there are no such estimates.
    pub fn remove(&self, diff_settings: &ConfigMap) -> Result<Option<Estimate>> {
        let mut table = self.read()?;
        let key = crate::render::render(diff_settings, false)?;
        let removed = table.remove(&key);
        if removed.is_some() {
            log::info!("{}: estimates removed", key);
            self.write(&table)?;
        }
        Ok(removed)
    }
}
