// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::settings::ConfigMap;

/// Time range of the source used for samples, e.g., from `25:00` for `10` s.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Range {
    /// Start position.
    pub start: String,
    /// Duration.
    pub duration: String,
}

impl Default for Range {
    fn default() -> Self {
        Self {
            start: String::from("5:00"),
            duration: String::from("10"),
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.duration)
    }
}

/// Name of the directory containing all the samples, which lists the
/// names of all the settings that vary among them.
pub fn samples_dir_name(title: &str, range: &Range, samples: &[ConfigMap]) -> String {
    format!(
        "samples.{}@{}.{}",
        title,
        range,
        crate::merge::union_keys(samples).join(":")
    )
}

/// Name of the file containing the unmodified excerpt of the source.
pub fn excerpt_file_name(title: &str, range: &Range, extension: &str) -> String {
    format!("{title}.original@{range}.{extension}")
}

/// Name of the file of a sample encoded with given full settings.
pub fn sample_file_name(
    title: &str,
    range: &Range,
    settings: &ConfigMap,
    extension: &str,
) -> crate::error::Result<String> {
    Ok(format!(
        "{}.sample@{}.{}.{}",
        title,
        range,
        crate::render::render(settings, false)?,
        extension
    ))
}
