// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::naming::Range;
use crate::settings::{ConfigMap, Value};

static BFRAMES_LINE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"consecutive B-frames:\s*((?:\d+\.\d+\s*%\s*)+)")
        .expect("invalid consecutive B-frames regex")
});
static PERCENTAGE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"(\d+\.\d+)\s*%").expect("invalid percentage regex")
});

/// Settings that make a test encode faster without changing the
/// distribution of consecutive B-frames.
pub fn fast_settings() -> ConfigMap {
    [
        ("crf", Value::text("51")),
        ("trellis", Value::text("0")),
        ("ref", Value::text("1")),
        ("aq-mode", Value::text("0")),
        ("partitions", Value::text("none")),
        ("weightp", Value::text("0")),
        ("no-mixed-refs", Value::Flag),
        ("no-deblock", Value::Flag),
        ("no-cabac", Value::Flag),
        ("no-8x8dct", Value::Flag),
        ("no-scenecut", Value::Flag),
    ]
    .into_iter()
    .collect()
}

/// Settings of the test encode used to find consecutive B-frames: the base
/// settings, overridden by [`fast_settings`], then by the B-frames ones.
pub fn bframes_settings(base: &ConfigMap, bframes: &str, b_adapt: &str) -> ConfigMap {
    let bframes: ConfigMap = [("bframes", Value::text(bframes)), ("b-adapt", Value::text(b_adapt))]
        .into_iter()
        .collect();
    crate::merge::merge(&[base, &fast_settings(), &bframes])
}

pub fn bframes_dir_name(title: &str, range: &Range) -> String {
    format!("bframes:{title}@{range}")
}

pub fn bframes_file_name(
    title: &str,
    range: &Range,
    settings: &ConfigMap,
    extension: &str,
) -> crate::error::Result<String> {
    Ok(format!(
        "{}.bframes@{}.{}.{}",
        title,
        range,
        crate::render::render(settings, false)?,
        extension
    ))
}

/// Collect the percentages of consecutive B-frames reported in an encoder log.
/// The i-th percentage is the share of frames in sequences of i B-frames.
pub fn parse_bframes(log: &str) -> Vec<f64> {
    let mut values = vec![];
    for captures in BFRAMES_LINE.captures_iter(log) {
        for perc in PERCENTAGE.captures_iter(&captures[1]) {
            if let Ok(value) = perc[1].parse::<f64>() {
                values.push(value);
            }
        }
    }
    values
}

/// Read the percentages of consecutive B-frames from an encoder log file.
///
/// Return [`crate::error::Error::MissingBframes`] if there are none.
pub fn read_bframes(path: &std::path::Path) -> crate::error::Result<Vec<f64>> {
    let values = parse_bframes(&std::fs::read_to_string(path)?);
    if values.is_empty() {
        return Err(crate::error::Error::MissingBframes {
            path: path.to_path_buf(),
        });
    }
    log::debug!("found {} consecutive B-frames percentages in {}", values.len(), path.display());
    Ok(values)
}

/// Table of percentages, aligned under the number of consecutive B-frames.
pub fn format_bframes(percentages: &[f64]) -> Vec<String> {
    vec![
        (0..percentages.len())
            .map(|i| format!(" {i:2}  "))
            .collect::<Vec<_>>()
            .join(" "),
        percentages
            .iter()
            .map(|perc| format!("{perc:4.1}%"))
            .collect::<Vec<_>>()
            .join(" "),
    ]
}
