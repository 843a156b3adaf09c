// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use crate::settings::{ConfigMap, Value, ASSIGN, DELIMITER};

/// How settings are rendered into strings.
#[derive(Debug, Clone)]
pub struct Format {
    /// Separator of the settings.
    pub delimiter: char,
    /// Replacement of the delimiter inside values. Settings such as
    /// `deblock=-1:-1` accept `,` as well, which needs no escaping.
    pub substitution: char,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            delimiter: DELIMITER,
            substitution: ',',
        }
    }
}

impl Format {
    fn normalize(&self, value: &str, escape: bool) -> String {
        let value = value.replace(self.delimiter, &self.substitution.to_string());
        if escape {
            crate::settings::escape(&value, &[self.delimiter, ASSIGN])
        } else {
            value
        }
    }

    /// Render a single configuration, e.g., `crf=20:me=umh:no-deblock`.
    ///
    /// With `escape` the delimiter, `=` and `\` in values are escaped with
    /// `\`, so that the result can be parsed back into the same
    /// configuration. In this case keys must not contain the delimiter
    /// or `=`, otherwise [`Error::EscapeConflict`] is returned.
    pub fn render(&self, settings: &ConfigMap, escape: bool) -> Result<String> {
        let mut parts = vec![];
        for (key, value) in settings.iter() {
            if escape && (key.contains(self.delimiter) || key.contains(ASSIGN)) {
                return Err(Error::EscapeConflict {
                    key: key.to_string(),
                });
            }
            match value {
                Value::Flag => parts.push(key.to_string()),
                Value::Text(text) => parts.push(format!("{key}={}", self.normalize(text, escape))),
            }
        }
        Ok(parts.join(&self.delimiter.to_string()))
    }

    /// Render a collection of configurations in summarized form.
    ///
    /// Configurations with the same keys, in the same order, are grouped
    /// together and each key is rendered once with all its values, e.g.,
    /// `crf=22/21:bframes=8/16`. Groups are separated by a space.
    pub fn render_all(&self, settings: &[ConfigMap]) -> String {
        let mut groups: Vec<(Vec<&str>, Vec<&ConfigMap>)> = vec![];
        for map in settings {
            let keys = map.keys().collect::<Vec<_>>();
            match groups.iter_mut().find(|(k, _)| *k == keys) {
                Some((_, members)) => members.push(map),
                None => groups.push((keys, vec![map])),
            }
        }

        let mut strings = vec![];
        for (keys, members) in groups {
            let mut parts = vec![];
            for key in keys {
                let mut values: Vec<String> = vec![];
                for value in members.iter().filter_map(|m| m.get(key)) {
                    if let Value::Text(text) = value {
                        let text = self.normalize(text, false);
                        if !text.is_empty() && !values.contains(&text) {
                            values.push(text);
                        }
                    }
                }
                if values.is_empty() {
                    parts.push(key.to_string());
                } else {
                    parts.push(format!("{key}={}", values.join("/")));
                }
            }
            strings.push(parts.join(&self.delimiter.to_string()));
        }
        strings.join(" ")
    }
}

/// Render a single configuration with the default format.
pub fn render(settings: &ConfigMap, escape: bool) -> Result<String> {
    Format::default().render(settings, escape)
}

/// Render a collection of configurations with the default format.
pub fn render_all(settings: &[ConfigMap]) -> String {
    Format::default().render_all(settings)
}
