// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::naming::Range;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Settings shared by all samples, e.g., `crf=19:me=umh`.
    pub settings: String,
    /// Time range of the source used for the samples.
    pub range: Range,
    /// Path of the estimates file, relative to the samples directory.
    pub estimates_file: String,
    /// Extension of sample files.
    pub extension: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            settings: String::new(),
            range: Range::default(),
            estimates_file: String::from("./estimates"),
            extension: String::from("mkv"),
        }
    }
}

impl UserConfig {
    /// Load the configuration from a JSON file, or use the default one if
    /// the file does not exist.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("{:#?} not found, using default configuration", path);
            return Ok(Self::default());
        }
        let conf_file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(conf_file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse the settings shared by all samples.
    pub fn base_settings(&self) -> crate::error::Result<crate::settings::ConfigMap> {
        crate::settings::parse(&[self.settings.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_config_load() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("txs.json");
        assert_eq!(UserConfig::default(), UserConfig::load(&path)?);

        std::fs::write(
            &path,
            r#"{"settings": "crf=19:me=umh", "range": {"start": "25:00", "duration": "60"}}"#,
        )?;
        let user_config = UserConfig::load(&path)?;
        assert_eq!("25:00-60", user_config.range.to_string());
        assert_eq!("./estimates", user_config.estimates_file);
        assert_eq!(
            vec!["crf", "me"],
            user_config.base_settings()?.keys().collect::<Vec<_>>()
        );

        std::fs::write(&path, serde_json::to_string_pretty(&UserConfig::default())?)?;
        assert_eq!(UserConfig::default(), UserConfig::load(&path)?);
        Ok(())
    }
}
