// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use crate::ordered_map::OrderedMap;
use crate::settings::{ConfigMap, Value, ASSIGN, DELIMITER};

/// Separator of the candidate values of a setting in an axis string.
pub const VARIANT_SEPARATOR: char = '/';

/// Parse an axis string, e.g., `aq-mode=2/3:no-deblock`, into the list of
/// candidate values of each setting. A flag has the single candidate
/// [`Value::Flag`].
fn parse_axis(axis: &str) -> Result<OrderedMap<Vec<Value>>> {
    let mut settings = OrderedMap::new();
    for (key, value) in crate::settings::parse_raw(axis)? {
        let variants = match value {
            None => vec![Value::Flag],
            Some(value) => crate::settings::split_unescaped(value, VARIANT_SEPARATOR)
                .into_iter()
                .map(|v| {
                    Value::Text(crate::settings::unescape(
                        v,
                        &[DELIMITER, ASSIGN, VARIANT_SEPARATOR],
                    ))
                })
                .collect(),
        };
        settings.insert_or_update(&key, variants);
    }
    Ok(settings)
}

/// Cross product of the candidate values, the last setting varying fastest.
fn cross_product(axis: &OrderedMap<Vec<Value>>) -> Vec<ConfigMap> {
    let lists = axis.values().collect::<Vec<_>>();
    if lists.iter().any(|l| l.is_empty()) {
        return vec![];
    }

    let mut ret: Vec<ConfigMap> = vec![];
    let mut indices = vec![0; lists.len()];
    loop {
        ret.push(
            axis.keys()
                .zip(indices.iter().zip(lists.iter()))
                .map(|(key, (i, list))| (key, list[*i].clone()))
                .collect(),
        );

        // Advance the rightmost index that has not wrapped around.
        let mut pos = lists.len();
        loop {
            if pos == 0 {
                return ret;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < lists[pos].len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

/// Expand axis strings into the list of diff settings to be tested.
///
/// Each axis string is expanded into the cross product of the candidate
/// values of its settings, which are separated by unescaped `/`.
/// For every flag in a combination, the same combination without that flag
/// precedes it in the output. The expansions of the axes are concatenated
/// in the order given.
///
/// Return [`Error::EmptyAxis`] if `axes` is empty.
pub fn expand(axes: &[&str]) -> Result<Vec<ConfigMap>> {
    if axes.is_empty() {
        return Err(Error::EmptyAxis);
    }

    let mut combinations: Vec<ConfigMap> = vec![];
    for axis in axes {
        let axis = parse_axis(axis)?;
        let before = combinations.len();
        for candidate in cross_product(&axis) {
            let flags = candidate
                .iter()
                .filter(|(_, value)| value.is_flag())
                .map(|(key, _)| key.to_string())
                .collect::<Vec<_>>();
            for flag in flags {
                let mut without = candidate.clone();
                without.remove(&flag);
                combinations.push(without);
            }
            combinations.push(candidate);
        }
        log::debug!(
            "axis with settings [{}] expanded into {} combinations",
            axis.keys().collect::<Vec<_>>().join(","),
            combinations.len() - before
        );
    }
    Ok(combinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::config_map;

    #[test]
    fn test_expand_cross_product() -> anyhow::Result<()> {
        let combinations = expand(&["a=1/2:b=x/y"])?;
        assert_eq!(
            vec![
                config_map(&[("a", Some("1")), ("b", Some("x"))]),
                config_map(&[("a", Some("1")), ("b", Some("y"))]),
                config_map(&[("a", Some("2")), ("b", Some("x"))]),
                config_map(&[("a", Some("2")), ("b", Some("y"))]),
            ],
            combinations
        );
        Ok(())
    }

    #[test]
    fn test_expand_flag() -> anyhow::Result<()> {
        let combinations = expand(&["a=1/2:no-flag"])?;
        assert_eq!(
            vec![
                config_map(&[("a", Some("1"))]),
                config_map(&[("a", Some("1")), ("no-flag", None)]),
                config_map(&[("a", Some("2"))]),
                config_map(&[("a", Some("2")), ("no-flag", None)]),
            ],
            combinations
        );
        Ok(())
    }

    #[test]
    fn test_expand_aq_example() -> anyhow::Result<()> {
        let combinations = expand(&["aq-strength=0.5/1.0:aq-mode=2/3:no-deblock"])?;
        let mut expected = vec![];
        for strength in ["0.5", "1.0"] {
            for mode in ["2", "3"] {
                expected.push(config_map(&[
                    ("aq-strength", Some(strength)),
                    ("aq-mode", Some(mode)),
                ]));
                expected.push(config_map(&[
                    ("aq-strength", Some(strength)),
                    ("aq-mode", Some(mode)),
                    ("no-deblock", None),
                ]));
            }
        }
        assert_eq!(8, combinations.len());
        assert_eq!(expected, combinations);
        Ok(())
    }

    #[test]
    fn test_expand_flags_dropped_one_at_a_time() -> anyhow::Result<()> {
        let combinations = expand(&["no-a:crf=20:no-b"])?;
        assert_eq!(
            vec![
                config_map(&[("crf", Some("20")), ("no-b", None)]),
                config_map(&[("no-a", None), ("crf", Some("20"))]),
                config_map(&[("no-a", None), ("crf", Some("20")), ("no-b", None)]),
            ],
            combinations
        );
        Ok(())
    }

    #[test]
    fn test_expand_multiple_axes() -> anyhow::Result<()> {
        let combinations = expand(&["aq-strength=0.5/1.0", "aq-mode=2/3"])?;
        assert_eq!(
            vec![
                config_map(&[("aq-strength", Some("0.5"))]),
                config_map(&[("aq-strength", Some("1.0"))]),
                config_map(&[("aq-mode", Some("2"))]),
                config_map(&[("aq-mode", Some("3"))]),
            ],
            combinations
        );
        Ok(())
    }

    #[test]
    fn test_expand_escaped_separator() -> anyhow::Result<()> {
        let combinations = expand(&[r"zones=0,10,b\/2/0,10,q=20:deblock=-1\:-1"])?;
        assert_eq!(
            vec![
                config_map(&[("zones", Some("0,10,b/2")), ("deblock", Some("-1:-1"))]),
                config_map(&[("zones", Some("0,10,q=20")), ("deblock", Some("-1:-1"))]),
            ],
            combinations
        );
        Ok(())
    }

    #[test]
    fn test_expand_escaped_backslash() -> anyhow::Result<()> {
        let combinations = expand(&[r"a=x\\/y:b=1\\\/2"])?;
        assert_eq!(
            vec![
                config_map(&[("a", Some(r"x\")), ("b", Some(r"1\/2"))]),
                config_map(&[("a", Some("y")), ("b", Some(r"1\/2"))]),
            ],
            combinations
        );
        Ok(())
    }

    #[test]
    fn test_expand_empty() {
        assert!(matches!(expand(&[]), Err(Error::EmptyAxis)));
        assert!(matches!(
            expand(&["=1/2"]),
            Err(Error::MalformedSettings { .. })
        ));
    }
}
