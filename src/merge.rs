// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::settings::ConfigMap;

/// Combine configurations, later ones taking precedence.
///
/// The keys of every map are moved to the end of the result, in the order
/// of that map, so a key declared by several maps ends up with both the
/// position and the value given by the last one. Keys declared only by
/// earlier maps keep their relative order. E.g., merging
/// `me=umh:bframes=5` with `crf=20:bframes=5` gives
/// `me=umh:crf=20:bframes=5`, not `me=umh:bframes=5:crf=20`.
///
/// The key order matters: the full settings of a sample must end with its
/// diff settings in the same order, otherwise its estimates are not found.
pub fn merge(maps: &[&ConfigMap]) -> ConfigMap {
    let mut combined = ConfigMap::new();
    for map in maps {
        for (key, value) in map.iter() {
            combined.reinsert(key, value.clone());
        }
    }
    combined
}

/// Union of the keys of all the maps, in order of first appearance.
pub fn union_keys(maps: &[ConfigMap]) -> Vec<String> {
    let mut keys: Vec<String> = vec![];
    for map in maps {
        for key in map.keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::config_map;

    #[test]
    fn test_merge_order() {
        let base = config_map(&[("me", Some("umh")), ("bframes", Some("5"))]);
        let diff = config_map(&[("crf", Some("20")), ("bframes", Some("5"))]);
        let combined = merge(&[&base, &diff]);
        assert_eq!(
            config_map(&[
                ("me", Some("umh")),
                ("crf", Some("20")),
                ("bframes", Some("5"))
            ]),
            combined
        );
    }

    #[test]
    fn test_merge_last_value_wins() {
        let a = config_map(&[("a", Some("1")), ("b", Some("1")), ("c", Some("1"))]);
        let b = config_map(&[("b", None)]);
        let c = config_map(&[("a", Some("3")), ("d", Some("3"))]);
        assert_eq!(
            config_map(&[
                ("c", Some("1")),
                ("b", None),
                ("a", Some("3")),
                ("d", Some("3"))
            ]),
            merge(&[&a, &b, &c])
        );
        assert!(merge(&[]).is_empty());
        assert_eq!(a, merge(&[&a]));
    }

    #[test]
    fn test_union_keys() {
        let maps = vec![
            config_map(&[("a", Some("1")), ("b", Some("2"))]),
            config_map(&[("b", Some("3")), ("c", Some("4"))]),
        ];
        assert_eq!(vec!["a", "b", "c"], union_keys(&maps));
        assert!(union_keys(&[]).is_empty());
    }
}
