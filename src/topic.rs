//! Hierarchical topic pattern matching
//!
//! Implements the broker wildcard rules used by stored grants: `+` matches
//! exactly one topic level, `#` matches all remaining levels, and patterns
//! that open with a wildcard never reach into the `$`-prefixed system
//! namespace.

/// Topic level separator
const SEPARATOR: char = '/';

/// Single-level wildcard segment
const SINGLE_WILDCARD: &str = "+";

/// Multi-level wildcard segment
const MULTI_WILDCARD: &str = "#";

/// Check whether a concrete topic matches a grant pattern
///
/// Pure and total: malformed input yields `false`, never an error.
///
/// Both strings are split into levels on `/` and compared left to right. A
/// `+` pattern level matches any single topic level, including an empty one;
/// a `#` in final position matches the rest of the topic, including nothing
/// at all. Either wildcard embedded in a longer level is a literal character.
/// Literal levels compare exactly, with no case folding or trimming.
pub fn topic_matches(topic: &str, pattern: &str) -> bool {
    if topic.is_empty() || pattern.is_empty() {
        return false;
    }

    // System topics ($SYS/... and friends) require an explicit literal first
    // level in the pattern.
    if topic.starts_with('$') && (pattern.starts_with('+') || pattern.starts_with('#')) {
        return false;
    }

    let topic_levels: Vec<&str> = topic.split(SEPARATOR).collect();
    let pattern_levels: Vec<&str> = pattern.split(SEPARATOR).collect();

    for (i, pattern_level) in pattern_levels.iter().enumerate() {
        let is_last = i + 1 == pattern_levels.len();

        if *pattern_level == MULTI_WILDCARD && is_last {
            // Absorbs zero or more remaining topic levels.
            return true;
        }

        match topic_levels.get(i) {
            Some(topic_level) => {
                if *pattern_level == SINGLE_WILDCARD {
                    continue;
                }
                if pattern_level != topic_level {
                    return false;
                }
            }
            // Topic exhausted before the pattern.
            None => return false,
        }
    }

    topic_levels.len() == pattern_levels.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_literal_match() {
        assert!(topic_matches("sensors/hall/temp", "sensors/hall/temp"));
        assert!(!topic_matches("sensors/hall/temp", "sensors/hall/hum"));
        assert!(!topic_matches("sensors/hall", "sensors/hall/temp"));
        assert!(!topic_matches("sensors/hall/temp", "sensors/hall"));
    }

    #[test]
    fn test_single_level_wildcard() {
        assert!(topic_matches("a/b/c", "a/+/c"));
        assert!(topic_matches("a/b/c", "+/b/c"));
        assert!(topic_matches("a/b/c", "+/+/+"));
        // Level-count mismatch: + covers exactly one level
        assert!(!topic_matches("a/b/c", "a/+"));
        assert!(!topic_matches("a", "a/+"));
    }

    #[test]
    fn test_single_level_wildcard_matches_empty_level() {
        assert!(topic_matches("a//c", "a/+/c"));
        assert!(topic_matches("a/b/", "a/b/+"));
    }

    #[test]
    fn test_multi_level_wildcard() {
        assert!(topic_matches("a/b/c", "a/#"));
        assert!(topic_matches("a/b/c", "#"));
        assert!(topic_matches("a", "#"));
        // Zero remaining levels still match
        assert!(topic_matches("a/b", "a/b/#"));
        assert!(!topic_matches("x/b/c", "a/#"));
    }

    #[test]
    fn test_wildcards_are_literal_inside_levels() {
        assert!(topic_matches("a+b/c", "a+b/c"));
        assert!(!topic_matches("aXb/c", "a+b/c"));
        assert!(topic_matches("a/b#/c", "a/b#/c"));
        // `#` not in final position is a literal level
        assert!(!topic_matches("a/x/c", "a/#/c"));
        assert!(topic_matches("a/#/c", "a/#/c"));
    }

    #[test]
    fn test_system_namespace_carve_out() {
        assert!(!topic_matches("$SYS/x", "+/x"));
        assert!(!topic_matches("$SYS/broker/load", "#"));
        assert!(!topic_matches("$SYS/x", "+/+"));
        // An explicit literal first level opens the namespace up
        assert!(topic_matches("$SYS/x", "$SYS/+"));
        assert!(topic_matches("$SYS/broker/load", "$SYS/#"));
    }

    #[test]
    fn test_empty_input_never_matches() {
        assert!(!topic_matches("", "a/b"));
        assert!(!topic_matches("a/b", ""));
        assert!(!topic_matches("", ""));
        assert!(!topic_matches("", "#"));
    }

    #[test]
    fn test_no_case_folding_or_trimming() {
        assert!(!topic_matches("Sensors/hall", "sensors/hall"));
        assert!(!topic_matches(" sensors/hall", "sensors/hall"));
    }

    proptest! {
        // Wildcard-free patterns degrade to plain string equality.
        #[test]
        fn literal_pattern_matches_iff_equal(
            topic in "[a-z0-9/]{1,30}",
            pattern in "[a-z0-9/]{1,30}",
        ) {
            prop_assert_eq!(topic_matches(&topic, &pattern), topic == pattern);
        }

        #[test]
        fn every_topic_matches_itself(topic in "[a-z0-9_-]{1,8}(/[a-z0-9_-]{1,8}){0,5}") {
            prop_assert!(topic_matches(&topic, &topic));
        }
    }
}
