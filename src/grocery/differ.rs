//! Grocery diff: which required ingredients are absent from the pantry.
//!
//! Both sides are normalized here and only here, so callers may pass raw
//! user input or catalog names in any case.

use std::collections::BTreeSet;

/// Trims and lowercases an ingredient name.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalized_set<I>(names: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| normalize(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect()
}

/// Required ingredients missing from the pantry, deduplicated and sorted.
/// Presence only: no quantities, units or fuzzy matching.
pub fn missing<R, P>(required: R, pantry: P) -> Vec<String>
where
    R: IntoIterator,
    R::Item: AsRef<str>,
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    let have = normalized_set(pantry);
    normalized_set(required)
        .into_iter()
        .filter(|name| !have.contains(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_what_the_pantry_has() {
        let out = missing(["tomato", "onion", "garlic", "pasta"], ["tomato"]);
        assert_eq!(out, vec!["garlic", "onion", "pasta"]);
    }

    #[test]
    fn case_and_whitespace_do_not_matter() {
        let lower = missing(["tomato", "onion", "garlic"], ["onion"]);
        let mixed = missing(["  Tomato", "ONION", "Garlic "], [" Onion"]);
        assert_eq!(lower, mixed);
        assert_eq!(mixed, vec!["garlic", "tomato"]);
    }

    #[test]
    fn renormalizing_output_is_stable() {
        let first = missing(["Basil", "Salt", "basil"], ["SALT"]);
        let second = missing(first.clone(), Vec::<String>::new());
        assert_eq!(first, vec!["basil"]);
        assert_eq!(first, second);
    }

    #[test]
    fn blank_names_are_ignored() {
        let out = missing(["", "  ", "rice"], [""]);
        assert_eq!(out, vec!["rice"]);
    }

    #[test]
    fn empty_inputs() {
        assert!(missing(Vec::<String>::new(), ["egg"]).is_empty());
        assert_eq!(missing(["egg"], Vec::<&str>::new()), vec!["egg"]);
    }

    #[test]
    fn full_pantry_needs_nothing() {
        assert!(missing(["egg", "milk"], ["Milk", "EGG", "flour"]).is_empty());
    }
}
