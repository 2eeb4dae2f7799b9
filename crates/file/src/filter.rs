//! File name predicates used by directory listings
//!
//! A filter is either a set of literal substrings that must all be present in a
//! base name (compared case-insensitively) or one regular expression searched
//! anywhere in the base name.

use crate::{Error, Result};
use regex::Regex;

/// Raw filter input as callers supply it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// One string; in literal mode it is split on whitespace
    Single(String),
    /// Several literal substrings
    Many(Vec<String>),
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Pattern::Single(value.to_string())
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Pattern::Single(value)
    }
}

impl From<Vec<String>> for Pattern {
    fn from(value: Vec<String>) -> Self {
        Pattern::Many(value)
    }
}

impl From<Vec<&str>> for Pattern {
    fn from(value: Vec<&str>) -> Self {
        Pattern::Many(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Literal,
    Regex,
}

/// A compiled file name filter
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Matches every name
    #[default]
    All,
    /// Uppercased substrings, all of which must occur in the uppercased name
    Substrings(Vec<String>),
    Regex(Regex),
}

impl Filter {
    /// Build a filter from caller input
    ///
    /// Fails with [`Error::InvalidFilterCombination`] when regex mode is combined
    /// with a list of substrings.
    pub fn new(pattern: Option<Pattern>, mode: FilterMode) -> Result<Self> {
        match (pattern, mode) {
            (None, _) => Ok(Filter::All),
            (Some(Pattern::Many(_)), FilterMode::Regex) => Err(Error::InvalidFilterCombination),
            (Some(Pattern::Single(pattern)), FilterMode::Regex) => Self::regex(&pattern),
            (Some(Pattern::Single(pattern)), FilterMode::Literal) => Ok(Self::literal(&pattern)),
            (Some(Pattern::Many(substrings)), FilterMode::Literal) => {
                Ok(Self::substrings(substrings))
            }
        }
    }

    /// Whitespace-separated literal substrings, e.g. `"projectA .csv"`
    pub fn literal(pattern: &str) -> Self {
        Self::substrings(pattern.split_whitespace())
    }

    pub fn substrings<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Filter::Substrings(
            substrings
                .into_iter()
                .map(|s| s.as_ref().to_uppercase())
                .collect(),
        )
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Filter::Regex(Regex::new(pattern)?))
    }

    /// Test a base name (not a full path) against this filter
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Substrings(substrings) => {
                let name = name.to_uppercase();
                substrings.iter().all(|s| name.contains(s.as_str()))
            }
            Filter::Regex(regex) => regex.is_match(name),
        }
    }
}

/// One-shot form of [`Filter::new`] followed by [`Filter::matches`]
pub fn matches(name: &str, pattern: Option<&Pattern>, mode: FilterMode) -> Result<bool> {
    let filter = Filter::new(pattern.cloned(), mode)?;
    Ok(filter.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_pattern_matches_everything() {
        assert!(matches("anything.txt", None, FilterMode::Literal).unwrap());
        assert!(matches("", None, FilterMode::Regex).unwrap());
    }

    #[test]
    fn test_literal_all_substrings_required() {
        let pattern = Pattern::from(vec!["projectA", ".csv"]);
        assert!(matches("ProjectA_2019.CSV", Some(&pattern), FilterMode::Literal).unwrap());
        assert!(!matches("projectB_2019.csv", Some(&pattern), FilterMode::Literal).unwrap());
        assert!(!matches("projectA_2019.txt", Some(&pattern), FilterMode::Literal).unwrap());
    }

    #[test]
    fn test_literal_single_string_splits_on_whitespace() {
        let filter = Filter::literal("report  2020");
        assert!(filter.matches("annual_REPORT_2020.pdf"));
        assert!(!filter.matches("annual_report_2021.pdf"));
    }

    #[test]
    fn test_empty_literal_matches_everything() {
        assert!(Filter::literal("").matches("x"));
        assert!(Filter::substrings(Vec::<String>::new()).matches("x"));
    }

    #[test]
    fn test_regex_searches_anywhere() {
        let pattern = Pattern::from(r"\d{4}");
        assert!(matches("sales_2019.csv", Some(&pattern), FilterMode::Regex).unwrap());
        assert!(!matches("sales.csv", Some(&pattern), FilterMode::Regex).unwrap());

        let anchored = Filter::regex(r"\.csv$").unwrap();
        assert!(anchored.matches("a.csv"));
        assert!(!anchored.matches("a.csv.bak"));
    }

    #[test]
    fn test_regex_is_case_sensitive() {
        let filter = Filter::regex("csv").unwrap();
        assert!(!filter.matches("DATA.CSV"));
    }

    #[test]
    fn test_regex_with_list_is_rejected() {
        let pattern = Pattern::from(vec!["a", "b"]);
        let err = matches("ab", Some(&pattern), FilterMode::Regex).unwrap_err();
        assert!(matches!(err, Error::InvalidFilterCombination));
    }

    #[test]
    fn test_invalid_regex() {
        let err = Filter::regex("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }
}
