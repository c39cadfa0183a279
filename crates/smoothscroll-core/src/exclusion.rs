//! Page exclusion list
//!
//! A page is excluded when its lowercased URL contains any pattern, so
//! `example.com` covers the host, its subdomains and any path naming it.

use regex::Regex;
use url::Url;

use crate::Result;

/// Separators of the legacy single-string pattern format
const PATTERN_SEPARATOR: &str = r"\s*[,\n]\s*";

/// Split the legacy "a.com, b.com" form into individual patterns
pub fn split_patterns(value: &str) -> Result<Vec<String>> {
    let separator = Regex::new(PATTERN_SEPARATOR)?;
    Ok(separator
        .split(value)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    patterns: Vec<String>,
}

impl ExclusionList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| p.as_ref().trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check a page URL against the list
    pub fn matches(&self, page_url: &str) -> Result<bool> {
        let url = Url::parse(page_url)?;
        Ok(self.matches_url(&url))
    }

    pub fn matches_url(&self, url: &Url) -> bool {
        let full = url.as_str().to_ascii_lowercase();
        self.patterns.iter().any(|pattern| full.contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_patterns() {
        let patterns = split_patterns("example.com, another.example.com\n third.org,,").unwrap();
        assert_eq!(patterns, vec!["example.com", "another.example.com", "third.org"]);
        assert!(split_patterns("  ").unwrap().is_empty());
    }

    #[test]
    fn test_host_and_subdomain_match() {
        let list = ExclusionList::new(&["example.com"]);
        assert!(list.matches("https://example.com/page").unwrap());
        assert!(list.matches("https://mail.Example.com/").unwrap());
        assert!(!list.matches("https://example.org/").unwrap());
    }

    #[test]
    fn test_partial_host_patterns_match() {
        let list = ExclusionList::new(&["mail.google", "example"]);
        assert!(list.matches("https://mail.google.com/").unwrap());
        assert!(list.matches("https://example.com/").unwrap());
        assert!(list.matches("https://www.example.org/inbox").unwrap());
        assert!(!list.matches("https://www.google.com/").unwrap());
    }

    #[test]
    fn test_pattern_anywhere_in_url_matches() {
        let list = ExclusionList::new(&["example.com"]);
        assert!(list.matches("https://notexample.com/").unwrap());
        assert!(list.matches("https://example.org/example.com").unwrap());
        assert!(list.matches("file:///tmp/example.com.html").unwrap());
    }

    #[test]
    fn test_path_pattern_matches_substring() {
        let list = ExclusionList::new(&["google.com/reader/view"]);
        assert!(list.matches("https://www.google.com/reader/view#stream").unwrap());
        assert!(!list.matches("https://www.google.com/search").unwrap());
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let list = ExclusionList::new(&["example.com"]);
        assert!(list.matches("not a url").is_err());
    }
}
