use anyhow::{bail, Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Matching rules shared by search and replace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchOptions {
    /// Treat the query as a regular expression instead of literal text.
    pub regex: bool,
    pub case_sensitive: bool,
    pub whole_word: bool,
    /// Prune build, dependency and version-control directories.
    pub exclude_gitignore: bool,
    /// Include entries whose name starts with `.`.
    pub include_hidden: bool,
}

/// Compiles the single pattern used for one search or replace call.
///
/// Literal queries are escaped first. Whole-word wraps the (escaped or raw)
/// query in word boundaries. Callers count every match, not just the first.
pub fn build_matcher(query: &str, options: &MatchOptions) -> Result<Regex> {
    if query.trim().is_empty() {
        bail!("Search query must not be empty");
    }

    let body = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };

    let pattern = if options.whole_word {
        format!(r"\b(?:{body})\b")
    } else {
        body
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
        .with_context(|| format!("Invalid search pattern: {query}"))
}

/// Converts a simple wildcard to an anchored regex (e.g., *.rs -> ^.*\.rs$)
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex> {
    let mut out = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    out.push('$');
    Regex::new(&out).with_context(|| format!("Invalid file pattern: {pattern}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn opts(regex: bool, case_sensitive: bool, whole_word: bool) -> MatchOptions {
        MatchOptions {
            regex,
            case_sensitive,
            whole_word,
            ..MatchOptions::default()
        }
    }

    #[rstest]
    #[case("foo", opts(false, false, false), "foo foo FOO", 3)]
    #[case("foo", opts(false, true, false), "foo foo FOO", 2)]
    #[case("foo", opts(false, true, true), "foo foobar foo", 2)]
    #[case("a.b", opts(false, true, false), "a.b axb", 1)]
    #[case("a.b", opts(true, true, false), "a.b axb", 2)]
    #[case("(x)", opts(false, true, false), "(x) x", 1)]
    #[case("fo+", opts(true, true, true), "foo ffo fooo", 2)]
    fn test_match_counts(
        #[case] query: &str,
        #[case] options: MatchOptions,
        #[case] haystack: &str,
        #[case] expected: usize,
    ) {
        let matcher = build_matcher(query, &options).unwrap();
        assert_eq!(matcher.find_iter(haystack).count(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_query_rejected(#[case] query: &str) {
        let err = build_matcher(query, &MatchOptions::default()).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = build_matcher("(unclosed", &opts(true, false, false)).unwrap_err();
        assert!(err.to_string().contains("Invalid search pattern"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: MatchOptions =
            serde_json::from_str(r#"{"caseSensitive": true, "wholeWord": true}"#).unwrap();
        assert!(options.case_sensitive);
        assert!(options.whole_word);
        assert!(!options.regex);
        assert!(!options.include_hidden);
    }

    #[test]
    fn test_wildcard() {
        let re = wildcard_to_regex("*.rs").unwrap();
        assert!(re.is_match("main.rs"));
        assert!(!re.is_match("main.rsx"));
        assert!(!re.is_match("mainrs"));

        let re = wildcard_to_regex("file?.txt").unwrap();
        assert!(re.is_match("file1.txt"));
        assert!(!re.is_match("file12.txt"));
    }
}
