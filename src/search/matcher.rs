//! Pattern compilation and the global scan over linearized text.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::MatchSpan;

/// Why a query could not be turned into a usable pattern.
///
/// Callers react differently to the two cases: a bad flags string is a
/// user-correctable typo, a malformed pattern carries the engine's
/// diagnostic.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Flags string contains a modifier the engine does not support.
    #[error("invalid regex flag {0:?}")]
    InvalidFlags(char),
    /// Pattern itself does not compile.
    #[error("malformed pattern: {0}")]
    MalformedPattern(#[from] regex::Error),
}

/// Compile `pattern` with a JS-style flags string.
///
/// `g` is accepted and ignored: [`find_spans`] always scans globally.
pub fn compile(pattern: &str, flags: &str) -> Result<Regex, SearchError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'g' => {}
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'u' => {
                builder.unicode(true);
            }
            other => return Err(SearchError::InvalidFlags(other)),
        }
    }
    Ok(builder.build()?)
}

/// Scan the whole text, returning non-overlapping match spans in
/// left-to-right order.
///
/// A zero-width match advances the scan by one character instead of
/// being recorded, so patterns like `a*` terminate and every returned
/// span is non-empty.
pub fn find_spans(re: &Regex, text: &str) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    let mut at = 0;
    while at <= text.len() {
        let Some(m) = re.find_at(text, at) else {
            break;
        };
        if m.start() == m.end() {
            at = next_char_boundary(text, m.end());
            continue;
        }
        spans.push(MatchSpan {
            start: m.start(),
            end: m.end(),
        });
        at = m.end();
    }
    spans
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    match text[at..].chars().next() {
        Some(c) => at + c.len_utf8(),
        None => text.len() + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_flag() {
        let re = compile("lorem", "gi").unwrap();
        let spans = find_spans(&re, "Lorem ipsum lorem");
        assert_eq!(
            spans,
            vec![
                MatchSpan { start: 0, end: 5 },
                MatchSpan { start: 12, end: 17 }
            ]
        );
    }

    #[test]
    fn case_sensitive_without_flag() {
        let re = compile("lorem", "g").unwrap();
        let spans = find_spans(&re, "Lorem ipsum lorem");
        assert_eq!(spans, vec![MatchSpan { start: 12, end: 17 }]);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        match compile("Lorem", "hoge") {
            Err(SearchError::InvalidFlags('h')) => {}
            other => panic!("expected InvalidFlags, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn malformed_pattern_is_distinguished() {
        match compile("(", "gi") {
            Err(SearchError::MalformedPattern(_)) => {}
            other => panic!("expected MalformedPattern, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn empty_match_advances_scan() {
        // `x*` matches empty at every position; only the real runs
        // come back and the scan terminates.
        let re = compile("x*", "g").unwrap();
        let spans = find_spans(&re, "axxb");
        assert_eq!(spans, vec![MatchSpan { start: 1, end: 3 }]);
    }

    #[test]
    fn empty_match_advances_over_multibyte() {
        let re = compile("x*", "g").unwrap();
        let spans = find_spans(&re, "日本xx語");
        assert_eq!(spans, vec![MatchSpan { start: 6, end: 8 }]);
    }

    #[test]
    fn spans_are_ordered_and_disjoint() {
        let re = compile(r"l\w+", "gi").unwrap();
        let spans = find_spans(&re, "lorem hello labore");
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert_eq!(spans.len(), 3);
    }
}
