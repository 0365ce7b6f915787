//! Last-resort slug when every candidate is taken.
//!
//! The result is not checked against the store again. A duplicate would need
//! two equal random tokens, which is accepted rather than guarded against.

use log::warn;

use crate::idgen::conflict_token;

/// Source of conflict tokens. Must not fail.
pub type TokenSource = fn() -> String;

/// Appends a random token to the first candidate.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    token_source: TokenSource,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self {
            token_source: conflict_token,
        }
    }
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the random source, e.g. with a fixed token in tests.
    pub fn with_token_source(token_source: TokenSource) -> Self {
        Self { token_source }
    }

    /// `first` + `separator` + a fresh token, no longer than `max_length` bytes.
    ///
    /// Under a limit, `first` is cut back (and stripped of a trailing
    /// separator) so the whole token still fits. A limit too short to keep
    /// any of `first` yields the token alone, cut to the limit.
    pub fn resolve(&self, first: &str, separator: &str, max_length: Option<usize>) -> String {
        let token = (self.token_source)();
        let Some(max) = max_length else {
            return format!("{first}{separator}{token}");
        };
        let budget = max.saturating_sub(separator.len() + token.len());
        let head = clip(first, budget, separator);
        if head.is_empty() {
            warn!("slug limit {max} leaves no room for '{first}', using the bare conflict token");
            return clip(&token, max, separator).trim_end_matches('-').to_string();
        }
        format!("{head}{separator}{token}")
    }
}

/// Longest prefix of `text` within `max` bytes, without trailing separator characters.
fn clip<'a>(text: &'a str, max: usize, separator: &str) -> &'a str {
    let mut end = max.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].trim_end_matches(|c| separator.contains(c))
}
