//! Splits a received command line into tokens.
//!
//! A token is either a bare word delimited by spaces or commas, or a quoted
//! run delimited by matching `'` or `"` marks so clients can embed spaces
//! and commas in a single argument. Separator runs between tokens are
//! absorbed as a whole: `a,b,,c` and `a, b, c` both yield three tokens and
//! empty fields are never emitted.

use thiserror::Error;

/// Upper bound on the byte length of a single token.
pub const MAX_TOKEN_BYTES: usize = 512;

/// Errors surfaced while tokenizing a line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// A single token exceeded [`MAX_TOKEN_BYTES`]. Surfaced as an explicit
    /// error rather than clipping the token silently.
    #[error("token exceeds the {limit}-byte limit")]
    TokenTooLong { limit: usize },
}

/// Prepares a raw received line for tokenizing.
///
/// Strips the line terminator, converts tabs to spaces, and returns `None`
/// when the result carries no non-space content (such lines must not be
/// dispatched).
#[must_use]
pub fn normalize_line(line: &str) -> Option<String> {
    let stripped = line.strip_suffix('\n').unwrap_or(line);
    let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);

    let normalized: String = stripped
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect();

    if normalized.chars().all(|c| c == ' ') {
        None
    } else {
        Some(normalized)
    }
}

/// Splits a normalized line into an ordered token sequence.
///
/// Token case is preserved as parsed; case folding happens at read time in
/// [`crate::ServerCommand`], never here. An unterminated quoted token runs
/// to end of input without error.
///
/// # Errors
///
/// Returns [`TokenizeError::TokenTooLong`] when a token exceeds
/// [`MAX_TOKEN_BYTES`].
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        // Absorb the whole separator gap before the next token.
        while matches!(chars.peek(), Some(' ' | ',')) {
            chars.next();
        }
        let Some(&first) = chars.peek() else { break };

        // A leading quote mark opens a quoted token; the mark itself is
        // consumed and not stored.
        let quote = (first == '"' || first == '\'').then(|| {
            chars.next();
            first
        });

        let mut token = String::new();
        while let Some(&c) = chars.peek() {
            match quote {
                Some(mark) if c == mark => {
                    // The terminating quote is consumed and discarded.
                    chars.next();
                    break;
                }
                None if c == ' ' || c == ',' => break,
                _ => {
                    chars.next();
                    if token.len() + c.len_utf8() > MAX_TOKEN_BYTES {
                        return Err(TokenizeError::TokenTooLong {
                            limit: MAX_TOKEN_BYTES,
                        });
                    }
                    token.push(c);
                }
            }
        }

        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn owned(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_owned()).collect()
    }

    #[rstest]
    #[case("add 3, 4", &["add", "3", "4"])]
    #[case("say \"hi there\", bob", &["say", "hi there", "bob"])]
    #[case("say 'hi there' bob", &["say", "hi there", "bob"])]
    #[case("a,b,,c", &["a", "b", "c"])]
    #[case("a,,b", &["a", "b"])]
    #[case("a , b", &["a", "b"])]
    #[case("  leading  spaces ", &["leading", "spaces"])]
    #[case("MixedCase arg", &["MixedCase", "arg"])]
    fn splits_lines_into_tokens(#[case] line: &str, #[case] expected: &[&str]) {
        assert_eq!(tokenize(line).expect("tokenize"), owned(expected));
    }

    #[test]
    fn whitespace_only_line_yields_no_tokens() {
        assert_eq!(tokenize("   ").expect("tokenize"), Vec::<String>::new());
        assert_eq!(tokenize("").expect("tokenize"), Vec::<String>::new());
    }

    #[test]
    fn consecutive_commas_collapse() {
        // Pinned decision: a separator run never emits empty fields.
        assert_eq!(tokenize("a,,,,b").expect("tokenize"), owned(&["a", "b"]));
        assert_eq!(tokenize(",a").expect("tokenize"), owned(&["a"]));
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_input() {
        assert_eq!(
            tokenize("say \"no closing quote").expect("tokenize"),
            owned(&["say", "no closing quote"])
        );
    }

    #[test]
    fn quotes_embed_commas() {
        assert_eq!(
            tokenize("set 'a, b, c' done").expect("tokenize"),
            owned(&["set", "a, b, c", "done"])
        );
    }

    #[test]
    fn quoted_empty_token_is_preserved() {
        assert_eq!(tokenize("set \"\" x").expect("tokenize"), owned(&["set", "", "x"]));
    }

    #[test]
    fn round_trips_plain_tokens() {
        let tokens = owned(&["mul", "2.0", "3.0"]);
        let joined = tokens.join(" ");
        assert_eq!(tokenize(&joined).expect("tokenize"), tokens);
    }

    #[test]
    fn over_length_token_is_an_error() {
        let long = "x".repeat(MAX_TOKEN_BYTES + 1);
        assert_eq!(
            tokenize(&long),
            Err(TokenizeError::TokenTooLong {
                limit: MAX_TOKEN_BYTES
            })
        );
    }

    #[test]
    fn token_at_the_limit_is_accepted() {
        let exact = "x".repeat(MAX_TOKEN_BYTES);
        assert_eq!(tokenize(&exact).expect("tokenize"), vec![exact]);
    }

    #[rstest]
    #[case("add\t3\t4", Some("add 3 4"))]
    #[case("add 3 4\r\n", Some("add 3 4"))]
    #[case("\t \t", None)]
    #[case("   \r\n", None)]
    #[case("", None)]
    fn normalizes_tabs_and_detects_blank_lines(
        #[case] line: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(normalize_line(line).as_deref(), expected);
    }
}
