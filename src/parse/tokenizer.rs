//! Input tokenizer: raw text to an ordered token sequence.

use thiserror::Error;

/// Errors produced by [`tokenize`] on malformed input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// A backslash was followed by a character outside the escape table.
    #[error("unknown escape sequence '\\{sequence}'")]
    UnknownEscape { sequence: char },

    /// Input ended while inside double quotes.
    #[error("unterminated quotes")]
    UnterminatedQuote,

    /// Input ended immediately after a backslash.
    #[error("trailing escape")]
    TrailingEscape,
}

/// Splits an input line into tokens, honoring quoting and escapes.
///
/// Tokens are separated by runs of whitespace unless enclosed in double
/// quotes. Quote characters never appear in the output. Escape sequences
/// (`\\`, `\"`, `\n`, `\r`, `\t`, `\b`) are processed inside and outside
/// quotes alike.
///
/// `hello "world test" --opt=val` becomes `["hello", "world test",
/// "--opt=val"]`. Empty or all-whitespace input yields an empty vec.
pub fn tokenize(text: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();

    let mut in_quotes = false;
    let mut is_escaped = false;

    for c in text.chars() {
        if is_escaped {
            is_escaped = false;
            buffer.push(unescape(c)?);
        } else if c == '"' {
            if in_quotes {
                tokens.push(std::mem::take(&mut buffer));
            }
            in_quotes = !in_quotes;
        } else if c == '\\' {
            is_escaped = true;
        } else if !in_quotes && c.is_whitespace() {
            if !buffer.is_empty() {
                tokens.push(std::mem::take(&mut buffer));
            }
        } else {
            buffer.push(c);
        }
    }

    if in_quotes {
        return Err(TokenizeError::UnterminatedQuote);
    }
    if is_escaped {
        return Err(TokenizeError::TrailingEscape);
    }

    if !buffer.is_empty() {
        tokens.push(buffer);
    }

    Ok(tokens)
}

fn unescape(c: char) -> Result<char, TokenizeError> {
    match c {
        '\\' => Ok('\\'),
        '"' => Ok('"'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'b' => Ok('\u{8}'),
        other => Err(TokenizeError::UnknownEscape { sequence: other }),
    }
}
