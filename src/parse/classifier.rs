//! Residue classifier: tokens to positionals, options, and flags.

use std::collections::{HashMap, HashSet};

/// Result of classifying the tokens left over after command-path matching.
///
/// An intermediate representation before type conversion: positionals stay
/// ordered, options are keyed strings, flags are a name set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Positional arguments, in input order.
    pub positionals: Vec<String>,
    /// `--key=value` options, prefix stripped. For a repeated key the last
    /// value wins; this is deliberate policy, not an accident of insertion.
    pub options: HashMap<String, String>,
    /// `--name` flags, prefix stripped.
    pub flags: HashSet<String>,
}

/// Classifies residue tokens.
///
/// A token starting with `--` is split on the first `=`: with an `=` it is
/// an option (the value is the raw remainder and may itself contain `=`),
/// without one it is a flag. Any other token is positional. Options and
/// flags may interleave with positionals; only the relative order of
/// positionals is preserved.
pub fn classify(tokens: &[String]) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();

    for token in tokens {
        if let Some(rest) = token.strip_prefix("--") {
            match rest.split_once('=') {
                Some((key, value)) => {
                    parsed.options.insert(key.to_string(), value.to_string());
                }
                None => {
                    parsed.flags.insert(rest.to_string());
                }
            }
        } else {
            parsed.positionals.push(token.clone());
        }
    }

    parsed
}
