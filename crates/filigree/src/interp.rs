//! Interpolated string detection and placeholder splitting.
//!
//! Luau's backtick strings are foreign to the upstream tokenizer: it emits
//! each delimiter as an unmatched `err` token and tokenizes the body as a mix
//! of string literals and stray punctuation. This pass finds those regions,
//! makes the whole body read as a string, and carves `{var}` placeholders out
//! of the string segments so variables render as names.
//!
//! The scan walks the original sequence once. New tokens produced by
//! placeholder splits are recorded in a pending list keyed by position and
//! spliced in after the scan, so in-flight indices never shift and freshly
//! inserted tokens are never re-examined.

use crate::token::{Tag, Token};

/// What one splitter run did to a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Interpolation regions with both delimiters found and processed.
    pub regions: usize,
    /// String segments split around a placeholder.
    pub placeholders: usize,
    /// Opening delimiters with no closing delimiter before the sequence end.
    /// Those regions are left completely untouched.
    pub unterminated: usize,
}

impl SplitOutcome {
    /// True if the run mutated the sequence at all.
    pub fn changed(&self) -> bool {
        self.regions > 0
    }
}

/// A placeholder located inside a string segment's text.
///
/// `open` and `close` are byte offsets of the two braces. The prefix is
/// everything up to and including `{`, the variable name sits between the
/// braces, and the suffix starts at `}` and runs to the end.
struct Placeholder {
    open: usize,
    close: usize,
}

/// Locate the first `{...}` placeholder in a string segment.
///
/// The brace pair only counts when text surrounds it on both sides: a string
/// segment always carries at least its quote characters, so a placeholder
/// flush against either end of the text is not one this tokenizer could have
/// produced. Only the first pair is found; any later braces stay in the
/// suffix.
fn find_placeholder(text: &str) -> Option<Placeholder> {
    let open = text.find('{')?;
    if open == 0 {
        return None;
    }
    let close = open + 1 + text[open + 1..].find('}')?;
    if close + 1 >= text.len() {
        return None;
    }
    Some(Placeholder { open, close })
}

/// Find and process every interpolation region in the sequence.
///
/// An opening delimiter is a token tagged `err` whose text is exactly one
/// backtick and which is not already tagged `s`. Everything up to the next
/// `err`-tagged token is the region body:
///
/// - punctuation tokens gain `s` (absorbed into the string look),
/// - string segments containing a placeholder are split into
///   prefix/name/suffix,
/// - anything else is untouched.
///
/// Both delimiters then trade `err` for `s`. A region with no closing
/// delimiter is abandoned unmodified and counted in the outcome; the caller
/// decides whether to surface a diagnostic.
pub fn split_interpolations(tokens: &mut Vec<Token>) -> SplitOutcome {
    let mut outcome = SplitOutcome::default();
    // (position, [prefix, varname]), applied back-to-front after the scan.
    let mut pending: Vec<(usize, [Token; 2])> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let opener = &tokens[i];
        let opens_region =
            opener.has(Tag::Unmatched) && opener.text() == "`" && !opener.has(Tag::Str);
        if !opens_region {
            i += 1;
            continue;
        }

        let Some(closer) = (i + 1..tokens.len()).find(|&j| tokens[j].has(Tag::Unmatched)) else {
            outcome.unterminated += 1;
            i += 1;
            continue;
        };

        for k in i + 1..closer {
            if tokens[k].has(Tag::Punct) {
                tokens[k].add(Tag::Str);
            } else if tokens[k].has(Tag::InterpStr) {
                if let Some(ph) = find_placeholder(tokens[k].text()) {
                    let prefix = Token::tagged(Tag::Str, &tokens[k].text()[..=ph.open]);
                    let varname =
                        Token::tagged(Tag::Name, &tokens[k].text()[ph.open + 1..ph.close]);
                    let suffix = tokens[k].text()[ph.close..].to_string();
                    tokens[k].set_text(suffix);
                    pending.push((k, [prefix, varname]));
                    outcome.placeholders += 1;
                }
            }
        }

        tokens[i].retag(Tag::Unmatched, Tag::Str);
        tokens[closer].retag(Tag::Unmatched, Tag::Str);
        outcome.regions += 1;
        i = closer + 1;
    }

    // Back-to-front so earlier recorded positions stay valid.
    for (pos, [prefix, varname]) in pending.into_iter().rev() {
        tokens.insert(pos, varname);
        tokens.insert(pos, prefix);
    }

    outcome
}
