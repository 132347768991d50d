//! Call and enum re-tagging.
//!
//! Pygments tags `String.Trim(` as name/punct/name/punct; it has no idea that
//! `String` and `StringPlus` are the library's entry points or that `Enum`
//! introduces an enum access chain. This pass walks the token sequence once
//! and re-labels those shapes.
//!
//! The pass only swaps classes on existing tokens. It never inserts or
//! removes, so positional indices stay valid for the whole scan, and a second
//! run is a no-op: re-tagged tokens no longer carry the `n` class the window
//! preconditions require.

use crate::token::{Tag, Token};

/// Names whose member access reads as a library function call.
const CALL_NAMESPACES: [&str; 2] = ["String", "StringPlus"];

/// Name introducing an `Enum.<Type>.<Member>` access chain.
const ENUM_MARKER: &str = "Enum";

/// Re-tag library calls and enum chains in one linear scan.
///
/// For every punctuation token, the window of interest is its immediate
/// neighbors: the token before it, and the two or three tokens after it. A
/// window only matches when `seq[i-1]` and `seq[i+1]` are names and
/// `seq[i+2]` is punctuation again: the `<name><punct><name><punct>` shape
/// of a member access followed by a call or a further access. Windows that
/// run off either end of the sequence simply do not match.
///
/// Returns the number of tokens whose tags changed.
pub fn reclassify(tokens: &mut [Token]) -> usize {
    let mut retagged = 0;

    for i in 0..tokens.len() {
        if !tokens[i].has(Tag::Punct) {
            continue;
        }
        if i == 0 || i + 2 >= tokens.len() {
            continue;
        }
        if !(tokens[i + 1].has(Tag::Name) && tokens[i + 2].has(Tag::Punct)) {
            continue;
        }
        if !tokens[i - 1].has(Tag::Name) {
            continue;
        }

        if CALL_NAMESPACES.contains(&tokens[i - 1].text()) {
            tokens[i + 1].retag(Tag::Name, Tag::FuncName);
            retagged += 1;
        } else if tokens[i - 1].text() == ENUM_MARKER {
            tokens[i - 1].retag(Tag::Name, Tag::EnumMarker);
            tokens[i + 1].retag(Tag::Name, Tag::EnumType);
            retagged += 2;
            // `Enum.Color.Red`: the member name sits one past the second dot.
            if let Some(member) = tokens.get_mut(i + 3) {
                if member.has(Tag::Name) {
                    member.retag(Tag::Name, Tag::EnumMember);
                    retagged += 1;
                }
            }
        }
    }

    retagged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> Token {
        Token::span(["n"], text)
    }

    fn p(text: &str) -> Token {
        Token::span(["p"], text)
    }

    #[test]
    fn no_window_means_no_mutation() {
        let mut tokens = vec![n("local"), Token::text_node(" "), n("x"), p("=")];
        let before = tokens.clone();
        assert_eq!(reclassify(&mut tokens), 0);
        assert_eq!(tokens, before);
    }

    #[test]
    fn string_call_becomes_function_name() {
        let mut tokens = vec![n("String"), p("."), n("Trim"), p("(")];
        assert_eq!(reclassify(&mut tokens), 1);
        assert!(tokens[2].has(Tag::FuncName));
        assert!(!tokens[2].has(Tag::Name));
        // The namespace itself keeps its name class.
        assert!(tokens[0].has(Tag::Name));
    }

    #[test]
    fn string_plus_alias_also_matches() {
        let mut tokens = vec![n("StringPlus"), p("."), n("Escape"), p("(")];
        assert_eq!(reclassify(&mut tokens), 1);
        assert!(tokens[2].has(Tag::FuncName));
    }

    #[test]
    fn enum_chain_gets_marker_type_and_member() {
        let mut tokens = vec![n("Enum"), p("."), n("Color"), p("."), n("Red")];
        assert_eq!(reclassify(&mut tokens), 3);
        assert!(tokens[0].has(Tag::EnumMarker));
        assert!(!tokens[0].has(Tag::Name));
        assert!(tokens[2].has(Tag::EnumType));
        assert!(tokens[4].has(Tag::EnumMember));
    }

    #[test]
    fn enum_chain_without_member_still_tags_type() {
        let mut tokens = vec![n("Enum"), p("."), n("Color"), p(".")];
        assert_eq!(reclassify(&mut tokens), 2);
        assert!(tokens[0].has(Tag::EnumMarker));
        assert!(tokens[2].has(Tag::EnumType));
    }

    #[test]
    fn enum_member_slot_must_be_a_name() {
        let mut tokens = vec![n("Enum"), p("."), n("Color"), p("."), p("(")];
        assert_eq!(reclassify(&mut tokens), 2);
        assert!(tokens[4].has(Tag::Punct));
        assert!(!tokens[4].has(Tag::EnumMember));
    }

    #[test]
    fn other_namespaces_are_untouched() {
        let mut tokens = vec![n("table"), p("."), n("insert"), p("(")];
        assert_eq!(reclassify(&mut tokens), 0);
        assert!(tokens[2].has(Tag::Name));
    }

    #[test]
    fn windows_at_sequence_edges_short_circuit() {
        // Punctuation first: no predecessor.
        let mut tokens = vec![p("."), n("Trim"), p("(")];
        assert_eq!(reclassify(&mut tokens), 0);

        // Punctuation last: no successors.
        let mut tokens = vec![n("String"), p(".")];
        assert_eq!(reclassify(&mut tokens), 0);

        // Successor name but no second punctuation.
        let mut tokens = vec![n("String"), p("."), n("Trim")];
        assert_eq!(reclassify(&mut tokens), 0);
    }

    #[test]
    fn text_node_inside_window_blocks_the_match() {
        let mut tokens = vec![
            n("String"),
            p("."),
            Token::text_node(" "),
            n("Trim"),
            p("("),
        ];
        assert_eq!(reclassify(&mut tokens), 0);
    }

    #[test]
    fn prev_must_be_tagged_name() {
        // A `String` that is itself a string literal must not trigger.
        let mut tokens = vec![Token::span(["s"], "String"), p("."), n("Trim"), p("(")];
        assert_eq!(reclassify(&mut tokens), 0);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut tokens = vec![
            n("Enum"),
            p("."),
            n("Color"),
            p("."),
            n("Red"),
            Token::text_node("\n"),
            n("String"),
            p("."),
            n("Trim"),
            p("("),
        ];
        assert!(reclassify(&mut tokens) > 0);
        let after_first = tokens.clone();
        assert_eq!(reclassify(&mut tokens), 0);
        assert_eq!(tokens, after_first);
    }

    #[test]
    fn overlapping_windows_each_apply() {
        // `String.Trim(Enum.Color.Red)`: the call window and the enum window
        // overlap around the open paren; both must land.
        let mut tokens = vec![
            n("String"),
            p("."),
            n("Trim"),
            p("("),
            n("Enum"),
            p("."),
            n("Color"),
            p("."),
            n("Red"),
            p(")"),
        ];
        assert_eq!(reclassify(&mut tokens), 4);
        assert!(tokens[2].has(Tag::FuncName));
        assert!(tokens[4].has(Tag::EnumMarker));
        assert!(tokens[6].has(Tag::EnumType));
        assert!(tokens[8].has(Tag::EnumMember));
    }
}
