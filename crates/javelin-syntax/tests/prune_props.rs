//! Property tests for the source pruner.
//!
//! The contract downstream stages rely on: pruned output has exactly the
//! input's byte length and every newline stays where it was, so positions
//! computed against the original text remain valid against the pruned one.

use javelin_syntax::{prune, prune_word};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

fn newline_positions(text: &str) -> Vec<usize> {
    text.bytes()
        .enumerate()
        .filter(|(_, b)| *b == b'\n' || *b == b'\r')
        .map(|(i, _)| i)
        .collect()
}

fn arb_java_soup() -> impl Strategy<Value = String> {
    // Free-form token soup: valid-ish Java fragments, unbalanced braces,
    // dangling strings, multibyte identifiers.
    proptest::string::string_regex(
        "(class |void |int |if |else |word|wörd|x|\\{|\\}|\\(|\\)|;|=|\\.|\"ab\"|'c'|//c\n|\n| ){0,60}",
    )
    .expect("valid regex")
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn prune_preserves_length_and_newlines(
        text in arb_java_soup(),
        line in 0u32..24,
        character in 0u32..48,
    ) {
        let pruned = prune(&text, line, character);
        prop_assert_eq!(text.len(), pruned.len());
        prop_assert_eq!(newline_positions(&text), newline_positions(&pruned));
    }

    #[test]
    fn word_prune_preserves_length_and_newlines(text in arb_java_soup()) {
        let pruned = prune_word(&text, "word");
        prop_assert_eq!(text.len(), pruned.len());
        prop_assert_eq!(newline_positions(&text), newline_positions(&pruned));
    }

    #[test]
    fn word_prune_keeps_nothing_but_the_word(text in arb_java_soup()) {
        let pruned = prune_word(&text, "word");
        for piece in pruned.split_whitespace() {
            prop_assert_eq!(piece, "word");
        }
    }
}
