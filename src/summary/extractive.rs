//! Frequency-based extractive summarization.
//!
//! Selects the highest-scoring sentences of a document, where a sentence's
//! score is the summed occurrence count of its non-stop words across the
//! whole document. Selected sentences are returned verbatim, ordered by
//! rank. Never fails for any string input.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Words too common to carry topical signal, excluded from frequency
/// counts. A fixed behavioral constant, not user-configurable.
const STOP_WORDS: &[&str] = &[
    "the", "and", "is", "in", "it", "of", "to", "a", "that", "this", "for", "on", "with", "as",
    "are", "was", "by", "be",
];

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("word pattern is valid");
}

/// Summarize `text` down to at most `max_sentences` sentences.
///
/// Documents at or under the cap come back trimmed but otherwise
/// untouched. Longer documents are ranked by word frequency; ties keep
/// their original relative order.
pub fn summarize_local(text: &str, max_sentences: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let sentences = split_sentences(trimmed);
    if sentences.len() <= max_sentences {
        return trimmed.to_string();
    }

    let freqs = word_frequencies(text);

    let mut ranked = sentences;
    // stable sort: equal scores keep document order
    ranked.sort_by_key(|s| std::cmp::Reverse(score_sentence(s, &freqs)));

    ranked[..max_sentences].join(" ")
}

/// Split at whitespace runs that immediately follow `.`, `!`, or `?`.
///
/// Sentences partition the input; each keeps its terminal punctuation.
/// This is a deliberate simplification with no abbreviation handling.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..i]);
            // swallow the whole separator run
            let mut next_start = i + c.len_utf8();
            while let Some(&(j, w)) = iter.peek() {
                if w.is_whitespace() {
                    iter.next();
                    next_start = j + w.len_utf8();
                } else {
                    next_start = j;
                    break;
                }
            }
            start = next_start;
            prev = None;
        } else {
            prev = Some(c);
        }
    }

    sentences.push(&text[start..]);
    sentences
}

/// Count every non-stop word in the lower-cased document.
fn word_frequencies(text: &str) -> HashMap<String, u32> {
    let lower = text.to_lowercase();
    let mut freqs = HashMap::new();
    for token in WORD_RE.find_iter(&lower) {
        let word = token.as_str();
        if !STOP_WORDS.contains(&word) {
            *freqs.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    freqs
}

/// Sum of frequency lookups over the sentence's own tokens; unknown and
/// stop words contribute 0.
fn score_sentence(sentence: &str, freqs: &HashMap<String, u32>) -> u32 {
    WORD_RE
        .find_iter(sentence)
        .map(|token| {
            freqs
                .get(&token.as_str().to_lowercase())
                .copied()
                .unwrap_or(0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize_local("", 3), "");
        assert_eq!(summarize_local("   \n ", 3), "");
    }

    #[test]
    fn test_short_document_is_identity() {
        assert_eq!(summarize_local("Short sentence.", 2), "Short sentence.");
        assert_eq!(
            summarize_local("  One. Two.  ", 3),
            "One. Two.",
            "identity path trims but does not re-join"
        );
    }

    #[test]
    fn test_split_sentences_partitions() {
        let sentences = split_sentences("First one. Second!  Third? Fourth.");
        assert_eq!(sentences, vec!["First one.", "Second!", "Third?", "Fourth."]);
    }

    #[test]
    fn test_split_ignores_unterminated_whitespace() {
        // whitespace not preceded by a terminal mark is not a boundary
        let sentences = split_sentences("no terminal punctuation at all");
        assert_eq!(sentences, vec!["no terminal punctuation at all"]);
    }

    #[test]
    fn test_word_frequencies_exclude_stop_words() {
        let freqs = word_frequencies("The cat and the cat sat.");
        assert_eq!(freqs.get("cat"), Some(&2));
        assert_eq!(freqs.get("sat"), Some(&1));
        assert_eq!(freqs.get("the"), None);
        assert_eq!(freqs.get("and"), None);
    }

    #[test]
    fn test_selection_prefers_frequent_topics() {
        let text = "Apple is a fruit. Car engines are complex machines. \
                    Bananas are yellow and sweet. Automobiles require fuel.";
        let summary = summarize_local(text, 2);

        let originals = split_sentences(text);
        let chosen: Vec<&str> = summary
            .split_inclusive(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        assert!(chosen.len() <= 2 && !chosen.is_empty());
        for sentence in &chosen {
            assert!(
                originals.contains(sentence),
                "summary sentence not drawn from input: {sentence:?}"
            );
        }
    }

    #[test]
    fn test_ties_keep_document_order() {
        // four sentences sharing no non-stop vocabulary: all score 0
        let text = "Alpha zero. Bravo one. Charlie two. Delta three.";
        assert_eq!(summarize_local(text, 2), "Alpha zero. Bravo one.");
    }

    #[test]
    fn test_rank_order_beats_document_order() {
        // the last sentence repeats the dominant word and must come first
        let text = "Wind blew. Rain fell once more. Storm storm storm. Storm storm wins again.";
        let summary = summarize_local(text, 2);
        assert!(summary.starts_with("Storm storm storm."));
    }

    #[test]
    fn test_zero_cap_on_long_document() {
        let text = "One. Two. Three.";
        assert_eq!(summarize_local(text, 0), "");
    }

    #[test]
    fn test_deterministic() {
        let text = "Apple is a fruit. Car engines are complex machines. \
                    Bananas are yellow and sweet. Automobiles require fuel.";
        let first = summarize_local(text, 2);
        for _ in 0..5 {
            assert_eq!(summarize_local(text, 2), first);
        }
    }

    #[test]
    fn test_non_latin_input_degrades_gracefully() {
        let text = "один два три. четыре пять. шесть семь восемь. девять.";
        let summary = summarize_local(text, 2);
        assert!(!summary.is_empty());
    }
}
