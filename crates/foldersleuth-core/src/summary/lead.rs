/// Extractive summariser that keeps the leading sentences of a document.
use super::Summarizer;
use crate::error::SummarizeError;

/// Returns whole leading sentences up to a word budget.
///
/// If the very first sentence alone exceeds the budget it is cut at the
/// budget and marked with an ellipsis.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadSummarizer;

impl Summarizer for LeadSummarizer {
    fn summarize(&self, text: &str, limit: usize) -> Result<String, SummarizeError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Err(SummarizeError::EmptyText);
        }
        let limit = limit.max(1);

        let mut taken = 0;
        let mut sentence_end = 0;
        for (i, word) in words.iter().enumerate().take(limit) {
            taken = i + 1;
            if ends_sentence(word) {
                sentence_end = taken;
            }
        }

        if taken == words.len() {
            return Ok(words.join(" "));
        }
        if sentence_end > 0 {
            return Ok(words[..sentence_end].join(" "));
        }
        Ok(format!("{}...", words[..taken].join(" ")))
    }
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', ')', ']'])
        .ends_with(['.', '!', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_returned_whole_and_normalised() {
        let s = LeadSummarizer.summarize("  One   line\nof text ", 150).unwrap();
        assert_eq!(s, "One line of text");
    }

    #[test]
    fn keeps_whole_sentences_within_budget() {
        let text = "First sentence here. Second one follows! Third is much longer than the rest.";
        let s = LeadSummarizer.summarize(text, 7).unwrap();
        assert_eq!(s, "First sentence here. Second one follows!");
    }

    #[test]
    fn overlong_first_sentence_is_cut() {
        let text = "a b c d e f g h";
        let s = LeadSummarizer.summarize(text, 3).unwrap();
        assert_eq!(s, "a b c...");
    }

    #[test]
    fn quoted_sentence_end_counts() {
        let text = "He said \"stop.\" Then more words follow here.";
        let s = LeadSummarizer.summarize(text, 4).unwrap();
        assert_eq!(s, "He said \"stop.\"");
    }

    #[test]
    fn blank_text_is_an_error() {
        assert!(matches!(
            LeadSummarizer.summarize(" \n\t", 10),
            Err(SummarizeError::EmptyText)
        ));
    }
}
