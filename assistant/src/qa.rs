use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::dataset::read_dataset;
use crate::error::DatasetError;
use crate::models::QaEntry;

const SEED_QA: &str = include_str!("../../data/qa.json");

pub const NOT_FOUND_CHUNKS: [&str; 2] = [
    "I couldn't find that in the current workspace.",
    "Try one of the suggested questions on the right.",
];

const MIN_OVERLAP: usize = 2;
const OVERLAP_RATIO: f64 = 0.3;
const TARGET_CHUNKS: usize = 4;

/// Hardcoded question/answer table behind the document-workspace chat.
#[derive(Debug)]
pub struct QaIndex {
    entries: Vec<QaEntry>,
}

pub type SharedQaIndex = Arc<QaIndex>;

impl QaIndex {
    pub fn new(entries: Vec<QaEntry>) -> Self {
        Self { entries }
    }

    pub fn seed() -> Result<Self, DatasetError> {
        Self::from_json(SEED_QA)
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn open(path: Option<&Path>) -> Result<SharedQaIndex, DatasetError> {
        let index = match path {
            Some(path) => Self::from_json(&read_dataset(path)?)?,
            None => Self::seed()?,
        };
        info!("Loaded {} Q&A entries", index.entries.len());
        Ok(Arc::new(index))
    }

    pub fn questions(&self) -> Vec<&str> {
        self.entries.iter().map(|qa| qa.question.as_str()).collect()
    }

    /// Exact match, then containment either way, then token overlap.
    /// The first strategy that hits wins.
    pub fn find_answer(&self, text: &str) -> Option<&QaEntry> {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        if let Some(qa) = self
            .entries
            .iter()
            .find(|qa| qa.question.trim().to_lowercase() == query)
        {
            return Some(qa);
        }

        if let Some(qa) = self.entries.iter().find(|qa| {
            let question = qa.question.to_lowercase();
            question.contains(&query) || query.contains(&question)
        }) {
            return Some(qa);
        }

        let query_tokens = tokenize(text);
        let threshold = (query_tokens.len() as f64 * OVERLAP_RATIO).max(MIN_OVERLAP as f64);

        let mut best: Option<(&QaEntry, usize)> = None;
        for qa in &self.entries {
            let overlap = overlap(&query_tokens, &tokenize(&qa.question));
            let better = best.map_or(overlap > 0, |(_, score)| overlap > score);
            if better && overlap as f64 >= threshold {
                best = Some((qa, overlap));
            }
        }
        best.map(|(qa, _)| qa)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of distinct tokens shared by both sides.
fn overlap(left: &[String], right: &[String]) -> usize {
    let left: HashSet<&str> = left.iter().map(String::as_str).collect();
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    left.intersection(&right).count()
}

/// Splits an answer into roughly four word groups for a streamed reply.
pub fn chunk_answer(answer: &str) -> Vec<String> {
    let words: Vec<&str> = answer.split(' ').collect();
    let size = words.len().div_ceil(TARGET_CHUNKS).max(1);
    words.chunks(size).map(|chunk| chunk.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> QaIndex {
        QaIndex::from_json(
            r#"[
                {"id": "a", "question": "What is our standard discount policy?", "answer": "Up to 10%.", "citations": ["doc-pricing"]},
                {"id": "b", "question": "How did the Q3 pipeline look?", "answer": "Healthy.", "citations": []},
                {"id": "c", "question": "What is the renewal forecast for next quarter?", "answer": "Mostly high.", "citations": []}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn exact_match_ignores_case_and_padding() {
        let index = index();
        assert_eq!(index.find_answer("  how did the q3 PIPELINE look?  ").unwrap().id, "b");
    }

    #[test]
    fn containment_works_both_ways() {
        let index = index();
        assert_eq!(index.find_answer("discount policy").unwrap().id, "a");
        assert_eq!(
            index
                .find_answer("Quick one: how did the Q3 pipeline look? Thanks")
                .unwrap()
                .id,
            "b"
        );
    }

    #[test]
    fn token_overlap_needs_two_shared_tokens() {
        let index = index();
        // Shares "renewal" and "forecast" with entry c.
        assert_eq!(index.find_answer("renewal forecast please").unwrap().id, "c");
        // Only "pipeline" in common.
        assert!(index.find_answer("pipeline").is_some()); // substring hit
        assert!(index.find_answer("sales pipeline?").is_none());
    }

    #[test]
    fn token_overlap_scales_with_query_length() {
        let index = index();
        // 10 tokens -> need 3 shared; only "what" and "is" overlap.
        assert!(index
            .find_answer("what is going on with every single account right now")
            .is_none());
    }

    #[test]
    fn blank_text_finds_nothing() {
        assert!(index().find_answer("   ").is_none());
    }

    #[test]
    fn seed_has_questions() {
        let index = QaIndex::seed().unwrap();
        assert!(!index.questions().is_empty());
        assert!(index
            .find_answer("Which case study should I send to a hospital system?")
            .is_some());
    }

    #[test]
    fn chunks_cover_all_words() {
        let answer = "one two three four five six seven eight nine";
        let chunks = chunk_answer(answer);
        assert_eq!(chunks, vec!["one two three", "four five six", "seven eight nine"]);
        assert_eq!(chunk_answer("short"), vec!["short"]);
    }
}
