use crate::tfidf::{cosine_similarity, TfidfSpace};
use nexbot_core::{CorpusRow, NexbotError, NexbotResult};
use tracing::debug;

/// The winning row of a corpus lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    /// Position of the row in the corpus.
    pub index: usize,
    /// Cosine similarity between the query and that row's question.
    pub score: f64,
}

/// Find the corpus row whose question is most similar to `query`.
///
/// The vector space is fitted from scratch on every call. The query is used
/// raw: no text normalization is applied, unlike intent matching. Ties go to
/// the lowest row index, so a query sharing no term with the corpus selects
/// row 0.
pub fn best_match(query: &str, corpus: &[CorpusRow]) -> NexbotResult<BestMatch> {
    if corpus.is_empty() {
        return Err(NexbotError::ResourceEmpty("corpus has no rows".to_string()));
    }
    if let Some(index) = corpus.iter().position(|row| row.question.trim().is_empty()) {
        return Err(NexbotError::ResourceMalformed(format!(
            "row {index} has an empty question"
        )));
    }

    let questions: Vec<&str> = corpus.iter().map(|row| row.question.as_str()).collect();
    let space = TfidfSpace::fit(&questions)?;
    let query_vector = space.transform(query);

    let mut best = BestMatch {
        index: 0,
        score: f64::NEG_INFINITY,
    };
    for (index, row) in space.rows().iter().enumerate() {
        let score = cosine_similarity(&query_vector, row);
        if score > best.score {
            best = BestMatch { index, score };
        }
    }

    debug!(
        index = best.index,
        score = best.score,
        vocabulary = space.dimension(),
        "best corpus match"
    );
    Ok(best)
}

/// Answer of the corpus row closest to `query`, returned verbatim.
pub fn best_answer<'a>(query: &str, corpus: &'a [CorpusRow]) -> NexbotResult<&'a str> {
    let found = best_match(query, corpus)?;
    corpus
        .get(found.index)
        .map(|row| row.answer.as_str())
        .ok_or_else(|| NexbotError::Lookup(format!("row {} out of range", found.index)))
}

/// Human-readable text returned in place of an answer when a lookup fails.
pub fn describe_failure(error: &NexbotError) -> String {
    match error {
        NexbotError::ResourceMissing { path } => {
            format!("Error: Dataset file not found at {path}")
        }
        NexbotError::ResourceEmpty(_) => "Error: The dataset file is empty".to_string(),
        NexbotError::ResourceMalformed(_) | NexbotError::Csv(_) => {
            "Error: Unable to parse the CSV file. Check the format.".to_string()
        }
        NexbotError::MissingColumn(column) => {
            format!("Error: Required column '{column}' not found in dataset")
        }
        other => format!("Error processing your question: {other}"),
    }
}

/// [`best_answer`] with failures rendered by [`describe_failure`]. Never fails.
pub fn answer_or_error(query: &str, corpus: &[CorpusRow]) -> String {
    match best_answer(query, corpus) {
        Ok(answer) => answer.to_string(),
        Err(e) => describe_failure(&e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn corpus() -> Vec<CorpusRow> {
        vec![
            CorpusRow::new("What is your name?", "I am a bot."),
            CorpusRow::new("How old are you?", "I am timeless."),
        ]
    }

    #[test]
    fn test_contraction_matches_name_question() {
        assert_eq!(answer_or_error("what's your name", &corpus()), "I am a bot.");
    }

    #[test]
    fn test_exact_question_returns_its_answer() {
        let corpus = corpus();
        for row in &corpus {
            assert_eq!(best_answer(&row.question, &corpus).unwrap(), row.answer);
        }
    }

    #[test]
    fn test_duplicate_questions_resolve_to_first() {
        let corpus = vec![
            CorpusRow::new("Where is the library?", "Other answer"),
            CorpusRow::new("What is Rust?", "first"),
            CorpusRow::new("What is Rust?", "second"),
        ];
        let found = best_match("What is Rust?", &corpus).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(best_answer("What is Rust?", &corpus).unwrap(), "first");
    }

    #[test]
    fn test_unrelated_query_selects_first_row() {
        let found = best_match("zzz qqq", &corpus()).unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.score, 0.0);
    }

    #[test]
    fn test_empty_corpus_is_described() {
        assert_eq!(answer_or_error("", &[]), "Error: The dataset file is empty");
        assert_eq!(answer_or_error("anything", &[]), "Error: The dataset file is empty");
    }

    #[test]
    fn test_blank_question_is_malformed() {
        let corpus = vec![CorpusRow::new("  ", "nothing")];
        let err = best_match("hi", &corpus).unwrap_err();
        assert!(matches!(err, NexbotError::ResourceMalformed(_)));
    }

    #[test]
    fn test_describe_failure_messages() {
        assert_eq!(
            describe_failure(&NexbotError::missing("/data/qa_dataset.csv")),
            "Error: Dataset file not found at /data/qa_dataset.csv"
        );
        assert_eq!(
            describe_failure(&NexbotError::MissingColumn("answer".into())),
            "Error: Required column 'answer' not found in dataset"
        );
        assert_eq!(
            describe_failure(&NexbotError::ResourceMalformed("bad quote".into())),
            "Error: Unable to parse the CSV file. Check the format."
        );
        assert!(describe_failure(&NexbotError::Lookup("boom".into()))
            .starts_with("Error processing your question:"));
    }
}
