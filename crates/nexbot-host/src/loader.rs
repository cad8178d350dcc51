use nexbot_core::{CorpusRow, Intent, IntentSet, NexbotError, NexbotResult};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const QUESTION_COLUMN: &str = "question";
const ANSWER_COLUMN: &str = "answer";

/// Load the question/answer corpus from a UTF-8 CSV file with a header row
/// naming `question` and `answer` columns. Other columns are ignored.
pub fn load_corpus(path: &Path) -> NexbotResult<Vec<CorpusRow>> {
    if !path.exists() {
        return Err(NexbotError::missing(path));
    }
    let text = std::fs::read_to_string(path)?;
    let rows = parse_corpus(&text)?;
    info!(path = %path.display(), rows = rows.len(), "corpus loaded");
    Ok(rows)
}

/// Parse CSV text into corpus rows.
pub fn parse_corpus(text: &str) -> NexbotResult<Vec<CorpusRow>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(NexbotError::ResourceEmpty("no columns to parse".to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| NexbotError::ResourceMalformed(e.to_string()))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| NexbotError::MissingColumn(name.to_string()))
    };
    let question_idx = column(QUESTION_COLUMN)?;
    let answer_idx = column(ANSWER_COLUMN)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| NexbotError::ResourceMalformed(e.to_string()))?;
        let question = record.get(question_idx).unwrap_or_default();
        if question.trim().is_empty() {
            return Err(NexbotError::ResourceMalformed(format!(
                "record {} has an empty question",
                line + 1
            )));
        }
        let answer = record.get(answer_idx).unwrap_or_default();
        rows.push(CorpusRow::new(question, answer));
    }

    if rows.is_empty() {
        return Err(NexbotError::ResourceEmpty("dataset has no rows".to_string()));
    }
    Ok(rows)
}

/// On-disk shape of the intent document.
#[derive(Debug, Deserialize)]
struct IntentDocument {
    intents: Vec<Intent>,
    #[serde(default)]
    fallback_responses: Vec<String>,
}

/// Load the intent document. Fallback replies declared in the document win
/// over `fallback_responses`.
pub fn load_intents(path: &Path, fallback_responses: &[String]) -> NexbotResult<IntentSet> {
    if !path.exists() {
        return Err(NexbotError::missing(path));
    }
    let text = std::fs::read_to_string(path)?;
    let set = parse_intents(&text, fallback_responses)?;
    info!(path = %path.display(), intents = set.intents.len(), "intents loaded");
    Ok(set)
}

/// Parse an intent document from JSON text.
pub fn parse_intents(text: &str, fallback_responses: &[String]) -> NexbotResult<IntentSet> {
    let document: IntentDocument = serde_json::from_str(text)?;
    let fallback = if document.fallback_responses.is_empty() {
        fallback_responses.to_vec()
    } else {
        document.fallback_responses
    };
    let set = IntentSet::new(document.intents, fallback);
    set.validate()?;
    Ok(set)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use nexbot_core::FailureKind;

    #[test]
    fn test_parse_corpus_basic() {
        let rows = parse_corpus("question,answer\nWhat is Rust?,A language.\n\"Why, though?\",\"Because, speed.\"\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], CorpusRow::new("Why, though?", "Because, speed."));
    }

    #[test]
    fn test_parse_corpus_column_order_and_extras() {
        let rows = parse_corpus("id,answer,question\n1,Yes,Is it?\n").unwrap();
        assert_eq!(rows, vec![CorpusRow::new("Is it?", "Yes")]);
    }

    #[test]
    fn test_parse_corpus_strips_bom() {
        let rows = parse_corpus("\u{feff}question,answer\nq,a\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_parse_corpus_empty() {
        assert_eq!(parse_corpus("").unwrap_err().kind(), FailureKind::ResourceEmpty);
        assert_eq!(
            parse_corpus("question,answer\n").unwrap_err().kind(),
            FailureKind::ResourceEmpty
        );
    }

    #[test]
    fn test_parse_corpus_missing_column() {
        let err = parse_corpus("query,answer\nq,a\n").unwrap_err();
        assert!(matches!(err, NexbotError::MissingColumn(ref c) if c == "question"));
        let err = parse_corpus("question,reply\nq,a\n").unwrap_err();
        assert!(matches!(err, NexbotError::MissingColumn(ref c) if c == "answer"));
    }

    #[test]
    fn test_parse_corpus_ragged_rows() {
        let err = parse_corpus("question,answer\nq,a,extra\n").unwrap_err();
        assert!(matches!(err, NexbotError::ResourceMalformed(_)));
    }

    #[test]
    fn test_parse_corpus_blank_question() {
        let err = parse_corpus("question,answer\n,orphan answer\n").unwrap_err();
        assert!(matches!(err, NexbotError::ResourceMalformed(_)));
    }

    #[test]
    fn test_parse_intents_uses_given_fallback() {
        let set = parse_intents(
            r#"{"intents":[{"tag":"greeting","patterns":["hi"],"responses":["Hello!"]}]}"#,
            &["Pardon?".to_string()],
        )
        .unwrap();
        assert_eq!(set.intents[0].tag, "greeting");
        assert_eq!(set.fallback_responses, vec!["Pardon?".to_string()]);
    }

    #[test]
    fn test_parse_intents_document_fallback_wins() {
        let set = parse_intents(
            r#"{"intents":[{"tag":"t","patterns":[],"responses":["r"]}],"fallback_responses":["doc"]}"#,
            &["config".to_string()],
        )
        .unwrap();
        assert_eq!(set.fallback_responses, vec!["doc".to_string()]);
    }

    #[test]
    fn test_parse_intents_errors() {
        assert_eq!(
            parse_intents("{not json", &[]).unwrap_err().kind(),
            FailureKind::ResourceMalformed
        );
        assert_eq!(
            parse_intents(r#"{"intents":[]}"#, &[]).unwrap_err().kind(),
            FailureKind::ResourceEmpty
        );
        assert_eq!(
            parse_intents(r#"{"intents":[{"tag":"t","patterns":["p"]}]}"#, &[])
                .unwrap_err()
                .kind(),
            FailureKind::ResourceMalformed
        );
    }

    #[test]
    fn test_load_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("qa_dataset.csv");
        assert!(matches!(load_corpus(&csv), Err(NexbotError::ResourceMissing { .. })));
        let json = dir.path().join("intent.json");
        assert!(matches!(load_intents(&json, &[]), Err(NexbotError::ResourceMissing { .. })));
    }
}
