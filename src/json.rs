//! The json module contains all the JSON API stubs for requests and responses
//!
//! Each are named (hopefully) appropriately
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::{PollRow, TallyRow};

#[derive(Debug, Deserialize)]
pub struct PollCreateRequest {
    pub text: String,
    pub answers: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct PollSummary {
    pub uuid: Uuid,
    pub text: String,
}

impl From<PollRow> for PollSummary {
    fn from(row: PollRow) -> Self {
        Self {
            uuid: row.id,
            text: row.text,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct AnswerTally {
    pub uuid: Uuid,
    pub text: String,
    pub votes: i64,
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct PollResponse {
    pub uuid: Uuid,
    pub text: String,
    pub answers: Vec<AnswerTally>,
}

impl PollResponse {
    /**
     * Fold the rows of the tally join into a single poll.
     *
     * Returns `None` when there are no rows, which only happens for an unknown poll. The NULL
     * answer row produced by a poll with no answers is skipped, leaving `answers` empty.
     */
    pub fn from_rows(rows: Vec<TallyRow>) -> Option<Self> {
        let first = rows.first()?;
        let uuid = first.poll_id;
        let text = first.poll_text.clone();

        let answers = rows
            .into_iter()
            .filter_map(|row| match (row.answer_id, row.answer_text) {
                (Some(uuid), Some(text)) => Some(AnswerTally {
                    uuid,
                    text,
                    votes: row.votes,
                }),
                _ => None,
            })
            .collect();

        Some(Self { uuid, text, answers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(poll_id: Uuid, answer: Option<(Uuid, &str)>, votes: i64) -> TallyRow {
        TallyRow {
            poll_id,
            poll_text: "Lunch?".to_string(),
            answer_id: answer.map(|(id, _)| id),
            answer_text: answer.map(|(_, text)| text.to_string()),
            votes,
        }
    }

    #[test]
    fn no_rows_is_not_found() {
        assert_eq!(PollResponse::from_rows(vec![]), None);
    }

    #[test]
    fn rows_fold_into_answers() {
        let poll = Uuid::new_v4();
        let tacos = Uuid::new_v4();
        let pizza = Uuid::new_v4();

        let response = PollResponse::from_rows(vec![
            row(poll, Some((tacos, "Tacos")), 3),
            row(poll, Some((pizza, "Pizza")), 0),
        ])
        .expect("Expected a poll");

        assert_eq!(response.uuid, poll);
        assert_eq!(response.text, "Lunch?");
        assert_eq!(
            response.answers,
            vec![
                AnswerTally { uuid: tacos, text: "Tacos".to_string(), votes: 3 },
                AnswerTally { uuid: pizza, text: "Pizza".to_string(), votes: 0 },
            ]
        );
    }

    #[test]
    fn poll_without_answers_has_empty_list() {
        let poll = Uuid::new_v4();
        let response = PollResponse::from_rows(vec![row(poll, None, 0)]).expect("Expected a poll");
        assert_eq!(response.uuid, poll);
        assert!(response.answers.is_empty());
    }

    #[test]
    fn create_request_ignores_extra_fields() {
        let parsed: PollCreateRequest =
            serde_json::from_str(r#"{"text": "Lunch?", "answers": ["Tacos"], "client": "web"}"#)
                .expect("Extra fields should be ignored");
        assert_eq!(parsed.text, "Lunch?");
        assert_eq!(parsed.answers, vec!["Tacos".to_string()]);
    }

    #[test]
    fn create_request_requires_answers() {
        let parsed: Result<PollCreateRequest, _> = serde_json::from_str(r#"{"text": "Lunch?"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn summary_serializes_with_uuid_key() {
        let id = Uuid::new_v4();
        let summary = PollSummary::from(PollRow { id, text: "Lunch?".to_string() });
        let value = serde_json::to_value(&summary).expect("Failed to serialize");
        assert_eq!(value, serde_json::json!({"uuid": id.to_string(), "text": "Lunch?"}));
    }
}
