use serde::Deserialize;

/// Form posted from the question page. `option_id` is absent when no radio was picked.
#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    pub question_id: i64,
    pub option_id: Option<i64>,
}
