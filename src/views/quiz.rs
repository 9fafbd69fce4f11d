use maud::{html, Markup};

use super::page;
use crate::models::question::{QuestionOption, QuestionWithOptions};

pub struct QuestionData {
    pub question: QuestionWithOptions,
    pub number: usize,
    pub total: usize,
}

pub struct FeedbackData {
    pub question: QuestionWithOptions,
    pub selected_option_id: i64,
    pub number: usize,
    pub total: usize,
    pub score: usize,
    pub finished: bool,
}

pub struct ResultRow {
    pub question: QuestionWithOptions,
    pub selected: Option<QuestionOption>,
}

pub struct ResultsData {
    pub score: usize,
    pub total: usize,
    pub rows: Vec<ResultRow>,
    pub has_wrong_answers: bool,
}

pub fn no_questions() -> Markup {
    page(
        "No questions",
        html! {
            h1 { "No questions available" }
            p {
                "The question store is empty. Generate a batch first, for example "
                code { "mcq-quiz generate notes.pdf -n 10" }
                ", then reload this page."
            }
        },
    )
}

pub fn question(data: QuestionData) -> Markup {
    page(
        &format!("Question {}", data.number),
        html! {
            article {
                p.progress { "Question " strong { (data.number) } " of " (data.total) }
                h2 { (data.question.text) }
                form method="post" action="/answer" {
                    input type="hidden" name="question_id" value=(data.question.question_id);
                    ul.options {
                        @for option in &data.question.options {
                            li {
                                label {
                                    input type="radio" name="option_id" value=(option.option_id) required;
                                    " " (option.text)
                                }
                            }
                        }
                    }
                    button type="submit" { "Submit answer" }
                }
            }
        },
    )
}

pub fn feedback(data: FeedbackData) -> Markup {
    let correct = data.question.correct_option();
    let answered_correctly = correct.is_some_and(|c| c.option_id == data.selected_option_id);

    page(
        &format!("Question {}", data.number),
        html! {
            article {
                p.progress {
                    "Question " strong { (data.number) } " of " (data.total)
                    " \u{2022} Score " (data.score)
                }
                h2 { (data.question.text) }
                @if answered_correctly {
                    p.verdict-correct { "Correct!" }
                } @else {
                    p.verdict-wrong { "Incorrect." }
                }
                ul.options {
                    @for option in &data.question.options {
                        @let class = if option.is_correct {
                            "correct"
                        } else if option.option_id == data.selected_option_id {
                            "wrong"
                        } else {
                            ""
                        };
                        li class=(class) {
                            (option.text)
                            @if option.option_id == data.selected_option_id { " \u{2190} your answer" }
                        }
                    }
                }
                @if let Some(correct) = correct {
                    p { "Correct answer: " strong.correct-answer { (correct.text) } }
                }
                p.actions {
                    @if data.finished {
                        a href="/results" { "See results" }
                    } @else {
                        a href="/question" { "Next question" }
                    }
                }
            }
        },
    )
}

pub fn results(data: ResultsData) -> Markup {
    page(
        "Results",
        html! {
            h1 { "Quiz complete" }
            p.final-score { "Your score: " strong { (data.score) " / " (data.total) } }
            @for (idx, row) in data.rows.iter().enumerate() {
                @let correct = row.question.correct_option();
                @let is_correct = matches!((&row.selected, correct), (Some(s), Some(c)) if s.option_id == c.option_id);
                article {
                    p.progress { "Question " (idx + 1) }
                    h3 { (row.question.text) }
                    p {
                        "Your answer: "
                        @match &row.selected {
                            Some(selected) => {
                                span class=(if is_correct { "correct" } else { "wrong" }) { (selected.text) }
                            }
                            None => { em { "not answered" } }
                        }
                    }
                    @if !is_correct {
                        @if let Some(correct) = correct {
                            p { "Correct answer: " span.correct { (correct.text) } }
                        }
                    }
                }
            }
            p.actions {
                a href="/restart" { "Start over" }
                @if data.has_wrong_answers {
                    a href="/retry-wrong" { "Retry wrong answers" }
                }
            }
        },
    )
}
