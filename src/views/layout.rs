use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }
header a { text-decoration: none; color: inherit; }
article { border: 1px solid #ddd; border-radius: 8px; padding: 1rem 1.5rem; margin: 1rem 0; }
.progress { color: #666; font-size: 0.9rem; }
.options { list-style: none; padding: 0; }
.options li { margin: 0.4rem 0; padding: 0.4rem 0.6rem; border-radius: 4px; }
.correct { background: #d4edda; }
.wrong { background: #f8d7da; }
.verdict-correct { color: #1e7e34; font-weight: 600; }
.verdict-wrong { color: #b21f2d; font-weight: 600; }
.actions a, button { display: inline-block; margin-right: 0.8rem; padding: 0.4rem 1rem; }
"#;

fn header() -> Markup {
    html! {
        header {
            a href="/" { strong { "MCQ Quiz" } }
        }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - MCQ Quiz" }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                (header())
                main { (body) }
            }
        }
    }
}

pub fn error_page(status: StatusCode, message: &str) -> Markup {
    page(
        "Error",
        html! {
            h1 { (status.canonical_reason().unwrap_or("Error")) }
            p { (message) }
            p { a href="/" { "Back to the quiz" } }
        },
    )
}
