//! HTML page for the web demo
//!
//! One template, `index.html`, rendered by minijinja with HTML autoescaping,
//! so review text and generated explanations are always escaped.

use axum::response::Html;
use minijinja::{context, Environment};
use reviewsense_core::{Error, InferenceResult, Result, SentimentLabel};
use serde::Serialize;
use std::sync::OnceLock;

const INDEX: &str = "index.html";

static PAGES: OnceLock<Environment<'static>> = OnceLock::new();

fn pages() -> &'static Environment<'static> {
    PAGES.get_or_init(|| {
        let mut env = Environment::new();
        if let Err(e) = env.add_template(INDEX, include_str!("../../templates/index.html")) {
            tracing::error!("Failed to parse page template: {}", e);
        }
        env
    })
}

#[derive(Debug, Serialize)]
struct LabelView {
    text: String,
    class: &'static str,
}

impl From<SentimentLabel> for LabelView {
    fn from(label: SentimentLabel) -> Self {
        Self {
            text: label.to_string(),
            class: if label.is_positive() { "pos" } else { "neg" },
        }
    }
}

/// Form prefilled with `review`, plus the result card when there is one
pub fn render(review: &str, result: Option<&InferenceResult>) -> Result<Html<String>> {
    let ctx = match result {
        Some(result) => context! {
            review,
            ml_pred => LabelView::from(result.lexical_label),
            dl_pred => LabelView::from(result.contextual_label),
            ai_expl => result.explanation,
        },
        None => context! { review },
    };
    render_index(ctx)
}

/// Form plus an error card
pub fn render_error(message: &str) -> Html<String> {
    render_index(context! { review => "", error => message }).unwrap_or_else(|e| {
        tracing::error!("Failed to render error page: {}", e);
        Html("<h1>Analysis failed</h1>".to_string())
    })
}

fn render_index(ctx: minijinja::Value) -> Result<Html<String>> {
    pages()
        .get_template(INDEX)
        .and_then(|template| template.render(ctx))
        .map(Html)
        .map_err(|e| Error::internal(format!("Failed to render page: {e}")))
}
