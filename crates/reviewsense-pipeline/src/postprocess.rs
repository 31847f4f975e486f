//! Generation post-processing
//!
//! Generative models given the prompt from [`build_prompt`](crate::build_prompt)
//! tend to echo it and continue after a colon, so the explanation is taken to
//! be whatever follows the last `:`. This is a best-effort heuristic, not a
//! parser: when the model emits no colon the whole text is kept, and when it
//! emits one in an unexpected place the result may still carry echoed prompt
//! text or be cut short. Neither case is an error.

/// Text after the last colon, trimmed; the whole text trimmed if there is none
pub fn extract_explanation(raw: &str) -> String {
    raw.rsplit_once(':')
        .map_or(raw, |(_, tail)| tail)
        .trim()
        .to_string()
}
