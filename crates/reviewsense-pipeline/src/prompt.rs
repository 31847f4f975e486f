//! Prompt construction

use reviewsense_core::SentimentLabel;

/// Instruction asking the generator why a review carries `label`.
///
/// The wording is fixed so generations stay comparable across versions. The
/// review is embedded verbatim between double quotes, without truncation.
pub fn build_prompt(label: SentimentLabel, review: &str) -> String {
    format!(
        "In one short sentence, explain why the following smartwatch review is {label}: \"{review}\""
    )
}
