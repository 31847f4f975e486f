//! Built-in smartwatch review dataset and evaluation helpers

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reviewsense_core::SentimentLabel;

/// A hand-labelled review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabeledReview {
    pub text: &'static str,
    pub label: SentimentLabel,
}

const fn review(text: &'static str, label: SentimentLabel) -> LabeledReview {
    LabeledReview { text, label }
}

/// The ten-review training corpus
pub fn smartwatch_reviews() -> Vec<LabeledReview> {
    use SentimentLabel::{Negative, Positive};

    vec![
        review("The smartwatch battery life is excellent and lasts two days.", Positive),
        review("The screen is bright and very responsive.", Positive),
        review("Love the design and smooth performance of this watch.", Positive),
        review("Notifications work perfectly and the app is easy to use.", Positive),
        review("The strap is uncomfortable and feels cheap.", Negative),
        review("Keeps disconnecting from my phone, very frustrating.", Negative),
        review("Step tracking is completely inaccurate and useless.", Negative),
        review("Charging is slow and the watch overheats sometimes.", Negative),
        review("Heart rate monitor seems reliable and accurate.", Positive),
        review("Touch response is laggy and the UI is confusing.", Negative),
    ]
}

/// Shuffle with a fixed seed and hold out `ceil(test_size * n)` samples.
///
/// Returns `(train, test)`. At least one sample stays in each split when the
/// input has two or more samples.
pub fn train_test_split<T: Clone>(
    data: &[T],
    test_size: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut shuffled = data.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let n = shuffled.len();
    let mut n_test = (test_size.clamp(0.0, 1.0) * n as f64).ceil() as usize;
    if n >= 2 {
        n_test = n_test.clamp(1, n - 1);
    }

    let test = shuffled.split_off(n - n_test.min(n));
    (shuffled, test)
}

/// Fraction of predictions matching the expected labels
pub fn accuracy(predicted: &[SentimentLabel], expected: &[SentimentLabel]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(expected)
        .filter(|(p, e)| p == e)
        .count();
    correct as f64 / expected.len() as f64
}
