//! Binary logistic regression over dense feature rows
//!
//! L2-regularized (inverse strength `c`, intercept not penalized), fitted with
//! full-batch gradient descent until the gradient norm drops below `tol` or
//! `max_iter` is reached.

use reviewsense_core::{Error, Result, SentimentLabel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Coefficients, one per feature column
    pub weights: Vec<f64>,

    pub intercept: f64,

    /// Inverse regularization strength
    pub c: f64,

    pub max_iter: usize,

    pub learning_rate: f64,

    pub tol: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            weights: Vec::new(),
            intercept: 0.0,
            c: 1.0,
            max_iter: 200,
            learning_rate: 1.0,
            tol: 1e-4,
        }
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn is_fitted(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Fit on rows `x` with labels `y` (positive is class 1)
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[SentimentLabel]) -> Result<()> {
        if x.is_empty() {
            return Err(Error::classifier("cannot fit classifier on zero samples"));
        }
        if x.len() != y.len() {
            return Err(Error::classifier(format!(
                "sample/label count mismatch: {} rows, {} labels",
                x.len(),
                y.len()
            )));
        }
        if self.c <= 0.0 {
            return Err(Error::classifier("regularization strength must be positive"));
        }

        let dim = x[0].len();
        if x.iter().any(|row| row.len() != dim) {
            return Err(Error::classifier("feature rows have inconsistent width"));
        }

        let targets: Vec<f64> = y
            .iter()
            .map(|label| if label.is_positive() { 1.0 } else { 0.0 })
            .collect();

        let n = x.len() as f64;
        let penalty = 1.0 / (self.c * n);
        self.weights = vec![0.0; dim];
        self.intercept = 0.0;

        let mut iterations = 0;
        for _ in 0..self.max_iter {
            iterations += 1;
            let mut grad_w = vec![0.0; dim];
            let mut grad_b = 0.0;

            for (row, target) in x.iter().zip(&targets) {
                let err = sigmoid(self.raw_decision(row)) - target;
                for (g, v) in grad_w.iter_mut().zip(row) {
                    *g += err * v;
                }
                grad_b += err;
            }

            for (g, w) in grad_w.iter_mut().zip(&self.weights) {
                *g = *g / n + penalty * w;
            }
            grad_b /= n;

            let grad_norm =
                (grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b).sqrt();
            if grad_norm < self.tol {
                break;
            }

            for (w, g) in self.weights.iter_mut().zip(&grad_w) {
                *w -= self.learning_rate * g;
            }
            self.intercept -= self.learning_rate * grad_b;
        }

        tracing::debug!(iterations, features = dim, "Fitted logistic regression");
        Ok(())
    }

    fn raw_decision(&self, row: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(row)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept
    }

    /// Signed distance to the separating hyperplane
    pub fn decision_function(&self, row: &[f64]) -> Result<f64> {
        if !self.is_fitted() {
            return Err(Error::artifact("classifier is not fitted"));
        }
        if row.len() != self.weights.len() {
            return Err(Error::artifact(format!(
                "feature width {} does not match classifier width {}",
                row.len(),
                self.weights.len()
            )));
        }
        Ok(self.raw_decision(row))
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        Ok(sigmoid(self.decision_function(row)?))
    }

    pub fn predict(&self, row: &[f64]) -> Result<SentimentLabel> {
        Ok(if self.decision_function(row)? > 0.0 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        })
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separable_data() {
        let x = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
        ];
        let y = vec![
            SentimentLabel::Positive,
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Negative,
        ];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), SentimentLabel::Positive);
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), SentimentLabel::Negative);
        assert!(model.predict_proba(&[1.0, 0.0]).unwrap() > 0.5);
    }

    #[test]
    fn test_zero_decision_is_negative() {
        let model = LogisticRegression {
            weights: vec![0.0, 0.0],
            ..Default::default()
        };
        assert_eq!(model.predict(&[0.3, 0.7]).unwrap(), SentimentLabel::Negative);
    }

    #[test]
    fn test_rejects_mismatched_inputs() {
        let mut model = LogisticRegression::new();
        assert!(model.fit(&[], &[]).is_err());
        assert!(model
            .fit(&[vec![1.0]], &[SentimentLabel::Positive, SentimentLabel::Negative])
            .is_err());

        model
            .fit(&[vec![1.0, 0.0], vec![0.0, 1.0]], &[SentimentLabel::Positive, SentimentLabel::Negative])
            .unwrap();
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_unfitted_predict_fails() {
        assert!(LogisticRegression::new().predict(&[1.0]).is_err());
    }
}
