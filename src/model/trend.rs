use serde::Serialize;

/// A single point of a trailing trend window.
///
/// The history selector produces these — the (external) chart
/// renderer just draws them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Human-readable x-axis label, usually a `YYYY-MM-DD` date.
    pub label: String,
    /// The resolved numeric value for that snapshot.
    pub value: f64,
}

impl TrendPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}
