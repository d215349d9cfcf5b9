use ordered_float::OrderedFloat;

/// Min, max and mean over the numeric entries of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Numeric entries the statistics were computed from.
    pub count: usize,
}

impl SummaryStats {
    /// Returns `None` when the series has no numeric entry.
    pub fn from_values(values: &[Option<f64>]) -> Option<Self> {
        let numeric: Vec<OrderedFloat<f64>> =
            values.iter().flatten().copied().map(OrderedFloat).collect();

        let min = numeric.iter().min()?.into_inner();
        let max = numeric.iter().max()?.into_inner();
        let sum: f64 = numeric.iter().map(|v| v.into_inner()).sum();

        Some(SummaryStats {
            min,
            max,
            mean: sum / numeric.len() as f64,
            count: numeric.len(),
        })
    }
}
