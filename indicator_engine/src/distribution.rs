//! Probability histogram of daily returns.

use serde::Serialize;

/// Bin count used for the return distribution card.
pub const DEFAULT_BINS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// `count / total`.
    pub probability: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReturnDistribution {
    pub bins: Vec<HistogramBin>,
    /// Number of values binned.
    pub total: usize,
}

impl ReturnDistribution {
    /// Equal-width histogram over `[min, max]` of the finite `values`.
    ///
    /// The last bin is closed on the right so the maximum is counted. When
    /// all values are equal there is a single bin holding all of them; with
    /// no values (or `bins == 0`) the distribution is empty.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let (Some(min), Some(max)) = (
            finite.iter().copied().reduce(f64::min),
            finite.iter().copied().reduce(f64::max),
        ) else {
            return Self::default();
        };
        if bins == 0 {
            return Self::default();
        }

        let total = finite.len();
        if max == min {
            return Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: total,
                    probability: 1.0,
                }],
                total,
            };
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in &finite {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + width * i as f64,
                upper: min + width * (i + 1) as f64,
                count,
                probability: count as f64 / total as f64,
            })
            .collect();

        Self { bins, total }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// The most populated bin; the lowest one wins ties.
    pub fn mode_bin(&self) -> Option<&HistogramBin> {
        self.bins
            .iter()
            .reduce(|best, b| if b.count > best.count { b } else { best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_sum_to_one() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64 / 1000.0 - 0.05).collect();
        let d = ReturnDistribution::from_values(&values, DEFAULT_BINS);
        assert_eq!(d.bins.len(), DEFAULT_BINS);
        assert_eq!(d.total, 200);
        let sum: f64 = d.bins.iter().map(|b| b.probability).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(d.bins.iter().map(|b| b.count).sum::<usize>(), 200);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let d = ReturnDistribution::from_values(&[0.0, 0.5, 1.0], 2);
        assert_eq!(d.bins[0].count, 1);
        assert_eq!(d.bins[1].count, 2);
        assert_eq!(d.bins[1].upper, 1.0);
    }

    #[test]
    fn identical_values_make_one_bin() {
        let d = ReturnDistribution::from_values(&[0.0; 10], DEFAULT_BINS);
        assert_eq!(d.bins.len(), 1);
        assert_eq!(d.bins[0].probability, 1.0);
    }

    #[test]
    fn empty_and_non_finite_inputs() {
        assert!(ReturnDistribution::from_values(&[], 10).is_empty());
        assert!(ReturnDistribution::from_values(&[f64::NAN], 10).is_empty());
        assert!(ReturnDistribution::from_values(&[1.0, 2.0], 0).is_empty());
        let d = ReturnDistribution::from_values(&[1.0, f64::INFINITY, 2.0], 4);
        assert_eq!(d.total, 2);
    }

    #[test]
    fn mode_bin_prefers_lowest_on_tie() {
        let d = ReturnDistribution::from_values(&[0.0, 0.1, 1.0, 1.0], 2);
        assert_eq!(d.mode_bin().unwrap().count, 2);
        assert_eq!(d.mode_bin().unwrap().lower, 0.0);
    }
}
