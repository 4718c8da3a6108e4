//! An ordered, de-duplicated run of daily bars for one symbol.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::bar::DailyBar;

/// Daily bars sorted ascending by date with at most one bar per date.
///
/// The invariants are established once in [`PriceSeries::new`]; there is no
/// way to mutate the bars afterwards.
///
/// Serializes as the plain array of bars.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<DailyBar>,
}

impl PriceSeries {
    /// Builds a series from provider output in any order.
    ///
    /// Bars are sorted by date; when a date repeats, the first bar supplied
    /// for it is kept.
    pub fn new(mut bars: Vec<DailyBar>) -> Self {
        // stable sort keeps provider order among equal dates
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self { bars }
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&DailyBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Mean daily volume, `None` when empty.
    pub fn average_volume(&self) -> Option<f64> {
        let volumes = self.volumes();
        (!volumes.is_empty()).then(|| volumes.iter().sum::<f64>() / volumes.len() as f64)
    }

    /// Lowest `low` across the whole series, `None` when empty.
    pub fn min_low(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.low).reduce(f64::min)
    }

    /// Highest `high` across the whole series, `None` when empty.
    pub fn max_high(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.high).reduce(f64::max)
    }
}
