use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::category::Category;
use super::interval::Interval;
use super::record::ClassifiedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistic {
    pub count: u64,
    pub total: f64,
}

impl Statistic {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
    }

    pub fn merge(&mut self, other: Statistic) {
        self.count += other.count;
        self.total += other.total;
    }
}

/// Per-category statistics, keyed by category name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categorisation(HashMap<String, Statistic>);

impl Categorisation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts `value` towards `category`, starting from an empty statistic
    /// the first time the category is seen.
    pub fn record(&mut self, category: &str, value: f64) {
        self.0.entry(category.to_string()).or_default().add(value);
    }

    pub fn merge(&mut self, other: Categorisation) {
        for (category, stat) in other.0 {
            self.0.entry(category).or_default().merge(stat);
        }
    }

    pub fn get(&self, category: &str) -> Option<&Statistic> {
        self.0.get(category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Statistic)> {
        self.0.iter().map(|(name, stat)| (name.as_str(), stat))
    }

    pub fn grand_total(&self) -> f64 {
        self.0.values().map(|s| s.total).sum()
    }
}

/// Sums count and value per category over the records dated inside `interval`.
/// No filtering on the sign of the value happens here.
pub fn aggregate<'a, I>(records: I, interval: Interval) -> Categorisation
where
    I: IntoIterator<Item = &'a ClassifiedRecord>,
{
    let mut result = Categorisation::new();
    for record in records.into_iter().filter(|r| interval.contains(r.date())) {
        result.record(record.category_name(), record.value());
    }
    result
}

/// One configured category with its statistics, ready for a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub color: String,
    pub count: u64,
    pub total: f64,
    /// Fraction of the summed total of all slices (0.0–1.0).
    pub share: f64,
}

/// Statistics joined with the configured category list. Categories that have
/// statistics but no configuration entry end up in `unconfigured` and stay in
/// the raw [`Categorisation`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Breakdown {
    pub slices: Vec<CategorySlice>,
    pub unconfigured: Vec<String>,
}

impl Breakdown {
    /// Slices follow configuration order; categories without records are left out.
    pub fn build(stats: &Categorisation, categories: &[Category]) -> Self {
        let mut slices: Vec<CategorySlice> = categories
            .iter()
            .filter_map(|c| {
                stats.get(&c.name).map(|s| CategorySlice {
                    name: c.name.clone(),
                    color: c.color.clone(),
                    count: s.count,
                    total: s.total,
                    share: 0.0,
                })
            })
            .collect();

        let sum: f64 = slices.iter().map(|s| s.total).sum();
        if sum != 0.0 {
            for slice in &mut slices {
                slice.share = slice.total / sum;
            }
        }

        let mut unconfigured: Vec<String> = stats
            .iter()
            .map(|(name, _)| name)
            .filter(|name| !categories.iter().any(|c| c.name == *name))
            .map(str::to_string)
            .collect();
        unconfigured.sort();

        Breakdown { slices, unconfigured }
    }
}
