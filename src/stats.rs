use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::ir::{LanguageTotal, RenderItem, Repository, Visibility};

pub const DEFAULT_RECENCY_DAYS: i64 = 365 * 2;
pub const DEFAULT_SIZE_EXPONENT: f64 = 0.6;
pub const DEFAULT_MAX_ITEMS: usize = 12;

/// Per-language totals in first-seen order.
pub type LanguageTotals = IndexMap<String, LanguageTotal>;

/// Decides whether a repository contributes to the statistics.
pub trait RepositoryFilter {
    fn accept(&self, repo: &Repository) -> bool;
}

impl<F> RepositoryFilter for F
where
    F: Fn(&Repository) -> bool,
{
    fn accept(&self, repo: &Repository) -> bool {
        self(repo)
    }
}

/// Rejects templates, archived repositories and anything not updated within
/// `window_days` of `now`.
#[derive(Debug, Clone)]
pub struct RecencyFilter {
    pub now: DateTime<Utc>,
    pub window_days: i64,
    pub include_private: bool,
}

impl RecencyFilter {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            window_days: DEFAULT_RECENCY_DAYS,
            include_private: true,
        }
    }

    pub fn from_config(now: DateTime<Utc>, config: &StatsConfig) -> Self {
        Self {
            now,
            window_days: config.recency_days,
            include_private: config.include_private,
        }
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        let window = TimeDelta::try_days(self.window_days.max(0))?;
        self.now.checked_sub_signed(window)
    }
}

impl RepositoryFilter for RecencyFilter {
    fn accept(&self, repo: &Repository) -> bool {
        if repo.is_template || repo.archived_at.is_some() {
            return false;
        }
        if !self.include_private && repo.visibility == Visibility::Private {
            return false;
        }
        match self.cutoff() {
            Some(cutoff) => repo.updated_at >= cutoff,
            None => true,
        }
    }
}

/// Monotonic rescaling applied to raw byte totals before layout.
pub trait SizeMapper {
    fn map(&self, size: f64) -> f64;
}

impl<F> SizeMapper for F
where
    F: Fn(f64) -> f64,
{
    fn map(&self, size: f64) -> f64 {
        self(size)
    }
}

/// Built-in size mappers selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SizeScale {
    Power { exponent: f64 },
    Linear,
    /// `ln(1 + size)`
    Log,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self::Power {
            exponent: DEFAULT_SIZE_EXPONENT,
        }
    }
}

impl SizeMapper for SizeScale {
    fn map(&self, size: f64) -> f64 {
        if !(size > 0.0) {
            return 0.0;
        }
        match *self {
            Self::Power { exponent } if exponent > 0.0 && exponent.is_finite() => {
                size.powf(exponent)
            }
            Self::Power { exponent } => {
                tracing::warn!(exponent, "non-positive size exponent, using default");
                size.powf(DEFAULT_SIZE_EXPONENT)
            }
            Self::Linear => size,
            Self::Log => size.ln_1p(),
        }
    }
}

/// Folds the samples of every accepted repository into per-language totals.
///
/// The first color seen for a name wins. Names listed in `omitted` are removed
/// after folding, together with their accumulated size.
pub fn aggregate<'a, I>(
    repositories: I,
    filter: &dyn RepositoryFilter,
    omitted: &[String],
) -> LanguageTotals
where
    I: IntoIterator<Item = &'a Repository>,
{
    let mut totals = LanguageTotals::new();
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for repo in repositories {
        if !filter.accept(repo) {
            rejected += 1;
            continue;
        }
        accepted += 1;
        for sample in repo.samples() {
            let entry = totals
                .entry(sample.name.to_string())
                .or_insert_with(|| LanguageTotal {
                    size: 0,
                    color: sample.color.map(str::to_string),
                });
            entry.size = entry.size.saturating_add(sample.size);
        }
    }

    let before = totals.len();
    totals.retain(|name, _| !omitted.iter().any(|omit| omit == name));
    tracing::debug!(
        accepted,
        rejected,
        languages = totals.len(),
        omitted = before - totals.len(),
        "aggregated language totals"
    );
    totals
}

/// Sum of every remaining total, not just the ones that will be displayed.
pub fn total_size(totals: &LanguageTotals) -> u64 {
    totals
        .values()
        .fold(0u64, |acc, total| acc.saturating_add(total.size))
}

/// Picks the `max_items` largest languages (stable on ties) and maps their
/// sizes to layout weights.
pub fn select(
    totals: &LanguageTotals,
    max_items: usize,
    mapper: &dyn SizeMapper,
) -> Vec<RenderItem> {
    let mut ranked: Vec<(&String, &LanguageTotal)> = totals.iter().collect();
    ranked.sort_by(|a, b| b.1.size.cmp(&a.1.size));

    let items: Vec<RenderItem> = ranked
        .into_iter()
        .take(max_items)
        .map(|(name, total)| {
            let weight = mapper.map(total.size as f64);
            RenderItem {
                name: name.clone(),
                size: if weight.is_finite() { weight.max(0.0) } else { 0.0 },
                color: total.color.clone(),
            }
        })
        .collect();
    tracing::debug!(selected = items.len(), max_items, "selected render items");
    items
}

/// Share of `size` in `total` as a percentage rounded to one decimal.
pub fn share_percent(size: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (size as f64 / total as f64 * 1000.0).round() / 10.0
}
