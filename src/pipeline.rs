use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::Result;
use crate::ir::{LanguageStatsInput, User};
use crate::layout::{Layout, Tiler, build_hierarchy, compute_layout};
use crate::render::render_svg;
use crate::stats::{LanguageTotals, RecencyFilter, RepositoryFilter, SizeMapper, aggregate, select};

/// Aggregated totals together with the positioned tiles drawn from them.
#[derive(Debug, Clone)]
pub struct TreemapOutput {
    pub totals: LanguageTotals,
    pub layout: Layout,
}

/// Configured pipeline from repository data to a treemap.
///
/// Filter, size mapper and tiler default to what `config` describes and can
/// each be replaced by any implementation of the matching trait, closures
/// included. The tiler is kept between calls, so a `resquarify` tiler reuses
/// its row structure when the same instance lays out updated data.
pub struct Treemap<'a> {
    config: Config,
    filter: Box<dyn RepositoryFilter + 'a>,
    size_mapper: Box<dyn SizeMapper + 'a>,
    tiler: Box<dyn Tiler + 'a>,
}

impl<'a> Treemap<'a> {
    /// `now` anchors the recency window of the default filter.
    pub fn new(config: Config, now: DateTime<Utc>) -> Self {
        let filter = RecencyFilter::from_config(now, &config.stats);
        let size_mapper = config.stats.size_scale;
        let tiler = config.layout.tile.tiler(config.layout.ratio);
        Self {
            config,
            filter: Box::new(filter),
            size_mapper: Box::new(size_mapper),
            tiler,
        }
    }

    pub fn with_filter(mut self, filter: impl RepositoryFilter + 'a) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_size_mapper(mut self, mapper: impl SizeMapper + 'a) -> Self {
        self.size_mapper = Box::new(mapper);
        self
    }

    pub fn with_tiler(mut self, tiler: impl Tiler + 'a) -> Self {
        self.tiler = Box::new(tiler);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn compute(&mut self, user: &User) -> TreemapOutput {
        let stats = &self.config.stats;
        let totals = aggregate(
            &user.repositories.nodes,
            self.filter.as_ref(),
            &stats.omitted_languages,
        );
        let items = select(&totals, stats.max_items, self.size_mapper.as_ref());
        let root = build_hierarchy(&items);
        let layout = compute_layout(root, &self.config.layout, self.tiler.as_mut());
        TreemapOutput { totals, layout }
    }

    pub fn render(&mut self, user: &User) -> Result<String> {
        let output = self.compute(user);
        render_svg(
            &output.layout,
            &output.totals,
            &self.config.theme,
            &self.config.render,
        )
    }
}

/// Renders `user` with the default strategies for `config`.
pub fn render_language_stats(user: &User, config: &Config, now: DateTime<Utc>) -> Result<String> {
    Treemap::new(config.clone(), now).render(user)
}

/// Same as [`render_language_stats`] but starting from a GraphQL response body.
pub fn render_language_stats_json(
    json: &str,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<String> {
    let input: LanguageStatsInput = serde_json::from_str(json)?;
    render_language_stats(&input.into_user(), config, now)
}
