//! Tabs: named groupings of scalars, graphs, and structures
//!
//! A [`Tab`] owns three keyed maps: scalar values, graph series, and
//! structure entries. Everything is created lazily on first write and
//! looked up with explicit `Option` results; unknown keys are never a
//! fault. Maps are ordered so a tab renders its rows in a stable,
//! deterministic order regardless of write order.

use crate::model::graph::{GraphConfig, GraphSeries};
use crate::model::structure::{StructureBuilder, StructureEntry, StructureNode};
use crate::types::ScalarValue;
use std::collections::BTreeMap;

/// One named tab inside a visualizer
#[derive(Debug, Clone, Default)]
pub struct Tab {
    id: String,
    title: String,
    scalars: BTreeMap<String, ScalarValue>,
    graphs: BTreeMap<String, GraphSeries>,
    structures: BTreeMap<String, StructureEntry>,
}

impl Tab {
    /// Create an empty tab; an empty title defaults to the id
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let title = title.into();
        let title = if title.is_empty() { id.clone() } else { title };
        Self {
            id,
            title,
            ..Default::default()
        }
    }

    /// Tab identifier, unique within its owning visualizer
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Update the display title; empty titles are ignored
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if !title.is_empty() {
            self.title = title;
        }
    }

    // ---- scalars ----

    /// Set a named scalar value (last write wins)
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> &mut Self {
        self.scalars.insert(key.into(), value.into());
        self
    }

    /// Look up a scalar by key
    pub fn scalar(&self, key: &str) -> Option<&ScalarValue> {
        self.scalars.get(key)
    }

    /// Iterate scalars in key order
    pub fn scalars(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.scalars.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ---- graphs ----

    /// Get or create a graph series with the default configuration
    pub fn graph_mut(&mut self, key: impl Into<String>) -> &mut GraphSeries {
        self.graphs.entry(key.into()).or_default()
    }

    /// Get or create a graph series, applying `config`
    ///
    /// An existing series is reconfigured (and re-trimmed) only when the
    /// given config actually differs from its current one.
    pub fn ensure_graph(&mut self, key: impl Into<String>, config: GraphConfig) -> &mut GraphSeries {
        let series = self
            .graphs
            .entry(key.into())
            .or_insert_with(|| GraphSeries::with_config(config));
        if *series.config() != config {
            series.configure(config);
        }
        series
    }

    /// Push one sample onto a series, creating it on first use
    pub fn push_sample(&mut self, key: impl Into<String>, sample: f32) -> &mut Self {
        self.graph_mut(key).push(sample);
        self
    }

    /// Push one sample, (re)configuring the series first
    pub fn push_sample_with(
        &mut self,
        key: impl Into<String>,
        sample: f32,
        config: GraphConfig,
    ) -> &mut Self {
        self.ensure_graph(key, config).push(sample);
        self
    }

    /// Append samples in order, creating the series on first use
    pub fn extend_samples(
        &mut self,
        key: impl Into<String>,
        samples: impl IntoIterator<Item = f32>,
    ) -> &mut Self {
        self.graph_mut(key).extend(samples);
        self
    }

    /// Append samples in order, (re)configuring the series first
    pub fn extend_samples_with(
        &mut self,
        key: impl Into<String>,
        samples: impl IntoIterator<Item = f32>,
        config: GraphConfig,
    ) -> &mut Self {
        self.ensure_graph(key, config).extend(samples);
        self
    }

    /// Look up a graph series by key
    pub fn graph(&self, key: &str) -> Option<&GraphSeries> {
        self.graphs.get(key)
    }

    /// Iterate graph series in key order
    pub fn graphs(&self) -> impl Iterator<Item = (&str, &GraphSeries)> {
        self.graphs.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ---- structures ----

    /// Rebuild a named structure from scratch via a builder callback
    ///
    /// The entry is created on first use; its prior content is always
    /// discarded before the callback runs. A callback that writes nothing
    /// leaves the entry without content, invisible to readers.
    pub fn update_structure(
        &mut self,
        key: impl Into<String>,
        build: impl FnOnce(&mut StructureBuilder<'_>),
    ) -> &mut Self {
        let key = key.into();
        self.structures
            .entry(key.clone())
            .or_insert_with(|| StructureEntry::new(key))
            .rebuild(build);
        self
    }

    /// Look up a structure root by key
    ///
    /// Returns `None` both for unknown keys and for entries whose last
    /// rebuild produced no children.
    pub fn structure(&self, key: &str) -> Option<&StructureNode> {
        self.structures
            .get(key)
            .filter(|e| e.has_content)
            .map(|e| &e.root)
    }

    /// Iterate structure entries in key order (content-less ones included)
    pub fn structures(&self) -> impl Iterator<Item = (&str, &StructureEntry)> {
        self.structures.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Empty all scalars, graphs, and structures; the tab itself survives
    pub fn clear(&mut self) {
        self.scalars.clear();
        self.graphs.clear();
        self.structures.clear();
    }
}
