//! The visualizer tree: ordered tabs plus recursively nested window tiles
//!
//! A [`Visualizer`] models one on-screen window: a title, a visibility
//! flag, window behavior flags, an ordered list of owned [`Tab`]s (the
//! first, protected "telemetry" tab always exists), and an ordered map of
//! owned child visualizers ("tiles") that render as independent windows.
//!
//! Ownership is a strict tree: a visualizer exclusively owns its tabs and
//! tiles, and removal of a tile drops its whole subtree. There are no
//! back-pointers; everything is addressed by string id, and enumeration
//! preserves insertion order.

use crate::model::structure::StructureBuilder;
use crate::model::tab::Tab;
use crate::types::ScalarValue;
use serde::{Deserialize, Serialize};

/// Id of the protected default tab every visualizer starts with
pub const DEFAULT_TAB_ID: &str = "telemetry";

/// Window behavior flags consumed by the render backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFlags {
    /// Allow the user to resize the window
    pub resizable: bool,
    /// Allow the user to collapse the window to its title bar
    pub collapsible: bool,
    /// Scroll overflowing content instead of clipping it
    pub scrollable: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            resizable: true,
            collapsible: true,
            scrollable: true,
        }
    }
}

/// A named, owned child visualizer
#[derive(Debug, Clone)]
struct WindowTile {
    id: String,
    visualizer: Visualizer,
}

/// A window's worth of telemetry state
#[derive(Debug, Clone)]
pub struct Visualizer {
    title: String,
    visible: bool,
    flags: WindowFlags,
    tabs: Vec<Tab>,
    tiles: Vec<WindowTile>,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualizer {
    /// Create a visualizer with the default tab and default title
    pub fn new() -> Self {
        Self::with_title("Telemetry")
    }

    /// Create a visualizer with the given window title
    pub fn with_title(title: impl Into<String>) -> Self {
        let mut vis = Self {
            title: title.into(),
            visible: true,
            flags: WindowFlags::default(),
            tabs: Vec::new(),
            tiles: Vec::new(),
        };
        vis.ensure_tab(DEFAULT_TAB_ID);
        vis
    }

    /// Window title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the window title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Whether the window is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the window
    ///
    /// The render backend writes `false` back here when the user closes
    /// the window. This is the one UI-to-core feedback channel.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Window behavior flags
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Replace the window behavior flags
    pub fn set_flags(&mut self, flags: WindowFlags) {
        self.flags = flags;
    }

    // ---- tabs ----

    /// Look up a tab by id
    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    /// Look up a tab by id, mutably
    pub fn tab_mut(&mut self, id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id() == id)
    }

    /// Get or create a tab by id
    pub fn ensure_tab(&mut self, id: &str) -> &mut Tab {
        self.ensure_tab_titled(id, "")
    }

    /// Get or create a tab by id; a non-empty title updates the display
    /// title of an existing tab without touching its contents
    pub fn ensure_tab_titled(&mut self, id: &str, title: &str) -> &mut Tab {
        if let Some(index) = self.tabs.iter().position(|t| t.id() == id) {
            let tab = &mut self.tabs[index];
            tab.set_title(title);
            return tab;
        }
        self.tabs.push(Tab::new(id, title));
        self.tabs.last_mut().unwrap()
    }

    /// The protected default tab
    pub fn default_tab(&mut self) -> &mut Tab {
        self.ensure_tab(DEFAULT_TAB_ID)
    }

    /// Remove a tab and everything in it
    ///
    /// Returns false (and does nothing) for the default tab and for
    /// unknown ids.
    pub fn remove_tab(&mut self, id: &str) -> bool {
        if id == DEFAULT_TAB_ID {
            return false;
        }
        match self.tabs.iter().position(|t| t.id() == id) {
            Some(index) => {
                self.tabs.remove(index);
                true
            }
            None => false,
        }
    }

    /// Tab ids in insertion order
    pub fn tab_ids(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.id().to_string()).collect()
    }

    /// Iterate tabs in insertion order
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    /// Number of tabs
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    // ---- tiles ----

    /// Look up a child visualizer by tile id
    pub fn tile(&self, id: &str) -> Option<&Visualizer> {
        self.tiles
            .iter()
            .find(|t| t.id == id)
            .map(|t| &t.visualizer)
    }

    /// Look up a child visualizer by tile id, mutably
    pub fn tile_mut(&mut self, id: &str) -> Option<&mut Visualizer> {
        self.tiles
            .iter_mut()
            .find(|t| t.id == id)
            .map(|t| &mut t.visualizer)
    }

    /// Get or create a child visualizer by tile id
    pub fn ensure_tile(&mut self, id: &str) -> &mut Visualizer {
        self.ensure_tile_titled(id, "")
    }

    /// Get or create a child visualizer; a non-empty title retitles an
    /// existing tile without touching its contents
    pub fn ensure_tile_titled(&mut self, id: &str, title: &str) -> &mut Visualizer {
        if let Some(index) = self.tiles.iter().position(|t| t.id == id) {
            let tile = &mut self.tiles[index].visualizer;
            if !title.is_empty() && tile.title() != title {
                tile.set_title(title);
            }
            return tile;
        }
        let title = if title.is_empty() { id } else { title };
        self.tiles.push(WindowTile {
            id: id.to_string(),
            visualizer: Visualizer::with_title(title),
        });
        &mut self.tiles.last_mut().unwrap().visualizer
    }

    /// Remove a tile and its entire subtree
    pub fn remove_tile(&mut self, id: &str) -> bool {
        match self.tiles.iter().position(|t| t.id == id) {
            Some(index) => {
                self.tiles.remove(index);
                true
            }
            None => false,
        }
    }

    /// Tile ids in insertion order
    pub fn tile_ids(&self) -> Vec<String> {
        self.tiles.iter().map(|t| t.id.clone()).collect()
    }

    /// Iterate tiles in insertion order
    pub fn tiles(&self) -> impl Iterator<Item = (&str, &Visualizer)> {
        self.tiles.iter().map(|t| (t.id.as_str(), &t.visualizer))
    }

    /// Iterate tiles mutably, for render traversal and visibility writeback
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = (&str, &mut Visualizer)> {
        self.tiles
            .iter_mut()
            .map(|t| (t.id.as_str(), &mut t.visualizer))
    }

    // ---- default-tab conveniences ----

    /// Set a scalar on the default tab
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) {
        self.default_tab().set_value(key, value);
    }

    /// Read a scalar from the default tab
    pub fn scalar(&self, key: &str) -> Option<&ScalarValue> {
        self.tab(DEFAULT_TAB_ID)?.scalar(key)
    }

    /// Push a graph sample on the default tab
    pub fn push_sample(&mut self, key: impl Into<String>, sample: f32) {
        self.default_tab().push_sample(key, sample);
    }

    /// Rebuild a structure on the default tab
    pub fn update_structure(
        &mut self,
        key: impl Into<String>,
        build: impl FnOnce(&mut StructureBuilder<'_>),
    ) {
        self.default_tab().update_structure(key, build);
    }

    /// Recursively empty every tab in this visualizer and all nested
    /// tiles, keeping all tab and tile identities intact
    pub fn clear(&mut self) {
        for tab in &mut self.tabs {
            tab.clear();
        }
        for tile in &mut self.tiles {
            tile.visualizer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tab_exists() {
        let vis = Visualizer::new();
        assert_eq!(vis.tab_ids(), vec![DEFAULT_TAB_ID.to_string()]);
    }

    #[test]
    fn test_ensure_tab_is_get_or_create() {
        let mut vis = Visualizer::new();
        vis.ensure_tab("metrics").set_value("score", 42);

        // Repeat access with a title retitles without erasing contents.
        let tab = vis.ensure_tab_titled("metrics", "Run metrics");
        assert_eq!(tab.title(), "Run metrics");
        assert_eq!(tab.scalar("score"), Some(&ScalarValue::Int(42)));
        assert_eq!(vis.tab_count(), 2);
    }

    #[test]
    fn test_default_tab_is_protected() {
        let mut vis = Visualizer::new();
        assert!(!vis.remove_tab(DEFAULT_TAB_ID));
        assert!(vis.tab_ids().contains(&DEFAULT_TAB_ID.to_string()));
    }

    #[test]
    fn test_remove_tab() {
        let mut vis = Visualizer::new();
        vis.ensure_tab("metrics");
        assert!(vis.remove_tab("metrics"));
        assert!(!vis.remove_tab("metrics"));
        assert_eq!(vis.tab_ids(), vec![DEFAULT_TAB_ID.to_string()]);
    }

    #[test]
    fn test_tab_order_is_insertion_order() {
        let mut vis = Visualizer::new();
        vis.ensure_tab("zeta");
        vis.ensure_tab("alpha");
        assert_eq!(vis.tab_ids(), vec!["telemetry", "zeta", "alpha"]);
    }

    #[test]
    fn test_tile_lifecycle() {
        let mut vis = Visualizer::new();
        let tile = vis.ensure_tile_titled("ai", "AI Debug");
        tile.ensure_tab("state").set_value("state", "searching");

        assert_eq!(vis.tile_ids(), vec!["ai".to_string()]);
        assert_eq!(vis.tile("ai").unwrap().title(), "AI Debug");

        assert!(vis.remove_tile("ai"));
        assert!(vis.tile_ids().is_empty());
        assert!(vis.tile("ai").is_none());
    }

    #[test]
    fn test_tile_retitle_keeps_contents() {
        let mut vis = Visualizer::new();
        vis.ensure_tile("ai").set_value("threat", 0.5);

        let tile = vis.ensure_tile_titled("ai", "AI Debug");
        assert_eq!(tile.title(), "AI Debug");
        assert_eq!(tile.scalar("threat"), Some(&ScalarValue::Float(0.5)));

        // Empty titles never overwrite.
        let tile = vis.ensure_tile_titled("ai", "");
        assert_eq!(tile.title(), "AI Debug");
    }

    #[test]
    fn test_clear_recurses_without_removing_identity() {
        let mut vis = Visualizer::new();
        vis.set_value("score", 42);
        vis.ensure_tab("metrics").push_sample("fps", 60.0);
        vis.ensure_tile("ai").set_value("threat", 0.5);

        vis.clear();

        assert_eq!(vis.tab_ids(), vec!["telemetry", "metrics"]);
        assert_eq!(vis.tile_ids(), vec!["ai".to_string()]);
        assert!(vis.scalar("score").is_none());
        assert!(vis.tab("metrics").unwrap().graph("fps").is_none());
        assert!(vis.tile("ai").unwrap().scalar("threat").is_none());
    }

    #[test]
    fn test_removing_tile_drops_subtree() {
        let mut vis = Visualizer::new();
        let ai = vis.ensure_tile("ai");
        ai.ensure_tile("pathfinding").set_value("nodes", 128);
        assert_eq!(vis.tile("ai").unwrap().tile_ids(), vec!["pathfinding"]);

        assert!(vis.remove_tile("ai"));
        assert!(vis.tile_ids().is_empty());
    }
}
