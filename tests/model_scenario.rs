//! End-to-end scenario over the data model
//!
//! Walks one visualizer tree through the full update surface the way an
//! instrumented game would: scalars, a bounded fps graph, a nested player
//! structure, and a removable "ai" tile. Runs entirely on this thread;
//! the model itself is single-threaded by contract.

use televis_rs::{GraphConfig, ScalarValue, Visualizer};

#[test]
fn full_visualizer_scenario() {
    let mut visualizer = Visualizer::new();

    // Scalars on a named tab.
    let metrics = visualizer.ensure_tab("metrics");
    metrics.set_value("score", 42);
    metrics.set_value("accuracy", 0.95);
    metrics.set_value("alive", true);

    assert_eq!(metrics.scalar("score"), Some(&ScalarValue::Int(42)));
    assert_eq!(metrics.scalar("accuracy"), Some(&ScalarValue::Float(0.95)));

    // A bounded graph: five pushes, four survive.
    metrics.push_sample_with(
        "fps",
        60.0,
        GraphConfig {
            max_samples: 4,
            ..Default::default()
        },
    );
    for sample in [58.0, 59.0, 61.0, 62.0] {
        metrics.push_sample("fps", sample);
    }

    let fps = metrics.graph("fps").unwrap();
    let stored: Vec<f32> = fps.samples().iter().copied().collect();
    assert_eq!(stored, vec![58.0, 59.0, 61.0, 62.0]);
    assert_eq!(fps.latest(), 62.0);

    // A structure with flat fields and one nested group.
    metrics.update_structure("player", |b| {
        b.field("health", 97);
        b.field("mana", 44);
        let mut position = b.nested("position");
        position.field("x", 1.0f32);
        position.field("y", 2.0f32);
        position.field("z", 3.0f32);
    });

    let player = metrics.structure("player").unwrap();
    assert_eq!(player.children.len(), 3);
    assert!(player.children[2].is_group());

    // A tile with its own tab, then tear it down.
    let ai = visualizer.ensure_tile_titled("ai", "AI Debug");
    let state = ai.ensure_tab("state");
    state.set_value("state", "searching");
    state.push_sample("threat", 0.5);

    assert_eq!(
        visualizer
            .tile("ai")
            .and_then(|tile| tile.tab("state"))
            .and_then(|tab| tab.scalar("state")),
        Some(&ScalarValue::Text("searching".to_string()))
    );
    assert_eq!(visualizer.tile_ids(), vec!["ai".to_string()]);

    assert!(visualizer.remove_tile("ai"));
    assert!(visualizer.tile_ids().is_empty());
}

#[test]
fn default_tab_survives_everything() {
    let mut visualizer = Visualizer::new();
    assert!(!visualizer.remove_tab(televis_rs::DEFAULT_TAB_ID));

    visualizer.set_value("score", 42);
    visualizer.clear();
    assert!(visualizer.scalar("score").is_none());
    assert!(visualizer
        .tab_ids()
        .contains(&televis_rs::DEFAULT_TAB_ID.to_string()));
}

#[test]
fn repeated_tab_access_with_title_keeps_contents() {
    let mut visualizer = Visualizer::new();
    visualizer.ensure_tab("metrics").set_value("score", 42);
    visualizer
        .ensure_tab("metrics")
        .push_sample("fps", 60.0);

    let tab = visualizer.ensure_tab_titled("metrics", "Run metrics");
    assert_eq!(tab.title(), "Run metrics");
    assert_eq!(tab.scalar("score"), Some(&ScalarValue::Int(42)));
    assert!(tab.graph("fps").is_some());
}

#[test]
fn empty_structure_rebuild_hides_prior_content() {
    let mut visualizer = Visualizer::new();
    let tab = visualizer.ensure_tab("metrics");

    tab.update_structure("player", |b| {
        b.field("health", 97);
    });
    assert!(tab.structure("player").is_some());

    tab.update_structure("player", |_| {});
    assert!(tab.structure("player").is_none());
}
