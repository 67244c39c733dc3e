//! egui widget rendering for the visualizer tree
//!
//! Turns a [`Visualizer`] into egui windows: one window per visible
//! visualizer (the root and every nested tile), each with a tab strip,
//! scalar rows, one plot per graph series, and a collapsible tree per
//! structure entry with content. Platform backends built on any egui
//! integration call [`show`] once per frame between their `begin_frame`
//! and paint.
//!
//! The tree is taken mutably for exactly one reason: when the user closes
//! a window, the close is written back into the visualizer's visibility
//! flag.
//!
//! Widget ids are salted with the tile path so identically titled windows
//! and identically keyed plots in different tiles never collide. The
//! active tab index lives in egui temp memory, not in the data model.

use crate::model::{GraphSeries, StructureNode, Tab, Visualizer};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};

/// Plot height in points for each graph row
const GRAPH_HEIGHT: f32 = 80.0;

/// Draw every visible visualizer in the tree as an egui window
pub fn show(ctx: &egui::Context, root: &mut Visualizer) {
    show_window(ctx, root, "televis");
}

fn show_window(ctx: &egui::Context, vis: &mut Visualizer, path: &str) {
    if vis.is_visible() {
        let flags = vis.flags();
        let mut open = true;
        egui::Window::new(vis.title().to_string())
            .id(egui::Id::new(path))
            .open(&mut open)
            .resizable(flags.resizable)
            .collapsible(flags.collapsible)
            .vscroll(flags.scrollable)
            .show(ctx, |ui| show_tabs(ui, vis, path));
        if !open {
            vis.set_visible(false);
        }
    }

    // Tiles are independent windows; a hidden parent does not hide them.
    for (id, tile) in vis.tiles_mut() {
        let child_path = format!("{path}/{id}");
        show_window(ctx, tile, &child_path);
    }
}

fn show_tabs(ui: &mut egui::Ui, vis: &Visualizer, path: &str) {
    let active_id = egui::Id::new(path).with("active_tab");
    let mut active = ui
        .ctx()
        .data_mut(|d| d.get_temp::<usize>(active_id))
        .unwrap_or(0);
    if active >= vis.tab_count() {
        active = 0;
    }

    ui.horizontal_wrapped(|ui| {
        for (i, tab) in vis.tabs().enumerate() {
            if ui.selectable_label(i == active, tab.title()).clicked() {
                active = i;
            }
        }
    });
    ui.ctx().data_mut(|d| d.insert_temp(active_id, active));
    ui.separator();

    if let Some(tab) = vis.tabs().nth(active) {
        show_tab_contents(ui, tab, path);
    }
}

fn show_tab_contents(ui: &mut egui::Ui, tab: &Tab, path: &str) {
    let mut rendered_any = false;

    if tab.scalars().next().is_some() {
        ui.strong("Values");
        for (key, value) in tab.scalars() {
            ui.label(format!("{key}: {value}"));
        }
        rendered_any = true;
    }

    if tab.graphs().next().is_some() {
        if rendered_any {
            ui.add_space(8.0);
        }
        ui.strong("Graphs");
        for (key, series) in tab.graphs() {
            show_graph(ui, key, series, path, tab.id());
        }
        rendered_any = true;
    }

    if tab.structures().any(|(_, entry)| entry.has_content) {
        if rendered_any {
            ui.add_space(8.0);
        }
        ui.strong("Structures");
        for (key, entry) in tab.structures() {
            if !entry.has_content {
                continue;
            }
            egui::CollapsingHeader::new(key)
                .id_salt((path, tab.id(), key))
                .show(ui, |ui| {
                    for child in &entry.root.children {
                        show_structure_node(ui, child);
                    }
                });
        }
        rendered_any = true;
    }

    if !rendered_any {
        ui.label("This tab has no data yet.");
    }
}

fn show_graph(ui: &mut egui::Ui, key: &str, series: &GraphSeries, path: &str, tab_id: &str) {
    let Some((min, max)) = series.plot_bounds() else {
        ui.label(format!("{key}: <no samples>"));
        return;
    };

    let points: Vec<[f64; 2]> = series
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &sample)| [i as f64, sample as f64])
        .collect();
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    Plot::new(egui::Id::new((path, tab_id, key)))
        .height(GRAPH_HEIGHT)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_axes(true)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [0.0, min as f64],
                [x_max, max as f64],
            ));
            plot_ui.line(Line::new(key, PlotPoints::from(points)));
        });
}

fn show_structure_node(ui: &mut egui::Ui, node: &StructureNode) {
    if node.is_group() {
        egui::CollapsingHeader::new(&node.label)
            .id_salt(ui.next_auto_id())
            .show(ui, |ui| {
                if let Some(value) = &node.value {
                    ui.label(value.to_string());
                }
                for child in &node.children {
                    show_structure_node(ui, child);
                }
            });
        return;
    }

    match &node.value {
        Some(value) => ui.label(format!("{}: {}", node.label, value)),
        None => ui.label(node.label.clone()),
    };
}
