mod connectors;
mod position;
mod sizing;
mod tree;
pub(crate) mod types;
pub use types::*;
use connectors::*;
use position::*;
use sizing::*;
use tree::*;

use crate::config::LayoutConfig;
use crate::model::{FamilyIndex, Person, PersonKey, Quadrant, RelationStatus};
use crate::theme::Theme;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Fraction of the parent-to-child drop where the horizontal leg of a child
/// connector runs.
pub const CHILD_SPLIT_RATIO: f32 = 0.67;
/// Fraction of the parent-to-twin drop where the twin fan-out hub sits.
pub const TWIN_HUB_RATIO: f32 = 0.53;

pub fn compute_layout(persons: &[Person], theme: &Theme, config: &LayoutConfig) -> Layout {
    let family = FamilyIndex::new(persons);
    let mut forest = build_forest(&family);
    size_forest(&mut forest, config);
    let generations = assign_generations(&family, &forest);
    let placement = assign_positions(&family, &forest, &generations, theme, config);
    let connectors = synthesize_connectors(&family, &placement, theme, config);

    let mut layout = Layout {
        nodes: placement.nodes,
        connectors,
        width: 0.0,
        height: 0.0,
    };
    let (width, height) = layout_bounds(&layout.nodes);
    layout.width = width;
    layout.height = height;

    tracing::debug!(
        persons = persons.len(),
        trees = forest.roots.len(),
        fallback_root = forest.fallback_root,
        nodes = layout.nodes.len(),
        connectors = layout.connectors.len(),
        "computed genogram layout"
    );
    layout
}

/// Attachment point of a handle. Anchors have no box, so every handle is the
/// anchor point itself.
pub(crate) fn handle_point(
    node: &PositionedNode,
    handle: Handle,
    config: &LayoutConfig,
) -> (f32, f32) {
    if node.kind.is_anchor() {
        return (node.x, node.y);
    }
    let inset = config.handle_inset();
    match handle {
        Handle::Top => (node.x + node.width / 2.0, node.y),
        Handle::Bottom => (node.x + node.width / 2.0, node.y + config.icon_size),
        Handle::Left => (node.x + inset, node.y + config.icon_size / 2.0),
        Handle::Right => (node.x + node.width - inset, node.y + config.icon_size / 2.0),
    }
}

/// Extent of the person boxes; manual positions may push it into negative space.
fn layout_bounds(nodes: &[PositionedNode]) -> (f32, f32) {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for node in nodes.iter().filter(|node| !node.kind.is_anchor()) {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    if min_x > max_x {
        return (0.0, 0.0);
    }
    (max_x - min_x, max_y - min_y)
}
