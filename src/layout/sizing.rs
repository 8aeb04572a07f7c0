use super::*;

/// Bottom-up pass filling `width` and `center_x` on every node of the forest.
///
/// Children always follow their parent in the arena, so walking it backwards
/// sizes every subtree before the node that holds it.
pub(super) fn size_forest(forest: &mut Forest, config: &LayoutConfig) {
    for node_id in (0..forest.nodes.len()).rev() {
        size_node(forest, node_id, config);
    }
    for &root in &forest.roots {
        tracing::trace!(
            root,
            width = forest.nodes[root].width,
            "sized family tree"
        );
    }
}

fn size_node(forest: &mut Forest, node_id: usize, config: &LayoutConfig) {
    let couple_width = config.couple_width(forest.nodes[node_id].spouse.is_some());
    let children_width = children_total_width(forest, &forest.nodes[node_id].children, config);

    let node = &mut forest.nodes[node_id];
    node.width = couple_width.max(children_width);
    node.center_x = if children_width > couple_width {
        children_width / 2.0
    } else {
        couple_width / 2.0
    };
}

/// Sum of child subtree widths plus one sibling gap between each neighbour.
pub(super) fn children_total_width(
    forest: &Forest,
    children: &[usize],
    config: &LayoutConfig,
) -> f32 {
    if children.is_empty() {
        return 0.0;
    }
    let widths: f32 = children.iter().map(|child| forest.nodes[*child].width).sum();
    widths + config.horizontal_spacing * (children.len() as f32 - 1.0)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    fn sized(persons: &[Person]) -> Forest {
        let family = FamilyIndex::new(persons);
        let mut forest = build_forest(&family);
        size_forest(&mut forest, &LayoutConfig::default());
        forest
    }

    #[test]
    fn childless_couple_takes_its_own_width() {
        let forest = sized(&link_spouses(vec![male(1), female(2)], 1, 2));
        let root = &forest.nodes[forest.roots[0]];
        assert_eq!(root.width, 210.0);
        assert_eq!(root.center_x, 105.0);
    }

    #[test]
    fn wide_sibling_group_expands_parent() {
        let persons = vec![
            male(1),
            child_of(male(2), Some(1), None),
            child_of(female(3), Some(1), None),
            child_of(male(4), Some(1), None),
        ];
        let forest = sized(&persons);
        let root = &forest.nodes[forest.roots[0]];
        // 3 * 80 + 2 * 30
        assert_eq!(root.width, 300.0);
        assert_eq!(root.center_x, 150.0);
    }

    #[test]
    fn single_child_centers_under_couple() {
        let persons = link_spouses(
            vec![male(1), female(2), child_of(male(3), Some(1), Some(2))],
            1,
            2,
        );
        let forest = sized(&persons);
        let root = &forest.nodes[forest.roots[0]];
        assert_eq!(root.width, 210.0);
        assert_eq!(root.center_x, 105.0);
        let child = &forest.nodes[root.children[0]];
        assert_eq!(child.width, 80.0);
        assert_eq!(child.center_x, 40.0);
    }
}
