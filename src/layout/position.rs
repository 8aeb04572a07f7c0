use super::*;

/// Where the connectors of a child (or twin group) originate.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ParentSource {
    Couple { anchor: String },
    Person(usize),
}

/// Relationship recorded while placing nodes, turned into connectors later.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Link {
    Marriage { primary: usize, spouse: usize },
    Child {
        parent: ParentSource,
        child: usize,
    },
    Twin {
        parent: ParentSource,
        hub: String,
        twins: Vec<usize>,
    },
}

#[derive(Debug, Default)]
pub(super) struct Placement {
    pub(super) nodes: Vec<PositionedNode>,
    /// Person index -> slot in `nodes`.
    pub(super) person_slots: Vec<Option<usize>>,
    pub(super) anchor_slots: HashMap<String, usize>,
    pub(super) links: Vec<Link>,
}

impl Placement {
    pub(super) fn person_node(&self, idx: usize) -> Option<&PositionedNode> {
        self.person_slots
            .get(idx)
            .copied()
            .flatten()
            .map(|slot| &self.nodes[slot])
    }

    pub(super) fn anchor_node(&self, id: &str) -> Option<&PositionedNode> {
        self.anchor_slots.get(id).map(|slot| &self.nodes[*slot])
    }

    /// Point a child or twin connector leaves from.
    pub(super) fn source_point(
        &self,
        source: &ParentSource,
        config: &LayoutConfig,
    ) -> Option<(f32, f32)> {
        match source {
            ParentSource::Couple { anchor } => {
                self.anchor_node(anchor).map(|node| (node.x, node.y))
            }
            ParentSource::Person(idx) => self
                .person_node(*idx)
                .map(|node| handle_point(node, Handle::Bottom, config)),
        }
    }
}

pub(super) fn marriage_anchor_id(primary: PersonKey, spouse: PersonKey) -> String {
    format!("marriage-node-{primary}-{spouse}")
}

pub(super) fn twin_anchor_id(first: PersonKey) -> String {
    format!("twin-hub-{first}")
}

struct Assigner<'a, 'p> {
    family: &'a FamilyIndex<'p>,
    forest: &'a Forest,
    generations: &'a [usize],
    theme: &'a Theme,
    config: &'a LayoutConfig,
    placement: Placement,
}

/// A placed couple whose child groups are still being laid out.
struct PlacedNode {
    node_id: usize,
    groups: Vec<Vec<usize>>,
    group: usize,
    member: usize,
    cursor: f32,
}

/// Top-down pass: absolute coordinates for every person and anchor.
pub(super) fn assign_positions(
    family: &FamilyIndex<'_>,
    forest: &Forest,
    generations: &[usize],
    theme: &Theme,
    config: &LayoutConfig,
) -> Placement {
    let mut assigner = Assigner {
        family,
        forest,
        generations,
        theme,
        config,
        placement: Placement {
            person_slots: vec![None; family.len()],
            ..Placement::default()
        },
    };

    let mut cursor = 0.0;
    for &root in &forest.roots {
        assigner.layout_tree(root, cursor);
        cursor += forest.nodes[root].width + config.tree_spacing;
    }
    assigner.placement
}

impl Assigner<'_, '_> {
    fn row_y(&self, idx: usize) -> f32 {
        self.generations[idx] as f32 * self.config.vertical_spacing
    }

    /// Depth-first over the tree: each child subtree is finished before its
    /// own child or twin link is recorded.
    fn layout_tree(&mut self, root: usize, x: f32) {
        let mut stack = vec![self.place_node(root, x)];
        while let Some(open) = stack.last_mut() {
            let Some(group) = open.groups.get(open.group) else {
                stack.pop();
                continue;
            };
            if let Some(&child) = group.get(open.member) {
                let x = open.cursor;
                open.member += 1;
                open.cursor += self.forest.nodes[child].width + self.config.horizontal_spacing;
                let placed = self.place_node(child, x);
                stack.push(placed);
                continue;
            }

            let node_id = open.node_id;
            let group = std::mem::take(&mut open.groups[open.group]);
            open.group += 1;
            open.member = 0;
            self.link_group(node_id, group);
        }
    }

    /// Places the couple of `node_id` with its subtree starting at `x`.
    fn place_node(&mut self, node_id: usize, x: f32) -> PlacedNode {
        let node = &self.forest.nodes[node_id];
        let (person, spouse) = (node.person, node.spouse);
        let (width, center_x) = (node.width, node.center_x);
        let config = self.config;

        let couple_width = config.couple_width(spouse.is_some());
        let computed_left = x + center_x - couple_width / 2.0;
        let (px, py) = self.place_person(person, computed_left, self.row_y(person));

        let (computed_center, actual_center) = match spouse {
            Some(spouse) => {
                let (sx, sy) = self.place_person(
                    spouse,
                    px + config.node_width + config.spouse_spacing,
                    self.row_y(spouse),
                );
                let anchor = self.place_marriage_anchor(person, spouse, (px, py), (sx, sy));
                let computed_spouse_x = computed_left + config.node_width + config.spouse_spacing;
                let computed = marriage_anchor_point(
                    config,
                    (computed_left, 0.0),
                    (computed_spouse_x, 0.0),
                );
                (computed.0, anchor.0)
            }
            None => (
                computed_left + config.node_width / 2.0,
                px + config.node_width / 2.0,
            ),
        };

        let children = &self.forest.nodes[node_id].children;
        // Children follow the parents' actual coordinates when they were dragged.
        let shift = actual_center - computed_center;
        let total = children_total_width(self.forest, children, config);
        PlacedNode {
            node_id,
            groups: group_children(self.family, self.forest, children),
            group: 0,
            member: 0,
            cursor: x + width / 2.0 - total / 2.0 + shift,
        }
    }

    /// Records the connector link of a laid-out child group.
    fn link_group(&mut self, node_id: usize, group: Vec<usize>) {
        let person = self.forest.nodes[node_id].person;
        let twins: Vec<usize> = group
            .iter()
            .map(|child| self.forest.nodes[*child].person)
            .collect();
        let parent = self.parent_source(node_id, twins[0]);
        if let [child] = twins.as_slice() {
            let child = *child;
            self.placement.links.push(Link::Child { parent, child });
            return;
        }
        let hub = self.place_twin_anchor(&parent, person, twins[0]);
        self.placement.links.push(Link::Twin { parent, hub, twins });
    }

    /// Places a person at the computed point unless they carry a manual position.
    fn place_person(&mut self, idx: usize, x: f32, y: f32) -> (f32, f32) {
        let person = self.family.person(idx);
        let (x, y, source) = match person.position {
            Some(pos) => (pos.x, pos.y, PositionSource::Manual),
            None => (x, y, PositionSource::Computed),
        };

        let slot = self.placement.nodes.len();
        self.placement.nodes.push(PositionedNode {
            id: person.key.to_string(),
            key: Some(person.key),
            kind: NodeKind::for_person(person),
            x,
            y,
            width: self.config.node_width,
            height: self.config.node_height,
            generation: self.generations[idx],
            source,
            data: Some(display_data(person, self.theme)),
        });
        self.placement.person_slots[idx] = Some(slot);
        (x, y)
    }

    fn place_marriage_anchor(
        &mut self,
        primary: usize,
        spouse: usize,
        primary_pos: (f32, f32),
        spouse_pos: (f32, f32),
    ) -> (f32, f32) {
        let point = marriage_anchor_point(self.config, primary_pos, spouse_pos);

        let primary_key = self.family.person(primary).key;
        let spouse_key = self.family.person(spouse).key;
        let id = marriage_anchor_id(primary_key, spouse_key);
        self.push_anchor(
            id,
            NodeKind::MarriageAnchor,
            point,
            self.generations[primary],
        );
        self.placement.links.push(Link::Marriage { primary, spouse });
        point
    }

    fn place_twin_anchor(
        &mut self,
        parent: &ParentSource,
        parent_person: usize,
        first_twin: usize,
    ) -> String {
        let config = self.config;
        let id = twin_anchor_id(self.family.person(first_twin).key);
        let source = self
            .placement
            .source_point(parent, config)
            .unwrap_or((0.0, 0.0));
        let target = self
            .placement
            .person_node(first_twin)
            .map(|node| handle_point(node, Handle::Top, config))
            .unwrap_or(source);
        let hub = (source.0, source.1 + (target.1 - source.1) * TWIN_HUB_RATIO);
        self.push_anchor(
            id.clone(),
            NodeKind::TwinAnchor,
            hub,
            self.generations[parent_person],
        );
        id
    }

    fn push_anchor(&mut self, id: String, kind: NodeKind, point: (f32, f32), generation: usize) {
        let slot = self.placement.nodes.len();
        self.placement.anchor_slots.insert(id.clone(), slot);
        self.placement.nodes.push(PositionedNode {
            id,
            key: None,
            kind,
            x: point.0,
            y: point.1,
            width: 0.0,
            height: 0.0,
            generation,
            source: PositionSource::Computed,
            data: None,
        });
    }

    /// The marriage anchor when the child's two recorded parents are this
    /// node's couple; otherwise the recorded parent standing in this node,
    /// father first.
    fn parent_source(&self, node_id: usize, child: usize) -> ParentSource {
        let node = &self.forest.nodes[node_id];
        let father = self.family.father_of(child);
        let mother = self.family.mother_of(child);
        let in_node = |idx: usize| idx == node.person || Some(idx) == node.spouse;

        if let (Some(spouse), Some(father), Some(mother)) = (node.spouse, father, mother)
            && father != mother
            && in_node(father)
            && in_node(mother)
        {
            let primary = self.family.person(node.person).key;
            let spouse = self.family.person(spouse).key;
            return ParentSource::Couple {
                anchor: marriage_anchor_id(primary, spouse),
            };
        }

        let lone = [father, mother]
            .into_iter()
            .flatten()
            .find(|idx| in_node(*idx))
            .unwrap_or(node.person);
        ParentSource::Person(lone)
    }
}

/// Midpoint of the couple's facing handles: the right handle of whoever is on
/// the left and the left handle of the other partner.
fn marriage_anchor_point(
    config: &LayoutConfig,
    primary_pos: (f32, f32),
    spouse_pos: (f32, f32),
) -> (f32, f32) {
    let inset = config.handle_inset();
    let handle_y = config.icon_size / 2.0;
    let (left, right) = if spouse_pos.0 < primary_pos.0 {
        (spouse_pos, primary_pos)
    } else {
        (primary_pos, spouse_pos)
    };
    let left_handle = (left.0 + config.node_width - inset, left.1 + handle_y);
    let right_handle = (right.0 + inset, right.1 + handle_y);
    (
        (left_handle.0 + right_handle.0) / 2.0,
        (left_handle.1 + right_handle.1) / 2.0,
    )
}

/// Twins sharing a group id stay together; everyone else stands alone.
/// Twin groups are listed before single children, then everything is ordered
/// oldest first. Equal ages keep that listing order.
fn group_children(
    family: &FamilyIndex<'_>,
    forest: &Forest,
    children: &[usize],
) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut singles: Vec<Vec<usize>> = Vec::new();
    let mut twin_slots: HashMap<u32, usize> = HashMap::new();
    for &child in children {
        let person = family.person(forest.nodes[child].person);
        match person.twin_group() {
            Some(group) => match twin_slots.get(&group) {
                Some(&slot) => groups[slot].push(child),
                None => {
                    twin_slots.insert(group, groups.len());
                    groups.push(vec![child]);
                }
            },
            None => singles.push(vec![child]),
        }
    }
    groups.append(&mut singles);
    groups.sort_by_key(|group| {
        let first = family.person(forest.nodes[group[0]].person);
        Reverse(first.age_or_zero())
    });
    groups
}

fn display_data(person: &Person, theme: &Theme) -> DisplayData {
    let mut by_quadrant: BTreeMap<Quadrant, String> = BTreeMap::new();
    for marker in &person.attributes {
        if let Some(color) = theme.attribute_color(*marker) {
            by_quadrant.insert(marker.quadrant(), color.to_string());
        }
    }
    DisplayData {
        name: person.name.clone(),
        age: person.age,
        deceased: person.deceased,
        is_adopted: person.is_adopted,
        is_foster: person.is_foster,
        birth_status: person.birth_status,
        markers: by_quadrant
            .into_iter()
            .map(|(quadrant, color)| MarkerLayout { quadrant, color })
            .collect(),
    }
}
