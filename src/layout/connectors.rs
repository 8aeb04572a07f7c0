use super::*;

/// Derives the connector list from the recorded links and final coordinates.
pub(super) fn synthesize_connectors(
    family: &FamilyIndex<'_>,
    placement: &Placement,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<Connector> {
    let mut connectors = Vec::with_capacity(placement.links.len());
    for link in &placement.links {
        match link {
            Link::Marriage { primary, spouse } => {
                connectors.extend(marriage_connector(
                    family, placement, *primary, *spouse, theme, config,
                ));
            }
            Link::Child { parent, child } => {
                connectors.extend(child_connector(
                    family, placement, parent, *child, theme, config,
                ));
            }
            Link::Twin { parent, hub, twins } => {
                twin_connectors(
                    family,
                    placement,
                    parent,
                    hub,
                    twins,
                    theme,
                    config,
                    &mut connectors,
                );
            }
        }
    }
    connectors
}

fn source_id(family: &FamilyIndex<'_>, parent: &ParentSource) -> String {
    match parent {
        ParentSource::Couple { anchor } => anchor.clone(),
        ParentSource::Person(idx) => family.person(*idx).key.to_string(),
    }
}

fn marriage_connector(
    family: &FamilyIndex<'_>,
    placement: &Placement,
    primary: usize,
    spouse: usize,
    theme: &Theme,
    config: &LayoutConfig,
) -> Option<Connector> {
    let primary_node = placement.person_node(primary)?;
    let spouse_node = placement.person_node(spouse)?;
    let primary_person = family.person(primary);
    let spouse_person = family.person(spouse);

    let (source_handle, target_handle) = if spouse_node.x < primary_node.x {
        (Handle::Left, Handle::Right)
    } else {
        (Handle::Right, Handle::Left)
    };
    let flags = StyleFlags {
        divorced: primary_person.relation_status == RelationStatus::Divorced
            || spouse_person.relation_status == RelationStatus::Divorced,
        ..StyleFlags::default()
    };

    Some(Connector {
        id: format!("marriage-{}-{}", primary_person.key, spouse_person.key),
        kind: ConnectorKind::Marriage,
        source: primary_node.id.clone(),
        target: spouse_node.id.clone(),
        source_handle,
        target_handle,
        members: Vec::new(),
        flags,
        stroke: resolve_stroke(ConnectorKind::Marriage, flags, theme),
        geometry: ConnectorGeometry::Straight {
            from: handle_point(primary_node, source_handle, config),
            to: handle_point(spouse_node, target_handle, config),
        },
    })
}

fn child_connector(
    family: &FamilyIndex<'_>,
    placement: &Placement,
    parent: &ParentSource,
    child: usize,
    theme: &Theme,
    config: &LayoutConfig,
) -> Option<Connector> {
    let source = placement.source_point(parent, config)?;
    let child_node = placement.person_node(child)?;
    let person = family.person(child);
    let source_id = source_id(family, parent);
    let flags = StyleFlags {
        adopted: person.is_adopted,
        foster: person.is_foster,
        ..StyleFlags::default()
    };

    Some(Connector {
        id: format!("child-{}-{}", source_id, person.key),
        kind: ConnectorKind::Child,
        source: source_id,
        target: child_node.id.clone(),
        source_handle: Handle::Bottom,
        target_handle: Handle::Top,
        members: Vec::new(),
        flags,
        stroke: resolve_stroke(ConnectorKind::Child, flags, theme),
        geometry: step_geometry(source, handle_point(child_node, Handle::Top, config)),
    })
}

#[allow(clippy::too_many_arguments)]
fn twin_connectors(
    family: &FamilyIndex<'_>,
    placement: &Placement,
    parent: &ParentSource,
    hub: &str,
    twins: &[usize],
    theme: &Theme,
    config: &LayoutConfig,
    out: &mut Vec<Connector>,
) {
    let Some(source) = placement.source_point(parent, config) else {
        return;
    };
    let Some(hub_node) = placement.anchor_node(hub) else {
        return;
    };
    let twin_nodes: Vec<&PositionedNode> = twins
        .iter()
        .filter_map(|idx| placement.person_node(*idx))
        .collect();
    let Some(first) = twin_nodes.first() else {
        return;
    };

    let identical = family.person(twins[0]).is_identical_twin;
    let flags = StyleFlags {
        identical,
        ..StyleFlags::default()
    };
    let source_id = source_id(family, parent);
    out.push(Connector {
        id: format!("twin-group-{}", first.id),
        kind: ConnectorKind::Twin,
        source: source_id,
        target: first.id.clone(),
        source_handle: Handle::Bottom,
        target_handle: Handle::Top,
        members: twin_nodes.iter().map(|node| node.id.clone()).collect(),
        flags,
        stroke: resolve_stroke(ConnectorKind::Twin, flags, theme),
        geometry: ConnectorGeometry::Fan {
            source,
            hub: (hub_node.x, hub_node.y),
            targets: twin_nodes
                .iter()
                .map(|node| handle_point(node, Handle::Top, config))
                .collect(),
            hub_ratio: TWIN_HUB_RATIO,
        },
    });

    if !identical {
        return;
    }
    for pair in twin_nodes.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        out.push(Connector {
            id: format!("identical-link-{}-{}", left.id, right.id),
            kind: ConnectorKind::SiblingLink,
            source: left.id.clone(),
            target: right.id.clone(),
            source_handle: Handle::Right,
            target_handle: Handle::Left,
            members: Vec::new(),
            flags,
            stroke: resolve_stroke(ConnectorKind::SiblingLink, flags, theme),
            geometry: ConnectorGeometry::Straight {
                from: handle_point(left, Handle::Right, config),
                to: handle_point(right, Handle::Left, config),
            },
        });
    }
}

/// Down from the source, across at 67% of the drop, down into the target.
fn step_geometry(source: (f32, f32), target: (f32, f32)) -> ConnectorGeometry {
    let split_y = source.1 + (target.1 - source.1).abs() * CHILD_SPLIT_RATIO;
    let points = if (source.0 - target.0).abs() < 1.0 {
        vec![source, target]
    } else {
        vec![source, (source.0, split_y), (target.0, split_y), target]
    };
    ConnectorGeometry::Step {
        points,
        split_y,
        split_ratio: CHILD_SPLIT_RATIO,
    }
}

pub(super) fn resolve_stroke(kind: ConnectorKind, flags: StyleFlags, theme: &Theme) -> Stroke {
    match kind {
        ConnectorKind::Marriage if flags.divorced => Stroke {
            color: theme.divorced_color.clone(),
            width: theme.relation_line_width,
            dasharray: Some(theme.divorced_dasharray.clone()),
        },
        ConnectorKind::Marriage => Stroke {
            color: theme.marriage_color.clone(),
            width: theme.relation_line_width,
            dasharray: None,
        },
        // Adopted wins over foster when both are set.
        ConnectorKind::Child if flags.adopted => Stroke {
            color: theme.adopted_color.clone(),
            width: theme.line_width,
            dasharray: Some(theme.adopted_dasharray.clone()),
        },
        ConnectorKind::Child if flags.foster => Stroke {
            color: theme.foster_color.clone(),
            width: theme.line_width,
            dasharray: Some(theme.foster_dasharray.clone()),
        },
        ConnectorKind::Child => Stroke {
            color: theme.child_color.clone(),
            width: theme.line_width,
            dasharray: None,
        },
        ConnectorKind::Twin | ConnectorKind::SiblingLink => Stroke {
            color: theme.twin_color.clone(),
            width: theme.line_width,
            dasharray: None,
        },
    }
}

impl ConnectorGeometry {
    /// SVG path data; step corners are rounded with `radius`.
    pub fn path_data(&self, radius: f32) -> String {
        match self {
            ConnectorGeometry::Straight { from, to } => {
                format!("M {:.2} {:.2} L {:.2} {:.2}", from.0, from.1, to.0, to.1)
            }
            ConnectorGeometry::Step { points, split_y, .. } => {
                let (Some(source), Some(target)) = (points.first(), points.last()) else {
                    return String::new();
                };
                let mut d = format!("M {:.2} {:.2}", source.0, source.1);
                if points.len() <= 2 {
                    d.push_str(&format!(" L {:.2} {:.2}", target.0, target.1));
                    return d;
                }
                let dir = if target.0 > source.0 { 1.0 } else { -1.0 };
                d.push_str(&format!(" L {:.2} {:.2}", source.0, split_y - radius));
                d.push_str(&format!(
                    " Q {:.2} {:.2} {:.2} {:.2}",
                    source.0,
                    split_y,
                    source.0 + dir * radius,
                    split_y
                ));
                d.push_str(&format!(" L {:.2} {:.2}", target.0 - dir * radius, split_y));
                d.push_str(&format!(
                    " Q {:.2} {:.2} {:.2} {:.2}",
                    target.0,
                    split_y,
                    target.0,
                    split_y + radius
                ));
                d.push_str(&format!(" L {:.2} {:.2}", target.0, target.1));
                d
            }
            ConnectorGeometry::Fan {
                source,
                hub,
                targets,
                ..
            } => {
                let mut d = format!(
                    "M {:.2} {:.2} L {:.2} {:.2}",
                    source.0, source.1, hub.0, hub.1
                );
                for target in targets {
                    d.push_str(&format!(
                        " M {:.2} {:.2} L {:.2} {:.2}",
                        hub.0, hub.1, target.0, target.1
                    ));
                }
                d
            }
        }
    }

    /// Every point the connector passes through, in drawing order.
    pub fn points(&self) -> Vec<(f32, f32)> {
        match self {
            ConnectorGeometry::Straight { from, to } => vec![*from, *to],
            ConnectorGeometry::Step { points, .. } => points.clone(),
            ConnectorGeometry::Fan {
                source,
                hub,
                targets,
                ..
            } => {
                let mut points = vec![*source, *hub];
                points.extend(targets.iter().copied());
                points
            }
        }
    }
}
