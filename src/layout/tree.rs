use super::*;

/// One slot of the layout forest: a person, their bound spouse and the
/// subtrees hanging below the couple.
#[derive(Debug, Clone)]
pub(super) struct FamilyNode {
    pub(super) person: usize,
    pub(super) spouse: Option<usize>,
    pub(super) children: Vec<usize>,
    pub(super) width: f32,
    pub(super) center_x: f32,
}

#[derive(Debug, Clone, Default)]
pub(super) struct Forest {
    /// Arena of tree nodes; `children` and `roots` index into it.
    pub(super) nodes: Vec<FamilyNode>,
    pub(super) roots: Vec<usize>,
    pub(super) fallback_root: bool,
}

impl Forest {
    /// Resolved couples only: `partner[a] == Some(b)` iff `partner[b] == Some(a)`.
    pub(super) fn partners(&self, person_count: usize) -> Vec<Option<usize>> {
        let mut partner = vec![None; person_count];
        for node in &self.nodes {
            if let Some(spouse) = node.spouse {
                partner[node.person] = Some(spouse);
                partner[spouse] = Some(node.person);
            }
        }
        partner
    }
}

pub(super) fn build_forest(family: &FamilyIndex<'_>) -> Forest {
    let count = family.len();
    let mut forest = Forest::default();
    if count == 0 {
        return forest;
    }

    let mut starts: Vec<usize> = (0..count).filter(|idx| family.is_root(*idx)).collect();
    if starts.is_empty() {
        if let Some(fallback) = (0..count).min_by_key(|idx| family.person(*idx).key) {
            tracing::debug!(
                key = family.person(fallback).key,
                "no parentless person, using smallest key as root"
            );
            starts.push(fallback);
        }
        forest.fallback_root = true;
    }

    let mut visited = vec![false; count];
    for start in starts {
        if let Some(root) = build_tree(family, start, &mut visited, &mut forest.nodes) {
            forest.roots.push(root);
        }
    }
    // Disconnected or cyclic leftovers each start their own tree.
    for idx in 0..count {
        if let Some(root) = build_tree(family, idx, &mut visited, &mut forest.nodes) {
            forest.roots.push(root);
        }
    }
    forest
}

/// A tree node whose candidate children are still being visited.
struct OpenNode {
    node_id: usize,
    candidates: Vec<usize>,
    next: usize,
}

/// Preorder walk from `idx`; node ids grow with depth, so every child sits
/// after its parent in the arena.
fn build_tree(
    family: &FamilyIndex<'_>,
    idx: usize,
    visited: &mut [bool],
    nodes: &mut Vec<FamilyNode>,
) -> Option<usize> {
    let root = open_node(family, idx, visited, nodes)?;
    let root_id = root.node_id;
    let mut stack = vec![root];
    while let Some(open) = stack.last_mut() {
        let Some(&candidate) = open.candidates.get(open.next) else {
            stack.pop();
            continue;
        };
        open.next += 1;
        let parent = open.node_id;
        if let Some(child) = open_node(family, candidate, visited, nodes) {
            nodes[parent].children.push(child.node_id);
            stack.push(child);
        }
    }
    Some(root_id)
}

fn open_node(
    family: &FamilyIndex<'_>,
    idx: usize,
    visited: &mut [bool],
    nodes: &mut Vec<FamilyNode>,
) -> Option<OpenNode> {
    if visited[idx] {
        return None;
    }
    visited[idx] = true;

    let spouse = family.spouse_of(idx).filter(|spouse| !visited[*spouse]);
    if let Some(spouse) = spouse {
        visited[spouse] = true;
    }

    let node_id = nodes.len();
    nodes.push(FamilyNode {
        person: idx,
        spouse,
        children: Vec::new(),
        width: 0.0,
        center_x: 0.0,
    });

    let mut candidates: Vec<usize> = family.children_of(idx).to_vec();
    if let Some(spouse) = spouse {
        candidates.extend_from_slice(family.children_of(spouse));
        candidates.sort_unstable();
        candidates.dedup();
    }
    Some(OpenNode {
        node_id,
        candidates,
        next: 0,
    })
}

/// Generation index per person (indexed like the person slice).
///
/// Depths only ever grow: a person already at or below the proposed depth is
/// left alone, and a resolved spouse is pulled to their partner's depth.
pub(super) fn assign_generations(family: &FamilyIndex<'_>, forest: &Forest) -> Vec<usize> {
    let count = family.len();
    let partner = forest.partners(count);
    let mut generation: Vec<Option<usize>> = vec![None; count];
    let mut on_path = vec![false; count];

    let seeds = forest
        .roots
        .iter()
        .map(|root| forest.nodes[*root].person)
        .chain(0..count);
    for seed in seeds {
        if generation[seed].is_none() {
            propagate(family, &partner, seed, &mut generation, &mut on_path);
        }
    }

    generation.into_iter().map(|depth| depth.unwrap_or(0)).collect()
}

struct Visit {
    idx: usize,
    depth: usize,
    /// 0 is the spouse, `n` the n-th child.
    step: usize,
}

fn propagate(
    family: &FamilyIndex<'_>,
    partner: &[Option<usize>],
    seed: usize,
    generation: &mut [Option<usize>],
    on_path: &mut [bool],
) {
    let mut stack = Vec::new();
    if enter(seed, 0, generation, on_path) {
        stack.push(Visit {
            idx: seed,
            depth: 0,
            step: 0,
        });
    }

    while let Some(visit) = stack.last_mut() {
        let (idx, depth, step) = (visit.idx, visit.depth, visit.step);
        visit.step += 1;
        let next = if step == 0 {
            partner[idx].map(|spouse| (spouse, depth))
        } else if let Some(&child) = family.children_of(idx).get(step - 1) {
            Some((child, depth + 1))
        } else {
            on_path[idx] = false;
            stack.pop();
            continue;
        };
        if let Some((next, next_depth)) = next
            && enter(next, next_depth, generation, on_path)
        {
            stack.push(Visit {
                idx: next,
                depth: next_depth,
                step: 0,
            });
        }
    }
}

/// Claims `idx` at `depth` unless it already sits at least that deep.
fn enter(idx: usize, depth: usize, generation: &mut [Option<usize>], on_path: &mut [bool]) -> bool {
    // A person already on the current descent path means the parent relation
    // loops back on itself.
    if on_path[idx] {
        return false;
    }
    if let Some(existing) = generation[idx]
        && existing >= depth
    {
        return false;
    }
    generation[idx] = Some(depth);
    on_path[idx] = true;
    true
}
