use crate::config::{HistoryConfig, LayoutConfig};
use crate::error::{DocumentError, Relation, StoreError};
use crate::layout::{Layout, compute_layout};
use crate::model::{
    AttributeMarker, BirthStatus, Gender, GenogramDocument, Person, PersonKey, Position, Quadrant,
    RelationStatus,
};
use crate::theme::Theme;
use std::collections::{HashMap, HashSet, VecDeque};

/// Everything about a person except the key, which the store assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPerson {
    pub name: String,
    pub gender: Gender,
    pub age: Option<u32>,
    pub deceased: bool,
    pub father: Option<PersonKey>,
    pub mother: Option<PersonKey>,
    pub spouse: Option<PersonKey>,
    pub relation_status: RelationStatus,
    pub attributes: Vec<AttributeMarker>,
    pub position: Option<Position>,
    pub is_adopted: bool,
    pub is_foster: bool,
    pub birth_status: BirthStatus,
    pub twin_group: Option<u32>,
    pub is_identical_twin: bool,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        let Person {
            name,
            gender,
            age,
            deceased,
            father,
            mother,
            spouse,
            relation_status,
            attributes,
            position,
            is_adopted,
            is_foster,
            birth_status,
            twin_group,
            is_identical_twin,
            ..
        } = Person::new(0, name, gender);
        Self {
            name,
            gender,
            age,
            deceased,
            father,
            mother,
            spouse,
            relation_status,
            attributes,
            position,
            is_adopted,
            is_foster,
            birth_status,
            twin_group,
            is_identical_twin,
        }
    }

    fn into_person(self, key: PersonKey) -> Person {
        Person {
            key,
            name: self.name,
            gender: self.gender,
            age: self.age,
            deceased: self.deceased,
            father: self.father,
            mother: self.mother,
            spouse: self.spouse,
            relation_status: self.relation_status,
            attributes: self.attributes,
            position: self.position,
            is_adopted: self.is_adopted,
            is_foster: self.is_foster,
            birth_status: self.birth_status,
            twin_group: self.twin_group,
            is_identical_twin: self.is_identical_twin,
        }
    }
}

/// Partial update. `None` leaves a field alone; for nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<Option<u32>>,
    pub deceased: Option<bool>,
    pub father: Option<Option<PersonKey>>,
    pub mother: Option<Option<PersonKey>>,
    pub spouse: Option<Option<PersonKey>>,
    pub relation_status: Option<RelationStatus>,
    pub attributes: Option<Vec<AttributeMarker>>,
    pub position: Option<Option<Position>>,
    pub is_adopted: Option<bool>,
    pub is_foster: Option<bool>,
    pub birth_status: Option<BirthStatus>,
    pub twin_group: Option<Option<u32>>,
    pub is_identical_twin: Option<bool>,
}

impl PersonUpdate {
    fn apply_to(self, person: &mut Person) {
        if let Some(v) = self.name {
            person.name = v;
        }
        if let Some(v) = self.gender {
            person.gender = v;
        }
        if let Some(v) = self.age {
            person.age = v;
        }
        if let Some(v) = self.deceased {
            person.deceased = v;
        }
        if let Some(v) = self.father {
            person.father = v;
        }
        if let Some(v) = self.mother {
            person.mother = v;
        }
        if let Some(v) = self.spouse {
            person.spouse = v;
        }
        if let Some(v) = self.relation_status {
            person.relation_status = v;
        }
        if let Some(v) = self.attributes {
            person.attributes = v;
        }
        if let Some(v) = self.position {
            person.position = v;
        }
        if let Some(v) = self.is_adopted {
            person.is_adopted = v;
        }
        if let Some(v) = self.is_foster {
            person.is_foster = v;
        }
        if let Some(v) = self.birth_status {
            person.birth_status = v;
        }
        if let Some(v) = self.twin_group {
            person.twin_group = v;
        }
        if let Some(v) = self.is_identical_twin {
            person.is_identical_twin = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    family_data: Vec<Person>,
    next_key: PersonKey,
}

/// Owns the person collection and a bounded undo/redo history of snapshots.
///
/// Every mutation validates against a working copy and only commits when it
/// succeeds, so a rejected edit leaves both the data and the history as they
/// were.
#[derive(Debug, Clone)]
pub struct GenogramStore {
    family_data: Vec<Person>,
    next_key: PersonKey,
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    history_limit: usize,
}

impl Default for GenogramStore {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}

impl GenogramStore {
    pub fn new(history: &HistoryConfig) -> Self {
        Self {
            family_data: Vec::new(),
            next_key: 1,
            past: VecDeque::new(),
            future: Vec::new(),
            history_limit: history.limit,
        }
    }

    pub fn from_document(
        document: GenogramDocument,
        history: &HistoryConfig,
    ) -> Result<Self, StoreError> {
        validate_family(&document.family_data)?;
        let next_key = safe_next_key(&document.family_data, document.next_key);
        Ok(Self {
            family_data: document.family_data,
            next_key,
            ..Self::new(history)
        })
    }

    /// Parses a persisted document and loads it through the same checks as
    /// [`GenogramStore::from_document`].
    pub fn from_json(input: &str, history: &HistoryConfig) -> Result<Self, DocumentError> {
        let document = GenogramDocument::from_json(input)?;
        Ok(Self::from_document(document, history)?)
    }

    pub fn persons(&self) -> &[Person] {
        &self.family_data
    }

    pub fn get(&self, key: PersonKey) -> Option<&Person> {
        self.family_data.iter().find(|person| person.key == key)
    }

    pub fn next_key(&self) -> PersonKey {
        self.next_key
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn layout(&self, theme: &Theme, config: &LayoutConfig) -> Layout {
        compute_layout(&self.family_data, theme, config)
    }

    pub fn add_person(&mut self, new_person: NewPerson) -> Result<PersonKey, StoreError> {
        let key = self.next_key;
        let person = new_person.into_person(key);
        let mut data = self.family_data.clone();

        for parent in [person.father, person.mother].into_iter().flatten() {
            if !contains(&data, parent) {
                return Err(rejected(
                    "add_person",
                    StoreError::MissingParent { key, parent },
                ));
            }
        }
        if let Some(spouse) = person.spouse
            && !contains(&data, spouse)
        {
            return Err(rejected(
                "add_person",
                StoreError::UnknownPerson(spouse),
            ));
        }
        check_quadrants(&person).map_err(|error| rejected("add_person", error))?;

        let spouse = person.spouse;
        let status = person.relation_status;
        data.push(person);
        if let Some(spouse) = spouse {
            link_partner(&mut data, key, spouse, status);
        }

        self.commit(data, key.saturating_add(1));
        tracing::debug!(key, "added person");
        Ok(key)
    }

    pub fn update_person(&mut self, key: PersonKey, update: PersonUpdate) -> Result<(), StoreError> {
        let Some(idx) = self.family_data.iter().position(|person| person.key == key) else {
            return Err(rejected(
                "update_person",
                StoreError::UnknownPerson(key),
            ));
        };

        let mut descendants = None;
        for (relation, parent) in [
            (Relation::Father, update.father.flatten()),
            (Relation::Mother, update.mother.flatten()),
        ] {
            let Some(parent) = parent else {
                continue;
            };
            let error = if parent == key {
                StoreError::SelfReference { key, relation }
            } else if !contains(&self.family_data, parent) {
                StoreError::MissingParent { key, parent }
            } else if descendants
                .get_or_insert_with(|| descendants_of(&self.family_data, key))
                .contains(&parent)
            {
                StoreError::CircularParent { key, parent }
            } else {
                continue;
            };
            return Err(rejected("update_person", error));
        }
        if let Some(Some(spouse)) = update.spouse {
            if spouse == key {
                return Err(rejected(
                    "update_person",
                    StoreError::SelfReference {
                        key,
                        relation: Relation::Spouse,
                    },
                ));
            }
            if !contains(&self.family_data, spouse) {
                return Err(rejected(
                    "update_person",
                    StoreError::UnknownPerson(spouse),
                ));
            }
        }

        let mut data = self.family_data.clone();
        let previous_spouse = data[idx].spouse;
        update.apply_to(&mut data[idx]);
        check_quadrants(&data[idx]).map_err(|error| rejected("update_person", error))?;

        let spouse = data[idx].spouse;
        let status = data[idx].relation_status;
        if let Some(previous) = previous_spouse
            && Some(previous) != spouse
        {
            release_partner(&mut data, previous, key);
        }
        if let Some(spouse) = spouse {
            link_partner(&mut data, key, spouse, status);
        }

        let next_key = self.next_key;
        self.commit(data, next_key);
        Ok(())
    }

    /// Removes a person and every reference to them.
    pub fn delete_person(&mut self, key: PersonKey) -> Result<(), StoreError> {
        if !contains(&self.family_data, key) {
            return Err(rejected(
                "delete_person",
                StoreError::UnknownPerson(key),
            ));
        }
        let data = self
            .family_data
            .iter()
            .filter(|person| person.key != key)
            .cloned()
            .map(|mut person| {
                if person.father == Some(key) {
                    person.father = None;
                }
                if person.mother == Some(key) {
                    person.mother = None;
                }
                if person.spouse == Some(key) {
                    person.spouse = None;
                    person.relation_status = RelationStatus::Married;
                }
                person
            })
            .collect();
        let next_key = self.next_key;
        self.commit(data, next_key);
        Ok(())
    }

    /// Sets or clears a manual drag override.
    pub fn set_position(
        &mut self,
        key: PersonKey,
        position: Option<Position>,
    ) -> Result<(), StoreError> {
        self.update_person(
            key,
            PersonUpdate {
                position: Some(position),
                ..PersonUpdate::default()
            },
        )
    }

    /// Drops every manual override so the next layout is fully computed.
    pub fn clear_all_positions(&mut self) {
        let data = self
            .family_data
            .iter()
            .cloned()
            .map(|mut person| {
                person.position = None;
                person
            })
            .collect();
        let next_key = self.next_key;
        self.commit(data, next_key);
    }

    /// Stores every laid-out person coordinate as a manual position.
    pub fn pin_positions(&mut self, layout: &Layout) {
        let placed: HashMap<PersonKey, Position> = layout
            .nodes
            .iter()
            .filter_map(|node| Some((node.key?, Position::new(node.x, node.y))))
            .collect();
        let data = self
            .family_data
            .iter()
            .cloned()
            .map(|mut person| {
                if let Some(position) = placed.get(&person.key) {
                    person.position = Some(*position);
                }
                person
            })
            .collect();
        let next_key = self.next_key;
        self.commit(data, next_key);
    }

    pub fn reset(&mut self) {
        self.commit(Vec::new(), 1);
    }

    pub fn import_data(&mut self, document: GenogramDocument) -> Result<(), StoreError> {
        if let Err(error) = validate_family(&document.family_data) {
            tracing::warn!(%error, "rejected import");
            return Err(error);
        }
        let next_key = safe_next_key(&document.family_data, document.next_key);
        self.commit(document.family_data, next_key);
        Ok(())
    }

    pub fn export_data(&self) -> GenogramDocument {
        GenogramDocument::new(self.family_data.clone(), self.next_key)
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = self.swap_in(previous);
        self.future.push(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = self.swap_in(next);
        self.past.push_back(current);
        true
    }

    fn swap_in(&mut self, snapshot: Snapshot) -> Snapshot {
        Snapshot {
            family_data: std::mem::replace(&mut self.family_data, snapshot.family_data),
            next_key: std::mem::replace(&mut self.next_key, snapshot.next_key),
        }
    }

    fn commit(&mut self, family_data: Vec<Person>, next_key: PersonKey) {
        let previous = self.swap_in(Snapshot {
            family_data,
            next_key,
        });
        if self.history_limit > 0 {
            self.past.push_back(previous);
            while self.past.len() > self.history_limit {
                self.past.pop_front();
            }
        }
        self.future.clear();
    }
}

/// Checks the invariants the layout relies on. Dangling references are
/// allowed; the layout ignores them.
pub fn validate_family(persons: &[Person]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(persons.len());
    for person in persons {
        if !seen.insert(person.key) {
            return Err(StoreError::DuplicateKey(person.key));
        }
        for (relation, other) in [
            (Relation::Father, person.father),
            (Relation::Mother, person.mother),
            (Relation::Spouse, person.spouse),
        ] {
            if other == Some(person.key) {
                return Err(StoreError::SelfReference {
                    key: person.key,
                    relation,
                });
            }
        }
        check_quadrants(person)?;
    }
    check_acyclic(persons)
}

fn check_quadrants(person: &Person) -> Result<(), StoreError> {
    let mut used = HashSet::new();
    for marker in &person.attributes {
        let quadrant: Quadrant = marker.quadrant();
        if !used.insert(quadrant) {
            return Err(StoreError::QuadrantConflict {
                key: person.key,
                quadrant,
            });
        }
    }
    Ok(())
}

/// Depth-first walk up the parent edges with three-state marking.
fn check_acyclic(persons: &[Person]) -> Result<(), StoreError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unseen,
        Active,
        Done,
    }

    let by_key: HashMap<PersonKey, &Person> =
        persons.iter().map(|person| (person.key, person)).collect();
    let mut marks: HashMap<PersonKey, Mark> = HashMap::with_capacity(persons.len());

    for start in persons {
        if marks.get(&start.key).copied().unwrap_or(Mark::Unseen) != Mark::Unseen {
            continue;
        }
        // (person, parents left to visit)
        let mut stack: Vec<(PersonKey, Vec<PersonKey>)> = vec![(start.key, parents(start))];
        marks.insert(start.key, Mark::Active);
        while let Some((key, pending)) = stack.last_mut() {
            let key = *key;
            let Some(parent) = pending.pop() else {
                marks.insert(key, Mark::Done);
                stack.pop();
                continue;
            };
            let Some(parent_person) = by_key.get(&parent) else {
                continue;
            };
            match marks.get(&parent).copied().unwrap_or(Mark::Unseen) {
                Mark::Active => return Err(StoreError::CircularParent { key, parent }),
                Mark::Done => {}
                Mark::Unseen => {
                    marks.insert(parent, Mark::Active);
                    stack.push((parent, parents(parent_person)));
                }
            }
        }
    }
    Ok(())
}

fn parents(person: &Person) -> Vec<PersonKey> {
    [person.father, person.mother]
        .into_iter()
        .flatten()
        .filter(|parent| *parent != person.key)
        .collect()
}

/// Every key reachable downward from `key`, computed in one walk.
fn descendants_of(persons: &[Person], key: PersonKey) -> HashSet<PersonKey> {
    let mut children: HashMap<PersonKey, Vec<PersonKey>> = HashMap::new();
    for person in persons {
        for parent in parents(person) {
            children.entry(parent).or_default().push(person.key);
        }
    }
    let mut found = HashSet::new();
    let mut queue = VecDeque::from([key]);
    while let Some(current) = queue.pop_front() {
        for child in children.get(&current).into_iter().flatten() {
            if found.insert(*child) {
                queue.push_back(*child);
            }
        }
    }
    found
}

fn contains(persons: &[Person], key: PersonKey) -> bool {
    persons.iter().any(|person| person.key == key)
}

/// Points `partner` back at `key` with the shared status, releasing whoever
/// `partner` was married to before.
fn link_partner(
    persons: &mut [Person],
    key: PersonKey,
    partner: PersonKey,
    status: RelationStatus,
) {
    let former = persons
        .iter()
        .find(|person| person.key == partner)
        .and_then(|person| person.spouse)
        .filter(|former| *former != key);
    if let Some(former) = former {
        release_partner(persons, former, partner);
    }
    if let Some(person) = persons.iter_mut().find(|person| person.key == partner) {
        person.spouse = Some(key);
        person.relation_status = status;
    }
}

fn release_partner(persons: &mut [Person], released: PersonKey, from: PersonKey) {
    if let Some(person) = persons
        .iter_mut()
        .find(|person| person.key == released && person.spouse == Some(from))
    {
        person.spouse = None;
        person.relation_status = RelationStatus::Married;
    }
}

fn safe_next_key(persons: &[Person], next_key: PersonKey) -> PersonKey {
    let max_key = persons.iter().map(|person| person.key).max().unwrap_or(0);
    next_key.max(max_key.saturating_add(1))
}

fn rejected(operation: &str, error: StoreError) -> StoreError {
    tracing::warn!(operation, %error, "rejected store mutation");
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_couple() -> (GenogramStore, PersonKey, PersonKey) {
        let mut store = GenogramStore::default();
        let dad = store
            .add_person(NewPerson::new("Dad", Gender::Male))
            .expect("add dad");
        let mut mom = NewPerson::new("Mom", Gender::Female);
        mom.spouse = Some(dad);
        let mom = store.add_person(mom).expect("add mom");
        (store, dad, mom)
    }

    fn add_child(store: &mut GenogramStore, father: PersonKey, mother: PersonKey) -> PersonKey {
        let mut child = NewPerson::new("Kid", Gender::Unknown);
        child.father = Some(father);
        child.mother = Some(mother);
        store.add_person(child).expect("add child")
    }

    #[test]
    fn add_person_assigns_keys_and_links_spouse_back() {
        let (store, dad, mom) = store_with_couple();
        assert_eq!((dad, mom), (1, 2));
        assert_eq!(store.next_key(), 3);
        assert_eq!(store.get(dad).and_then(|p| p.spouse), Some(mom));
        assert_eq!(store.get(mom).and_then(|p| p.spouse), Some(dad));
    }

    #[test]
    fn rejects_parent_that_does_not_exist() {
        let mut store = GenogramStore::default();
        let mut orphan = NewPerson::new("Orphan", Gender::Male);
        orphan.father = Some(42);
        let err = store.add_person(orphan).expect_err("missing parent");
        assert_eq!(err, StoreError::MissingParent { key: 1, parent: 42 });
        assert!(store.persons().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn rejects_self_and_descendant_parents_without_touching_history() {
        let (mut store, dad, mom) = store_with_couple();
        let kid = add_child(&mut store, dad, mom);
        let grandkid = add_child(&mut store, kid, mom);
        let history_before = store.past.len();

        let err = store
            .update_person(
                dad,
                PersonUpdate {
                    father: Some(Some(dad)),
                    ..PersonUpdate::default()
                },
            )
            .expect_err("self parent");
        assert_eq!(
            err,
            StoreError::SelfReference {
                key: dad,
                relation: Relation::Father
            }
        );

        let err = store
            .update_person(
                dad,
                PersonUpdate {
                    father: Some(Some(grandkid)),
                    ..PersonUpdate::default()
                },
            )
            .expect_err("descendant parent");
        assert_eq!(
            err,
            StoreError::CircularParent {
                key: dad,
                parent: grandkid
            }
        );
        assert_eq!(store.past.len(), history_before);
    }

    #[test]
    fn rejects_two_markers_in_one_quadrant() {
        let (mut store, dad, _) = store_with_couple();
        let err = store
            .update_person(
                dad,
                PersonUpdate {
                    attributes: Some(vec![AttributeMarker::D, AttributeMarker::F]),
                    ..PersonUpdate::default()
                },
            )
            .expect_err("quadrant conflict");
        assert_eq!(
            err,
            StoreError::QuadrantConflict {
                key: dad,
                quadrant: Quadrant::TopRight
            }
        );
    }

    #[test]
    fn changing_spouse_releases_the_former_partner() {
        let (mut store, dad, mom) = store_with_couple();
        let other = store
            .add_person(NewPerson::new("Other", Gender::Female))
            .expect("add other");
        store
            .update_person(
                dad,
                PersonUpdate {
                    spouse: Some(Some(other)),
                    relation_status: Some(RelationStatus::Divorced),
                    ..PersonUpdate::default()
                },
            )
            .expect("remarry");

        let mom = store.get(mom).expect("mom");
        assert_eq!(mom.spouse, None);
        assert_eq!(mom.relation_status, RelationStatus::Married);
        let other = store.get(other).expect("other");
        assert_eq!(other.spouse, Some(dad));
        assert_eq!(other.relation_status, RelationStatus::Divorced);
    }

    #[test]
    fn delete_clears_dangling_references() {
        let (mut store, dad, mom) = store_with_couple();
        let kid = add_child(&mut store, dad, mom);
        store
            .update_person(
                mom,
                PersonUpdate {
                    relation_status: Some(RelationStatus::Divorced),
                    ..PersonUpdate::default()
                },
            )
            .expect("divorce");
        store.delete_person(dad).expect("delete");

        assert!(store.get(dad).is_none());
        assert_eq!(store.get(kid).and_then(|p| p.father), None);
        assert_eq!(store.get(kid).and_then(|p| p.mother), Some(mom));
        let mom = store.get(mom).expect("mom");
        assert_eq!(mom.spouse, None);
        assert_eq!(mom.relation_status, RelationStatus::Married);
        assert_eq!(
            store.delete_person(dad),
            Err(StoreError::UnknownPerson(dad))
        );
    }

    #[test]
    fn undo_and_redo_swap_snapshots() {
        let (mut store, dad, _) = store_with_couple();
        store
            .set_position(dad, Some(Position::new(5.0, 6.0)))
            .expect("drag");
        assert!(store.get(dad).and_then(|p| p.position).is_some());

        assert!(store.undo());
        assert!(store.get(dad).and_then(|p| p.position).is_none());
        assert!(store.can_redo());
        assert!(store.redo());
        assert_eq!(
            store.get(dad).and_then(|p| p.position),
            Some(Position::new(5.0, 6.0))
        );

        assert!(store.undo());
        store.clear_all_positions();
        assert!(!store.can_redo());
    }

    #[test]
    fn history_is_bounded() {
        let mut store = GenogramStore::new(&HistoryConfig { limit: 2 });
        for idx in 0..5 {
            store
                .add_person(NewPerson::new(format!("P{idx}"), Gender::Unknown))
                .expect("add");
        }
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.persons().len(), 3);
        assert_eq!(store.next_key(), 4);
    }

    #[test]
    fn reset_then_undo_restores_everything() {
        let (mut store, _, _) = store_with_couple();
        store.reset();
        assert!(store.persons().is_empty());
        assert_eq!(store.next_key(), 1);
        assert!(store.undo());
        assert_eq!(store.persons().len(), 2);
    }

    #[test]
    fn pinned_positions_reproduce_the_layout() {
        let (mut store, dad, mom) = store_with_couple();
        add_child(&mut store, dad, mom);
        let theme = Theme::classic();
        let config = LayoutConfig::default();
        let before = store.layout(&theme, &config);

        store.pin_positions(&before);
        assert!(store.persons().iter().all(|p| p.position.is_some()));
        let after = store.layout(&theme, &config);
        for node in &before.nodes {
            let pinned = after.node(&node.id).expect("node survives");
            assert_eq!((pinned.x, pinned.y), (node.x, node.y));
        }

        store.clear_all_positions();
        assert_eq!(store.layout(&theme, &config).nodes, before.nodes);
    }

    #[test]
    fn import_validates_and_repairs_next_key() {
        let mut store = GenogramStore::default();
        let mut a = Person::new(4, "A", Gender::Male);
        a.father = Some(5);
        let mut b = Person::new(5, "B", Gender::Male);
        b.father = Some(4);
        let cyclic = GenogramDocument::new(vec![a.clone(), b], 6);
        assert!(matches!(
            store.import_data(cyclic),
            Err(StoreError::CircularParent { .. })
        ));
        assert!(!store.can_undo());

        a.father = Some(99);
        store
            .import_data(GenogramDocument::new(vec![a], 1))
            .expect("dangling father is fine");
        assert_eq!(store.next_key(), 5);
        assert_eq!(store.export_data().version, "1.0");
    }

    #[test]
    fn from_json_separates_parse_and_validation_errors() {
        let history = HistoryConfig::default();
        let malformed = GenogramStore::from_json("{\"version\":", &history);
        assert!(matches!(malformed, Err(DocumentError::Parse(_))));

        let cyclic = r#"{"version":"1.0","nextKey":3,"familyData":[
            {"key":1,"name":"A","gender":"M","father":2},
            {"key":2,"name":"B","gender":"M","father":1}
        ]}"#;
        let err = GenogramStore::from_json(cyclic, &history).expect_err("cycle is rejected");
        assert!(matches!(
            err,
            DocumentError::Invalid(StoreError::CircularParent { .. })
        ));

        let stale_counter = r#"{"version":"1.0","nextKey":1,"familyData":[
            {"key":4,"name":"A","gender":"F"}
        ]}"#;
        let store = GenogramStore::from_json(stale_counter, &history).expect("valid document loads");
        assert_eq!(store.next_key(), 5);
    }

    #[test]
    fn validate_family_reports_duplicates() {
        let persons = vec![
            Person::new(1, "A", Gender::Male),
            Person::new(1, "B", Gender::Female),
        ];
        assert_eq!(validate_family(&persons), Err(StoreError::DuplicateKey(1)));
    }
}
