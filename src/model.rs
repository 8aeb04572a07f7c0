use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type PersonKey = u32;

/// Version tag written into exported documents.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "U")]
    Unknown,
    #[serde(rename = "P")]
    Pet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BirthStatus {
    #[default]
    Normal,
    Pregnancy,
    Miscarriage,
    Abortion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    #[default]
    Married,
    Divorced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeMarker {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl AttributeMarker {
    pub const ALL: [AttributeMarker; 12] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|marker| format!("{marker:?}") == code.trim())
    }

    pub fn quadrant(self) -> Quadrant {
        match self {
            Self::A | Self::B | Self::C => Quadrant::TopLeft,
            Self::D | Self::E | Self::F => Quadrant::TopRight,
            Self::G | Self::H | Self::I => Quadrant::BottomRight,
            Self::J | Self::K | Self::L => Quadrant::BottomLeft,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub key: PersonKey,
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub deceased: bool,
    #[serde(default)]
    pub father: Option<PersonKey>,
    #[serde(default)]
    pub mother: Option<PersonKey>,
    #[serde(default)]
    pub spouse: Option<PersonKey>,
    #[serde(default)]
    pub relation_status: RelationStatus,
    #[serde(default)]
    pub attributes: Vec<AttributeMarker>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub is_adopted: bool,
    #[serde(default)]
    pub is_foster: bool,
    #[serde(default)]
    pub birth_status: BirthStatus,
    #[serde(default)]
    pub twin_group: Option<u32>,
    #[serde(default)]
    pub is_identical_twin: bool,
}

impl Person {
    pub fn new(key: PersonKey, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            key,
            name: name.into(),
            gender,
            age: None,
            deceased: false,
            father: None,
            mother: None,
            spouse: None,
            relation_status: RelationStatus::Married,
            attributes: Vec::new(),
            position: None,
            is_adopted: false,
            is_foster: false,
            birth_status: BirthStatus::Normal,
            twin_group: None,
            is_identical_twin: false,
        }
    }

    /// Twin group id; zero is treated as "not a twin".
    pub fn twin_group(&self) -> Option<u32> {
        self.twin_group.filter(|group| *group > 0)
    }

    pub fn age_or_zero(&self) -> u32 {
        self.age.unwrap_or(0)
    }
}

/// The persisted project file: format tag, key counter and every person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenogramDocument {
    pub version: String,
    pub next_key: PersonKey,
    pub family_data: Vec<Person>,
}

impl GenogramDocument {
    pub fn new(family_data: Vec<Person>, next_key: PersonKey) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            next_key,
            family_data,
        }
    }

    pub fn from_json(input: &str) -> Result<Self, crate::error::DocumentError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, crate::error::DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read-only lookup tables over a person collection.
///
/// Dangling or self-referencing father/mother/spouse keys resolve to `None`, so
/// every consumer sees the relaxed view of the data without re-checking.
pub struct FamilyIndex<'a> {
    persons: &'a [Person],
    by_key: HashMap<PersonKey, usize>,
    children: Vec<Vec<usize>>,
}

impl<'a> FamilyIndex<'a> {
    pub fn new(persons: &'a [Person]) -> Self {
        let mut by_key = HashMap::with_capacity(persons.len());
        for (idx, person) in persons.iter().enumerate() {
            by_key.entry(person.key).or_insert(idx);
        }
        let mut index = Self {
            persons,
            by_key,
            children: vec![Vec::new(); persons.len()],
        };
        for idx in 0..persons.len() {
            let father = index.father_of(idx);
            let mother = index.mother_of(idx);
            if let Some(parent) = father {
                index.children[parent].push(idx);
            }
            if let Some(parent) = mother
                && Some(parent) != father
            {
                index.children[parent].push(idx);
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn persons(&self) -> &'a [Person] {
        self.persons
    }

    pub fn person(&self, idx: usize) -> &'a Person {
        &self.persons[idx]
    }

    pub fn index_of(&self, key: PersonKey) -> Option<usize> {
        self.by_key.get(&key).copied()
    }

    pub fn get(&self, key: PersonKey) -> Option<&'a Person> {
        self.index_of(key).map(|idx| &self.persons[idx])
    }

    fn resolve(&self, idx: usize, key: Option<PersonKey>) -> Option<usize> {
        let key = key?;
        if key == self.persons[idx].key {
            return None;
        }
        self.index_of(key)
    }

    pub fn father_of(&self, idx: usize) -> Option<usize> {
        self.resolve(idx, self.persons[idx].father)
    }

    pub fn mother_of(&self, idx: usize) -> Option<usize> {
        self.resolve(idx, self.persons[idx].mother)
    }

    pub fn spouse_of(&self, idx: usize) -> Option<usize> {
        self.resolve(idx, self.persons[idx].spouse)
    }

    /// Children recorded with `idx` as father or mother, in collection order.
    pub fn children_of(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub fn is_root(&self, idx: usize) -> bool {
        self.father_of(idx).is_none() && self.mother_of(idx).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_and_self_references_resolve_to_none() {
        let mut child = Person::new(3, "Child", Gender::Female);
        child.father = Some(1);
        child.mother = Some(99);
        child.spouse = Some(3);
        let persons = vec![Person::new(1, "Dad", Gender::Male), child];
        let index = FamilyIndex::new(&persons);

        assert_eq!(index.father_of(1), Some(0));
        assert_eq!(index.mother_of(1), None);
        assert_eq!(index.spouse_of(1), None);
        assert_eq!(index.children_of(0), &[1]);
        assert!(index.is_root(0));
        assert!(!index.is_root(1));
    }

    #[test]
    fn parses_persisted_document_shape() {
        let input = r#"{
            "version": "1.0",
            "nextKey": 3,
            "familyData": [
                {"key": 1, "name": "Kim", "gender": "M", "spouse": 2, "relationStatus": "divorced",
                 "attributes": ["A", "G"], "position": {"x": 10.5, "y": 20}},
                {"key": 2, "name": "Lee", "gender": "F", "age": null, "spouse": 1,
                 "birthStatus": "pregnancy", "twinGroup": null, "isIdenticalTwin": false}
            ]
        }"#;
        let doc = GenogramDocument::from_json(input).expect("document should parse");
        assert_eq!(doc.next_key, 3);
        assert_eq!(doc.family_data[0].relation_status, RelationStatus::Divorced);
        assert_eq!(doc.family_data[0].position, Some(Position::new(10.5, 20.0)));
        assert_eq!(doc.family_data[1].birth_status, BirthStatus::Pregnancy);

        let json = doc.to_json_pretty().expect("serialize");
        assert!(json.contains("\"nextKey\": 3"));
        assert!(json.contains("\"gender\": \"F\""));
    }

    #[test]
    fn markers_map_to_quadrants() {
        assert_eq!(AttributeMarker::B.quadrant(), Quadrant::TopLeft);
        assert_eq!(AttributeMarker::E.quadrant(), Quadrant::TopRight);
        assert_eq!(AttributeMarker::H.quadrant(), Quadrant::BottomRight);
        assert_eq!(AttributeMarker::L.quadrant(), Quadrant::BottomLeft);
    }

    #[test]
    fn zero_twin_group_is_not_a_twin() {
        let mut person = Person::new(1, "A", Gender::Unknown);
        person.twin_group = Some(0);
        assert_eq!(person.twin_group(), None);
        person.twin_group = Some(4);
        assert_eq!(person.twin_group(), Some(4));
    }
}
