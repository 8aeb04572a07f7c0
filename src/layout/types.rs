use crate::model::{BirthStatus, Gender, Person, PersonKey, Quadrant};

/// Rendered form of a node, resolved once per person while positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Male,
    Female,
    Unknown,
    Pet,
    Pregnancy(BirthStatus),
    MarriageAnchor,
    TwinAnchor,
}

impl NodeKind {
    pub fn for_person(person: &Person) -> Self {
        if person.birth_status != BirthStatus::Normal {
            return NodeKind::Pregnancy(person.birth_status);
        }
        match person.gender {
            Gender::Male => NodeKind::Male,
            Gender::Female => NodeKind::Female,
            Gender::Unknown => NodeKind::Unknown,
            Gender::Pet => NodeKind::Pet,
        }
    }

    pub fn is_anchor(self) -> bool {
        matches!(self, NodeKind::MarriageAnchor | NodeKind::TwinAnchor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Male => "male",
            NodeKind::Female => "female",
            NodeKind::Unknown => "unknown",
            NodeKind::Pet => "pet",
            NodeKind::Pregnancy(_) => "pregnancy",
            NodeKind::MarriageAnchor => "marriageAnchor",
            NodeKind::TwinAnchor => "twinAnchor",
        }
    }
}

/// Where a node's coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    Computed,
    Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayout {
    pub quadrant: Quadrant,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayData {
    pub name: String,
    pub age: Option<u32>,
    pub deceased: bool,
    pub is_adopted: bool,
    pub is_foster: bool,
    pub birth_status: BirthStatus,
    pub markers: Vec<MarkerLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub key: Option<PersonKey>,
    pub kind: NodeKind,
    /// Top-left corner for person nodes; the point itself for anchors.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub generation: usize,
    pub source: PositionSource,
    pub data: Option<DisplayData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Marriage,
    Child,
    Twin,
    SiblingLink,
}

impl ConnectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectorKind::Marriage => "marriage",
            ConnectorKind::Child => "child",
            ConnectorKind::Twin => "twin",
            ConnectorKind::SiblingLink => "siblingLink",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
}

impl Handle {
    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Top => "top",
            Handle::Bottom => "bottom",
            Handle::Left => "left",
            Handle::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleFlags {
    pub divorced: bool,
    pub adopted: bool,
    pub foster: bool,
    pub identical: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
    pub dasharray: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorGeometry {
    Straight {
        from: (f32, f32),
        to: (f32, f32),
    },
    /// Down, across at `split_y`, down. Collapses to two points when the
    /// endpoints are vertically aligned.
    Step {
        points: Vec<(f32, f32)>,
        split_y: f32,
        split_ratio: f32,
    },
    /// Source to hub, then hub to every target.
    Fan {
        source: (f32, f32),
        hub: (f32, f32),
        targets: Vec<(f32, f32)>,
        hub_ratio: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub id: String,
    pub kind: ConnectorKind,
    pub source: String,
    pub target: String,
    pub source_handle: Handle,
    pub target_handle: Handle,
    /// Ordered member ids of a twin fan-out; empty for other kinds.
    pub members: Vec<String>,
    pub flags: StyleFlags,
    pub stroke: Stroke,
    pub geometry: ConnectorGeometry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub nodes: Vec<PositionedNode>,
    pub connectors: Vec<Connector>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn person_node(&self, key: PersonKey) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.key == Some(key))
    }

    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|connector| connector.id == id)
    }

    pub fn connectors_of_kind(&self, kind: ConnectorKind) -> impl Iterator<Item = &Connector> {
        self.connectors
            .iter()
            .filter(move |connector| connector.kind == kind)
    }
}
