use crate::config::LayoutConfig;
use crate::layout::{Connector, ConnectorGeometry, Layout, NodeKind, PositionSource, PositionedNode};
use crate::model::{BirthStatus, Quadrant};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub key: Option<u32>,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_status: Option<BirthStatus>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub generation: usize,
    pub manual: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeDataDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDataDump {
    pub name: String,
    pub age: Option<u32>,
    pub deceased: bool,
    pub is_adopted: bool,
    pub is_foster: bool,
    pub markers: Vec<MarkerDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDump {
    pub quadrant: Quadrant,
    pub color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorDump {
    pub id: String,
    pub kind: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    pub divorced: bool,
    pub adopted: bool,
    pub foster: bool,
    pub identical: bool,
    pub stroke: String,
    pub stroke_width: f32,
    pub stroke_dasharray: Option<String>,
    pub points: Vec<[f32; 2]>,
    pub path: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, config: &LayoutConfig) -> Self {
        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes: layout.nodes.iter().map(NodeDump::from_node).collect(),
            connectors: layout
                .connectors
                .iter()
                .map(|connector| ConnectorDump::from_connector(connector, config.corner_radius))
                .collect(),
        }
    }
}

impl NodeDump {
    fn from_node(node: &PositionedNode) -> Self {
        let birth_status = match node.kind {
            NodeKind::Pregnancy(status) => Some(status),
            _ => None,
        };
        NodeDump {
            id: node.id.clone(),
            key: node.key,
            kind: node.kind.as_str().to_string(),
            birth_status,
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            generation: node.generation,
            manual: node.source == PositionSource::Manual,
            data: node.data.as_ref().map(|data| NodeDataDump {
                name: data.name.clone(),
                age: data.age,
                deceased: data.deceased,
                is_adopted: data.is_adopted,
                is_foster: data.is_foster,
                markers: data
                    .markers
                    .iter()
                    .map(|marker| MarkerDump {
                        quadrant: marker.quadrant,
                        color: marker.color.clone(),
                    })
                    .collect(),
            }),
        }
    }
}

impl ConnectorDump {
    fn from_connector(connector: &Connector, corner_radius: f32) -> Self {
        let geometry: &ConnectorGeometry = &connector.geometry;
        ConnectorDump {
            id: connector.id.clone(),
            kind: connector.kind.as_str().to_string(),
            source: connector.source.clone(),
            target: connector.target.clone(),
            source_handle: connector.source_handle.as_str().to_string(),
            target_handle: connector.target_handle.as_str().to_string(),
            members: connector.members.clone(),
            divorced: connector.flags.divorced,
            adopted: connector.flags.adopted,
            foster: connector.flags.foster,
            identical: connector.flags.identical,
            stroke: connector.stroke.color.clone(),
            stroke_width: connector.stroke.width,
            stroke_dasharray: connector.stroke.dasharray.clone(),
            points: geometry.points().iter().map(|(x, y)| [*x, *y]).collect(),
            path: geometry.path_data(corner_radius),
        }
    }
}

pub fn layout_dump_json(layout: &Layout, config: &LayoutConfig) -> anyhow::Result<String> {
    let dump = LayoutDump::from_layout(layout, config);
    Ok(serde_json::to_string_pretty(&dump)?)
}

pub fn write_layout_dump(path: &Path, layout: &Layout, config: &LayoutConfig) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::model::{Gender, Person};
    use crate::theme::Theme;

    #[test]
    fn dump_uses_camel_case_and_svg_paths() {
        let mut dad = Person::new(1, "Dad", Gender::Male);
        let mut mom = Person::new(2, "Mom", Gender::Female);
        dad.spouse = Some(2);
        mom.spouse = Some(1);
        let mut kid = Person::new(3, "Kid", Gender::Female);
        kid.father = Some(1);
        kid.mother = Some(2);
        kid.is_adopted = true;
        let config = LayoutConfig::default();
        let layout = compute_layout(&[dad, mom, kid], &Theme::classic(), &config);

        let json = layout_dump_json(&layout, &config).expect("dump serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        let connectors = value["connectors"].as_array().expect("connectors");
        assert_eq!(connectors.len(), 2);
        assert_eq!(connectors[0]["kind"], "marriage");
        assert_eq!(connectors[0]["sourceHandle"], "right");
        assert_eq!(connectors[1]["id"], "child-marriage-node-1-2-3");
        assert_eq!(connectors[1]["strokeDasharray"], "5,5");
        assert!(
            connectors[1]["path"]
                .as_str()
                .expect("path string")
                .starts_with("M ")
        );

        let kinds: Vec<&str> = value["nodes"]
            .as_array()
            .expect("nodes")
            .iter()
            .filter_map(|node| node["kind"].as_str())
            .collect();
        assert!(kinds.contains(&"marriageAnchor"));
        assert_eq!(value["nodes"][0]["data"]["isAdopted"], false);
    }

    #[test]
    fn writes_dump_to_file() {
        let config = LayoutConfig::default();
        let layout = compute_layout(
            &[Person::new(1, "Solo", Gender::Female)],
            &Theme::classic(),
            &config,
        );
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("layout.json");
        write_layout_dump(&path, &layout, &config).expect("dump written");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read dump"))
                .expect("valid json");
        assert_eq!(value["nodes"][0]["id"], "1");
        assert_eq!(value["connectors"].as_array().map(Vec::len), Some(0));
    }
}
