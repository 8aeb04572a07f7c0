use crate::model::AttributeMarker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ATTRIBUTE_COLORS: [(AttributeMarker, &str); 12] = [
    (AttributeMarker::A, "#00af54"),
    (AttributeMarker::B, "#f27935"),
    (AttributeMarker::C, "#d4071c"),
    (AttributeMarker::D, "#70bdc2"),
    (AttributeMarker::E, "#fcf384"),
    (AttributeMarker::F, "#e69aaf"),
    (AttributeMarker::G, "#08488f"),
    (AttributeMarker::H, "#866310"),
    (AttributeMarker::I, "#9270c2"),
    (AttributeMarker::J, "#a3cf62"),
    (AttributeMarker::K, "#91a4c2"),
    (AttributeMarker::L, "#af70c2"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub marriage_color: String,
    pub divorced_color: String,
    pub divorced_dasharray: String,
    pub relation_line_width: f32,
    pub child_color: String,
    pub adopted_color: String,
    pub foster_color: String,
    pub adopted_dasharray: String,
    pub foster_dasharray: String,
    pub twin_color: String,
    pub line_width: f32,
    pub attribute_colors: BTreeMap<AttributeMarker, String>,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            marriage_color: "blue".to_string(),
            divorced_color: "red".to_string(),
            divorced_dasharray: "10,4".to_string(),
            relation_line_width: 2.5,
            child_color: "gray".to_string(),
            adopted_color: "#2196F3".to_string(),
            foster_color: "#4CAF50".to_string(),
            adopted_dasharray: "5,5".to_string(),
            foster_dasharray: "5,5".to_string(),
            twin_color: "black".to_string(),
            line_width: 2.0,
            attribute_colors: default_attribute_colors(),
        }
    }

    /// Print-friendly variant: every line black, so adopted and foster lines
    /// get distinct dash patterns.
    pub fn monochrome() -> Self {
        Self {
            marriage_color: "#000000".to_string(),
            divorced_color: "#000000".to_string(),
            adopted_color: "#000000".to_string(),
            foster_color: "#000000".to_string(),
            child_color: "#000000".to_string(),
            twin_color: "#000000".to_string(),
            foster_dasharray: "2,3".to_string(),
            ..Self::classic()
        }
    }

    pub fn attribute_color(&self, marker: AttributeMarker) -> Option<&str> {
        self.attribute_colors.get(&marker).map(String::as_str)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

fn default_attribute_colors() -> BTreeMap<AttributeMarker, String> {
    ATTRIBUTE_COLORS
        .iter()
        .map(|(marker, color)| (*marker, color.to_string()))
        .collect()
}
