use crate::model::AttributeMarker;
use crate::theme::Theme;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Shared defaults for callers that lay out on every edit without a config file.
pub static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Bounding box width of a person node.
    pub node_width: f32,
    pub node_height: f32,
    /// Side of the drawn symbol inside the node box; handles sit on its edges.
    pub icon_size: f32,
    pub horizontal_spacing: f32,
    pub spouse_spacing: f32,
    /// Floor-to-floor distance between generations.
    pub vertical_spacing: f32,
    /// Gap between independent family trees.
    pub tree_spacing: f32,
    pub corner_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 80.0,
            node_height: 80.0,
            icon_size: 40.0,
            horizontal_spacing: 30.0,
            spouse_spacing: 50.0,
            vertical_spacing: 150.0,
            tree_spacing: 100.0,
            corner_radius: 5.0,
        }
    }
}

impl LayoutConfig {
    /// Horizontal distance from a node box edge to its left/right handle.
    pub fn handle_inset(&self) -> f32 {
        ((self.node_width - self.icon_size) / 2.0).max(0.0)
    }

    pub fn couple_width(&self, paired: bool) -> f32 {
        if paired {
            self.node_width + self.spouse_spacing + self.node_width
        } else {
            self.node_width
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots kept by the store.
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    marriage_color: Option<String>,
    divorced_color: Option<String>,
    divorced_dasharray: Option<String>,
    relation_line_width: Option<NumberOrString>,
    child_color: Option<String>,
    adopted_color: Option<String>,
    foster_color: Option<String>,
    adopted_dasharray: Option<String>,
    foster_dasharray: Option<String>,
    twin_color: Option<String>,
    line_width: Option<NumberOrString>,
    attribute_colors: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    icon_size: Option<f32>,
    horizontal_spacing: Option<f32>,
    spouse_spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    tree_spacing: Option<f32>,
    corner_radius: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct HistoryConfigFile {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    history: Option<HistoryConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(DEFAULT_CONFIG.clone());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON (or JSON5) config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = DEFAULT_CONFIG.clone();
    if contents.trim().is_empty() {
        return Ok(config);
    }
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "classic" | "default" => config.theme = Theme::classic(),
            "monochrome" | "print" => config.theme = Theme::monochrome(),
            other => {
                return Err(anyhow::anyhow!("unknown theme '{other}'"));
            }
        }
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars)?;
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.node_width {
            target.node_width = v;
        }
        if let Some(v) = layout.node_height {
            target.node_height = v;
        }
        if let Some(v) = layout.icon_size {
            target.icon_size = v;
        }
        if let Some(v) = layout.horizontal_spacing {
            target.horizontal_spacing = v;
        }
        if let Some(v) = layout.spouse_spacing {
            target.spouse_spacing = v;
        }
        if let Some(v) = layout.vertical_spacing {
            target.vertical_spacing = v;
        }
        if let Some(v) = layout.tree_spacing {
            target.tree_spacing = v;
        }
        if let Some(v) = layout.corner_radius {
            target.corner_radius = v;
        }
    }

    if let Some(history) = parsed.history
        && let Some(limit) = history.limit
    {
        config.history.limit = limit;
    }

    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) -> anyhow::Result<()> {
    if let Some(v) = vars.marriage_color {
        theme.marriage_color = v;
    }
    if let Some(v) = vars.divorced_color {
        theme.divorced_color = v;
    }
    if let Some(v) = vars.divorced_dasharray {
        theme.divorced_dasharray = v;
    }
    if let Some(v) = vars.relation_line_width.as_ref().and_then(NumberOrString::as_f32) {
        theme.relation_line_width = v;
    }
    if let Some(v) = vars.child_color {
        theme.child_color = v;
    }
    if let Some(v) = vars.adopted_color {
        theme.adopted_color = v;
    }
    if let Some(v) = vars.foster_color {
        theme.foster_color = v;
    }
    if let Some(v) = vars.adopted_dasharray {
        theme.adopted_dasharray = v;
    }
    if let Some(v) = vars.foster_dasharray {
        theme.foster_dasharray = v;
    }
    if let Some(v) = vars.twin_color {
        theme.twin_color = v;
    }
    if let Some(v) = vars.line_width.as_ref().and_then(NumberOrString::as_f32) {
        theme.line_width = v;
    }
    if let Some(colors) = vars.attribute_colors {
        for (code, color) in colors {
            let marker = AttributeMarker::from_code(&code)
                .ok_or_else(|| anyhow::anyhow!("unknown attribute marker '{code}'"))?;
            theme.attribute_colors.insert(marker, color);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").expect("empty config");
        assert_eq!(config.layout.node_width, 80.0);
        assert_eq!(config.layout.handle_inset(), 20.0);
        assert_eq!(config.history.limit, 100);
    }

    #[test]
    fn json5_overrides_layout_and_theme() {
        let input = r##"{
            // tighter sibling spacing for printouts
            theme: "monochrome",
            themeVariables: { lineWidth: "3", attributeColors: { A: "#123456" } },
            layout: { horizontalSpacing: 12, spouseSpacing: 40 },
            history: { limit: 5 },
        }"##;
        let config = parse_config(input).expect("config should parse");
        assert_eq!(config.layout.horizontal_spacing, 12.0);
        assert_eq!(config.layout.couple_width(true), 200.0);
        assert_eq!(config.theme.line_width, 3.0);
        assert_eq!(config.theme.foster_dasharray, "2,3");
        assert_eq!(config.theme.attribute_color(AttributeMarker::A), Some("#123456"));
        assert_eq!(config.history.limit, 5);
    }

    #[test]
    fn rejects_unknown_marker_and_theme() {
        assert!(parse_config(r#"{"themeVariables": {"attributeColors": {"Z": "red"}}}"#).is_err());
        assert!(parse_config(r#"{"theme": "neon"}"#).is_err());
    }
}
