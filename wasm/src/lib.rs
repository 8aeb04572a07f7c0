use genogram_layout::{LayoutOptions, layout_document_str, parse_config};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenogramLayoutOptions {
    theme: Option<String>,
    /// Full config document, same shape as the CLI's `--configFile`.
    config: Option<serde_json::Value>,
    relayout: Option<bool>,
}

fn build_layout_options(options: GenogramLayoutOptions) -> Result<LayoutOptions, String> {
    let mut layout_options = match options.config {
        Some(config) => {
            let config = parse_config(&config.to_string()).map_err(|error| error.to_string())?;
            LayoutOptions::with_config(&config)
        }
        None => LayoutOptions::classic(),
    };

    match options.theme.as_deref() {
        None => {}
        Some("classic") | Some("default") => layout_options.theme = LayoutOptions::classic().theme,
        Some("monochrome") | Some("print") => {
            layout_options.theme = LayoutOptions::monochrome().theme
        }
        Some(other) => return Err(format!("unknown theme '{other}'")),
    }
    layout_options.relayout = options.relayout.unwrap_or(false);
    Ok(layout_options)
}

#[wasm_bindgen]
pub fn compute_genogram_layout(
    document_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<GenogramLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        GenogramLayoutOptions::default()
    };

    let layout_options = build_layout_options(options).map_err(|error| JsValue::from_str(&error))?;
    layout_document_str(document_json, &layout_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
