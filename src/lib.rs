#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod store;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, HistoryConfig, LayoutConfig, load_config, parse_config};
pub use error::{DocumentError, Relation, StoreError};
pub use layout::{
    CHILD_SPLIT_RATIO, Connector, ConnectorGeometry, ConnectorKind, Handle, Layout, NodeKind,
    PositionSource, PositionedNode, TWIN_HUB_RATIO, compute_layout,
};
pub use layout_dump::{LayoutDump, layout_dump_json, write_layout_dump};
pub use model::{
    AttributeMarker, BirthStatus, FamilyIndex, Gender, GenogramDocument, Person, PersonKey,
    Position, RelationStatus,
};
pub use store::{GenogramStore, NewPerson, PersonUpdate, validate_family};
pub use theme::Theme;

/// Theme and layout settings for the one-call entry points.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    /// Drop stored manual positions before laying out.
    pub relayout: bool,
}

impl LayoutOptions {
    pub fn classic() -> Self {
        Self::default()
    }

    pub fn monochrome() -> Self {
        Self {
            theme: Theme::monochrome(),
            ..Self::default()
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
            relayout: false,
        }
    }
}

/// Lays out a document in its persisted JSON form.
pub fn layout_document(document: &GenogramDocument, options: &LayoutOptions) -> Layout {
    if options.relayout {
        let persons: Vec<Person> = document
            .family_data
            .iter()
            .cloned()
            .map(|mut person| {
                person.position = None;
                person
            })
            .collect();
        return compute_layout(&persons, &options.theme, &options.layout);
    }
    compute_layout(&document.family_data, &options.theme, &options.layout)
}

/// Parses a document and returns the layout dump JSON.
pub fn layout_document_str(input: &str, options: &LayoutOptions) -> anyhow::Result<String> {
    let document = GenogramDocument::from_json(input)?;
    let layout = layout_document(&document, options);
    layout_dump_json(&layout, &options.layout)
}
