pub mod config;
pub mod geometry;
pub mod layout;
pub mod measure;
pub mod schema;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use config::DiagramOptions;
use layout::{Diagram, DiagramEngine};
use schema::{Relationship, Table};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Generate draw instructions for a schema.
pub fn generate_diagram(
    tables: &[Table],
    relationships: &[Relationship],
    options: &DiagramOptions,
) -> Diagram {
    DiagramEngine::new(options.clone()).generate(tables, relationships)
}

#[derive(Debug, Deserialize)]
struct SchemaInput {
    tables: Vec<Table>,
    #[serde(default)]
    relationships: Vec<Relationship>,
    #[serde(default)]
    options: DiagramOptions,
}

/// Render a JSON schema description to JSON draw instructions.
#[wasm_bindgen(js_name = "schemaToDiagram")]
pub fn schema_to_diagram(input: &str) -> Result<String, String> {
    let input: SchemaInput = serde_json::from_str(input).map_err(|e| e.to_string())?;
    for table in &input.tables {
        table.validate().map_err(|e| e.to_string())?;
    }
    let diagram = DiagramEngine::new(input.options).generate(&input.tables, &input.relationships);
    serde_json::to_string(&diagram).map_err(|e| e.to_string())
}
