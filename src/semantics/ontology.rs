//! Daltonism ontology catalog.
//!
//! A static JSON-LD graph describing the deficiency types (labels,
//! comments, missing wavelength component, perceived colors), embedded in
//! the binary and parsed once at startup. Used for documentation and
//! response enrichment only; nothing here computes.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::transform;
use crate::models::DeficiencyType;

/// The class name the toy query facility recognizes.
const DALTONISM_CLASS: &str = "cs:Daltonism";

/// Static descriptive graph of deficiency-type metadata.
#[derive(Debug, Clone)]
pub struct OntologyCatalog {
    graph: Value,
}

impl OntologyCatalog {
    /// Loads the catalog from the embedded JSON-LD resource.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("ontology.json");
        let graph: Value =
            serde_json::from_str(json_data).context("Failed to parse embedded ontology.json")?;
        Ok(Self { graph })
    }

    /// Returns the full JSON-LD graph.
    #[must_use]
    pub const fn graph(&self) -> &Value {
        &self.graph
    }

    /// Toy query facility over the graph.
    ///
    /// Performs a literal substring check for `cs:Daltonism` in the query
    /// string and, on match, returns the graph nodes typed as that class
    /// (the three deficiency individuals). Any other query yields no
    /// results. This is not a query evaluator and must stay that way.
    #[must_use]
    pub fn query(&self, query: &str) -> Vec<Value> {
        if !query.contains(DALTONISM_CLASS) {
            return Vec::new();
        }

        self.graph["@graph"]
            .as_array()
            .map(|nodes| {
                nodes
                    .iter()
                    .filter(|node| node_has_type(node, DALTONISM_CLASS))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Exposes the transform table for a deficiency type as a JSON object,
    /// the same data the adaptation engine resolves against.
    #[must_use]
    pub fn transformations(&self, deficiency_type: DeficiencyType) -> Map<String, Value> {
        transform::entries(deficiency_type)
            .iter()
            .map(|(original, adapted)| {
                ((*original).to_string(), Value::String((*adapted).to_string()))
            })
            .collect()
    }
}

/// Checks whether a graph node's `@type` names the given class, either as
/// a plain string or as one entry of a type array.
fn node_has_type(node: &Value, class: &str) -> bool {
    match node.get("@type") {
        Some(Value::String(ty)) => ty == class,
        Some(Value::Array(types)) => types.iter().any(|ty| ty == class),
        _ => false,
    }
}
