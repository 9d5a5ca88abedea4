//! Node templates and the palette that supplies them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Stable identifier of a node template (and of the node placed from it).
pub type NodeId = String;
/// Identifier of a column, unique within its node.
pub type ColumnId = String;

/// A single column of a table template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub column_id: ColumnId,
    pub name: String,
    #[serde(alias = "column_data_type")]
    pub data_type: String,
}

impl ColumnSpec {
    pub fn new(
        column_id: impl Into<ColumnId>,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Read-only description of a table available for placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub id: NodeId,
    pub name: String,
    /// Columns in display order.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl NodeTemplate {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column (builder style).
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Look up a column by id.
    pub fn column(&self, column_id: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.column_id == column_id)
    }

    /// Ordinal position of a column within this template.
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column_id == column_id)
    }
}

/// Palette errors.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("Failed to read palette: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse palette: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate template id in palette: {0}")]
    DuplicateTemplate(NodeId),
}

/// Ordered, read-only provider of node templates.
pub trait PaletteSource {
    /// All templates in display order.
    fn templates(&self) -> &[NodeTemplate];

    /// Find a template by id.
    fn template(&self, id: &str) -> Option<&NodeTemplate> {
        self.templates().iter().find(|t| t.id == id)
    }
}

/// A palette backed by an in-memory list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Palette {
    templates: Vec<NodeTemplate>,
}

impl Palette {
    /// Build a palette, rejecting duplicate template ids.
    pub fn new(templates: Vec<NodeTemplate>) -> Result<Self, PaletteError> {
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.id.as_str()) {
                return Err(PaletteError::DuplicateTemplate(template.id.clone()));
            }
        }
        Ok(Self { templates })
    }

    /// Parse a palette from a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        let templates: Vec<NodeTemplate> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    /// Load a palette from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaletteError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The Employees/Departments sample palette.
    pub fn sample() -> Self {
        Self {
            templates: vec![
                NodeTemplate::new("employees", "Employees")
                    .with_column(ColumnSpec::new("emp_id", "ID", "integer"))
                    .with_column(ColumnSpec::new("emp_name", "Name", "varchar"))
                    .with_column(ColumnSpec::new("emp_dept", "Department", "varchar")),
                NodeTemplate::new("departments", "Departments")
                    .with_column(ColumnSpec::new("dept_id", "ID", "integer"))
                    .with_column(ColumnSpec::new("dept_name", "Name", "varchar")),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl PaletteSource for Palette {
    fn templates(&self) -> &[NodeTemplate] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_palette_order() {
        let palette = Palette::sample();
        let ids: Vec<&str> = palette.templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["employees", "departments"]);
    }

    #[test]
    fn test_column_index() {
        let palette = Palette::sample();
        let employees = palette.template("employees").unwrap();
        assert_eq!(employees.column_index("emp_dept"), Some(2));
        assert_eq!(employees.column_index("missing"), None);
        assert_eq!(employees.column("emp_name").unwrap().name, "Name");
    }

    #[test]
    fn test_from_json_accepts_legacy_data_type_field() {
        let json = r#"[
            { "id": "orders", "name": "Orders", "columns": [
                { "column_id": "order_id", "name": "ID", "column_data_type": "integer" }
            ] }
        ]"#;
        let palette = Palette::from_json(json).unwrap();
        let orders = palette.template("orders").unwrap();
        assert_eq!(orders.columns[0].data_type, "integer");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            { "id": "orders", "name": "Orders" },
            { "id": "orders", "name": "Orders again" }
        ]"#;
        assert!(matches!(
            Palette::from_json(json),
            Err(PaletteError::DuplicateTemplate(id)) if id == "orders"
        ));
    }
}
