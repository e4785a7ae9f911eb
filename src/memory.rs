//! In-memory attribute store for fixtures and tests.
//!
//! Small known-value datasets are assembled through the fluent builder and
//! handed to the resolver like any other store. Insertion order is
//! preserved, so detector tie-breaks ("first encountered wins") are
//! deterministic.

use crate::error::{Result, SgridError};
use crate::model::GridArray;
use crate::slice::DimSlice;
use crate::store::AttributeStore;

/// A variable held by a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryVariable {
    name: String,
    dimensions: Vec<String>,
    attributes: Vec<(String, String)>,
    values: Option<GridArray>,
}

impl MemoryVariable {
    /// Create a variable with no dimensions, attributes, or payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the variable's dimension names.
    pub fn with_dimensions(mut self, dimensions: &[&str]) -> Self {
        self.dimensions = dimensions.iter().map(|dim| dim.to_string()).collect();
        self
    }

    /// Add a textual attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Attach a numeric payload.
    pub fn with_values(mut self, values: GridArray) -> Self {
        self.values = Some(values);
        self
    }
}

/// In-memory [`AttributeStore`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    dimensions: Vec<(String, usize)>,
    variables: Vec<MemoryVariable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset dimension.
    pub fn with_dimension(mut self, name: impl Into<String>, size: usize) -> Self {
        self.dimensions.push((name.into(), size));
        self
    }

    /// Add a variable.
    pub fn with_variable(mut self, variable: MemoryVariable) -> Self {
        self.variables.push(variable);
        self
    }

    fn find(&self, name: &str) -> Option<&MemoryVariable> {
        self.variables.iter().find(|var| var.name == name)
    }
}

impl AttributeStore for MemoryStore {
    fn list_dimensions(&self) -> Vec<(String, usize)> {
        self.dimensions.clone()
    }

    fn list_variables(&self) -> Vec<String> {
        self.variables.iter().map(|var| var.name.clone()).collect()
    }

    fn get_attribute(&self, var: &str, key: &str) -> Option<String> {
        self.find(var)?
            .attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    }

    fn variable_dimensions(&self, var: &str) -> Option<Vec<String>> {
        self.find(var).map(|variable| variable.dimensions.clone())
    }

    fn read_variable(&self, var: &str) -> Result<GridArray> {
        let variable = self
            .find(var)
            .ok_or_else(|| SgridError::VariableNotFound(var.to_string()))?;
        variable
            .values
            .clone()
            .ok_or_else(|| SgridError::read(format!("variable `{var}` has no payload")))
    }

    fn read_variable_sliced(&self, var: &str, slices: &[DimSlice]) -> Result<GridArray> {
        Ok(self.read_variable(var)?.slice(slices))
    }
}
