//! NetCDF-backed attribute store, behind the `netcdf` cargo feature.
//!
//! Wraps an open NetCDF resource as an [`AttributeStore`] so grids can be
//! resolved straight from model output files.
//!
//! System requirements: libhdf5-dev libnetcdf-dev.

use std::path::Path;

use crate::error::{Result, SgridError};
use crate::model::{GridArray, GridModel};
use crate::resolve::load_grid;
use crate::slice::DimSlice;
use crate::store::AttributeStore;

/// [`AttributeStore`] over an open NetCDF dataset.
pub struct NetCdfStore {
    file: netcdf::File,
}

impl NetCdfStore {
    /// Open a NetCDF resource by path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = netcdf::open(path.as_ref())
            .map_err(|err| SgridError::read(format!("failed to open NetCDF resource: {err}")))?;
        Ok(Self { file })
    }

    fn variable(&self, name: &str) -> Result<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| SgridError::VariableNotFound(name.to_string()))
    }
}

impl AttributeStore for NetCdfStore {
    fn list_dimensions(&self) -> Vec<(String, usize)> {
        self.file
            .dimensions()
            .map(|dim| (dim.name(), dim.len()))
            .collect()
    }

    fn list_variables(&self) -> Vec<String> {
        self.file.variables().map(|var| var.name()).collect()
    }

    fn get_attribute(&self, var: &str, key: &str) -> Option<String> {
        let variable = self.file.variable(var)?;
        // Probing the attribute list first avoids HDF5 error output for
        // optional attributes.
        if !variable.attributes().any(|attr| attr.name() == key) {
            return None;
        }
        let value = variable.attribute_value(key)?.ok()?;
        attribute_to_string(value)
    }

    fn variable_dimensions(&self, var: &str) -> Option<Vec<String>> {
        let variable = self.file.variable(var)?;
        Some(variable.dimensions().iter().map(|dim| dim.name()).collect())
    }

    fn read_variable(&self, var: &str) -> Result<GridArray> {
        let variable = self.variable(var)?;
        let shape: Vec<usize> = variable.dimensions().iter().map(|dim| dim.len()).collect();
        let values: Vec<f64> = variable
            .get_values(..)
            .map_err(|err| SgridError::read(format!("failed to read `{var}`: {err}")))?;
        Ok(GridArray::new(shape, values))
    }

    fn read_variable_sliced(&self, var: &str, slices: &[DimSlice]) -> Result<GridArray> {
        Ok(self.read_variable(var)?.slice(slices))
    }
}

/// Render a NetCDF attribute value in the textual form the resolver
/// consumes. Array-valued attributes have no textual form and yield
/// `None`.
fn attribute_to_string(value: netcdf::AttributeValue) -> Option<String> {
    use netcdf::AttributeValue::*;
    match value {
        Str(value) => Some(value),
        Uchar(value) => Some(value.to_string()),
        Schar(value) => Some(value.to_string()),
        Ushort(value) => Some(value.to_string()),
        Short(value) => Some(value.to_string()),
        Uint(value) => Some(value.to_string()),
        Int(value) => Some(value.to_string()),
        Ulonglong(value) => Some(value.to_string()),
        Longlong(value) => Some(value.to_string()),
        Float(value) => Some(value.to_string()),
        Double(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Resolve a grid straight from a NetCDF resource.
pub fn load_grid_from_path(
    path: impl AsRef<Path>,
    topology_variable: Option<&str>,
) -> Result<GridModel> {
    let store = NetCdfStore::open(path)?;
    load_grid(&store, topology_variable)
}
