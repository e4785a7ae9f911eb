//! Attribute store abstraction over a self-describing dataset.

use crate::error::Result;
use crate::model::GridArray;
use crate::slice::DimSlice;

/// Read-only view over a self-describing, array-oriented dataset.
///
/// Implementations expose the dimensions, variables, attributes, and
/// numeric payloads of one dataset. All operations are side-effect-free;
/// the resolver only ever reads. Resolving grids from independent stores is
/// safe concurrently; resolving two grids from the *same* store
/// concurrently is safe only if the implementation permits concurrent
/// reads.
pub trait AttributeStore {
    /// All dataset dimensions as (name, size) pairs, in dataset order.
    fn list_dimensions(&self) -> Vec<(String, usize)>;

    /// All variable names, in dataset order.
    fn list_variables(&self) -> Vec<String>;

    /// A textual attribute of a variable, or `None` when the variable or
    /// the attribute is absent. Numeric attribute values are rendered in
    /// their decimal form.
    fn get_attribute(&self, var: &str, key: &str) -> Option<String>;

    /// Dimension names of a variable, or `None` when the variable is
    /// absent. A scalar variable yields `Some` of an empty list.
    fn variable_dimensions(&self, var: &str) -> Option<Vec<String>>;

    /// Read a variable's full numeric payload.
    fn read_variable(&self, var: &str) -> Result<GridArray>;

    /// Read a variable's numeric payload restricted to one index range per
    /// dimension.
    fn read_variable_sliced(&self, var: &str, slices: &[DimSlice]) -> Result<GridArray>;

    /// Whether a variable with this name exists.
    fn has_variable(&self, var: &str) -> bool {
        self.list_variables().iter().any(|name| name == var)
    }
}
