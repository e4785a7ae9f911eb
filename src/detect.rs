//! Convention detection: locating the topology variable and other
//! convention-tagged variables in a dataset.

use tracing::debug;

use crate::store::AttributeStore;

/// Accepted `long_name` spellings for the grid-cell-node longitude
/// variable. Matching is exact and case-sensitive.
pub const NODE_LON_LONG_NAMES: &[&str] = &[
    "longitude of grid cell nodes",
    "longitude of PSI-points",
];

/// Accepted `long_name` spellings for the grid-cell-node latitude variable.
pub const NODE_LAT_LONG_NAMES: &[&str] = &[
    "latitude of grid cell nodes",
    "latitude of PSI-points",
];

/// Scanner over a dataset's convention attributes.
pub struct ConventionScan<'a> {
    store: &'a dyn AttributeStore,
}

impl<'a> ConventionScan<'a> {
    pub fn new(store: &'a dyn AttributeStore) -> Self {
        Self { store }
    }

    /// Find the first variable qualifying as a grid topology variable: its
    /// `cf_role` attribute (trimmed) equals `grid_topology` and its
    /// `topology_dimension` attribute parses to an integer of at least 2.
    ///
    /// When several variables qualify, the first in store iteration order
    /// wins; determinism therefore depends on the store's listing order.
    pub fn find_topology_variable(&self) -> Option<String> {
        for var in self.store.list_variables() {
            let role = match self.store.get_attribute(&var, "cf_role") {
                Some(role) => role,
                None => continue,
            };
            if role.trim() != "grid_topology" {
                continue;
            }
            let dimension = self
                .store
                .get_attribute(&var, "topology_dimension")
                .and_then(|raw| raw.trim().parse::<i64>().ok());
            if matches!(dimension, Some(dim) if dim >= 2) {
                debug!(variable = %var, "found grid topology variable");
                return Some(var);
            }
        }
        None
    }

    /// Find the grid-cell-node longitude and latitude variables by their
    /// `long_name` attribute. Either may be absent; when several variables
    /// carry an accepted spelling, the last one encountered wins.
    pub fn find_grid_cell_node_vars(&self) -> (Option<String>, Option<String>) {
        let mut lon = None;
        let mut lat = None;
        for var in self.store.list_variables() {
            let long_name = match self.store.get_attribute(&var, "long_name") {
                Some(long_name) => long_name,
                None => continue,
            };
            if NODE_LON_LONG_NAMES.contains(&long_name.as_str()) {
                lon = Some(var.clone());
            }
            if NODE_LAT_LONG_NAMES.contains(&long_name.as_str()) {
                lat = Some(var);
            }
        }
        (lon, lat)
    }

    /// Whether the dataset carries a qualifying topology variable.
    pub fn is_compliant(&self) -> bool {
        self.find_topology_variable().is_some()
    }

    /// All variables whose `location` attribute equals `tag`, in store
    /// iteration order.
    pub fn search_by_location(&self, tag: &str) -> Vec<String> {
        self.store
            .list_variables()
            .into_iter()
            .filter(|var| self.store.get_attribute(var, "location").as_deref() == Some(tag))
            .collect()
    }
}
