//! Topology resolution: the linear path turning convention attributes into
//! a [`GridModel`].
//!
//! Resolution has one pass and no backtracking. Fatal conditions are a
//! non-compliant dataset, a topology dimension other than 2 or 3, and a
//! missing time variable; every other missing or malformed attribute
//! degrades to an unset field on the model, with grammar violations logged
//! at `warn`.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::detect::ConventionScan;
use crate::error::{Result, SgridError};
use crate::infer::infer_coordinates;
use crate::model::{
    pair_arrays, AttributeGroup, CoordinatePairs, GridArray, GridModel, Topology2d, Topology3d,
    TopologyAttributes, VariableDescriptor,
};
use crate::padding::{parse_padding, PaddingSpec};
use crate::slice::center_slicing;
use crate::store::AttributeStore;

/// Which concrete topology a grid declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopologyKind {
    TwoD,
    ThreeD,
}

impl TopologyKind {
    fn dimension(self) -> u32 {
        match self {
            TopologyKind::TwoD => 2,
            TopologyKind::ThreeD => 3,
        }
    }
}

/// Resolve a grid topology from a dataset.
///
/// `topology_variable` overrides detection when the caller already knows
/// which variable carries the topology attributes; the compliance check
/// still runs either way. When several variables qualify, detection takes
/// the first in store iteration order.
pub fn load_grid(store: &dyn AttributeStore, topology_variable: Option<&str>) -> Result<GridModel> {
    let scan = ConventionScan::new(store);
    let detected = scan.find_topology_variable().ok_or(SgridError::NonCompliant)?;
    let topology_variable = topology_variable.map(str::to_string).unwrap_or(detected);

    let raw_dimension = store
        .get_attribute(&topology_variable, "topology_dimension")
        .unwrap_or_default();
    let kind = match raw_dimension.trim().parse::<i64>() {
        Ok(2) => TopologyKind::TwoD,
        Ok(3) => TopologyKind::ThreeD,
        _ => {
            return Err(SgridError::UnsupportedTopologyDimension {
                found: raw_dimension.trim().to_string(),
            });
        }
    };
    info!(
        topology_variable = %topology_variable,
        topology_dimension = kind.dimension(),
        "resolving grid topology"
    );

    let resolver = Resolver {
        store,
        topology_variable,
        dimensions: store.list_dimensions(),
    };
    resolver.resolve(kind)
}

struct Resolver<'a> {
    store: &'a dyn AttributeStore,
    topology_variable: String,
    dimensions: Vec<(String, usize)>,
}

impl Resolver<'_> {
    /// An attribute of the topology variable.
    fn attr(&self, key: &str) -> Option<String> {
        self.store.get_attribute(&self.topology_variable, key)
    }

    /// Whether every dimension a padding clause names exists in the dataset.
    fn dims_exist(&self, specs: &[PaddingSpec]) -> bool {
        specs.iter().all(|spec| {
            [&spec.dim, &spec.shared_dim]
                .into_iter()
                .all(|name| self.dimensions.iter().any(|(dim, _)| dim == name))
        })
    }

    /// Read a `<prefix>_dimensions` attribute into its raw string and
    /// parsed padding clauses. A grammar violation, or a clause naming a
    /// dimension missing from the dataset, leaves both fields unset.
    fn dimension_attribute(&self, attribute: &str) -> (Option<String>, Option<Vec<PaddingSpec>>) {
        let raw = match self.attr(attribute) {
            Some(raw) => raw,
            None => return (None, None),
        };
        match parse_padding(attribute, &raw) {
            Ok(specs) if self.dims_exist(&specs) => (Some(raw), Some(specs)),
            Ok(_) => {
                warn!(
                    attribute,
                    "padding clause names a dimension missing from the dataset"
                );
                (None, None)
            }
            Err(err) => {
                warn!(attribute, error = %err, "ignoring unparseable padding attribute");
                (None, None)
            }
        }
    }

    /// Extract one directional attribute group (`edge1`, `face2`, ...).
    fn directional_group(&self, prefix: &str) -> AttributeGroup {
        let (dimensions, padding) = self.dimension_attribute(&format!("{prefix}_dimensions"));
        let coordinates = self
            .attr(&format!("{prefix}_coordinates"))
            .map(|raw| raw.split_whitespace().map(str::to_string).collect());
        AttributeGroup {
            dimensions,
            padding,
            coordinates,
        }
    }

    /// Like [`Resolver::directional_group`], falling back to
    /// location-based inference when the coordinates attribute is absent.
    /// The prefix doubles as the `location` tag (`face`, `volume`).
    fn located_group(&self, prefix: &str, topology_dimension: u32) -> AttributeGroup {
        let mut group = self.directional_group(prefix);
        if group.coordinates.is_none() {
            group.coordinates = infer_coordinates(self.store, prefix, topology_dimension);
        }
        group
    }

    /// Node dimensions and coordinates, falling back to the node-vertex
    /// long-name lookup when `node_coordinates` is absent.
    fn node_attributes(&self, scan: &ConventionScan) -> (Option<String>, Option<(String, String)>) {
        let node_dimensions = self.attr("node_dimensions");
        let node_coordinates = match self.attr("node_coordinates") {
            Some(raw) => {
                let mut names = raw.split_whitespace().map(str::to_string);
                match (names.next(), names.next()) {
                    (Some(lon), Some(lat)) => Some((lon, lat)),
                    _ => None,
                }
            }
            None => match scan.find_grid_cell_node_vars() {
                (Some(lon), Some(lat)) => Some((lon, lat)),
                _ => None,
            },
        };
        (node_dimensions, node_coordinates)
    }

    /// Read a coordinate variable pair and zip it elementwise. Unresolved
    /// names, unreadable variables, and mismatched shapes degrade to
    /// `None`.
    fn paired_coordinates(&self, names: Option<&[String]>) -> Option<CoordinatePairs> {
        let (lon_name, lat_name) = match names? {
            [lon, lat, ..] => (lon, lat),
            _ => return None,
        };
        let lon = self.read_coordinate(lon_name)?;
        let lat = self.read_coordinate(lat_name)?;
        let pairs = pair_arrays(&lon, &lat);
        if pairs.is_none() {
            warn!(lon = %lon_name, lat = %lat_name, "coordinate arrays have mismatched shapes");
        }
        pairs
    }

    /// Read a coordinate variable, degrading failures to `None` with a
    /// warning.
    fn read_coordinate(&self, name: &str) -> Option<GridArray> {
        if !self.store.has_variable(name) {
            warn!(variable = %name, "coordinate variable named by the convention is absent");
            return None;
        }
        match self.store.read_variable(name) {
            Ok(array) => Some(array),
            Err(err) => {
                warn!(variable = %name, error = %err, "failed to read coordinate variable");
                None
            }
        }
    }

    /// Grid rotation angles from a variable literally named `angle`;
    /// absence is tolerated.
    fn angles(&self) -> Result<Option<GridArray>> {
        if !self.store.has_variable("angle") {
            return Ok(None);
        }
        self.store.read_variable("angle").map(Some)
    }

    /// The required time payload: a `time` variable, else `Times`.
    fn grid_times(&self) -> Result<GridArray> {
        for candidate in ["time", "Times"] {
            if self.store.has_variable(candidate) {
                return self.store.read_variable(candidate);
            }
        }
        Err(SgridError::MissingTime)
    }

    /// Build a descriptor for every dataset variable and collect the names
    /// declaring a `grid` attribute.
    fn variable_descriptors(
        &self,
        specs: &[PaddingSpec],
    ) -> (BTreeMap<String, VariableDescriptor>, Vec<String>) {
        let mut variables = BTreeMap::new();
        let mut grid_variables = Vec::new();
        for name in self.store.list_variables() {
            let dims = self.store.variable_dimensions(&name).unwrap_or_default();
            let is_grid_variable = self.store.get_attribute(&name, "grid").is_some();
            if is_grid_variable {
                grid_variables.push(name.clone());
            }
            let descriptor = VariableDescriptor {
                name: name.clone(),
                center_slicing: center_slicing(&dims, &self.dimensions, specs),
                is_grid_variable,
            };
            variables.insert(name, descriptor);
        }
        (variables, grid_variables)
    }

    fn resolve(self, kind: TopologyKind) -> Result<GridModel> {
        let scan = ConventionScan::new(self.store);
        let (node_dimensions, node_coordinates) = self.node_attributes(&scan);
        let edge1 = self.directional_group("edge1");
        let edge2 = self.directional_group("edge2");

        let topology = match kind {
            TopologyKind::TwoD => {
                let face = self.located_group("face", 2);
                let (vertical_dimensions, vertical_padding) =
                    self.dimension_attribute("vertical_dimensions");
                TopologyAttributes::TwoD(Topology2d {
                    face,
                    vertical_dimensions,
                    vertical_padding,
                })
            }
            TopologyKind::ThreeD => TopologyAttributes::ThreeD(Topology3d {
                edge3: self.directional_group("edge3"),
                face1: self.directional_group("face1"),
                face2: self.directional_group("face2"),
                face3: self.directional_group("face3"),
                volume: self.located_group("volume", 3),
            }),
        };

        // Cell centers come from the cell-interior coordinates. Node
        // pairing only exists for 2-D topologies; 3-D node lat/lon is not
        // derivable from the current attribute set.
        let centers = match &topology {
            TopologyAttributes::TwoD(topo) => {
                self.paired_coordinates(topo.face.coordinates.as_deref())
            }
            TopologyAttributes::ThreeD(topo) => {
                self.paired_coordinates(topo.volume.coordinates.as_deref())
            }
        };
        let nodes = match kind {
            TopologyKind::TwoD => {
                let names = node_coordinates
                    .clone()
                    .map(|(lon, lat)| vec![lon, lat]);
                self.paired_coordinates(names.as_deref())
            }
            TopologyKind::ThreeD => None,
        };

        let angles = self.angles()?;
        let grid_times = self.grid_times()?;

        let mut model = GridModel {
            dimensions: self.dimensions.clone(),
            topology_variable: self.topology_variable.clone(),
            topology,
            node_dimensions,
            node_coordinates,
            edge1,
            edge2,
            angles,
            grid_times,
            centers,
            nodes,
            variables: BTreeMap::new(),
            grid_variables: Vec::new(),
        };
        let specs = model.padding_specs();
        let (variables, grid_variables) = self.variable_descriptors(&specs);
        model.variables = variables;
        model.grid_variables = grid_variables;
        debug!(
            variables = model.variables.len(),
            grid_variables = model.grid_variables.len(),
            "grid topology resolved"
        );
        Ok(model)
    }
}
