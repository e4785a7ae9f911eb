//! The resolved grid topology model.
//!
//! [`GridModel`] is the final artifact of a load: a frozen description of
//! one dataset's staggered-grid topology. It is built once by the resolver
//! and handed to the caller by value; unresolved convention attributes stay
//! `None` so incompleteness is detectable structurally, never through
//! sentinel values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::padding::PaddingSpec;
use crate::slice::DimSlice;

/// A numeric array read from the dataset: a flat row-major buffer plus its
/// shape. A scalar has an empty shape and a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridArray {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

impl GridArray {
    /// Create an array from a shape and its row-major values. The number of
    /// values must equal the product of the shape.
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Self {
        debug_assert_eq!(
            shape.iter().product::<usize>(),
            values.len(),
            "shape does not match value count"
        );
        Self { shape, values }
    }

    /// Total number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Extract the sub-array selected by one [`DimSlice`] per dimension.
    /// Missing trailing slices are treated as [`DimSlice::Full`].
    pub fn slice(&self, slices: &[DimSlice]) -> GridArray {
        let bounds: Vec<(usize, usize)> = self
            .shape
            .iter()
            .enumerate()
            .map(|(axis, &size)| {
                slices
                    .get(axis)
                    .copied()
                    .unwrap_or(DimSlice::Full)
                    .bounds(size)
            })
            .collect();
        let out_shape: Vec<usize> = bounds
            .iter()
            .map(|(start, stop)| stop.saturating_sub(*start))
            .collect();
        let total: usize = out_shape.iter().product();
        let mut values = Vec::with_capacity(total);
        if total == 0 {
            return GridArray {
                shape: out_shape,
                values,
            };
        }

        // Row-major strides of the source array.
        let mut strides = vec![1usize; self.shape.len()];
        for axis in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.shape[axis + 1];
        }
        let mut index: Vec<usize> = bounds.iter().map(|(start, _)| *start).collect();
        loop {
            let offset: usize = index.iter().zip(&strides).map(|(i, s)| i * s).sum();
            values.push(self.values[offset]);
            // Advance the odometer, innermost axis first.
            let mut axis = index.len();
            loop {
                if axis == 0 {
                    return GridArray {
                        shape: out_shape,
                        values,
                    };
                }
                axis -= 1;
                index[axis] += 1;
                if index[axis] < bounds[axis].1 {
                    break;
                }
                index[axis] = bounds[axis].0;
            }
        }
    }
}

/// Elementwise (longitude, latitude) pairs carrying the source array shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePairs {
    pub shape: Vec<usize>,
    pub pairs: Vec<(f64, f64)>,
}

/// Zip a longitude array and a latitude array elementwise into coordinate
/// pairs. Returns `None` when the shapes differ.
pub fn pair_arrays(lon: &GridArray, lat: &GridArray) -> Option<CoordinatePairs> {
    if lon.shape != lat.shape {
        return None;
    }
    let pairs = lon
        .values
        .iter()
        .zip(&lat.values)
        .map(|(&x, &y)| (x, y))
        .collect();
    Some(CoordinatePairs {
        shape: lon.shape.clone(),
        pairs,
    })
}

/// One directional attribute group of the topology variable (`edge1`,
/// `face2`, ...). Every field is independently optional: an absent source
/// attribute, or one rejected by the padding grammar, leaves its fields
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeGroup {
    /// Raw `<prefix>_dimensions` attribute string.
    pub dimensions: Option<String>,
    /// Parsed padding clauses of the `<prefix>_dimensions` attribute.
    pub padding: Option<Vec<PaddingSpec>>,
    /// Variable names from `<prefix>_coordinates`, or inferred.
    pub coordinates: Option<Vec<String>>,
}

/// Attribute groups that only exist on a 2-D topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology2d {
    /// Cell-interior group.
    pub face: AttributeGroup,
    /// Raw `vertical_dimensions` attribute string.
    pub vertical_dimensions: Option<String>,
    /// Parsed padding clauses of `vertical_dimensions`.
    pub vertical_padding: Option<Vec<PaddingSpec>>,
}

/// Attribute groups that only exist on a 3-D topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology3d {
    pub edge3: AttributeGroup,
    pub face1: AttributeGroup,
    pub face2: AttributeGroup,
    pub face3: AttributeGroup,
    /// Cell-interior group.
    pub volume: AttributeGroup,
}

/// Topology-dimension-specific attribute payload.
///
/// Exactly one variant exists on a resolved model, so the attribute groups
/// of the other topology dimension are structurally absent rather than
/// merely unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopologyAttributes {
    TwoD(Topology2d),
    ThreeD(Topology3d),
}

impl TopologyAttributes {
    /// The declared topology dimension, 2 or 3.
    pub fn dimension(&self) -> u32 {
        match self {
            TopologyAttributes::TwoD(_) => 2,
            TopologyAttributes::ThreeD(_) => 3,
        }
    }
}

/// Per-variable slicing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    /// One entry per variable dimension, aligning the raw array with the
    /// cell-center coordinate system.
    pub center_slicing: Vec<DimSlice>,
    /// Whether the variable declares a `grid` attribute.
    pub is_grid_variable: bool,
}

/// The resolved grid topology: the final artifact of a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridModel {
    /// Every dataset dimension as (name, size), in dataset order.
    pub dimensions: Vec<(String, usize)>,
    /// Name of the variable carrying the topology attributes.
    pub topology_variable: String,
    /// Topology-dimension-specific attribute groups.
    pub topology: TopologyAttributes,
    /// Raw `node_dimensions` attribute string.
    pub node_dimensions: Option<String>,
    /// Node (cell vertex) longitude/latitude variable names.
    pub node_coordinates: Option<(String, String)>,
    pub edge1: AttributeGroup,
    pub edge2: AttributeGroup,
    /// Grid rotation angles, when the dataset carries an `angle` variable.
    pub angles: Option<GridArray>,
    /// Time payload from the `time` variable (falling back to `Times`).
    pub grid_times: GridArray,
    /// Cell-center (lon, lat) pairs.
    pub centers: Option<CoordinatePairs>,
    /// Cell-vertex (lon, lat) pairs; absent on 3-D topologies.
    pub nodes: Option<CoordinatePairs>,
    /// Slicing metadata for every dataset variable.
    pub variables: BTreeMap<String, VariableDescriptor>,
    /// Variables declaring association with the grid topology.
    pub grid_variables: Vec<String>,
}

impl GridModel {
    /// The declared topology dimension, 2 or 3.
    pub fn topology_dimension(&self) -> u32 {
        self.topology.dimension()
    }

    /// The 2-D attribute payload, if this is a 2-D topology.
    pub fn as_two_d(&self) -> Option<&Topology2d> {
        match &self.topology {
            TopologyAttributes::TwoD(topology) => Some(topology),
            TopologyAttributes::ThreeD(_) => None,
        }
    }

    /// The 3-D attribute payload, if this is a 3-D topology.
    pub fn as_three_d(&self) -> Option<&Topology3d> {
        match &self.topology {
            TopologyAttributes::TwoD(_) => None,
            TopologyAttributes::ThreeD(topology) => Some(topology),
        }
    }

    /// Every padding spec resolved on the model, in resolution order: the
    /// edge groups first, then the topology-specific groups.
    pub fn padding_specs(&self) -> Vec<PaddingSpec> {
        let mut out = Vec::new();
        push_group(&mut out, &self.edge1);
        push_group(&mut out, &self.edge2);
        match &self.topology {
            TopologyAttributes::TwoD(topology) => {
                push_group(&mut out, &topology.face);
                if let Some(padding) = &topology.vertical_padding {
                    out.extend(padding.iter().cloned());
                }
            }
            TopologyAttributes::ThreeD(topology) => {
                for group in [
                    &topology.edge3,
                    &topology.face1,
                    &topology.face2,
                    &topology.face3,
                    &topology.volume,
                ] {
                    push_group(&mut out, group);
                }
            }
        }
        out
    }
}

fn push_group(out: &mut Vec<PaddingSpec>, group: &AttributeGroup) {
    if let Some(padding) = &group.padding {
        out.extend(padding.iter().cloned());
    }
}
