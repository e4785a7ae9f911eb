//! Center-slice computation for staggered variables.
//!
//! A variable defined on a staggered location carries extra padding rows
//! relative to the cell-center grid. The slicer turns the padding specs
//! resolved from the topology variable into per-dimension index ranges that
//! trim the padding, aligning the variable's raw array with its center
//! counterpart.

use serde::{Deserialize, Serialize};

use crate::padding::{PaddingKind, PaddingSpec};

/// Index selection along a single dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimSlice {
    /// Take every index of the dimension.
    Full,
    /// Take the half-open range `[start, stop)`.
    Range { start: usize, stop: usize },
}

impl DimSlice {
    /// Derive the center slice for a dimension of `size` indices with the
    /// given padding: `none` keeps the full range, `low` drops the first
    /// index, `high` the last, `both` drops both ends. Degenerate sizes
    /// saturate to an empty range rather than underflow.
    pub fn from_padding(kind: PaddingKind, size: usize) -> Self {
        match kind {
            PaddingKind::None => DimSlice::Full,
            PaddingKind::Low => DimSlice::Range {
                start: 1.min(size),
                stop: size,
            },
            PaddingKind::High => DimSlice::Range {
                start: 0,
                stop: size.saturating_sub(1),
            },
            PaddingKind::Both => {
                let stop = size.saturating_sub(1);
                DimSlice::Range {
                    start: 1.min(stop),
                    stop,
                }
            }
        }
    }

    /// Concrete `[start, stop)` bounds for a dimension of `size` indices.
    pub fn bounds(&self, size: usize) -> (usize, usize) {
        match *self {
            DimSlice::Full => (0, size),
            DimSlice::Range { start, stop } => (start.min(size), stop.min(size)),
        }
    }

    /// Number of indices selected from a dimension of `size` indices.
    pub fn selected(&self, size: usize) -> usize {
        let (start, stop) = self.bounds(size);
        stop.saturating_sub(start)
    }
}

/// Look up the padding kind recorded for `dim`. The first matching spec
/// wins when several groups pad the same dimension.
pub fn padding_for_dim(specs: &[PaddingSpec], dim: &str) -> Option<PaddingKind> {
    specs.iter().find(|spec| spec.dim == dim).map(|spec| spec.kind)
}

/// Compute the per-dimension center slices for a variable.
///
/// `var_dims` are the variable's dimension names in order, `dimensions` the
/// dataset's (name, size) pairs, and `specs` every padding spec resolved on
/// the grid. Dimensions without a matching spec get a full-range slice; the
/// result always has exactly one entry per variable dimension.
pub fn center_slicing(
    var_dims: &[String],
    dimensions: &[(String, usize)],
    specs: &[PaddingSpec],
) -> Vec<DimSlice> {
    var_dims
        .iter()
        .map(|dim| {
            let size = dimensions
                .iter()
                .find(|(name, _)| name == dim)
                .map(|(_, size)| *size);
            match (padding_for_dim(specs, dim), size) {
                (Some(kind), Some(size)) => DimSlice::from_padding(kind, size),
                _ => DimSlice::Full,
            }
        })
        .collect()
}
