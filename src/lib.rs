//! SGRID convention resolver for staggered-grid model output.
//!
//! Oceanographic and atmospheric models store their grids across several
//! co-located coordinate systems (nodes, edges, faces, volumes), tied
//! together by textual attributes on a designated topology variable — the
//! SGRID conventions. This crate locates that variable, verifies
//! compliance, parses the attributes into a structured [`GridModel`] for a
//! 2-D or 3-D topology, infers coordinate variables when the attributes
//! leave them out, and computes, for every variable in the dataset, the
//! index slices that trim staggering padding so the variable aligns with
//! the cell-center grid.
//!
//! # Architecture
//!
//! ```text
//! load_grid(store)
//!      │
//!      ├─► ConventionScan: locate topology variable, compliance check
//!      │
//!      ├─► 2-D / 3-D dispatch over the topology_dimension attribute
//!      │         │
//!      │         ├─► parse_padding: `<dim>: <shared> (padding: <kind>)`
//!      │         │
//!      │         └─► infer_coordinates: coordinates attribute, else
//!      │             shared-dimension subset heuristic
//!      │
//!      ├─► centers / nodes: elementwise lon/lat pairing
//!      │
//!      └─► center_slicing for every dataset variable
//!               │
//!               ▼
//!          GridModel
//! ```
//!
//! # Example
//!
//! ```
//! use sgrid::{GridArray, MemoryStore, MemoryVariable};
//!
//! let store = MemoryStore::new()
//!     .with_dimension("xi_rho", 4)
//!     .with_dimension("eta_rho", 3)
//!     .with_dimension("time", 2)
//!     .with_variable(
//!         MemoryVariable::new("grid")
//!             .with_attribute("cf_role", "grid_topology")
//!             .with_attribute("topology_dimension", "2")
//!             .with_attribute("node_dimensions", "xi_psi eta_psi"),
//!     )
//!     .with_variable(
//!         MemoryVariable::new("time")
//!             .with_dimensions(&["time"])
//!             .with_values(GridArray::new(vec![2], vec![0.0, 3600.0])),
//!     );
//!
//! let model = sgrid::load_grid(&store, None)?;
//! assert_eq!(model.topology_dimension(), 2);
//! # Ok::<(), sgrid::SgridError>(())
//! ```
//!
//! Datasets are accessed through the read-only [`AttributeStore`] trait.
//! [`MemoryStore`] ships for fixtures and tests; the `netcdf` cargo
//! feature adds a file-backed store over the `netcdf` crate.

pub mod detect;
pub mod error;
pub mod infer;
pub mod memory;
pub mod model;
#[cfg(feature = "netcdf")]
pub mod netcdf;
pub mod padding;
pub mod resolve;
pub mod slice;
pub mod store;

// Re-export commonly used types at crate root
pub use detect::ConventionScan;
pub use error::{Result, SgridError};
pub use infer::infer_coordinates;
pub use memory::{MemoryStore, MemoryVariable};
pub use model::{
    pair_arrays, AttributeGroup, CoordinatePairs, GridArray, GridModel, Topology2d, Topology3d,
    TopologyAttributes, VariableDescriptor,
};
#[cfg(feature = "netcdf")]
pub use netcdf::{load_grid_from_path, NetCdfStore};
pub use padding::{parse_padding, PaddingKind, PaddingSpec};
pub use resolve::load_grid;
pub use slice::{center_slicing, padding_for_dim, DimSlice};
pub use store::AttributeStore;
