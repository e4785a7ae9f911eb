//! End-to-end resolution tests over in-memory datasets.

use sgrid::{
    load_grid, DimSlice, GridArray, MemoryStore, MemoryVariable, PaddingKind, SgridError,
};

/// Sequential test values starting at `base`; the offset makes lon and lat
/// payloads distinguishable in pairing assertions.
fn seq(len: usize, base: f64) -> Vec<f64> {
    (0..len).map(|v| v as f64 + base).collect()
}

/// A ROMS-style 2-D staggered dataset with rho (center), psi (node), u,
/// and v points.
fn roms_style_store() -> MemoryStore {
    MemoryStore::new()
        .with_dimension("xi_psi", 9)
        .with_dimension("eta_psi", 6)
        .with_dimension("xi_rho", 10)
        .with_dimension("eta_rho", 7)
        .with_dimension("xi_u", 9)
        .with_dimension("eta_u", 7)
        .with_dimension("xi_v", 10)
        .with_dimension("eta_v", 6)
        .with_dimension("s_rho", 5)
        .with_dimension("s_w", 6)
        .with_dimension("time", 3)
        .with_variable(
            MemoryVariable::new("grid")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "2")
                .with_attribute("node_dimensions", "xi_psi eta_psi")
                .with_attribute("node_coordinates", "lon_psi lat_psi")
                .with_attribute(
                    "face_dimensions",
                    "xi_rho: xi_psi (padding: both) eta_rho: eta_psi (padding: both)",
                )
                .with_attribute("face_coordinates", "lon_rho lat_rho")
                .with_attribute(
                    "edge1_dimensions",
                    "xi_u: xi_psi eta_u: eta_psi (padding: both)",
                )
                .with_attribute("edge1_coordinates", "lon_u lat_u")
                .with_attribute(
                    "edge2_dimensions",
                    "xi_v: xi_psi (padding: both) eta_v: eta_psi",
                )
                .with_attribute("edge2_coordinates", "lon_v lat_v")
                .with_attribute("vertical_dimensions", "s_rho: s_w (padding: none)"),
        )
        .with_variable(
            MemoryVariable::new("time")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![3], vec![0.0, 3600.0, 7200.0])),
        )
        .with_variable(
            MemoryVariable::new("lon_rho")
                .with_dimensions(&["eta_rho", "xi_rho"])
                .with_values(GridArray::new(vec![7, 10], seq(70, 0.0))),
        )
        .with_variable(
            MemoryVariable::new("lat_rho")
                .with_dimensions(&["eta_rho", "xi_rho"])
                .with_values(GridArray::new(vec![7, 10], seq(70, 100.0))),
        )
        .with_variable(
            MemoryVariable::new("lon_psi")
                .with_dimensions(&["eta_psi", "xi_psi"])
                .with_values(GridArray::new(vec![6, 9], seq(54, 0.0))),
        )
        .with_variable(
            MemoryVariable::new("lat_psi")
                .with_dimensions(&["eta_psi", "xi_psi"])
                .with_values(GridArray::new(vec![6, 9], seq(54, 100.0))),
        )
        .with_variable(
            MemoryVariable::new("angle")
                .with_dimensions(&["eta_rho", "xi_rho"])
                .with_values(GridArray::new(vec![7, 10], seq(70, 0.5))),
        )
        .with_variable(
            MemoryVariable::new("u")
                .with_dimensions(&["time", "eta_u", "xi_u"])
                .with_attribute("grid", "grid")
                .with_attribute("location", "edge1"),
        )
        .with_variable(
            MemoryVariable::new("v")
                .with_dimensions(&["time", "eta_v", "xi_v"])
                .with_attribute("grid", "grid")
                .with_attribute("location", "edge2"),
        )
        .with_variable(
            MemoryVariable::new("zeta")
                .with_dimensions(&["time", "eta_rho", "xi_rho"])
                .with_attribute("grid", "grid")
                .with_attribute("location", "face")
                .with_attribute("coordinates", "lon_rho lat_rho"),
        )
}

/// A small 3-D dataset whose volume coordinates come from inference.
fn volume_store() -> MemoryStore {
    MemoryStore::new()
        .with_dimension("x_c", 4)
        .with_dimension("y_c", 3)
        .with_dimension("z_c", 2)
        .with_dimension("x_n", 5)
        .with_dimension("y_n", 4)
        .with_dimension("z_n", 3)
        .with_dimension("time", 2)
        .with_variable(
            MemoryVariable::new("grid")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "3")
                .with_attribute("node_dimensions", "x_n y_n z_n")
                .with_attribute(
                    "volume_dimensions",
                    "x_c: x_n (padding: both) y_c: y_n (padding: both) z_c: z_n (padding: both)",
                )
                .with_attribute("edge3_dimensions", "z_n: z_c")
                .with_attribute("face1_dimensions", "x_n: x_c y_c: y_n (padding: both)"),
        )
        .with_variable(
            MemoryVariable::new("time")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![2], vec![0.0, 60.0])),
        )
        .with_variable(
            MemoryVariable::new("lon_center")
                .with_dimensions(&["y_c", "x_c"])
                .with_attribute("standard_name", "longitude")
                .with_values(GridArray::new(vec![3, 4], seq(12, 0.0))),
        )
        .with_variable(
            MemoryVariable::new("lat_center")
                .with_dimensions(&["y_c", "x_c"])
                .with_attribute("standard_name", "latitude")
                .with_values(GridArray::new(vec![3, 4], seq(12, 50.0))),
        )
        .with_variable(
            MemoryVariable::new("depth")
                .with_dimensions(&["z_c"])
                .with_attribute("standard_name", "depth")
                .with_values(GridArray::new(vec![2], vec![5.0, 15.0])),
        )
        .with_variable(
            MemoryVariable::new("temp")
                .with_dimensions(&["time", "z_c", "y_c", "x_c"])
                .with_attribute("grid", "grid")
                .with_attribute("location", "volume")
                .with_attribute("coordinates", "lon_center lat_center depth"),
        )
}

// ============================================================================
// 2-D resolution
// ============================================================================

#[test]
fn test_two_d_topology_dispatch() {
    let model = load_grid(&roms_style_store(), None).unwrap();
    assert_eq!(model.topology_dimension(), 2);
    assert_eq!(model.topology_variable, "grid");
    assert!(model.as_two_d().is_some());
    assert!(model.as_three_d().is_none());
}

#[test]
fn test_face_and_vertical_groups() {
    let model = load_grid(&roms_style_store(), None).unwrap();
    let topo = model.as_two_d().unwrap();

    let padding = topo.face.padding.as_ref().unwrap();
    assert_eq!(padding.len(), 2);
    assert_eq!(padding[0].dim, "xi_rho");
    assert_eq!(padding[0].shared_dim, "xi_psi");
    assert_eq!(padding[0].kind, PaddingKind::Both);
    assert_eq!(padding[1].dim, "eta_rho");
    assert_eq!(padding[1].kind, PaddingKind::Both);
    assert_eq!(
        topo.face.coordinates,
        Some(vec!["lon_rho".to_string(), "lat_rho".to_string()])
    );

    assert_eq!(
        topo.vertical_dimensions.as_deref(),
        Some("s_rho: s_w (padding: none)")
    );
    let vertical = topo.vertical_padding.as_ref().unwrap();
    assert_eq!(vertical.len(), 1);
    assert_eq!(vertical[0].kind, PaddingKind::None);
}

#[test]
fn test_edge_groups() {
    let model = load_grid(&roms_style_store(), None).unwrap();

    let edge1 = model.edge1.padding.as_ref().unwrap();
    assert_eq!(edge1.len(), 2);
    assert_eq!(edge1[0].dim, "xi_u");
    assert_eq!(edge1[0].kind, PaddingKind::None);
    assert_eq!(edge1[1].dim, "eta_u");
    assert_eq!(edge1[1].kind, PaddingKind::Both);
    assert_eq!(
        model.edge1.coordinates,
        Some(vec!["lon_u".to_string(), "lat_u".to_string()])
    );

    let edge2 = model.edge2.padding.as_ref().unwrap();
    assert_eq!(edge2[0].kind, PaddingKind::Both);
    assert_eq!(edge2[1].kind, PaddingKind::None);
}

#[test]
fn test_node_coordinates_and_pairing() {
    let model = load_grid(&roms_style_store(), None).unwrap();
    assert_eq!(model.node_dimensions.as_deref(), Some("xi_psi eta_psi"));
    assert_eq!(
        model.node_coordinates,
        Some(("lon_psi".to_string(), "lat_psi".to_string()))
    );

    let centers = model.centers.as_ref().unwrap();
    assert_eq!(centers.shape, vec![7, 10]);
    assert_eq!(centers.pairs.len(), 70);
    assert_eq!(centers.pairs[0], (0.0, 100.0));

    let nodes = model.nodes.as_ref().unwrap();
    assert_eq!(nodes.shape, vec![6, 9]);
    assert_eq!(nodes.pairs[1], (1.0, 101.0));
}

#[test]
fn test_angles_and_times() {
    let model = load_grid(&roms_style_store(), None).unwrap();
    assert_eq!(model.angles.as_ref().unwrap().len(), 70);
    assert_eq!(model.grid_times.values, vec![0.0, 3600.0, 7200.0]);
}

#[test]
fn test_variable_descriptors() {
    let store = roms_style_store();
    let model = load_grid(&store, None).unwrap();
    assert_eq!(model.variables.len(), 10);
    assert_eq!(model.grid_variables, vec!["u", "v", "zeta"]);

    let u = &model.variables["u"];
    assert!(u.is_grid_variable);
    assert_eq!(
        u.center_slicing,
        vec![
            DimSlice::Full,
            DimSlice::Range { start: 1, stop: 6 },
            DimSlice::Full,
        ]
    );

    let zeta = &model.variables["zeta"];
    assert_eq!(
        zeta.center_slicing,
        vec![
            DimSlice::Full,
            DimSlice::Range { start: 1, stop: 6 },
            DimSlice::Range { start: 1, stop: 9 },
        ]
    );

    let lon_rho = &model.variables["lon_rho"];
    assert!(!lon_rho.is_grid_variable);
    assert_eq!(lon_rho.center_slicing.len(), 2);
}

#[test]
fn test_resolution_is_idempotent() {
    let store = roms_style_store();
    let first = load_grid(&store, None).unwrap();
    let second = load_grid(&store, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_model_serde_round_trip() {
    let model = load_grid(&roms_style_store(), None).unwrap();
    let value = serde_json::to_value(&model).unwrap();
    let back: sgrid::GridModel = serde_json::from_value(value).unwrap();
    assert_eq!(model, back);
}

// ============================================================================
// 3-D resolution
// ============================================================================

#[test]
fn test_three_d_topology_dispatch() {
    let model = load_grid(&volume_store(), None).unwrap();
    assert_eq!(model.topology_dimension(), 3);
    assert!(model.as_two_d().is_none());
    let topo = model.as_three_d().unwrap();

    let volume = topo.volume.padding.as_ref().unwrap();
    assert_eq!(volume.len(), 3);
    assert!(volume.iter().all(|spec| spec.kind == PaddingKind::Both));
    assert!(topo.edge3.padding.is_some());
    assert!(topo.face1.padding.is_some());
}

#[test]
fn test_volume_coordinates_are_inferred() {
    let model = load_grid(&volume_store(), None).unwrap();
    let topo = model.as_three_d().unwrap();
    assert_eq!(
        topo.volume.coordinates,
        Some(vec![
            "lon_center".to_string(),
            "lat_center".to_string(),
            "depth".to_string(),
        ])
    );

    let centers = model.centers.as_ref().unwrap();
    assert_eq!(centers.shape, vec![3, 4]);
    assert_eq!(centers.pairs[0], (0.0, 50.0));

    // 3-D node lat/lon is not derivable from the attribute set.
    assert!(model.nodes.is_none());
}

#[test]
fn test_three_d_center_slicing() {
    let model = load_grid(&volume_store(), None).unwrap();
    let temp = &model.variables["temp"];
    assert_eq!(
        temp.center_slicing,
        vec![
            DimSlice::Full,
            DimSlice::Range { start: 1, stop: 1 },
            DimSlice::Range { start: 1, stop: 2 },
            DimSlice::Range { start: 1, stop: 3 },
        ]
    );
}

// ============================================================================
// Error paths
// ============================================================================

#[test]
fn test_non_compliant_dataset_is_rejected() {
    let store = MemoryStore::new()
        .with_dimension("x", 4)
        .with_variable(MemoryVariable::new("zeta").with_dimensions(&["x"]));
    assert!(matches!(
        load_grid(&store, None),
        Err(SgridError::NonCompliant)
    ));
}

#[test]
fn test_unsupported_topology_dimension_is_rejected() {
    let store = MemoryStore::new().with_variable(
        MemoryVariable::new("hypergrid")
            .with_attribute("cf_role", "grid_topology")
            .with_attribute("topology_dimension", "4"),
    );
    match load_grid(&store, None) {
        Err(SgridError::UnsupportedTopologyDimension { found }) => assert_eq!(found, "4"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_missing_time_is_rejected() {
    let store = MemoryStore::new().with_variable(
        MemoryVariable::new("grid")
            .with_attribute("cf_role", "grid_topology")
            .with_attribute("topology_dimension", "2"),
    );
    assert!(matches!(
        load_grid(&store, None),
        Err(SgridError::MissingTime)
    ));
}

#[test]
fn test_times_fallback() {
    let store = MemoryStore::new()
        .with_dimension("time", 2)
        .with_variable(
            MemoryVariable::new("grid")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "2"),
        )
        .with_variable(
            MemoryVariable::new("Times")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![2], vec![1.0, 2.0])),
        );
    let model = load_grid(&store, None).unwrap();
    assert_eq!(model.grid_times.values, vec![1.0, 2.0]);
}

// ============================================================================
// Graceful degradation
// ============================================================================

#[test]
fn test_malformed_padding_attribute_degrades_to_unset() {
    let store = MemoryStore::new()
        .with_dimension("time", 1)
        .with_variable(
            MemoryVariable::new("grid")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "2")
                .with_attribute("face_dimensions", "xi_rho xi_psi"),
        )
        .with_variable(
            MemoryVariable::new("time")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![1], vec![0.0])),
        );
    let model = load_grid(&store, None).unwrap();
    let topo = model.as_two_d().unwrap();
    assert!(topo.face.dimensions.is_none());
    assert!(topo.face.padding.is_none());
}

#[test]
fn test_padding_clause_naming_unknown_dimension_degrades_to_unset() {
    let store = MemoryStore::new()
        .with_dimension("time", 1)
        .with_dimension("xi_psi", 5)
        .with_variable(
            MemoryVariable::new("grid")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "2")
                .with_attribute("face_dimensions", "ghost: xi_psi (padding: low)"),
        )
        .with_variable(
            MemoryVariable::new("time")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![1], vec![0.0])),
        );
    let model = load_grid(&store, None).unwrap();
    let topo = model.as_two_d().unwrap();
    assert!(topo.face.dimensions.is_none());
    assert!(topo.face.padding.is_none());
}

#[test]
fn test_face_coordinates_fall_back_to_subset_inference() {
    let store = MemoryStore::new()
        .with_dimension("eta_rho", 3)
        .with_dimension("xi_rho", 4)
        .with_dimension("time", 1)
        .with_variable(
            MemoryVariable::new("grid")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "2"),
        )
        .with_variable(
            MemoryVariable::new("zeta")
                .with_dimensions(&["eta_rho", "xi_rho"])
                .with_attribute("location", "face"),
        )
        .with_variable(
            MemoryVariable::new("lon_rho")
                .with_dimensions(&["eta_rho", "xi_rho"])
                .with_values(GridArray::new(vec![3, 4], seq(12, 0.0))),
        )
        .with_variable(
            MemoryVariable::new("lat_rho")
                .with_dimensions(&["eta_rho", "xi_rho"])
                .with_values(GridArray::new(vec![3, 4], seq(12, 40.0))),
        )
        .with_variable(
            MemoryVariable::new("time")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![1], vec![0.0])),
        );
    let model = load_grid(&store, None).unwrap();
    let topo = model.as_two_d().unwrap();
    assert_eq!(
        topo.face.coordinates,
        Some(vec!["lon_rho".to_string(), "lat_rho".to_string()])
    );
    assert_eq!(model.centers.as_ref().unwrap().pairs[0], (0.0, 40.0));
}

#[test]
fn test_node_coordinates_fall_back_to_long_name_lookup() {
    let store = MemoryStore::new()
        .with_dimension("eta_psi", 2)
        .with_dimension("xi_psi", 3)
        .with_dimension("time", 1)
        .with_variable(
            MemoryVariable::new("grid")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "2")
                .with_attribute("node_dimensions", "xi_psi eta_psi"),
        )
        .with_variable(
            MemoryVariable::new("lon_psi")
                .with_dimensions(&["eta_psi", "xi_psi"])
                .with_attribute("long_name", "longitude of grid cell nodes")
                .with_values(GridArray::new(vec![2, 3], seq(6, 0.0))),
        )
        .with_variable(
            MemoryVariable::new("lat_psi")
                .with_dimensions(&["eta_psi", "xi_psi"])
                .with_attribute("long_name", "latitude of grid cell nodes")
                .with_values(GridArray::new(vec![2, 3], seq(6, 60.0))),
        )
        .with_variable(
            MemoryVariable::new("time")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![1], vec![0.0])),
        );
    let model = load_grid(&store, None).unwrap();
    assert_eq!(
        model.node_coordinates,
        Some(("lon_psi".to_string(), "lat_psi".to_string()))
    );
    assert_eq!(model.nodes.as_ref().unwrap().pairs[0], (0.0, 60.0));
}

#[test]
fn test_explicit_topology_variable_overrides_detection() {
    let store = MemoryStore::new()
        .with_dimension("time", 1)
        .with_variable(
            MemoryVariable::new("grid_a")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "2"),
        )
        .with_variable(
            MemoryVariable::new("grid_b")
                .with_attribute("cf_role", "grid_topology")
                .with_attribute("topology_dimension", "3"),
        )
        .with_variable(
            MemoryVariable::new("time")
                .with_dimensions(&["time"])
                .with_values(GridArray::new(vec![1], vec![0.0])),
        );

    let detected = load_grid(&store, None).unwrap();
    assert_eq!(detected.topology_variable, "grid_a");
    assert_eq!(detected.topology_dimension(), 2);

    let explicit = load_grid(&store, Some("grid_b")).unwrap();
    assert_eq!(explicit.topology_variable, "grid_b");
    assert_eq!(explicit.topology_dimension(), 3);
}
