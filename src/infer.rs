//! Coordinate-variable inference for location-tagged variables.
//!
//! When the topology variable does not name a group's coordinate variables
//! directly, they are recovered from a data variable tagged with the
//! matching `location` attribute: either from that variable's `coordinates`
//! attribute, or, as a last resort, from the set of variables whose
//! dimensions are a subset of the tagged variable's dimensions.
//!
//! The subset fallback classifies any variable matching neither `lon` nor
//! `lat` as the vertical coordinate. That is a known weakness of the
//! convention, not of this implementation; treat the inferred names as a
//! best-effort guess.

use tracing::debug;

use crate::detect::ConventionScan;
use crate::store::AttributeStore;

#[derive(Default)]
struct CoordinateSlots {
    x: Option<String>,
    y: Option<String>,
    z: Option<String>,
}

/// Infer the coordinate variable names for a `location`-tagged group.
///
/// Returns two names (x, y) for a 2-D topology, three (x, y, z) for 3-D,
/// or `None` when no variable carries the location tag or any required
/// slot stays unfilled.
pub fn infer_coordinates(
    store: &dyn AttributeStore,
    location_tag: &str,
    topology_dimension: u32,
) -> Option<Vec<String>> {
    let scan = ConventionScan::new(store);
    let tagged = scan.search_by_location(location_tag);
    let location_var = tagged.first()?;

    let mut slots = CoordinateSlots::default();
    match store.get_attribute(location_var, "coordinates") {
        Some(coordinates) => classify_tokens(store, &coordinates, &mut slots),
        None => classify_by_shared_dimensions(store, location_var, &mut slots),
    }

    let names = match topology_dimension {
        2 => vec![slots.x?, slots.y?],
        _ => vec![slots.x?, slots.y?, slots.z?],
    };
    debug!(location = location_tag, coordinates = ?names, "inferred coordinate variables");
    Some(names)
}

/// Classify the whitespace-separated tokens of a `coordinates` attribute.
/// Each token names a variable; its `standard_name` decides the slot, with
/// a case-insensitive substring match on the name itself as fallback.
fn classify_tokens(store: &dyn AttributeStore, coordinates: &str, slots: &mut CoordinateSlots) {
    let tokens: Vec<&str> = coordinates.split_whitespace().collect();
    for &token in &tokens {
        match store.get_attribute(token, "standard_name") {
            Some(standard_name) => match standard_name.as_str() {
                "longitude" => slots.x = Some(token.to_string()),
                "latitude" => slots.y = Some(token.to_string()),
                _ => {}
            },
            None => {
                let lowered = token.to_lowercase();
                if lowered.contains("lon") {
                    slots.x = Some(token.to_string());
                } else if lowered.contains("lat") {
                    slots.y = Some(token.to_string());
                }
            }
        }
    }
    // With exactly three tokens the last names the vertical coordinate,
    // whatever it is called.
    if tokens.len() == 3 {
        slots.z = tokens.last().map(|token| token.to_string());
    }
}

/// Fallback when the tagged variable has no `coordinates` attribute:
/// classify every other variable whose dimension set is a non-empty subset
/// of the tagged variable's dimensions.
fn classify_by_shared_dimensions(
    store: &dyn AttributeStore,
    location_var: &str,
    slots: &mut CoordinateSlots,
) {
    let location_dims = match store.variable_dimensions(location_var) {
        Some(dims) => dims,
        None => return,
    };
    for var in store.list_variables() {
        if var == location_var {
            continue;
        }
        let dims = match store.variable_dimensions(&var) {
            Some(dims) => dims,
            None => continue,
        };
        if dims.is_empty() || !dims.iter().all(|dim| location_dims.contains(dim)) {
            continue;
        }
        let lowered = var.to_lowercase();
        if lowered.contains("lon") {
            slots.x = Some(var);
        } else if lowered.contains("lat") {
            slots.y = Some(var);
        } else {
            slots.z = Some(var);
        }
    }
}
