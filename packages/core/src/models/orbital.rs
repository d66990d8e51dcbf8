//! Orbital attributes carried by solar-system nodes
//!
//! Celestial bodies store their orbital elements at the top level of their
//! record, while vessels nest them in an `OrbitData` block. Both are captured
//! into the same [`OrbitData`] shape so that ordering and display code do not
//! need to care where the numbers came from.

use serde::{Deserialize, Deserializer, Serialize};

/// Parent GUID used by the root star of a solar system.
pub const ROOT_PARENT_GUID: i64 = -1;

/// Treat an explicit JSON `null` the same as a missing field.
///
/// Save files routinely write `null` for numeric fields that were never set;
/// those must land as `0` rather than fail the whole record.
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The six-parameter orbital element record plus vessel identification.
///
/// Fields absent from the source default to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct OrbitData {
    /// GUID of the body this orbit is around
    #[serde(rename = "ParentGUID", deserialize_with = "deserialize_null_default")]
    pub parent_guid: i64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub semi_major_axis: f64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub inclination: f64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub eccentricity: f64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub argument_of_periapsis: f64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub longitude_of_ascending_node: f64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub time_since_periapsis: f64,

    #[serde(rename = "VesselID", deserialize_with = "deserialize_null_default")]
    pub vessel_id: f64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub vessel_type: f64,
}

impl OrbitData {
    /// One-line summary used in node tooltips.
    pub fn summary(&self) -> String {
        format!(
            "a={} e={} i={} \u{3c9}={} \u{3a9}={} t={}",
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.argument_of_periapsis,
            self.longitude_of_ascending_node,
            self.time_since_periapsis
        )
    }
}

/// Identity, orbital and docking attributes of a solar-system node.
///
/// `parent_guid` is the *orbital* parent and drives the initial tree build.
/// The docking fields describe physical connectivity and are consumed only by
/// the docking resolver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrbitalData {
    pub guid: i64,
    pub parent_guid: i64,
    pub docked_to_guid: Option<i64>,
    pub docked_port_id: Option<i64>,
    pub docked_to_port_id: Option<i64>,
    pub orbit: OrbitData,
}

impl OrbitalData {
    /// Create orbital data with no docking information.
    pub fn new(guid: i64, parent_guid: i64, orbit: OrbitData) -> Self {
        Self {
            guid,
            parent_guid,
            docked_to_guid: None,
            docked_port_id: None,
            docked_to_port_id: None,
            orbit,
        }
    }

    /// The docking target, if this node is docked to anything.
    ///
    /// A stored value of `0` means "not docked".
    pub fn docking_target(&self) -> Option<i64> {
        self.docked_to_guid.filter(|guid| *guid != 0)
    }

    /// Multi-line tooltip text.
    pub fn tooltip(&self) -> String {
        let mut text = format!(
            "GUID: {}\nParent GUID: {}\nOrbit: {}",
            self.guid,
            self.parent_guid,
            self.orbit.summary()
        );
        if let Some(target) = self.docking_target() {
            text.push_str(&format!("\nDocked to: {}", target));
            if let (Some(port), Some(to_port)) = (self.docked_port_id, self.docked_to_port_id) {
                text.push_str(&format!(" (port {} -> {})", port, to_port));
            }
        }
        text
    }
}
