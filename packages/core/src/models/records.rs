//! Typed views of the flat save-data records
//!
//! Only the fields the orbital hierarchy needs are deserialized; everything
//! else stays in the source document and is reachable through the node's
//! [`SourceRef`](crate::models::SourceRef).

use crate::models::orbital::{deserialize_null_default, OrbitData, OrbitalData};
use serde::Deserialize;

/// A star, planet or moon from the celestial-bodies definition file.
///
/// Orbital elements are stored at the top level of these records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CelestialBodyRecord {
    #[serde(rename = "GUID", deserialize_with = "deserialize_null_default")]
    pub guid: i64,

    #[serde(rename = "ParentGUID", deserialize_with = "deserialize_null_default")]
    pub parent_guid: i64,

    pub name: Option<String>,

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
}

impl CelestialBodyRecord {
    pub fn orbital_data(&self) -> OrbitalData {
        let orbit = OrbitData {
            parent_guid: self.parent_guid,
            semi_major_axis: self.semi_major_axis,
            inclination: self.inclination,
            eccentricity: self.eccentricity,
            argument_of_periapsis: self.argument_of_periapsis,
            longitude_of_ascending_node: self.longitude_of_ascending_node,
            time_since_periapsis: self.time_since_periapsis,
            ..OrbitData::default()
        };
        OrbitalData::new(self.guid, self.parent_guid, orbit)
    }
}

/// A ship or asteroid from the save file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VesselRecord {
    #[serde(rename = "GUID", deserialize_with = "deserialize_null_default")]
    pub guid: i64,

    #[serde(deserialize_with = "deserialize_null_default")]
    pub orbit_data: OrbitData,

    #[serde(rename = "DockedToShipGUID")]
    pub docked_to_ship_guid: Option<i64>,

    #[serde(rename = "DockedPortID")]
    pub docked_port_id: Option<i64>,

    #[serde(rename = "DockedToPortID")]
    pub docked_to_port_id: Option<i64>,
}

impl VesselRecord {
    /// Orbital data; the orbital parent is the body named in `OrbitData`.
    pub fn orbital_data(&self) -> OrbitalData {
        OrbitalData {
            guid: self.guid,
            parent_guid: self.orbit_data.parent_guid,
            docked_to_guid: self.docked_to_ship_guid,
            docked_port_id: self.docked_port_id,
            docked_to_port_id: self.docked_to_port_id,
            orbit: self.orbit_data,
        }
    }
}

/// A player character. `ParentGUID` is the ship the player is aboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlayerRecord {
    #[serde(rename = "GUID", deserialize_with = "deserialize_null_default")]
    pub guid: i64,

    #[serde(rename = "ParentGUID", deserialize_with = "deserialize_null_default")]
    pub parent_guid: i64,

    pub name: Option<String>,
}

/// An item or module. `ParentGUID` is the vessel that holds it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DynamicObjectRecord {
    #[serde(rename = "GUID", deserialize_with = "deserialize_null_default")]
    pub guid: i64,

    #[serde(rename = "ParentGUID", deserialize_with = "deserialize_null_default")]
    pub parent_guid: i64,
}
