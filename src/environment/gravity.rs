use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::STANDARD_GRAVITY;
use crate::errors::SimulationError;

#[derive(Clone, Debug, PartialEq)]
pub struct Planet {
    pub name: String,
    pub gravity: f64, // m/s², magnitude
}

impl Planet {
    pub fn new(name: String, gravity: f64) -> Self {
        Planet { name, gravity }
    }
}

/// Planet name to surface gravity. Immutable once built; share it behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct GravityTable {
    planets: Vec<Planet>,
}

impl GravityTable {
    pub fn standard() -> Self {
        GravityTable {
            planets: STANDARD_GRAVITY
                .iter()
                .map(|(name, gravity)| Planet::new(name.to_string(), *gravity))
                .collect(),
        }
    }

    pub fn from_entries<I, S>(entries: I) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut planets: Vec<Planet> = Vec::new();
        for (name, gravity) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(SimulationError::ConfigurationError(
                    "planet name must not be empty".to_string(),
                ));
            }
            if !gravity.is_finite() || gravity <= 0.0 {
                return Err(SimulationError::ConfigurationError(format!(
                    "gravity for {} must be positive, got {}",
                    name, gravity
                )));
            }
            if planets.iter().any(|planet| planet.name == name) {
                return Err(SimulationError::ConfigurationError(format!(
                    "duplicate planet: {}",
                    name
                )));
            }
            planets.push(Planet::new(name, gravity));
        }

        if planets.is_empty() {
            return Err(SimulationError::ConfigurationError(
                "gravity table is empty".to_string(),
            ));
        }

        Ok(GravityTable { planets })
    }

    pub fn lookup(&self, planet: &str) -> Option<f64> {
        self.planets
            .iter()
            .find(|entry| entry.name == planet)
            .map(|entry| entry.gravity)
    }

    pub fn list_planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }
}

impl Default for GravityTable {
    fn default() -> Self {
        GravityTable::standard()
    }
}

// Discovery payload: a flat JSON object, planet -> gravity, in table order.
impl Serialize for GravityTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.planets.len()))?;
        for planet in &self.planets {
            map.serialize_entry(&planet.name, &planet.gravity)?;
        }
        map.end()
    }
}

// Entries are taken in document order and validated like `from_entries`.
impl<'de> Deserialize<'de> for GravityTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = GravityTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of planet name to surface gravity")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, f64)> = Vec::new();
                while let Some(entry) = access.next_entry::<String, f64>()? {
                    entries.push(entry);
                }
                GravityTable::from_entries(entries).map_err(|e| de::Error::custom(e.detail()))
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_lookup() {
        let table = GravityTable::standard();

        assert_eq!(table.len(), 9);
        assert_eq!(table.lookup("Earth"), Some(9.81));
        assert_eq!(table.lookup("Moon"), Some(1.62));
        assert_eq!(table.lookup("Jupiter"), Some(24.79));
        assert_eq!(table.lookup("Pluto"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = GravityTable::standard();
        assert_eq!(table.lookup("earth"), None);
        assert_eq!(table.lookup("EARTH"), None);
    }

    #[test]
    fn test_list_planets_keeps_catalog_order() {
        let table = GravityTable::standard();
        let planets = table.list_planets();
        assert_eq!(planets.first().map(|planet| planet.name.as_str()), Some("Earth"));
        assert_eq!(planets.last().map(|planet| planet.name.as_str()), Some("Neptune"));
        assert!(table.list_planets().iter().all(|planet| planet.gravity > 0.0));
    }

    #[test]
    fn test_from_entries_rejects_bad_gravity() {
        let result = GravityTable::from_entries(vec![("Earth", 9.81), ("Void", 0.0)]);
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))));

        let result = GravityTable::from_entries(vec![("Earth", -9.81)]);
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))));

        let result = GravityTable::from_entries(vec![("Earth", f64::NAN)]);
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_entries_rejects_duplicates_and_empty() {
        let result = GravityTable::from_entries(vec![("Earth", 9.81), ("Earth", 9.8)]);
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))));

        let result = GravityTable::from_entries(Vec::<(String, f64)>::new());
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let json = serde_json::to_value(GravityTable::standard()).unwrap();
        assert_eq!(json["Earth"], 9.81);
        assert_eq!(json["Neptune"], 11.15);
        assert_eq!(json.as_object().unwrap().len(), 9);
    }

    #[test]
    fn test_discovery_payload_keeps_document_order() {
        let json = serde_json::to_string(&GravityTable::standard()).unwrap();
        let table: GravityTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, GravityTable::standard());

        let table: GravityTable =
            serde_json::from_str(r#"{"Mercury": 3.7, "Earth": 9.81, "Ceres": 0.28}"#).unwrap();
        let names: Vec<&str> = table.list_planets().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Mercury", "Earth", "Ceres"]);
    }

    #[test]
    fn test_discovery_payload_is_validated() {
        assert!(serde_json::from_str::<GravityTable>(r#"{"Earth": -9.81}"#).is_err());
        assert!(serde_json::from_str::<GravityTable>("{}").is_err());
        assert!(serde_json::from_str::<GravityTable>(r#"["Earth"]"#).is_err());
    }
}
