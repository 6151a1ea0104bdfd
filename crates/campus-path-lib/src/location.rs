//! Known locations and nearest-match lookup
//!
//! This module provides the `LocationIndex`, loaded once from the path service and
//! queried on every map click to snap the raw coordinate to the closest location.

use crate::service::PathService;
use geo::Rect;
use serde::{Deserialize, Deserializer, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar distance in degree space (not geodesically corrected)
    #[inline(always)]
    pub fn planar_distance(&self, lat: f64, lon: f64) -> f64 {
        ((self.lat - lat).powi(2) + (self.lon - lon).powi(2)).sqrt()
    }
}

/// A named point on the campus map, the unit of selection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Identity of the location; the service sends integers, strings are accepted too
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
        }
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Signed(id) => id.to_string(),
        RawId::Unsigned(id) => id.to_string(),
    })
}

/// Read-only set of every known location, in the order the service returned them
#[derive(Clone, Debug, Default)]
pub struct LocationIndex {
    locations: Vec<Location>,
}

impl LocationIndex {
    /// Create an index over the given locations, keeping their order
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// Fetch every location from the service.
    ///
    /// A failed load is not fatal: it is logged and an empty index is returned, so
    /// the map stays usable and clicks simply resolve to nothing.
    pub async fn load<S: PathService>(service: &S) -> Self {
        match service.nodes().await {
            Ok(locations) => {
                tracing::info!("Loaded {} locations", locations.len());
                Self::new(locations)
            }
            Err(err) => {
                tracing::error!("Error loading locations: {err} ({})", err.detail());
                Self::default()
            }
        }
    }

    /// Closest location to the given point.
    ///
    /// Linear scan over all locations. On exact distance ties the location that comes
    /// first in the index wins. Returns `None` when the index is empty.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<&Location> {
        profiling::scope!("LocationIndex::nearest");

        let mut nearest = None;
        let mut min_distance = f64::INFINITY;

        for location in &self.locations {
            let distance = location.position().planar_distance(lat, lon);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(location);
            }
        }

        nearest
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Bounding box of all locations (x = longitude, y = latitude)
    pub fn bounding_box(&self) -> Option<Rect<f64>> {
        let first = self.locations.first()?;
        let mut min = geo::Coord {
            x: first.lon,
            y: first.lat,
        };
        let mut max = min;

        for location in &self.locations[1..] {
            min.x = min.x.min(location.lon);
            min.y = min.y.min(location.lat);
            max.x = max.x.max(location.lon);
            max.y = max.y.max(location.lat);
        }

        Some(Rect::new(min, max))
    }
}
