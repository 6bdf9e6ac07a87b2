//! Marker records and their render-position projection.
//!
//! Markers are owned by the external editor; the engine reads their angular
//! position and derives cartesian render positions from it. The cartesian
//! side is never stored back.

use std::collections::BTreeMap;

use foundation::math::{
    SphericalCoordinate, Vec3, clamp_pitch, normalize_yaw, spherical_to_cartesian,
};
use serde::{Deserialize, Serialize};

pub type MarkerId = u64;

/// A point of interest on the sphere. Identity and payload belong to the
/// editor; the engine only ever reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: SphericalCoordinate,
    pub payload: serde_json::Value,
}

/// Wire form of a marker as supplied by the editor (angles in degrees).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerRecord {
    pub id: MarkerId,
    pub yaw: f64,
    pub pitch: f64,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl MarkerRecord {
    /// Converts into an engine marker, absorbing out-of-range angles
    /// (normalize yaw, clamp pitch) instead of rejecting the record.
    pub fn into_marker(self) -> Marker {
        Marker {
            id: self.id,
            position: SphericalCoordinate::new(normalize_yaw(self.yaw), clamp_pitch(self.pitch)),
            payload: self.payload,
        }
    }
}

#[derive(Debug)]
pub enum MarkerParseError {
    Parse(serde_json::Error),
}

impl std::fmt::Display for MarkerParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerParseError::Parse(e) => write!(f, "marker parse error: {e}"),
        }
    }
}

impl std::error::Error for MarkerParseError {}

/// Parses a JSON array of marker records into engine markers.
pub fn markers_from_json_str(s: &str) -> Result<Vec<Marker>, MarkerParseError> {
    let records: Vec<MarkerRecord> = serde_json::from_str(s).map_err(MarkerParseError::Parse)?;
    Ok(records.into_iter().map(MarkerRecord::into_marker).collect())
}

/// Counters for one projection pass; handy for asserting the memo behaves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ProjectionPass {
    pub recomputed: usize,
    pub reused: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct CachedProjection {
    position: SphericalCoordinate,
    point: Vec3,
}

/// Derives cartesian render positions for markers, memoized per marker.
///
/// A marker's point is a pure function of `(id, yaw, pitch)` — never of the
/// camera or of time — so it is recomputed only when its stored angle
/// changes. Iteration order is ascending id for determinism.
#[derive(Debug, Clone)]
pub struct MarkerProjector {
    sphere_radius: f64,
    cache: BTreeMap<MarkerId, CachedProjection>,
}

impl MarkerProjector {
    pub fn new(sphere_radius: f64) -> Self {
        Self {
            sphere_radius,
            cache: BTreeMap::new(),
        }
    }

    pub fn sphere_radius(&self) -> f64 {
        self.sphere_radius
    }

    /// Refreshes the cache against the current marker set.
    ///
    /// Markers missing from `markers` are dropped from the cache. If an id
    /// appears more than once the last record wins.
    pub fn project(&mut self, markers: &[Marker]) -> ProjectionPass {
        let mut pass = ProjectionPass::default();
        let mut fresh: BTreeMap<MarkerId, CachedProjection> = BTreeMap::new();

        for marker in markers {
            let reusable = self
                .cache
                .get(&marker.id)
                .filter(|cached| cached.position == marker.position)
                .cloned();

            let entry = match reusable {
                Some(cached) => {
                    pass.reused += 1;
                    cached
                }
                None => {
                    pass.recomputed += 1;
                    CachedProjection {
                        position: marker.position,
                        point: spherical_to_cartesian(marker.position, self.sphere_radius),
                    }
                }
            };
            fresh.insert(marker.id, entry);
        }

        pass.removed = self
            .cache
            .keys()
            .filter(|id| !fresh.contains_key(id))
            .count();
        self.cache = fresh;
        pass
    }

    /// Render position of one marker, if it was in the last projected set.
    pub fn point(&self, id: MarkerId) -> Option<Vec3> {
        self.cache.get(&id).map(|c| c.point)
    }

    /// All projected positions in ascending id order.
    pub fn points(&self) -> impl Iterator<Item = (MarkerId, Vec3)> + '_ {
        self.cache.iter().map(|(id, c)| (*id, c.point))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
