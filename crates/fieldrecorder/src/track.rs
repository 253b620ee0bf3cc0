//! GPS trails.
//!
//! A [`Track`] is the ordered list of fixes recorded while walking a
//! permission. Fixes with poor accuracy are dropped as they arrive, except
//! for the first one so that every track has a starting point.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::convert::Converter;
use crate::error::{Error, Result};
use crate::gps::GpsFix;
use crate::gridref::GridReference;

/// Default worst accuracy accepted after the first point, metres.
pub const DEFAULT_MAX_ACCURACY_M: f64 = 50.0;

/// Rules for accepting fixes into a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPolicy {
    /// Fixes reporting a larger accuracy radius are skipped.
    pub max_accuracy_m: f64,
}

impl Default for TrackPolicy {
    fn default() -> Self {
        Self {
            max_accuracy_m: DEFAULT_MAX_ACCURACY_M,
        }
    }
}

/// On-disk track layouts accepted by [`Track::load`].
#[derive(Deserialize)]
#[serde(untagged)]
enum TrackFile {
    Fixes(Vec<GpsFix>),
    Track(Track),
}

/// A named sequence of GPS fixes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Display name, e.g. "Top field, north headland".
    #[serde(default)]
    pub name: String,
    /// Accepted fixes in arrival order.
    #[serde(default)]
    pub points: Vec<GpsFix>,
}

impl Track {
    /// Create an empty track.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    /// Build a track by offering each fix in turn to [`Track::push`].
    #[must_use]
    pub fn from_fixes(
        name: impl Into<String>,
        fixes: impl IntoIterator<Item = GpsFix>,
        policy: &TrackPolicy,
    ) -> Self {
        let mut track = Self::new(name);
        for fix in fixes {
            track.push(fix, policy);
        }
        track
    }

    /// Append a fix unless it is too inaccurate.
    ///
    /// The first fix is always kept. Returns whether the fix was appended.
    pub fn push(&mut self, fix: GpsFix, policy: &TrackPolicy) -> bool {
        if !self.points.is_empty() && fix.is_less_accurate_than(policy.max_accuracy_m) {
            debug!(
                accuracy_m = fix.accuracy_m,
                limit_m = policy.max_accuracy_m,
                "skipping inaccurate fix"
            );
            return false;
        }
        self.points.push(fix);
        true
    }

    /// Number of accepted fixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the track has no fixes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Grid reference of every fix, in order.
    #[must_use]
    pub fn grid_references(&self, converter: &Converter) -> Vec<Result<Option<GridReference>>> {
        self.points
            .iter()
            .map(|fix| fix.grid_reference(converter))
            .collect()
    }

    /// Read fixes from a JSON file and filter them into a track.
    ///
    /// The file may hold either a bare array of fixes or a whole track
    /// object. The track is named after the file stem when it has no name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: impl AsRef<Path>, policy: &TrackPolicy) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::TrackRead {
            path: path.to_path_buf(),
            source,
        })?;

        let (name, fixes) = match serde_json::from_str(&text)? {
            TrackFile::Fixes(fixes) => (String::new(), fixes),
            TrackFile::Track(track) => (track.name, track.points),
        };
        let name = if name.is_empty() {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            name
        };

        let offered = fixes.len();
        let track = Self::from_fixes(name, fixes, policy);
        info!(
            "Loaded track '{}' from {}: kept {} of {} fixes",
            track.name,
            path.display(),
            track.len(),
            offered
        );
        Ok(track)
    }

    /// Write the track as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fix(accuracy: Option<f64>) -> GpsFix {
        GpsFix::new(52.2, -0.9, accuracy)
    }

    #[test]
    fn test_first_point_always_kept() {
        let mut track = Track::new("walk");
        assert!(track.push(fix(Some(500.0)), &TrackPolicy::default()));
        assert_eq!(track.len(), 1);
    }

    #[test]
    fn test_inaccurate_points_skipped_after_first() {
        let policy = TrackPolicy::default();
        let mut track = Track::new("walk");
        assert!(track.push(fix(Some(5.0)), &policy));
        assert!(!track.push(fix(Some(51.0)), &policy));
        assert!(track.push(fix(Some(50.0)), &policy));
        assert!(track.push(fix(None), &policy));
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn test_custom_policy() {
        let policy = TrackPolicy {
            max_accuracy_m: 10.0,
        };
        let track = Track::from_fixes(
            "strict",
            vec![fix(Some(3.0)), fix(Some(12.0)), fix(Some(9.0))],
            &policy,
        );
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn test_grid_references() {
        let track = Track::from_fixes(
            "mixed",
            vec![
                GpsFix::new(51.5074, -0.1278, None),
                GpsFix::new(48.8566, 2.3522, None),
                GpsFix::new(95.0, 0.0, None),
            ],
            &TrackPolicy::default(),
        );
        let refs = track.grid_references(&Converter::default());
        assert_eq!(refs.len(), 3);
        assert_eq!(
            refs[0].as_ref().unwrap().map(|r| r.to_string()).as_deref(),
            Some("TQ 2991 8043")
        );
        assert!(refs[1].as_ref().unwrap().is_none());
        assert!(refs[2].is_err());
    }

    #[test]
    fn test_load_bare_array() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"lat": 52.2, "lon": -0.9, "accuracy": 80.0, "timestamp": "2025-03-14T10:30:00Z"}},
                {{"lat": 52.2001, "lon": -0.9, "accuracy": 90.0, "timestamp": "2025-03-14T10:30:05Z"}},
                {{"lat": 52.2002, "lon": -0.9, "accuracy": 4.0, "timestamp": "2025-03-14T10:30:10Z"}}
            ]"#
        )
        .unwrap();

        let track = Track::load(file.path(), &TrackPolicy::default()).unwrap();
        assert_eq!(track.len(), 2);
        assert!(!track.name.is_empty());
    }

    #[test]
    fn test_load_epoch_millis_timestamps() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"lat": 52.2, "lon": -0.9, "accuracy": 6.0, "timestamp": 1710412200000}},
                {{"lat": 52.2001, "lon": -0.9, "accuracy": 7.0, "timestamp": 1710412205000}}
            ]"#
        )
        .unwrap();

        let track = Track::load(file.path(), &TrackPolicy::default()).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(
            track.points[1].captured_at.to_rfc3339(),
            "2024-03-14T10:30:05+00:00"
        );
    }

    #[test]
    fn test_save_and_load_track_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headland.json");
        let track = Track::from_fixes(
            "Headland",
            vec![fix(Some(2.0)), fix(Some(3.0))],
            &TrackPolicy::default(),
        );
        track.save(&path).unwrap();

        let loaded = Track::load(&path, &TrackPolicy::default()).unwrap();
        assert_eq!(loaded, track);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Track::load("/nonexistent/track.json", &TrackPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::TrackRead { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Track::load(file.path(), &TrackPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
