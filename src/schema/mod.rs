//! Animation Log Schema
//!
//! The declarative description of one recording: timing parameters, the
//! named rigid-body groups and their primitives, and the per-frame pose table.
//!
//! Logs are JSON documents:
//!
//! ```json
//! {
//!   "step": 0.1, "start": 0.0, "stop": 1.0,
//!   "groups": [{ "name": "arm", "objs": [{ "type": "box", "scale": [1, 2, 3], "color": 16711680 }] }],
//!   "frames": [{ "arm": { "position": [0, 0, 0], "quaternion": [0, 0, 0, 1] } }]
//! }
//! ```
//!
//! A parsed [`AnimationLog`] is immutable. [`AnimationLog::validate`] checks
//! the structural invariants; the scene builder calls it before building.

pub mod primitive;

use glam::{Quat, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::errors::{LoadError, ValidationError};

pub use primitive::{Color, PrimitiveKind, PrimitiveSpec, Shape};

/// One recorded animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationLog {
    /// Seconds per frame.
    pub step: f64,
    /// Recording start, in seconds.
    pub start: f64,
    /// Recording stop, in seconds.
    pub stop: f64,
    /// Rigid sub-assemblies, in declaration order.
    pub groups: Vec<GroupSpec>,
    /// Time-sampled poses, one entry per step.
    pub frames: Vec<Frame>,
}

/// A named rigid sub-assembly built from primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    #[serde(rename = "objs", default)]
    pub primitives: Vec<PrimitiveSpec>,
}

/// Position and orientation of one group at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Quaternion in `[x, y, z, w]` order.
    #[serde(rename = "quaternion")]
    pub orientation: Quat,
}

impl Pose {
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// A snapshot of group poses keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    poses: FxHashMap<String, Pose>,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for constructing logs in code.
    #[must_use]
    pub fn with_pose(mut self, group: impl Into<String>, pose: Pose) -> Self {
        self.poses.insert(group.into(), pose);
        self
    }

    pub fn insert(&mut self, group: impl Into<String>, pose: Pose) -> Option<Pose> {
        self.poses.insert(group.into(), pose)
    }

    #[must_use]
    pub fn get(&self, group: &str) -> Option<&Pose> {
        self.poses.get(group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pose)> {
        self.poses.iter().map(|(name, pose)| (name.as_str(), pose))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl AnimationLog {
    /// Parses a log from JSON text. Performs no validation.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a log from raw JSON bytes. Performs no validation.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Recording length in seconds.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }

    /// Number of frames implied by the timing parameters.
    #[must_use]
    pub fn expected_frame_count(&self) -> usize {
        (self.duration() / self.step).round() as usize
    }

    /// Checks every structural invariant of the log.
    ///
    /// A frame that omits a declared group is *not* rejected here; that is
    /// only detected when the frame is applied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ValidationError::InvalidStep(self.step));
        }
        if !self.start.is_finite() || !self.stop.is_finite() || self.stop <= self.start {
            return Err(ValidationError::InvalidRange {
                start: self.start,
                stop: self.stop,
            });
        }
        if self.frames.is_empty() {
            return Err(ValidationError::NoFrames);
        }

        let expected = self.expected_frame_count();
        if expected != self.frames.len() {
            return Err(ValidationError::FrameCountMismatch {
                expected,
                found: self.frames.len(),
            });
        }

        let mut declared = FxHashSet::default();
        for group in &self.groups {
            if !declared.insert(group.name.as_str()) {
                return Err(ValidationError::DuplicateGroup(group.name.clone()));
            }
            for (primitive_index, primitive) in group.primitives.iter().enumerate() {
                primitive
                    .shape()
                    .map_err(|reason| ValidationError::InvalidPrimitive {
                        group_name: group.name.clone(),
                        primitive_index,
                        reason,
                    })?;
            }
        }

        for (frame_index, frame) in self.frames.iter().enumerate() {
            if let Some((name, _)) = frame.iter().find(|(name, _)| !declared.contains(name)) {
                return Err(ValidationError::UndeclaredGroup {
                    group_name: name.to_string(),
                    frame_index,
                });
            }
        }

        Ok(())
    }
}
