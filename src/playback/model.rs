use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::new_key_type;

use crate::errors::PlaybackError;
use crate::schema::{AnimationLog, Pose};
use crate::scene::NodeHandle;

new_key_type! {
    /// Handle to a model in the viewer's live model set.
    pub struct ModelHandle;
}

/// Sampling parameters of a recording, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub step: f64,
    pub start: f64,
    pub stop: f64,
}

impl Timing {
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }
}

/// Dense pose table: one row per frame, one column per group slot.
///
/// Built once from the log's name-keyed frames so the per-tick path indexes
/// by slot instead of hashing group names. A `None` cell marks a pose the log
/// omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTable {
    frame_count: usize,
    group_count: usize,
    cells: Vec<Option<Pose>>,
}

impl FrameTable {
    /// Lays out `log.frames` with columns in `group_names` order.
    #[must_use]
    pub fn from_log(log: &AnimationLog, group_names: &[&str]) -> Self {
        let group_count = group_names.len();
        let mut cells = Vec::with_capacity(log.frames.len() * group_count);
        for frame in &log.frames {
            cells.extend(group_names.iter().map(|name| frame.get(name).copied()));
        }
        Self {
            frame_count: log.frames.len(),
            group_count,
            cells,
        }
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frame_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// All cells of one frame, or `None` past the end.
    #[must_use]
    pub fn row(&self, frame: usize) -> Option<&[Option<Pose>]> {
        if frame >= self.frame_count {
            return None;
        }
        let begin = frame * self.group_count;
        self.cells.get(begin..begin + self.group_count)
    }

    #[must_use]
    pub fn pose(&self, frame: usize, slot: usize) -> Option<&Pose> {
        self.row(frame)?.get(slot)?.as_ref()
    }
}

/// A group's name and the scene node that carries its transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBinding {
    pub name: String,
    pub node: NodeHandle,
}

/// Runtime instantiation of one loaded log.
///
/// Created by [`SceneModelBuilder`](crate::playback::SceneModelBuilder); the
/// group bindings and frame table never change afterwards. Only
/// `current_frame` and the halt flag evolve during playback.
#[derive(Debug, Clone)]
pub struct PlaybackModel {
    pub(crate) label: String,
    pub(crate) root: NodeHandle,
    pub(crate) groups: Vec<GroupBinding>,
    pub(crate) group_index: FxHashMap<String, usize>,
    pub(crate) frames: Arc<FrameTable>,
    pub(crate) timing: Timing,
    pub(crate) current_frame: usize,
    pub(crate) halted: Option<PlaybackError>,
}

impl PlaybackModel {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Root node of the model's subtree in the scene.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn frames(&self) -> &Arc<FrameTable> {
        &self.frames
    }

    /// Index of the frame most recently applied.
    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[must_use]
    pub fn groups(&self) -> &[GroupBinding] {
        &self.groups
    }

    /// Group names in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Scene node of the named group.
    #[must_use]
    pub fn group_handle(&self, name: &str) -> Option<NodeHandle> {
        self.group_index.get(name).map(|&slot| self.groups[slot].node)
    }

    /// Why the model stopped advancing, if it did.
    #[must_use]
    pub fn halted(&self) -> Option<&PlaybackError> {
        self.halted.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub(crate) fn halt(&mut self, reason: PlaybackError) {
        self.halted = Some(reason);
    }

    pub(crate) fn resume(&mut self) -> Option<PlaybackError> {
        self.halted.take()
    }
}
