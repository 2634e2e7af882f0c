use crate::errors::{MissingGroupPoseError, PlaybackError};
use crate::playback::model::PlaybackModel;
use crate::scene::Scene;

/// Writes the poses of `frame_index` onto the model's group nodes and records
/// it as the model's current frame.
///
/// Every group is checked before any node is written. On error nothing is
/// changed, so a model is never left showing a mix of two frames.
///
/// A model with no groups accepts any index; it is clamped into range.
pub fn apply(
    scene: &mut Scene,
    model: &mut PlaybackModel,
    frame_index: usize,
) -> Result<(), PlaybackError> {
    let frames = model.frames.clone();

    if model.groups.is_empty() {
        model.current_frame = frame_index.min(frames.len().saturating_sub(1));
        return Ok(());
    }

    let missing = |slot: usize| {
        PlaybackError::from(MissingGroupPoseError {
            group_name: model.groups[slot].name.clone(),
            frame_index,
        })
    };

    let row = frames.row(frame_index).ok_or_else(|| missing(0))?;

    for (slot, (binding, cell)) in model.groups.iter().zip(row).enumerate() {
        if cell.is_none() {
            return Err(missing(slot));
        }
        if !scene.nodes.contains_key(binding.node) {
            return Err(PlaybackError::DetachedGroup(binding.name.clone()));
        }
    }

    for (binding, pose) in model.groups.iter().zip(row.iter().flatten()) {
        if let Some(node) = scene.get_node_mut(binding.node) {
            node.transform.set_pose(pose.position, pose.orientation);
        }
    }

    model.current_frame = frame_index;
    Ok(())
}
