use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::ValidationError;
use crate::playback::model::{FrameTable, GroupBinding, PlaybackModel, Timing};
use crate::schema::AnimationLog;
use crate::scene::{Mesh, Scene};

/// Turns a validated [`AnimationLog`] into a [`PlaybackModel`] attached to a
/// [`Scene`].
///
/// The resulting subtree is:
///
/// ```text
/// <model root>
/// ├── <group "a">          ← transform written every tick
/// │   ├── primitive mesh
/// │   └── primitive mesh
/// └── <group "b">
///     └── primitive mesh
/// ```
pub struct SceneModelBuilder;

impl SceneModelBuilder {
    /// Validates `log`, then builds its nodes and registers the model root
    /// with the scene.
    ///
    /// All fallible work happens before the scene is touched, so an error
    /// leaves the scene unchanged.
    pub fn build(scene: &mut Scene, log: &AnimationLog) -> Result<PlaybackModel, ValidationError> {
        log.validate()?;

        let meshes = log
            .groups
            .iter()
            .map(|group| {
                group
                    .primitives
                    .iter()
                    .enumerate()
                    .map(|(primitive_index, spec)| {
                        Mesh::from_spec(spec).map_err(|reason| ValidationError::InvalidPrimitive {
                            group_name: group.name.clone(),
                            primitive_index,
                            reason,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let group_names: Vec<&str> = log.groups.iter().map(|g| g.name.as_str()).collect();
        let frames = Arc::new(FrameTable::from_log(log, &group_names));

        let root = scene.create_node_with_name("model");
        let mut groups = Vec::with_capacity(log.groups.len());
        let mut group_index = FxHashMap::default();

        for (slot, (spec, group_meshes)) in log.groups.iter().zip(meshes).enumerate() {
            let node = scene.create_node_with_name(&spec.name);
            scene.attach(node, root);

            for (i, mesh) in group_meshes.into_iter().enumerate() {
                let child = scene.create_node_with_name(&format!("{}#{i}", spec.name));
                scene.set_mesh(child, mesh);
                scene.attach(child, node);
            }

            group_index.insert(spec.name.clone(), slot);
            groups.push(GroupBinding {
                name: spec.name.clone(),
                node,
            });
        }

        scene.add_root(root);

        log::debug!(
            "Built model: {} groups, {} frames, step {}s",
            groups.len(),
            frames.len(),
            log.step
        );

        Ok(PlaybackModel {
            label: String::new(),
            root,
            groups,
            group_index,
            frames,
            timing: Timing {
                step: log.step,
                start: log.start,
                stop: log.stop,
            },
            current_frame: 0,
            halted: None,
        })
    }
}
