use glam::Affine3A;
use smallvec::SmallVec;

use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeHandle};

/// A scene node: hierarchy links, a transform and an optional mesh.
///
/// Names live in the owning [`Scene`](crate::scene::Scene) so the node itself
/// stays small; the per-tick pose writes only touch `transform`.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: SmallVec<[NodeHandle; 4]>,

    pub transform: Transform,
    pub mesh: Option<MeshKey>,
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            transform: Transform::new(),
            mesh: None,
            visible: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World transformation, valid after [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
