//! Scene Graph
//!
//! A data-only scene graph that playback writes into and a renderer reads from:
//! - [`Node`]: hierarchy links, transform and an optional mesh
//! - [`Transform`]: position / rotation / scale with cached matrices
//! - [`Mesh`]: the primitive descriptor a renderer turns into geometry
//! - [`Scene`]: owns nodes and meshes, propagates world matrices
//!
//! No GPU state lives here. Renderers consume [`Scene`] through
//! [`crate::render::Renderer`].

pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use mesh::Mesh;
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Opaque reference to a node in a [`Scene`].
    pub struct NodeHandle;
    pub struct MeshKey;
}
