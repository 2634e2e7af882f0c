//! Rendering collaborator interface.
//!
//! The viewer never draws. After each eligible tick it has updated world
//! matrices for every node and hands the scene to a [`Renderer`], which owns
//! meshes, materials, camera, lighting and the output surface.

use crate::scene::{NodeHandle, Scene};

pub trait Renderer {
    /// Draws the scene. World matrices are up to date when this is called.
    fn render(&mut self, scene: &Scene);

    /// Output surface changed size. Never called with a zero dimension.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// A model subtree rooted at `root` was attached to the scene. Its mesh
    /// descriptors are reachable through [`Scene::meshes`].
    fn on_model_added(&mut self, _scene: &Scene, _root: NodeHandle) {}

    /// A model subtree is about to be removed; release whatever was built
    /// for it.
    fn on_model_removed(&mut self, _scene: &Scene, _root: NodeHandle) {}
}

/// Renderer that draws nothing. Used headless and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _scene: &Scene) {}
}
