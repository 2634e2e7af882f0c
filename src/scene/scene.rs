use glam::Affine3A;
use slotmap::{SecondaryMap, SlotMap};

use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::{MeshKey, NodeHandle};

/// Scene graph container.
///
/// Scene is a pure data layer: node hierarchy, names and mesh descriptors.
/// Models are attached as root subtrees and only removed by an explicit
/// [`remove_node`](Self::remove_node).
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
    pub meshes: SlotMap<MeshKey, Mesh>,

    names: SecondaryMap<NodeHandle, String>,

    // Reused across `update_matrix_world` calls.
    update_stack: Vec<(NodeHandle, Affine3A, bool)>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            names: SecondaryMap::new(),
            update_stack: Vec::new(),
        }
    }

    // ========================================================================
    // Node creation
    // ========================================================================

    /// Creates a detached node. Attach it with [`attach`](Self::attach) or
    /// promote it with [`add_root`](Self::add_root).
    pub fn create_node(&mut self) -> NodeHandle {
        self.nodes.insert(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.names.insert(handle, name.to_string());
        handle
    }

    /// Marks an existing, parentless node as a scene root.
    pub fn add_root(&mut self, handle: NodeHandle) {
        let is_orphan = self.nodes.get(handle).is_some_and(|n| n.parent.is_none());
        if is_orphan && !self.root_nodes.contains(&handle) {
            self.root_nodes.push(handle);
        }
    }

    /// Registers a mesh descriptor and binds it to `node`.
    pub fn set_mesh(&mut self, node: NodeHandle, mesh: Mesh) -> Option<MeshKey> {
        let target = self.nodes.get_mut(node)?;
        let key = self.meshes.insert(mesh);
        if let Some(old) = target.mesh.replace(key) {
            self.meshes.remove(old);
        }
        Some(key)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Makes `child` a child of `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return;
        }
        self.detach(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Unlinks `handle` from its parent (or from the root list).
    pub fn detach(&mut self, handle: NodeHandle) {
        let parent = self.nodes.get(handle).and_then(|n| n.parent);
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|c| *c != handle);
                }
                if let Some(node) = self.nodes.get_mut(handle) {
                    node.parent = None;
                }
            }
            None => self.root_nodes.retain(|r| *r != handle),
        }
    }

    /// Removes a node together with its whole subtree and their meshes.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach(handle);

        let mut pending = vec![handle];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(current) {
                pending.extend(node.children.iter().copied());
                if let Some(mesh) = node.mesh {
                    self.meshes.remove(mesh);
                }
            }
            self.names.remove(current);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Mesh-carrying nodes in the subtree rooted at `root`, depth-first.
    #[must_use]
    pub fn meshes_under(&self, root: NodeHandle) -> Vec<(MeshKey, &Mesh)> {
        let mut found = Vec::new();
        let mut pending = vec![root];
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if let Some(mesh) = node.mesh.and_then(|key| Some((key, self.meshes.get(key)?))) {
                found.push(mesh);
            }
            pending.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// Every visible mesh with the world matrix of the node carrying it.
    pub fn iter_visible_meshes(&self) -> impl Iterator<Item = (MeshKey, &Mesh, &Affine3A)> {
        self.nodes.values().filter(|node| node.visible).filter_map(|node| {
            let key = node.mesh?;
            Some((key, self.meshes.get(key)?, node.world_matrix()))
        })
    }

    // ========================================================================
    // Transform propagation
    // ========================================================================

    /// Recomputes world matrices for every node whose local transform, or any
    /// ancestor's, changed since the previous call.
    pub fn update_matrix_world(&mut self) {
        let mut stack = std::mem::take(&mut self.update_stack);
        stack.clear();
        stack.extend(self.root_nodes.iter().map(|&h| (h, Affine3A::IDENTITY, false)));

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let changed = node.transform.update_local_matrix() || parent_changed;
            if changed {
                node.transform.world_matrix = parent_world * node.transform.local_matrix;
            }
            let world = node.transform.world_matrix;
            stack.extend(node.children.iter().map(|&child| (child, world, changed)));
        }

        self.update_stack = stack;
    }
}
