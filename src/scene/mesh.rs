use serde::Serialize;

use crate::schema::{Color, PrimitiveKind, PrimitiveSpec, Shape};

/// Renderable description of a single primitive.
///
/// Built once from a [`PrimitiveSpec`] when a model is loaded and never
/// mutated afterwards; the renderer owns the actual geometry and material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh {
    pub kind: PrimitiveKind,
    pub shape: Shape,
    pub color: Color,
}

impl Mesh {
    pub fn from_spec(spec: &PrimitiveSpec) -> Result<Self, String> {
        Ok(Self {
            kind: spec.kind,
            shape: spec.shape()?,
            color: spec.color,
        })
    }
}
