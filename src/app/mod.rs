//! Host Integration
//!
//! Glue between the [`Viewer`](crate::Viewer) and a host environment.
//!
//! - [`web`]: browser adapter (wasm32 only). Wires drag-and-drop, query
//!   string startup, window resize and a `requestAnimationFrame` tick driver,
//!   and exports the viewer to JavaScript through `wasm-bindgen`.
//!
//! Native hosts drive [`Viewer::tick`](crate::Viewer::tick) and
//! [`Viewer::poll_loads`](crate::Viewer::poll_loads) from their own loop.

#[cfg(target_arch = "wasm32")]
pub mod web;
