//! Playback core: log → model, time → frame, frame → scene.
//!
//! - [`SceneModelBuilder`] instantiates a validated log as scene nodes and a
//!   [`PlaybackModel`].
//! - [`map_frame`] turns elapsed time and speed into a frame index.
//! - [`apply`] writes that frame's poses onto the model's group nodes.
//! - [`PlaybackClock`] throttles ticks to a target rate.
//! - [`PlaybackState`] holds play/pause, speed and the elapsed-time origin.

pub mod applier;
pub mod builder;
pub mod clock;
pub mod mapper;
pub mod model;
pub mod state;

pub use applier::apply;
pub use builder::SceneModelBuilder;
pub use clock::PlaybackClock;
pub use mapper::{frame_for_offset, map_frame};
pub use model::{FrameTable, GroupBinding, ModelHandle, PlaybackModel, Timing};
pub use state::{PlaybackState, PlaybackStatus};
