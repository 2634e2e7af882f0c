//! # Kinescope
//!
//! Replays recorded motion logs of a multi-body mechanism as a 3D animation.
//!
//! A log declares named rigid-body groups built from primitive shapes, plus a
//! time-sampled table of per-group poses. The viewer loads a log once, builds
//! it into a scene graph, and then on every tick maps wall-clock time to a
//! recorded frame and writes that frame's poses onto the scene. Drawing is
//! left to a [`Renderer`].
//!
//! ## Modules
//!
//! - [`schema`]: the log document and its validation
//! - [`scene`]: data-only scene graph with world-matrix propagation
//! - [`playback`]: model building, time → frame mapping, pose application,
//!   tick throttling and playback state
//! - [`loader`]: URL / dropped file / fixture acquisition with supersession
//! - [`viewer`]: the live model set, playback controls and the tick loop
//! - [`config`]: viewer configuration and query-string parsing
//! - [`app`]: host adapters (browser on wasm32)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kinescope::{LoadSource, NullRenderer, Viewer, ViewerConfig};
//!
//! kinescope::utils::logging::init();
//! let mut viewer = Viewer::new(ViewerConfig::default(), NullRenderer)?;
//! viewer.begin_load(LoadSource::Fixture(0)).block_on();
//! viewer.poll_loads();
//!
//! loop {
//!     viewer.tick();
//! }
//! ```

pub mod app;
pub mod config;
pub mod errors;
pub mod loader;
pub mod playback;
pub mod render;
pub mod scene;
pub mod schema;
pub mod utils;
pub mod viewer;

pub use config::{StartupSource, ViewerConfig};
pub use errors::{
    KinescopeError, LoadError, LoadErrorKind, MissingGroupPoseError, PlaybackError, Result,
    ValidationError,
};
pub use loader::{LoadSlot, LoadSource, LoaderPipeline, load};
pub use playback::{
    ModelHandle, PlaybackClock, PlaybackModel, PlaybackState, PlaybackStatus, SceneModelBuilder,
    apply, map_frame,
};
pub use render::{NullRenderer, Renderer};
pub use scene::{Mesh, Node, NodeHandle, Scene, Transform};
pub use schema::{AnimationLog, Frame, GroupSpec, Pose, PrimitiveKind, PrimitiveSpec, Shape};
pub use utils::time::{HostClock, ManualClock, TimeSource};
pub use viewer::{LoadEvent, TickOutcome, TickReport, Viewer};
