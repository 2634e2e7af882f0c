//! Error Types
//!
//! This module defines the error types used throughout the viewer.
//!
//! # Overview
//!
//! Errors are split by the stage that raises them:
//! - [`ValidationError`]: a log is structurally malformed and cannot be loaded
//! - [`LoadError`]: acquiring or parsing log bytes failed
//! - [`MissingGroupPoseError`]: a frame lacks a pose for a declared group
//! - [`PlaybackError`]: why a single model stopped advancing
//!
//! [`KinescopeError`] wraps all of them for callers that only want one type.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kinescope::errors::{KinescopeError, Result};
//!
//! fn open(text: &str) -> Result<()> {
//!     let log = kinescope::schema::AnimationLog::from_json_str(text)?;
//!     log.validate()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// A log whose structure violates the log invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `step` must be a finite, strictly positive number of seconds.
    #[error("Invalid step: {0} (must be > 0)")]
    InvalidStep(f64),

    /// `stop` must lie strictly after `start`.
    #[error("Invalid time range: start {start}, stop {stop} (stop must be > start)")]
    InvalidRange {
        /// Recording start in seconds
        start: f64,
        /// Recording stop in seconds
        stop: f64,
    },

    /// The frame table has no entries.
    #[error("Log contains no frames")]
    NoFrames,

    /// The number of frames disagrees with `round((stop - start) / step)`.
    #[error("Frame count mismatch: expected {expected} frames, found {found}")]
    FrameCountMismatch {
        /// Frame count implied by the timing parameters
        expected: usize,
        /// Frame count actually present
        found: usize,
    },

    /// Two groups share a name.
    #[error("Duplicate group name: {0}")]
    DuplicateGroup(String),

    /// A frame carries a pose for a group that was never declared.
    #[error("Frame {frame_index} references undeclared group '{group_name}'")]
    UndeclaredGroup {
        /// The unknown group name
        group_name: String,
        /// Index of the offending frame
        frame_index: usize,
    },

    /// A primitive lacks a dimension its kind requires.
    #[error("Group '{group_name}': primitive {primitive_index} is invalid: {reason}")]
    InvalidPrimitive {
        /// Owning group
        group_name: String,
        /// Position of the primitive inside the group
        primitive_index: usize,
        /// What was wrong
        reason: String,
    },
}

/// Which stage of source acquisition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    /// The source could not be reached.
    Network,
    /// The source was reached but its content is not a valid log.
    Parse,
    /// The requested built-in fixture does not exist.
    NotFound,
}

/// Failure to acquire a log from a source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Transport failure: unreachable host, unreadable file.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP response with a non-success status code.
    #[error("HTTP response error: status {status} {status_text}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Reason phrase reported by the server
        status_text: String,
    },

    /// The bytes are not a well-formed log document.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document parsed but failed validation.
    #[error("Invalid log: {0}")]
    Invalid(#[from] ValidationError),

    /// No built-in fixture has this index.
    #[error("Fixture not found: {0}")]
    FixtureNotFound(usize),
}

impl LoadError {
    /// Classifies this error for the user interface.
    #[must_use]
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::Network(_) | Self::HttpStatus { .. } => LoadErrorKind::Network,
            Self::Parse(_) | Self::Invalid(_) => LoadErrorKind::Parse,
            Self::FixtureNotFound(_) => LoadErrorKind::NotFound,
        }
    }

    /// A short, user-facing explanation.
    ///
    /// Distinguishes a source that could not be reached from one whose
    /// content was not a valid log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            LoadErrorKind::Network => format!("Could not reach the log source ({self})."),
            LoadErrorKind::Parse => format!("The source content is not a valid motion log ({self})."),
            LoadErrorKind::NotFound => format!("No built-in sample exists with that number ({self})."),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

/// A frame that lacks a pose for one of the model's groups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Frame {frame_index} has no pose for group '{group_name}'")]
pub struct MissingGroupPoseError {
    pub group_name: String,
    pub frame_index: usize,
}

/// Why a model stopped advancing during playback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error(transparent)]
    MissingGroupPose(#[from] MissingGroupPoseError),

    /// A group's scene node vanished from the scene graph.
    #[error("Scene node for group '{0}' no longer exists")]
    DetachedGroup(String),
}

/// The umbrella error type for the crate.
#[derive(Error, Debug)]
pub enum KinescopeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Invalid viewer configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A handle that does not refer to a live model.
    #[error("Model not found")]
    ModelNotFound,
}

impl From<MissingGroupPoseError> for KinescopeError {
    fn from(err: MissingGroupPoseError) -> Self {
        KinescopeError::Playback(err.into())
    }
}

/// Alias for `Result<T, KinescopeError>`.
pub type Result<T> = std::result::Result<T, KinescopeError>;
