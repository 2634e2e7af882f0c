//! Log acquisition.
//!
//! [`load`] turns a [`LoadSource`] into a validated [`AnimationLog`].
//! [`LoaderPipeline`] runs loads as cancellable tasks and queues their results
//! for the viewer to commit between ticks.

pub mod fixtures;
pub mod io;
pub mod pipeline;

use crate::errors::LoadError;
use crate::schema::AnimationLog;

pub use pipeline::{LoadCompletion, LoadSlot, LoadTask, LoaderPipeline};

/// Where a log comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// A URL, or a local path on native targets.
    Url(String),
    /// The full text of a drag-and-dropped file.
    DroppedFile { name: String, text: String },
    /// A built-in fixture by index.
    Fixture(usize),
}

impl LoadSource {
    /// Short human-readable label, used for logging and as the model label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Url(uri) => io::source_filename(uri).to_string(),
            Self::DroppedFile { name, .. } => name.clone(),
            Self::Fixture(index) => match fixtures::name(*index) {
                Some(name) => format!("fixture:{name}"),
                None => format!("fixture:{index}"),
            },
        }
    }
}

/// Acquires, parses and validates a log.
pub async fn load(source: LoadSource) -> Result<AnimationLog, LoadError> {
    let log = match source {
        LoadSource::Url(uri) => {
            log::info!("Fetching log from {uri}");
            let bytes = io::read_bytes(&uri).await?;
            AnimationLog::from_json_slice(&bytes)?
        }
        LoadSource::DroppedFile { name, text } => {
            log::info!("Reading dropped file {name} ({} bytes)", text.len());
            AnimationLog::from_json_str(&text)?
        }
        LoadSource::Fixture(index) => fixtures::fixture(index)?,
    };
    log.validate()?;
    Ok(log)
}
