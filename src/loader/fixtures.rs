//! Built-in sample logs, addressable by index (`?test=<n>`).

use crate::errors::LoadError;
use crate::schema::AnimationLog;

const FIXTURES: &[(&str, &str)] = &[
    ("arm", include_str!("../../fixtures/arm.json")),
    ("pendulum", include_str!("../../fixtures/pendulum.json")),
];

/// Number of built-in fixtures.
#[must_use]
pub fn count() -> usize {
    FIXTURES.len()
}

/// Name of the fixture at `index`.
#[must_use]
pub fn name(index: usize) -> Option<&'static str> {
    FIXTURES.get(index).map(|(name, _)| *name)
}

/// Parses the fixture at `index`.
pub fn fixture(index: usize) -> Result<AnimationLog, LoadError> {
    let (_, text) = FIXTURES.get(index).ok_or(LoadError::FixtureNotFound(index))?;
    AnimationLog::from_json_str(text)
}
