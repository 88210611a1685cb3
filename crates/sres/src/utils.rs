//! Small shared helpers

use std::{error::Error, fmt::Display};

pub type AnyResult<T = (), E = anyhow::Error> = anyhow::Result<T, E>;

/// Shorthand for `Ok(())`, cause it looks ugly
pub const fn ok<E>() -> Result<(), E> {
    Ok(())
}

/// Attaches a human readable message to a failed [`Result`].
pub trait OtherwiseExt<T> {
    fn otherwise(self, s: impl Display) -> AnyResult<T>;
}

impl<T, E: Error + Send + Sync + 'static> OtherwiseExt<T> for Result<T, E> {
    fn otherwise(self, s: impl Display) -> AnyResult<T> {
        self.map_err(|e| anyhow::Error::from(e).context(s.to_string()))
    }
}
