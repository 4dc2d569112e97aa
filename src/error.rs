//! Errors from the freshness core.  Every one of these is fatal to a build.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A prerequisite was attached before it had been built.
    #[error("cannot depend on {dependency}: it has not been built")]
    Unbuilt { dependency: String },

    /// A build action returned without producing its file.
    #[error("{} did not exist after its build action", .path.display())]
    Missing { path: PathBuf },

    /// The rebuilt age still predates a prerequisite.
    #[error("{dependency}: dependency still violated after build")]
    StillViolated { dependency: String },

    #[error("building {}", .path.display())]
    Action {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("{op} {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
