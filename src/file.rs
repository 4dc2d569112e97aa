//! Dependencies backed by files on disk, aged by their modification time.

use crate::age::Age;
use crate::dependency::{Dependency, Freshness};
use crate::error::{Error, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::trace;
use std::path::{Path, PathBuf};

pub struct FileDependency<F: FileSystem = RealFileSystem> {
    fs: F,
    path: PathBuf,
    freshness: Freshness,
}

impl FileDependency {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_fs(RealFileSystem::new(), path)
    }
}

impl<F: FileSystem> FileDependency<F> {
    pub fn with_fs(fs: F, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let age = stat(&fs, &path)?;
        Ok(FileDependency {
            fs,
            path,
            freshness: Freshness::new(age),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn stat<F: FileSystem>(fs: &F, path: &Path) -> Result<Age> {
    fs.stat(path).map_err(|source| Error::Io {
        op: "stat",
        path: path.to_owned(),
        source,
    })
}

impl<F: FileSystem> Dependency for FileDependency<F> {
    fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    fn freshness_mut(&mut self) -> &mut Freshness {
        &mut self.freshness
    }

    fn build<A>(mut self, action: A) -> Result<Self>
    where
        A: FnOnce() -> anyhow::Result<()>,
    {
        if !self.violated() {
            return Ok(self);
        }

        let newest_dependency = self.freshness.newest_dependency();
        let started_at = self.fs.now();

        let name = self.path.display().to_string();
        trace::scope(&name, action).map_err(|source| Error::Action {
            path: self.path.clone(),
            source,
        })?;

        let produced_at = match stat(&self.fs, &self.path)? {
            Age::Unknown => {
                return Err(Error::Missing {
                    path: self.path.clone(),
                })
            }
            age => age,
        };

        let age = if newest_dependency.is_unknown() {
            produced_at
        } else {
            // Backdate the file to when the build started, so that a
            // dependency modified while the action ran still looks newer
            // on the next run.
            self.fs
                .set_mtime(&self.path, started_at)
                .map_err(|source| Error::Io {
                    op: "set mtime",
                    path: self.path.clone(),
                    source,
                })?;
            Age::Stamp(started_at)
        };
        self.freshness.finish(age);

        if self.violated() {
            return Err(Error::StillViolated {
                dependency: self.to_string(),
            });
        }
        Ok(self)
    }
}

impl<F: FileSystem> std::fmt::Display for FileDependency<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FileDependency<{}, {}", self.path.display(), self.age())?;
        if self.violated() {
            write!(f, ", violated due to {}", self.newest_dependency())?;
        }
        write!(f, ">")
    }
}

impl<F: FileSystem> std::fmt::Debug for FileDependency<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDependency")
            .field("path", &self.path)
            .field("freshness", &self.freshness)
            .finish()
    }
}

/// Shorthand for `FileDependency::new`.
pub fn file(path: impl Into<PathBuf>) -> Result<FileDependency> {
    FileDependency::new(path)
}
