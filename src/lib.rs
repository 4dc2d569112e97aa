//! fmake: make-style builds written as Rust code.
//!
//! Targets are [`Dependency`] values wired bottom-up by the caller; a target
//! is rebuilt only when it is missing or one of its dependencies is newer.
//! Tasks group build code under names that can be picked from the command
//! line, see [`run::main`].

pub mod age;
pub mod dependency;
mod error;
pub mod file;
pub mod fs;
pub mod process;
pub mod run;
pub mod task;
pub mod terminal;
pub mod trace;

pub use age::Age;
pub use dependency::{Dependency, Freshness};
pub use error::{Error, Result};
pub use file::{file, FileDependency};
pub use process::Shell;
pub use task::{Context, Tasks};
pub use terminal::{Color, Console};
