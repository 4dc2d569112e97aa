//! The freshness model: things with an age that depend on other things with
//! ages, and which must be rebuilt when a dependency is newer.
//!
//! A graph of dependencies is resolved bottom-up by the caller: a dependency
//! may only be attached once it has itself been built (or found to be fresh),
//! so ages are never read from a node before it is final.

use crate::age::Age;
use crate::error::{Error, Result};

/// Freshness state shared by every kind of dependency.
#[derive(Clone, Debug)]
pub struct Freshness {
    age: Age,
    /// Newest age seen among attached dependencies; starts out as our own.
    newest_dependency: Age,
    /// Set once the age is final for this run.
    complete: bool,
}

impl Freshness {
    pub fn new(age: Age) -> Self {
        let mut freshness = Freshness {
            age,
            newest_dependency: age,
            complete: false,
        };
        freshness.complete = !freshness.violated();
        freshness
    }

    pub fn age(&self) -> Age {
        self.age
    }

    pub fn newest_dependency(&self) -> Age {
        self.newest_dependency
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether a rebuild is required.
    pub fn violated(&self) -> bool {
        match (self.age, self.newest_dependency) {
            (Age::Unknown, _) => true,
            (_, Age::Unknown) => false,
            (age, newest) => newest.is_newer_than(age),
        }
    }

    /// Take `other` into account as a dependency.
    pub fn depend_on<D: Dependency + ?Sized>(&mut self, other: &D) -> Result<()> {
        if !other.is_complete() {
            return Err(Error::Unbuilt {
                dependency: other.to_string(),
            });
        }
        self.newest_dependency = match self.newest_dependency {
            Age::Unknown => other.age(),
            newest => newest.newest(other.age()),
        };
        Ok(())
    }

    /// Record the age produced by a build.
    pub fn finish(&mut self, age: Age) {
        self.age = age;
        self.complete = true;
    }
}

/// Something with an age that can be rebuilt.
///
/// Implementors supply their `Freshness` and a `build`; everything else is
/// provided.  Calls chain by value:
///
/// ```no_run
/// use fmake::{file, Dependency};
/// # fn main() -> fmake::Result<()> {
/// let header = file("foo.h")?;
/// let object = file("foo.o")?
///     .depend_on(&file("foo.c")?)?
///     .depend_on(&header)?
///     .build(|| Ok(()))?;
/// assert!(!object.violated());
/// # Ok(())
/// # }
/// ```
pub trait Dependency: std::fmt::Display {
    fn freshness(&self) -> &Freshness;
    fn freshness_mut(&mut self) -> &mut Freshness;

    /// Run `action` if this is violated, then record the resulting age.
    /// After a successful build the dependency is complete and not violated.
    fn build<A>(self, action: A) -> Result<Self>
    where
        Self: Sized,
        A: FnOnce() -> anyhow::Result<()>;

    fn age(&self) -> Age {
        self.freshness().age()
    }

    fn newest_dependency(&self) -> Age {
        self.freshness().newest_dependency()
    }

    fn is_complete(&self) -> bool {
        self.freshness().is_complete()
    }

    fn violated(&self) -> bool {
        self.freshness().violated()
    }

    /// Declare `other` as a dependency.  Fails if `other` is not complete.
    fn depend_on<D>(mut self, other: &D) -> Result<Self>
    where
        Self: Sized,
        D: Dependency + ?Sized,
    {
        self.freshness_mut().depend_on(other)?;
        Ok(self)
    }

    /// Declare each of `others` as a dependency, stopping at the first
    /// failure.
    fn depend_on_all<'a, I, D>(mut self, others: I) -> Result<Self>
    where
        Self: Sized,
        I: IntoIterator<Item = &'a D>,
        D: Dependency + ?Sized + 'a,
    {
        for other in others {
            self.freshness_mut().depend_on(other)?;
        }
        Ok(self)
    }
}
