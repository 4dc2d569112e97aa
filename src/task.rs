//! Named tasks, the units a user asks fmake to run.

use crate::process::Shell;
use crate::terminal::Console;
use crate::trace;
use std::collections::BTreeMap;

/// What a running task can reach: the shell and the console.
#[derive(Clone, Debug)]
pub struct Context {
    shell: Shell,
    console: Console,
}

impl Context {
    pub fn new(shell: Shell, console: Console) -> Self {
        Context { shell, console }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn sh(&self, cmdline: &str) -> anyhow::Result<()> {
        self.shell.sh(cmdline)
    }
}

pub type Action = Box<dyn Fn(&Context) -> anyhow::Result<()>>;

pub struct Task {
    pub name: String,
    /// Tasks without a description are only listed with --all.
    pub description: Option<String>,
    action: Action,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Tasks {
    tasks: BTreeMap<String, Task>,
}

impl Tasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define<F>(&mut self, name: &str, description: Option<&str>, action: F) -> anyhow::Result<()>
    where
        F: Fn(&Context) -> anyhow::Result<()> + 'static,
    {
        if self.tasks.contains_key(name) {
            anyhow::bail!("task '{}' is already defined", name);
        }
        self.tasks.insert(
            name.to_string(),
            Task {
                name: name.to_string(),
                description: description.map(|d| d.to_string()),
                action: Box::new(action),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// All tasks, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up every name, failing on the first unknown one.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> anyhow::Result<Vec<&Task>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .ok_or_else(|| anyhow::anyhow!("no such task: '{}'", name))
            })
            .collect()
    }

    /// The task listing printed for -T; with `all`, tasks lacking a
    /// description are included too.
    pub fn listing(&self, all: bool) -> String {
        let mut out = String::from("Tasks:\n\n");
        for task in self.iter() {
            match &task.description {
                Some(desc) => out.push_str(&format!("- {}\t: {}\n", task.name, desc)),
                None if all => out.push_str(&format!("- {}\n", task.name)),
                None => {}
            }
        }
        out.push('\n');
        out
    }
}

impl Task {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        trace::scope(&self.name, || (self.action)(ctx))
            .map_err(|err| err.context(format!("task '{}'", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ctx() -> Context {
        Context::new(Shell::new(false), Console::new(false))
    }

    #[test]
    fn define_twice() -> anyhow::Result<()> {
        let mut tasks = Tasks::new();
        tasks.define("build", None, |_| Ok(()))?;
        let err = tasks.define("build", Some("again"), |_| Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "task 'build' is already defined");
        assert_eq!(tasks.len(), 1);
        Ok(())
    }

    #[test]
    fn resolve_unknown() -> anyhow::Result<()> {
        let mut tasks = Tasks::new();
        tasks.define("a", None, |_| Ok(()))?;
        assert_eq!(tasks.resolve(&["a", "a"])?.len(), 2);
        let err = tasks.resolve(&["a", "b"]).unwrap_err();
        assert_eq!(err.to_string(), "no such task: 'b'");
        Ok(())
    }

    #[test]
    fn listing() -> anyhow::Result<()> {
        let mut tasks = Tasks::new();
        tasks.define("zeta", Some("last"), |_| Ok(()))?;
        tasks.define("hidden", None, |_| Ok(()))?;
        tasks.define("alpha", Some("first"), |_| Ok(()))?;
        assert_eq!(
            tasks.listing(false),
            "Tasks:\n\n- alpha\t: first\n- zeta\t: last\n\n"
        );
        assert_eq!(
            tasks.listing(true),
            "Tasks:\n\n- alpha\t: first\n- hidden\n- zeta\t: last\n\n"
        );
        Ok(())
    }

    #[test]
    fn run_and_fail() -> anyhow::Result<()> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tasks = Tasks::new();
        {
            let log = log.clone();
            tasks.define("ok", None, move |_| {
                log.borrow_mut().push("ok");
                Ok(())
            })?;
        }
        tasks.define("bad", None, |_| anyhow::bail!("nope"))?;

        let ctx = ctx();
        tasks.get("ok").unwrap().run(&ctx)?;
        assert_eq!(*log.borrow(), vec!["ok"]);

        let err = tasks.get("bad").unwrap().run(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "task 'bad'");
        assert_eq!(err.root_cause().to_string(), "nope");
        Ok(())
    }
}
