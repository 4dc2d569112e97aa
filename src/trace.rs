//! Chrome trace output.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

thread_local! {
    static TRACE: RefCell<Option<Trace>> = RefCell::new(None);
}

struct Trace {
    start: Instant,
    w: BufWriter<File>,
}

impl Trace {
    fn new(path: &str) -> std::io::Result<Self> {
        let mut w = BufWriter::new(File::create(path)?);
        writeln!(w, "[")?;
        Ok(Trace {
            start: Instant::now(),
            w,
        })
    }

    fn write_complete(&mut self, name: &str, start: Instant, end: Instant) -> std::io::Result<()> {
        write!(
            self.w,
            "{{ \"pid\": 0, \"name\": {:?}, \"ts\": {}, \"ph\": \"X\", \"dur\": {} }}",
            name,
            start.duration_since(self.start).as_micros(),
            end.duration_since(start).as_micros(),
        )
    }

    fn close(&mut self) -> std::io::Result<()> {
        let start = self.start;
        self.write_complete("main", start, Instant::now())?;
        writeln!(self.w, "\n]")?;
        self.w.flush()
    }
}

pub fn open(path: &str) -> std::io::Result<()> {
    let trace = Trace::new(path)?;
    TRACE.with(|t| *t.borrow_mut() = Some(trace));
    Ok(())
}

pub fn enabled() -> bool {
    TRACE.with(|t| t.borrow().is_some())
}

/// Run `f`, recording it as an event named `name` if tracing is on.
/// `f` may itself open nested scopes.
#[inline]
pub fn scope<T>(name: &str, f: impl FnOnce() -> T) -> T {
    if !enabled() {
        return f();
    }
    let start = Instant::now();
    let result = f();
    let end = Instant::now();
    TRACE.with(|t| {
        if let Some(trace) = t.borrow_mut().as_mut() {
            // A lost trace event isn't worth failing the build over.
            let _ = trace
                .write_complete(name, start, end)
                .and_then(|_| writeln!(trace.w, ","));
        }
    });
    result
}

pub fn close() -> std::io::Result<()> {
    TRACE.with(|t| match t.borrow_mut().take() {
        Some(mut trace) => trace.close(),
        None => Ok(()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_scope_runs() {
        assert_eq!(scope("x", || 3), 3);
    }

    #[test]
    fn writes_events() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("trace.json");
        open(path.to_str().unwrap())?;
        let n = scope("outer", || scope("inner", || 1) + 1);
        assert_eq!(n, 2);
        close()?;

        let text = std::fs::read_to_string(&path)?;
        assert!(text.starts_with("[\n"));
        assert!(text.trim_end().ends_with("]"));
        assert!(text.contains("\"name\": \"inner\""));
        assert!(text.contains("\"name\": \"outer\""));
        assert!(text.contains("\"name\": \"main\""));
        assert!(!enabled());
        Ok(())
    }
}
