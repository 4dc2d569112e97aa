//! Running external commands from build actions.

use anyhow::bail;
use std::ffi::OsStr;
use std::io::Write;
use std::process::{Command, ExitStatus, Output};

#[derive(Debug, PartialEq)]
pub enum Termination {
    Success,
    Interrupted,
    Failure,
}

fn termination(status: ExitStatus) -> (Termination, String) {
    if status.success() {
        return (Termination::Success, String::new());
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return match sig {
                libc::SIGINT => (Termination::Interrupted, "interrupted".to_string()),
                _ => (Termination::Failure, format!("signal {}", sig)),
            };
        }
    }
    (Termination::Failure, status.to_string())
}

/// Runs commands, echoing them first when verbose.
#[derive(Clone, Debug, Default)]
pub struct Shell {
    verbose: bool,
}

impl Shell {
    pub fn new(verbose: bool) -> Self {
        Shell { verbose }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Run `program` directly with `args`.
    pub fn run<S: AsRef<OsStr>>(&self, program: &str, args: &[S]) -> anyhow::Result<()> {
        let mut display = program.to_string();
        for arg in args {
            display.push(' ');
            display.push_str(&arg.as_ref().to_string_lossy());
        }
        let mut cmd = Command::new(program);
        cmd.args(args);
        self.exec(&display, &mut cmd)
    }

    /// Run `cmdline` through the system shell.
    pub fn sh(&self, cmdline: &str) -> anyhow::Result<()> {
        #[cfg(unix)]
        let mut cmd = {
            let mut cmd = Command::new("/bin/sh");
            cmd.arg("-c").arg(cmdline);
            cmd
        };
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/c").arg(cmdline);
            cmd
        };
        self.exec(cmdline, &mut cmd)
    }

    fn exec(&self, display: &str, cmd: &mut Command) -> anyhow::Result<()> {
        self.exec_to(
            display,
            cmd,
            &mut std::io::stdout().lock(),
            &mut std::io::stderr().lock(),
        )
    }

    /// Like exec, but a successful command's output goes to the given
    /// writers rather than the process's own stdout/stderr.
    fn exec_to(
        &self,
        display: &str,
        cmd: &mut Command,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> anyhow::Result<()> {
        if self.verbose {
            writeln!(stdout, "> {}", display)?;
        }
        let out = match cmd.output() {
            Ok(out) => out,
            Err(err) => bail!("{}: {}", display, err),
        };
        check(display, out, stdout, stderr)
    }
}

fn check(
    display: &str,
    out: Output,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> anyhow::Result<()> {
    let (term, reason) = termination(out.status);
    if term == Termination::Success {
        // Warnings and the like from a passing command still reach the user.
        stdout.write_all(&out.stdout)?;
        stderr.write_all(&out.stderr)?;
        stdout.flush()?;
        stderr.flush()?;
        return Ok(());
    }
    let mut output = out.stdout;
    output.extend_from_slice(&out.stderr);
    let output = String::from_utf8_lossy(&output);
    let output = output.trim_end();
    if output.is_empty() {
        bail!("command failed ({}): {}", reason, display);
    }
    bail!("command failed ({}): {}\n{}", reason, display, output);
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn sh_success() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out");
        Shell::new(false).sh(&format!("echo hi > '{}'", path.display()))?;
        assert_eq!(std::fs::read_to_string(&path)?, "hi\n");
        Ok(())
    }

    #[test]
    fn sh_success_forwards_output() -> anyhow::Result<()> {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg("echo warning: unused >&2; echo built");
        Shell::new(true).exec_to("compile", &mut cmd, &mut stdout, &mut stderr)?;
        assert_eq!(String::from_utf8(stdout)?, "> compile\nbuilt\n");
        assert_eq!(String::from_utf8(stderr)?, "warning: unused\n");
        Ok(())
    }

    #[test]
    fn sh_quiet_success_prints_nothing() -> anyhow::Result<()> {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg("true");
        Shell::new(false).exec_to("true", &mut cmd, &mut stdout, &mut stderr)?;
        assert!(stdout.is_empty());
        assert!(stderr.is_empty());
        Ok(())
    }

    #[test]
    fn sh_failure_reports_output() {
        let err = Shell::new(false)
            .sh("echo oops >&2; exit 3")
            .unwrap_err()
            .to_string();
        assert!(err.contains("exit status: 3"), "{}", err);
        assert!(err.contains("echo oops >&2; exit 3"), "{}", err);
        assert!(err.ends_with("\noops"), "{}", err);
    }

    #[test]
    fn run_direct() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("made");
        Shell::new(false).run("touch", &[&path])?;
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn run_missing_program() {
        let err = Shell::new(false)
            .run::<&str>("/nonexistent/fmake-program", &[])
            .unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/fmake-program: "));
    }

    #[test]
    fn signal() {
        let err = Shell::new(false).sh("kill -TERM $$").unwrap_err();
        assert!(err.to_string().contains("signal 15"), "{}", err);
    }
}
