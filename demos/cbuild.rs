//! A build program for a small C project: two objects linked into `test`.
//!
//!   cargo run --example cbuild -- -C path/to/project -v

use fmake::{file, Context, Dependency, FileDependency, Tasks};

fn object(
    ctx: &Context,
    object_file: &str,
    source_file: &str,
    headers: &[FileDependency],
) -> anyhow::Result<FileDependency> {
    Ok(file(object_file)?
        .depend_on(&file(source_file)?)?
        .depend_on_all(headers)?
        .build(|| ctx.sh(&format!("gcc -c -o {} {}", object_file, source_file)))?)
}

/// The C source an object is compiled from: `foo.o` comes from `foo.c`.
fn source_for(object_file: &str) -> String {
    let stem = object_file.strip_suffix(".o").unwrap_or(object_file);
    format!("{}.c", stem)
}

fn link(
    ctx: &Context,
    binary_file: &str,
    object_files: &[&str],
    header_files: &[&str],
) -> anyhow::Result<FileDependency> {
    let headers = header_files
        .iter()
        .map(|&h| file(h))
        .collect::<fmake::Result<Vec<_>>>()?;
    let objects = object_files
        .iter()
        .map(|&o| object(ctx, o, &source_for(o), &headers))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(file(binary_file)?
        .depend_on_all(&objects)?
        .build(|| ctx.sh(&format!("gcc -o {} {}", binary_file, object_files.join(" "))))?)
}

fn main() -> anyhow::Result<()> {
    let mut tasks = Tasks::new();
    tasks.define("build", Some("Build the main binary."), |ctx| {
        ctx.console().green("Build 'test'");
        let binary = link(ctx, "test", &["test.o", "test2.o"], &["test2.h"])?;
        if ctx.shell().verbose() {
            ctx.console().print(&binary.to_string());
        }
        Ok(())
    })?;
    tasks.define("clean", None, |ctx| {
        ctx.shell().run("rm", &["-f", "test", "test.o", "test2.o"])
    })?;
    fmake::run::main(&tasks, Some("build"))
}
