//! The command-line driver: pick tasks from argv and run them.

use crate::process::Shell;
use crate::task::{Context, Tasks};
use crate::terminal::Console;
use crate::trace;
use anyhow::anyhow;
use argh::FromArgs;
use std::path::Path;

#[derive(FromArgs, Debug, PartialEq)]
/// fmake, make-style build tasks
pub struct Options {
    /// list defined tasks with their description
    #[argh(switch, short = 'T')]
    pub tasks: bool,

    /// list all defined tasks, even without description
    #[argh(switch, short = 'A')]
    pub all: bool,

    /// verbosely log shell commands before they are executed
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// chdir before running
    #[argh(option, short = 'C')]
    pub chdir: Option<String>,

    /// debugging tools, "-d list" to list
    #[argh(option, short = 'd')]
    pub debug: Option<String>,

    /// tasks to run, in order
    #[argh(positional)]
    pub names: Vec<String>,
}

impl Options {
    /// Parse `args`, where args[0] is the program name.  On --help or a
    /// usage error, returns the exit code to use after printing.
    pub fn parse(args: &[String]) -> Result<Options, i32> {
        let cmd = args
            .first()
            .and_then(|a| Path::new(a).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "fmake".to_string());
        let rest: Vec<&str> = args.iter().skip(1).map(|a| a.as_str()).collect();
        Options::from_args(&[cmd.as_str()], &rest).map_err(|early| match early.status {
            Ok(()) => {
                println!("{}", early.output);
                0
            }
            Err(()) => {
                eprintln!("{}", early.output);
                1
            }
        })
    }
}

/// Run tasks according to `opts`, returning the process exit code.
pub fn run_with(tasks: &Tasks, default_task: Option<&str>, opts: &Options) -> anyhow::Result<i32> {
    if let Some(debug) = &opts.debug {
        match debug.as_str() {
            "list" => {
                println!("debug tools:");
                println!("  trace  generate json performance trace");
                return Ok(1);
            }
            "trace" => trace::open("trace.json")?,
            _ => anyhow::bail!("unknown -d {:?}, use -d list to list", debug),
        }
    }

    if let Some(dir) = &opts.chdir {
        let dir = Path::new(dir);
        std::env::set_current_dir(dir).map_err(|err| anyhow!("chdir {:?}: {}", dir, err))?;
    }

    let mut names: Vec<&str> = opts.names.iter().map(|n| n.as_str()).collect();
    if names.is_empty() {
        if let Some(default) = default_task {
            names.push(default);
        }
    }
    let selected = tasks.resolve(&names)?;

    let ctx = Context::new(Shell::new(opts.verbose), Console::detect());
    if opts.tasks {
        print!("{}", tasks.listing(opts.all));
    }

    for task in selected {
        task.run(&ctx)?;
    }
    Ok(0)
}

pub fn run(tasks: &Tasks, default_task: Option<&str>) -> anyhow::Result<i32> {
    let args: Vec<String> = std::env::args().collect();
    let opts = match Options::parse(&args) {
        Ok(opts) => opts,
        Err(code) => return Ok(code),
    };
    let res = run_with(tasks, default_task, &opts);
    trace::close()?;
    res
}

/// Entry point for a build program: run tasks from argv and exit.
pub fn main(tasks: &Tasks, default_task: Option<&str>) -> ! {
    let exit_code = match run(tasks, default_task) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("fmake: error: {:#}", err);
            1
        }
    };
    std::process::exit(exit_code)
}
