use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use bel::config::{Config, DEFAULT_HEAP_CAPACITY};
use bel::eval::Machine;
use bel::lexer::paren_depth;
use bel::value::FrameId;

/// A small Bel-flavoured Lisp.
///
/// Reads a program from stdin when piped, otherwise starts a REPL.
#[derive(Parser, Debug)]
#[command(name = "tinybel", version)]
struct Args {
    /// Load a source file before reading stdin (repeatable)
    #[arg(long = "load", value_name = "FILE")]
    load: Vec<PathBuf>,

    /// Maximum number of cons cells
    #[arg(long, value_name = "CELLS", default_value_t = DEFAULT_HEAP_CAPACITY)]
    heap: usize,

    /// Evaluation step limit per top-level input
    #[arg(long, value_name = "STEPS")]
    fuel: Option<u64>,

    /// Print character lists as lists instead of strings
    #[arg(long)]
    no_strings: bool,

    /// Run the REPL even when stdin is not a terminal
    #[arg(short, long)]
    interactive: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Trace every evaluation step (also BEL_TRACE=1)
    #[arg(long)]
    trace: bool,
}

impl Args {
    fn config(&self) -> Config {
        let config = Config::default()
            .with_heap_capacity(self.heap)
            .with_print_strings(!self.no_strings);
        match self.fuel {
            Some(steps) => config.with_max_fuel(steps),
            None => config,
        }
    }

    fn log_level(&self) -> Level {
        let env_trace = std::env::var("BEL_TRACE").map(|v| v == "1").unwrap_or(false);
        if self.trace || env_trace {
            Level::TRACE
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set up logging")?;

    let config = args.config();
    debug!(?config, "starting");

    let mut machine = Machine::new(&config);
    let env = machine.global_env()?;

    for path in &args.load {
        load_file(&mut machine, env, path)?;
    }

    if args.interactive || io::stdin().is_terminal() {
        run_interactive(&mut machine, env)
    } else {
        run_piped(&mut machine, env)
    }
}

/// Evaluate a whole file into `env`. The first error stops the load.
fn load_file(machine: &mut Machine, env: FrameId, path: &Path) -> Result<()> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Error loading {}", path.display()))?;

    let start = Instant::now();
    let exprs = machine
        .read(&input)
        .with_context(|| format!("Error reading {}", path.display()))?;
    machine
        .eval_all(&exprs, env)
        .with_context(|| format!("Error evaluating {}", path.display()))?;

    info!(
        "Loaded {} ({} expressions in {:.2}s, {} cells)",
        path.display(),
        exprs.len(),
        start.elapsed().as_secs_f64(),
        machine.heap.total_cells()
    );
    Ok(())
}

/// Interactive REPL: accumulate lines until parens are balanced.
fn run_interactive(machine: &mut Machine, env: FrameId) -> Result<()> {
    let stdin = io::stdin();
    let mut buf = String::new();

    loop {
        print!("{}", if buf.is_empty() { "> " } else { "  " });
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Read error")? == 0 {
            break;
        }
        buf.push_str(&line);

        match paren_depth(&buf) {
            Ok(depth) if depth > 0 => continue,
            // Open string literal: keep reading.
            Err(_) => continue,
            Ok(_) => {}
        }

        let input = buf.trim().to_string();
        buf.clear();
        if !input.is_empty() {
            eval_and_print(&input, machine, env)?;
        }
    }

    println!("\nHave a nice day!");
    Ok(())
}

/// Evaluate one REPL input and print its value. Ordinary errors are
/// reported and the session continues; fatal ones end it.
fn eval_and_print(input: &str, machine: &mut Machine, env: FrameId) -> Result<()> {
    match machine.run(input, env) {
        Ok(val) => println!("{}", machine.print(val)),
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => eprintln!("{}", e),
    }
    Ok(())
}

/// Piped mode: the whole of stdin is one program; print its last value.
fn run_piped(machine: &mut Machine, env: FrameId) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read input")?;

    if input.trim().is_empty() {
        return Ok(());
    }

    let val = machine.run(&input, env)?;
    println!("{}", machine.print(val));
    Ok(())
}
