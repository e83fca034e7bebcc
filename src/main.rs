//! Interactive demo shell for the commandant pipeline.
//!
//! Wires two environments onto an engine and drives it from stdin, either
//! synchronously or through a worker pool. Every pipeline error is printed
//! and the loop continues; the process only exits on end of input.

use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use parking_lot::Mutex;

use commandant::config::Config;
use commandant::{
    ArgSpec, AsyncExecutor, CommandRegistry, CommandSpec, ConverterRegistry, Engine, Environment,
    Error, Executor, FlagSpec, OptionSpec, Shell,
};

#[derive(Parser)]
#[command(name = "commandant", about = "Interactive typed-command shell demo")]
struct Cli {
    /// Path to a config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run invocations synchronously instead of on the worker pool.
    #[arg(long)]
    sync: bool,

    /// Worker threads for asynchronous execution (overrides config).
    #[arg(long)]
    workers: Option<NonZeroUsize>,

    /// Tracing filter, e.g. "debug" or "commandant=trace" (overrides config).
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let filter = cli
        .log_filter
        .clone()
        .unwrap_or_else(|| config.shell.log_filter.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let engine = Engine::new();
    engine
        .register(ops_environment()?)
        .context("registering ops environment")?;
    engine
        .register(math_environment()?)
        .context("registering math environment")?;

    let prompt = config.shell.prompt.clone();
    let workers = cli
        .workers
        .or_else(|| NonZeroUsize::new(config.engine.workers))
        .unwrap_or(NonZeroUsize::MIN);

    if cli.sync {
        Shell::new(engine, report).with_prompt(prompt).run(io::stdin().lock());
    } else {
        let pool = AsyncExecutor::new(
            Arc::new(engine) as Arc<dyn Executor + Send + Sync>,
            workers,
            report,
        );
        Shell::new(pool, report).with_prompt(prompt).run(io::stdin().lock());
    }

    Ok(())
}

/// Prints a pipeline error with its source chain.
fn report(error: Error) {
    eprintln!("error: {error}");
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

type Remotes = Arc<Mutex<Vec<(String, String)>>>;

/// The `ops` environment: nested subcommands and shared mutable state.
fn ops_environment() -> anyhow::Result<Environment<Remotes>> {
    let remotes: Remotes = Arc::new(Mutex::new(Vec::new()));

    let remote = CommandSpec::new("remote", "Manage named remotes")
        .subcommand(
            CommandSpec::new("add", "Register a remote")
                .arg(ArgSpec::of::<String>("name", "Remote name"))
                .arg(ArgSpec::of::<String>("url", "Remote URL"))
                .handler(|ctx: &mut commandant::Context<Remotes>| {
                    let name: &String = ctx.arg("name").ok_or("missing name")?;
                    let url: &String = ctx.arg("url").ok_or("missing url")?;
                    ctx.state().lock().push((name.clone(), url.clone()));
                    println!("added remote {name} -> {url}");
                    Ok(())
                }),
        )
        .subcommand(
            CommandSpec::new("remove", "Forget a remote")
                .arg(ArgSpec::of::<String>("name", "Remote name"))
                .handler(|ctx: &mut commandant::Context<Remotes>| {
                    let name: &String = ctx.arg("name").ok_or("missing name")?;
                    let mut remotes = ctx.state().lock();
                    let before = remotes.len();
                    remotes.retain(|(n, _)| n != name);
                    if remotes.len() == before {
                        return Err(format!("no such remote: {name}").into());
                    }
                    println!("removed remote {name}");
                    Ok(())
                }),
        )
        .subcommand(
            CommandSpec::new("list", "List known remotes").handler(|ctx: &mut commandant::Context<Remotes>| {
                for (name, url) in ctx.state().lock().iter() {
                    println!("{name}\t{url}");
                }
                Ok(())
            }),
        );

    let repeat = CommandSpec::new("repeat", "Print a message one or more times")
        .arg(ArgSpec::of::<String>("message", "Text to print"))
        .option(
            OptionSpec::of::<i32>("times", "How often to print")
                .default_value(1i32)
                .validate(|n: &i32| *n > 0),
        )
        .flag(FlagSpec::new("upper", "Uppercase the message"))
        .handler(|ctx| {
            let message: &String = ctx.arg("message").ok_or("missing message")?;
            let times: i32 = ctx.option::<i32>("times").copied().unwrap_or(1);
            let message = if ctx.flag("upper") {
                message.to_uppercase()
            } else {
                message.clone()
            };
            for _ in 0..times {
                println!("{message}");
            }
            Ok(())
        });

    let help = CommandSpec::new("help", "List available commands").handler(|ctx| {
        for def in ctx.registry().iter() {
            println!("{:<12} {}", def.name(), def.description());
            for sub in def.subcommands().iter() {
                println!("  {:<14} {}", format!("{} {}", def.name(), sub.name()), sub.description());
            }
        }
        Ok(())
    });

    let commands = CommandRegistry::new(vec![remote, repeat, help])?;

    Ok(Environment::new(
        "ops",
        commands,
        ConverterRegistry::standard(),
        move || Arc::clone(&remotes),
    ))
}

/// The `math` environment: typed positionals and validators, no state.
fn math_environment() -> anyhow::Result<Environment<()>> {
    let add = CommandSpec::new("add", "Add two numbers")
        .arg(ArgSpec::of::<f64>("a", "First addend"))
        .arg(ArgSpec::of::<f64>("b", "Second addend"))
        .handler(|ctx| {
            let a: f64 = ctx.arg::<f64>("a").copied().ok_or("missing a")?;
            let b: f64 = ctx.arg::<f64>("b").copied().ok_or("missing b")?;
            println!("{}", a + b);
            Ok(())
        });

    let div = CommandSpec::new("div", "Divide two numbers")
        .arg(ArgSpec::of::<f64>("dividend", "Number to divide"))
        .arg(ArgSpec::of::<f64>("divisor", "Number to divide by").validate(|d: &f64| *d != 0.0))
        .handler(|ctx| {
            let dividend: f64 = ctx.arg::<f64>("dividend").copied().ok_or("missing dividend")?;
            let divisor: f64 = ctx.arg::<f64>("divisor").copied().ok_or("missing divisor")?;
            println!("{}", dividend / divisor);
            Ok(())
        });

    let commands = CommandRegistry::new(vec![add, div])?;

    Ok(Environment::new(
        "math",
        commands,
        ConverterRegistry::standard(),
        || (),
    ))
}
