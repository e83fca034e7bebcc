//! Shared test utilities: a recording environment and small helpers.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use commandant::{
    ArgSpec, CommandRegistry, CommandSpec, ConverterRegistry, Environment, FlagSpec, OptionSpec,
};

/// Handler observations, shared between the test and the environment.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn raw(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Builds a `git`-shaped environment that records every handler run:
///
/// - `remote` (group only) with subcommand `add <name> <url> [--tags]`
/// - `echo <message>`
/// - `sum <a> <b> [--scale=N]` (scale defaults to 1, must be positive)
/// - `fail` (handler always errors)
pub fn git_environment(name: &str, log: &Log) -> Environment<Log> {
    let remote = CommandSpec::new("remote", "Manage remotes").subcommand(
        CommandSpec::new("add", "Register a remote")
            .arg(ArgSpec::of::<String>("name", "Remote name"))
            .arg(ArgSpec::of::<String>("url", "Remote URL"))
            .flag(FlagSpec::new("tags", "Also fetch tags"))
            .handler(|ctx: &mut commandant::Context<Log>| {
                let name: &String = ctx.arg("name").ok_or("missing name")?;
                let url: &String = ctx.arg("url").ok_or("missing url")?;
                ctx.state()
                    .lock()
                    .push(format!("add {name} {url} tags={}", ctx.flag("tags")));
                Ok(())
            }),
    );

    let echo = CommandSpec::new("echo", "Record a message")
        .arg(ArgSpec::of::<String>("message", "Text to record"))
        .handler(|ctx: &mut commandant::Context<Log>| {
            let message: &String = ctx.arg("message").ok_or("missing message")?;
            ctx.state().lock().push(message.clone());
            Ok(())
        });

    let sum = CommandSpec::new("sum", "Record a scaled sum")
        .arg(ArgSpec::of::<i32>("a", "First addend"))
        .arg(ArgSpec::of::<i32>("b", "Second addend"))
        .option(
            OptionSpec::of::<i32>("scale", "Multiplier for the sum")
                .default_value(1i32)
                .validate(|n: &i32| *n > 0),
        )
        .handler(|ctx: &mut commandant::Context<Log>| {
            let a: i32 = ctx.arg::<i32>("a").copied().ok_or("missing a")?;
            let b: i32 = ctx.arg::<i32>("b").copied().ok_or("missing b")?;
            let scale: i32 = ctx.option::<i32>("scale").copied().unwrap_or(1);
            ctx.state().lock().push(((a + b) * scale).to_string());
            Ok(())
        });

    let fail = CommandSpec::new("fail", "Always fails in the handler")
        .handler(|_ctx| Err("handler exploded".into()));

    let whereami = CommandSpec::new("whereami", "Record the invocation route").handler(|ctx: &mut commandant::Context<Log>| {
        let invocation = ctx.invocation();
        ctx.state().lock().push(format!(
            "{}:{}",
            invocation.environment,
            invocation.command_path.join("/")
        ));
        Ok(())
    });

    let commands = CommandRegistry::new(vec![remote, echo, sum, fail, whereami])
        .expect("test command set has unique names");

    let log = Arc::clone(log);
    Environment::new(name, commands, ConverterRegistry::standard(), move || {
        Arc::clone(&log)
    })
}
