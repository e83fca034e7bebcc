//! Line-oriented interactive reader driving an executor.

use std::io::{self, BufRead, Write};
use std::thread::JoinHandle;

use super::Executor;
use crate::error::Error;

/// Reads input lines and executes each through the configured executor.
///
/// Empty lines are skipped; execution errors go to the error handler and
/// the loop continues; end of input ends the loop. [`run`] consumes the
/// shell, so a shell can only ever drive one reader from one thread.
///
/// [`run`]: Shell::run
pub struct Shell<E> {
    executor: E,
    on_error: Box<dyn Fn(Error) + Send>,
    prompt: Option<String>,
}

impl<E: Executor> Shell<E> {
    pub fn new(executor: E, on_error: impl Fn(Error) + Send + 'static) -> Self {
        Self {
            executor,
            on_error: Box::new(on_error),
            prompt: None,
        }
    }

    /// Sets a prompt written to stdout before each read.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Runs the read loop on the calling thread until end of input.
    pub fn run(self, mut input: impl BufRead) {
        tracing::debug!("shell started");
        let mut line = String::new();

        loop {
            if let Some(prompt) = &self.prompt {
                let mut stdout = io::stdout();
                let _ = write!(stdout, "{prompt}");
                let _ = stdout.flush();
            }

            line.clear();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let trimmed = line.trim_end_matches(['\r', '\n']);
                    if trimmed.trim().is_empty() {
                        continue;
                    }
                    if let Err(error) = self.executor.execute(trimmed) {
                        (self.on_error)(error);
                    }
                }
            }
        }

        tracing::debug!("shell stopped");
    }

    /// Runs the read loop on a dedicated thread.
    pub fn spawn(self, input: impl BufRead + Send + 'static) -> JoinHandle<()>
    where
        E: Send + 'static,
    {
        std::thread::Builder::new()
            .name("commandant-shell".to_string())
            .spawn(move || self.run(input))
            .expect("failed to spawn shell thread")
    }
}
