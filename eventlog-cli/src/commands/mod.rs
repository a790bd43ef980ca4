pub mod config;
pub mod edit;
pub mod new;
pub mod show;

use std::fmt::Display;
use std::sync::Arc;

use anyhow::Result;
use dialoguer::Input;
use eventlog_client::controller::SubmitOutcome;
use eventlog_client::notify::TracingNotifier;
use eventlog_client::{HttpBackend, Notifier, SessionToken};
use eventlog_core::config::ClientConfig;
use owo_colors::OwoColorize;

use crate::render::{Render, TerminalNotifier};

pub fn backend(config: &ClientConfig) -> Result<HttpBackend> {
    let session = SessionToken::new(config.id_token.clone());
    Ok(HttpBackend::from_config(config, Arc::new(session))?)
}

/// Terminal output, or the log only when `quiet`.
pub fn notifier(quiet: bool) -> Box<dyn Notifier> {
    if quiet {
        Box::new(TracingNotifier)
    } else {
        Box::new(TerminalNotifier)
    }
}

/// Turn a controller outcome into the command's result.
///
/// The controller has already shown the user-facing message; the error
/// returned here carries the detail.
pub fn finish<T, E: Display>(outcome: SubmitOutcome<T, E>) -> Result<T> {
    match outcome {
        SubmitOutcome::Saved(value) => Ok(value),
        SubmitOutcome::Rejected(violations) => {
            eprintln!("{}", violations.render());
            anyhow::bail!("{} field(s) need fixing", violations.len())
        }
        SubmitOutcome::Failed(e) => anyhow::bail!("{e}"),
        SubmitOutcome::Busy => anyhow::bail!("A save is already in progress"),
    }
}

/// Prompt the user with retry on parse errors.
pub fn prompt_with_retry<T, E, F>(prompt: &str, parse: F) -> Result<T>
where
    E: Display,
    F: Fn(&str) -> std::result::Result<T, E>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

/// Prompt for an optional value; an empty answer means "skip".
pub fn prompt_optional(prompt: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(String::new())
        .show_default(false)
        .interact_text()?;
    Ok(if input.is_empty() { None } else { Some(input) })
}
