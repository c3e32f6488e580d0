//! Session lifecycle commands for trellis.
//!
//! - Starting a session from its stored config (or attaching if it runs)
//! - Printing the compiled tmux commands
//! - Killing a session

use anyhow::{Context, Result};
use colored::Colorize;
use trellis_core::{
    CommandChain, Compiler, ConfigStore, ExecuteOptions,
    tmux::{attach_session, current_session, has_session, kill_session},
};

/// Options for `trellis start`
#[derive(Debug, Clone, Copy, Default)]
pub struct StartOptions {
    pub debug: bool,
    pub dry_run: bool,
    pub teardown_on_failure: bool,
}

fn compile(store: &ConfigStore, name: &str) -> Result<CommandChain> {
    let config = store.load(name)?;
    let compiler = Compiler::from_env()?;
    compiler
        .compile(&config)
        .with_context(|| format!("Could not compile session {}", name))
}

// =============================================================================
// Session Start
// =============================================================================

/// Start a session and hand the terminal over to it.
///
/// If a tmux session with the config's session name is already running,
/// trellis attaches (or switches) to it instead of building it again. Only
/// returns on failure.
pub fn do_start(store: &ConfigStore, name: &str, options: StartOptions) -> Result<()> {
    if options.dry_run {
        return do_show(store, name);
    }

    let config = store.load(name)?;
    let session = config.name.as_str();

    if has_session(session) {
        tracing::debug!(session, "session already running");
        eprintln!("{} {} {}", "→".blue(), "Attaching to".dimmed(), session);
        let err = attach_session(session);
        return Err(err).with_context(|| format!("Could not attach to session {:?}", session));
    }

    let compiler = Compiler::from_env()?;
    let execute = ExecuteOptions {
        debug: options.debug,
        teardown_on_failure: options.teardown_on_failure,
    };
    tracing::debug!(session, config = name, "building session");

    match compiler.execute(&config, execute) {
        Ok(never) => match never {},
        Err(err) => Err(err).with_context(|| format!("Could not start session {}", session)),
    }
}

/// Print the tmux commands a config compiles to, one per line
pub fn do_show(store: &ConfigStore, name: &str) -> Result<()> {
    let chain = compile(store, name)?;
    for invocation in chain.entries() {
        println!("{}", invocation);
    }
    Ok(())
}

// =============================================================================
// Session Stop
// =============================================================================

/// Kill a session, defaulting to the one this terminal is attached to
pub fn do_stop(name: Option<&str>) -> Result<()> {
    let session_name = match name {
        Some(name) => name.to_string(),
        None => current_session().context(
            "Could not determine current tmux session. Specify a session name: trellis stop <name>",
        )?,
    };

    if !has_session(&session_name) {
        eprintln!("{}", format!("No running session: {}", session_name).red());
        return Ok(());
    }

    kill_session(&session_name)?;
    println!("{} {} {}", "✔".green(), "Killed session".dimmed(), session_name);
    Ok(())
}
