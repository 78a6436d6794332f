// fprobe/src/cli/mod.rs

pub mod array;
pub mod inspect;
pub mod offline;

pub use array::{print_arrays, print_flat_array};
pub use inspect::{print_location, print_types, run_transcript};
pub use offline::{decode_offline, parse_type_offline};

use crate::config::ProbeConfig;
use crate::session::Session;
use anyhow::Context;
use gdbmirs::GdbController;
use std::path::{Path, PathBuf};

/// Program to debug and where to stop it.
#[derive(Debug, Clone)]
pub struct Target {
    pub program: PathBuf,
    pub breakpoints: Vec<String>,
}

/// Spawn gdb, load the program, set breakpoints and run to the first stop.
pub fn start_session(config: &ProbeConfig, target: &Target) -> anyhow::Result<Session<GdbController>> {
    let controller = GdbController::spawn(&config.controller_options()).context(format!(
        "Failed to start {}",
        config.gdb_path.display()
    ))?;
    let mut session = Session::new(controller).with_temp_var_name(config.temp_var_name.clone());

    session
        .configure(&config.settings)
        .context("Failed to apply gdb settings")?;
    session
        .load_program(&target.program)
        .context(format!("Failed to load {}", target.program.display()))?;
    for location in &target.breakpoints {
        session
            .break_insert(location)
            .context(format!("Failed to set breakpoint at {}", location))?;
    }

    if target.breakpoints.is_empty() {
        log::warn!("no breakpoints set; the program may run to completion");
    }
    let stopped = session.run().context(format!(
        "Failed to run {} to a breakpoint",
        target.program.display()
    ))?;
    log::info!(
        "stopped: {}",
        stopped.payload_str("reason").unwrap_or("unknown reason")
    );

    Ok(session)
}

/// Write `html` to `path`, or to stdout when no path is given.
pub fn emit_html(html: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs_err::write(path, html).context(format!("Error writing {}", path.display()))?;
            println!("  ✓ Wrote {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}
