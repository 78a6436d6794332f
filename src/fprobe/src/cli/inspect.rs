// fprobe/src/cli/inspect.rs

use super::{emit_html, start_session, Target};
use crate::config::ProbeConfig;
use crate::render::{html_page, render_transcript};
use anyhow::Context;
use std::path::Path;

/// Print the parsed type descriptor of each variable as JSON.
pub fn print_types(config: &ProbeConfig, target: &Target, names: &[String]) -> anyhow::Result<()> {
    let mut session = start_session(config, target)?;
    for name in names {
        let raw = session
            .query_type(name)
            .context(format!("Failed to query type of '{}'", name))?;
        let descriptor = raw.as_deref().and_then(crate::types::parse_type);
        let elements = descriptor.as_ref().and_then(|d| d.element_count());
        let report = serde_json::json!({
            "name": name,
            "raw": raw,
            "descriptor": descriptor,
            "elements": elements,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Show the source around the line the program stopped at.
pub fn print_location(config: &ProbeConfig, target: &Target, html: Option<&Path>) -> anyhow::Result<()> {
    let mut session = start_session(config, target)?;
    let frame = session.current_frame()?;
    println!("{} in {} at line {}", frame.file, frame.func, frame.line);

    let fragment = session
        .current_location_html(None, config.source_pad)
        .context(format!("Failed to read {}", frame.fullname.display()))?;
    emit_html(&html_page(&frame.file, &[fragment]), html)
}

/// Run MI commands at the stop and render every exchange.
pub fn run_transcript(
    config: &ProbeConfig,
    target: &Target,
    commands: &[String],
    html: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = start_session(config, target)?;
    let mut fragments = Vec::with_capacity(commands.len());
    for command in commands {
        let responses = session
            .write(command)
            .context(format!("Failed to run '{}'", command))?;
        fragments.push(render_transcript(command, &responses));
    }
    emit_html(&html_page("gdb transcript", &fragments), html)
}
