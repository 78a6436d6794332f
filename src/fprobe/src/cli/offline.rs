// fprobe/src/cli/offline.rs

//! Subcommands that exercise the parser and decoder without a debugger.

use crate::decode::decode_array;
use crate::types::TypeDescriptor;
use anyhow::Context;

pub fn parse_type_offline(raw: &str) -> anyhow::Result<()> {
    let descriptor: TypeDescriptor = raw
        .parse()
        .context(format!("Could not parse type '{}'", raw))?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}

pub fn decode_offline(raw_type: &str, value: &str) -> anyhow::Result<()> {
    let descriptor: TypeDescriptor = raw_type
        .parse()
        .context(format!("Could not parse type '{}'", raw_type))?;
    let array = decode_array(value, &descriptor)?;
    println!("{} {:?}", array.element_type(), array.shape());
    println!("{}", array);
    Ok(())
}
