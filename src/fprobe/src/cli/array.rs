// fprobe/src/cli/array.rs

use super::{start_session, Target};
use crate::config::ProbeConfig;
use anyhow::Context;

/// Decode and print each variable with its type and shape.
pub fn print_arrays(config: &ProbeConfig, target: &Target, names: &[String]) -> anyhow::Result<()> {
    let mut session = start_session(config, target)?;
    for name in names {
        let array = session
            .load_array(name)
            .context(format!("Failed to load array '{}'", name))?;
        println!(
            "{}: {} {:?} ({} unconvertible)",
            name,
            array.element_type(),
            array.shape(),
            array.sentinel_count()
        );
        println!("{}", array);
    }
    Ok(())
}

/// Print a 1-D array read without type probing.
pub fn print_flat_array(config: &ProbeConfig, target: &Target, name: &str, head: Option<usize>) -> anyhow::Result<()> {
    let mut session = start_session(config, target)?;
    let array = session
        .read_array_variable::<f64>(name)
        .context(format!("Failed to read '{}'", name))?;
    let shown = head.unwrap_or(array.len()).min(array.len());
    println!("{}: {} elements", name, array.len());
    println!("{}", array.slice(ndarray::s![..shown]));
    Ok(())
}
