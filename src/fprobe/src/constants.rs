// fprobe/src/constants.rs

pub const DEFAULT_CONFIG_NAME: &str = "fprobe.toml";
pub const ENV_PREFIX: &str = "FPROBE_";

/// Name of the transient variable object created to query a type.
pub const DEFAULT_TEMP_VAR_NAME: &str = "temp__";

/// Kind assumed for a `real` that reports none.
pub const DEFAULT_REAL_KIND: i64 = 4;

/// Lines shown on each side of the current line in a source window.
pub const DEFAULT_SOURCE_PAD: usize = 5;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings applied before probing so gdb prints arrays in full.
pub const DEFAULT_GDB_SETTINGS: &[&str] = &[
    "max-value-size unlimited",
    "max-composite-size unlimited",
    "print repeats 0",
    "print elements 0",
];
