// fprobe/build.rs
use std::process::Command;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let crate_env_name = "FPROBE_CLI_VERSION";
    let version = std::env::var("CARGO_PKG_VERSION")?;
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    let hash = get_git_hash(".").unwrap_or_else(|| "unknown".to_string());
    let dirty = check_git_dirty().unwrap_or("");

    println!(
        "cargo:rustc-env={}={} {}{}-{}",
        crate_env_name, version, hash, dirty, profile
    );

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    Ok(())
}

fn get_git_hash(git_dir: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["-C", git_dir, "rev-parse", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("bad revision 'HEAD'") || stderr.contains("ambiguous argument 'HEAD'") {
            return Some("no-commits".to_string());
        }
        return None;
    }

    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if hash.len() < 8 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some("no-commits".to_string());
    }
    Some(hash[..8].to_string())
}

fn check_git_dirty() -> Option<&'static str> {
    let status = Command::new("git")
        .args(["diff", "--quiet", "."])
        .status()
        .ok()?;

    Some(if status.success() { "" } else { "-dirty" })
}
