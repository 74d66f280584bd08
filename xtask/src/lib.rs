use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Environment variable with extra cargo features, space separated.
pub const FEATURES_ENV: &str = "SKIT_FEATURES";

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub rustflags: Option<String>,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }
}

/// Workspace root, one level above this crate.
pub fn workspace_root() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let arch = detect_arch();
    let cpu_flags = detect_cpu_flags();
    let extra = env::var(FEATURES_ENV).unwrap_or_default();
    compute_config(&arch, &cpu_flags, &extra)
}

fn detect_arch() -> String {
    if let Ok(arch) = env::var("ARCH") {
        if !arch.trim().is_empty() {
            return arch;
        }
    }
    Command::new("uname")
        .arg("-m")
        .output()
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default()
}

fn detect_cpu_flags() -> String {
    if let Ok(out) = Command::new("lscpu").output() {
        let s = String::from_utf8_lossy(&out.stdout);
        for line in s.lines() {
            if line.to_lowercase().contains("flags") {
                return line.to_string();
            }
        }
    }
    if let Ok(out) = Command::new("sysctl")
        .args(["-n", "machdep.cpu.features"])
        .output()
    {
        return String::from_utf8_lossy(&out.stdout).to_string();
    }
    String::new()
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
///
/// The library has no architecture-specific features; the CPU only decides
/// the `RUSTFLAGS` benchmarks are built with.
pub fn compute_config(arch: &str, cpu_flags: &str, extra: &str) -> BuildConfig {
    let mut rustflags = None;
    if arch.contains("x86_64") {
        if cpu_flags.contains("avx512f") {
            rustflags = Some("-C target-feature=+avx512f,+fma".into());
        } else if cpu_flags.contains("avx2") {
            rustflags = Some("-C target-feature=+avx2,+fma".into());
        }
    } else if arch.contains("aarch64") || arch.contains("arm64") {
        rustflags = Some("-C target-feature=+neon".into());
    }

    let features = extra
        .split_whitespace()
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    BuildConfig {
        features,
        rustflags,
    }
}

fn cargo(cfg: &BuildConfig, subcommand: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.arg(subcommand);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    cargo(cfg, "build")
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    cargo(cfg, "test")
}

/// Tests with every optional feature, including the logging and in-crate
/// property tests.
pub fn test_all_features_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["test", "--workspace", "--all-features"]);
    cmd
}

/// Tests for the `no_std` build of the library.
pub fn test_no_std_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["test", "-p", "skit", "--lib", "--no-default-features"]);
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["clippy", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["fmt", "--all"]);
    cmd
}

/// Run the criterion suite in `skit-bench`. `bench` selects a single bench
/// target.
pub fn bench_command(cfg: &BuildConfig, bench: Option<&str>) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    if let Some(rf) = &cfg.rustflags {
        cmd.env("RUSTFLAGS", rf);
    }
    cmd.args(["bench", "--manifest-path", "skit-bench/Cargo.toml"]);
    if let Some(name) = bench {
        cmd.args(["--bench", name]);
    }
    cmd
}

pub fn update_bench_readme_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root().join("skit-bench"));
    if let Some(rf) = &cfg.rustflags {
        cmd.env("RUSTFLAGS", rf);
    }
    cmd.args(["run", "--example", "update_bench_readme", "--release"]);
    cmd
}

/// Known demo programs and the features each one needs.
pub const DEMOS: &[(&str, &[&str])] = &[
    ("basic_usage", &[]),
    ("verbose_logging", &["verbose-logging"]),
];

pub fn demo_command(name: &str) -> Result<Command> {
    let Some((_, features)) = DEMOS.iter().find(|(demo, _)| *demo == name) else {
        bail!(
            "unknown demo `{}`; expected one of: {}",
            name,
            DEMOS
                .iter()
                .map(|(d, _)| *d)
                .collect::<Vec<_>>()
                .join(", ")
        );
    };
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd.args(["run", "--example", name]);
    if !features.is_empty() {
        cmd.arg("--features").arg(features.join(" "));
    }
    Ok(cmd)
}
