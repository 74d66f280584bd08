use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for skit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test {
        /// Also run the all-features and no_std test passes
        #[arg(long)]
        all: bool,
    },
    Clippy,
    Fmt,
    Analyze,
    Bench {
        /// Run only this bench target (e.g. bench_fft, bench_memmem)
        name: Option<String>,
    },
    #[command(name = "update-bench-readme")]
    UpdateBenchReadme,
    Demo {
        /// Name of the demo program
        name: String,
    },
}

#[cfg(not(test))]
fn run(cmd: &mut std::process::Command) -> anyhow::Result<()> {
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{:?} failed with {}", cmd, status);
    }
    Ok(())
}

#[cfg(not(test))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    match cli.command {
        Commands::Build => run(&mut build_command(&cfg)),
        Commands::Test { all } => {
            run(&mut test_command(&cfg))?;
            if all {
                run(&mut test_all_features_command())?;
                run(&mut test_no_std_command())?;
            }
            Ok(())
        }
        Commands::Clippy => run(&mut clippy_command()),
        Commands::Fmt => run(&mut fmt_command()),
        Commands::Analyze => {
            run(&mut fmt_command())?;
            run(&mut clippy_command())
        }
        Commands::Bench { name } => run(&mut bench_command(&cfg, name.as_deref())),
        Commands::UpdateBenchReadme => run(&mut update_bench_readme_command(&cfg)),
        Commands::Demo { name } => run(&mut demo_command(&name)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bench_command() {
        let cli = Cli::parse_from(["xtask", "bench", "bench_memmem"]);
        match cli.command {
            Commands::Bench { name } => assert_eq!(name.as_deref(), Some("bench_memmem")),
            _ => panic!("parsed wrong command"),
        }
    }

    #[test]
    fn parse_test_all() {
        let cli = Cli::parse_from(["xtask", "test", "--all"]);
        assert!(matches!(cli.command, Commands::Test { all: true }));
    }

    #[test]
    fn parse_demo_command() {
        let cli = Cli::parse_from(["xtask", "demo", "basic_usage"]);
        match cli.command {
            Commands::Demo { name } => assert_eq!(name, "basic_usage"),
            _ => panic!("parsed wrong command"),
        }
    }
}
