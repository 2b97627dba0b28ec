use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use epoa_runner::{Config, Pipeline};
use epoa_sheet::YamlRoster;

#[derive(Parser)]
#[command(name = "epoa", version, about = "Equal-pay evidence collection for job applications")]
struct Cli {
    /// Config file (default: ~/.config/epoa/epoa.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file
    Init {
        #[arg(long)]
        name: String,
    },

    /// Show the effective configuration
    Config,

    /// Check renderer, evidence root and roster before a run
    Doctor,

    /// Fetch and check postings for every role not yet applied to
    Apply {
        /// Resume to stage into each role directory (default: resume_path from config)
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Print the full report as JSON instead of the summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let cfg_path = cli.config.unwrap_or_else(Config::config_path);

    match cli.cmd {
        Command::Init { name } => {
            if cfg_path.exists() {
                anyhow::bail!("{} already exists", cfg_path.display());
            }
            Config::default_for_user(&name).save_to(&cfg_path)?;
            println!("Wrote {}", cfg_path.display());
        }
        Command::Config => {
            let cfg = Config::load_from(&cfg_path)?;
            print_config(&cfg_path, &cfg);
        }
        Command::Doctor => {
            let cfg = Config::load_from(&cfg_path)?;
            for line in epoa_runner::doctor(&cfg)? {
                println!("ok  {line}");
            }
        }
        Command::Apply { resume, json } => {
            let mut cfg = Config::load_from(&cfg_path)?;
            if let Some(resume) = resume {
                let resume = std::fs::canonicalize(&resume).with_context(|| format!("resume {}", resume.display()))?;
                cfg.resume_path = resume.display().to_string();
            }
            if !json {
                print_config(&cfg_path, &cfg);
            }

            let pipeline = Pipeline::from_config(&cfg)?;
            let roster = YamlRoster::new(cfg.spreadsheet_path(), &cfg.spreadsheet_tab);
            let report = pipeline.run_source(&roster)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }

    Ok(())
}

fn print_config(path: &std::path::Path, cfg: &Config) {
    println!(">>> Configuration ({}):", path.display());
    println!();
    println!("    {:>16} {}", "Name:", cfg.name);
    println!("    {:>16} {}", "Evidence dir:", cfg.evidence_dir().display());
    println!("    {:>16} {}", "Resume:", cfg.resume_path().display());
    println!("    {:>16} {}", "Spreadsheet:", cfg.spreadsheet_path().display());
    println!("    {:>16} {}", "Spreadsheet tab:", cfg.spreadsheet_tab);
    let mut words = cfg.trigger_words.clone();
    words.sort();
    println!("    {:>16} {}", "Check words:", words.join(", "));
    println!("    {:>16} {} (timeout {}s)", "Renderer:", cfg.renderer.binary, cfg.renderer.timeout_secs);
    println!();
}
