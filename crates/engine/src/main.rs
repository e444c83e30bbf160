//! Mapkeep - Command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapkeep_domain::{PlayerId, TracingSink};
use mapkeep_engine::infrastructure::settings::EngineSettings;
use mapkeep_engine::use_cases::{inspect, map_io};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert, compare and redact strategy-game maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a map and save it again, possibly in the other format.
    Convert {
        #[arg(long)]
        from: PathBuf,
        #[arg(long)]
        to: PathBuf,
    },
    /// Check that everything in the candidate map also holds in the reference.
    Compare {
        #[arg(long)]
        reference: PathBuf,
        #[arg(long)]
        candidate: PathBuf,
    },
    /// Save the view of a map one player is allowed to see.
    Redact {
        #[arg(long)]
        from: PathBuf,
        #[arg(long)]
        to: PathBuf,
        #[arg(long)]
        player: i32,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Load environment from repo root when run through cargo.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapkeep_engine=info,mapkeep_domain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = EngineSettings::from_env();
    tracing::debug!(?settings, "Loaded settings");

    match cli.command {
        Command::Convert { from, to } => {
            let loaded = map_io::load_map(&from, &settings)
                .with_context(|| format!("loading {}", from.display()))?;
            map_io::save_map(&loaded.map, &to)
                .with_context(|| format!("saving {}", to.display()))?;
            tracing::info!(from = %from.display(), to = %to.display(), "Converted map");
            Ok(ExitCode::SUCCESS)
        }
        Command::Compare {
            reference,
            candidate,
        } => {
            let ours = map_io::load_map(&reference, &settings)
                .with_context(|| format!("loading {}", reference.display()))?;
            let theirs = map_io::load_map(&candidate, &settings)
                .with_context(|| format!("loading {}", candidate.display()))?;
            let result = inspect::compare(&ours.map, &theirs.map, &mut TracingSink);
            println!(
                "subset: {}, equal: {}",
                if result.is_subset { "yes" } else { "no" },
                if result.is_equal { "yes" } else { "no" }
            );
            Ok(if result.is_subset {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Redact { from, to, player } => {
            let loaded = map_io::load_map(&from, &settings)
                .with_context(|| format!("loading {}", from.display()))?;
            let view = inspect::player_view(&loaded.map, PlayerId::new(player));
            map_io::save_map(&view, &to).with_context(|| format!("saving {}", to.display()))?;
            tracing::info!(player, to = %to.display(), "Saved player view");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
