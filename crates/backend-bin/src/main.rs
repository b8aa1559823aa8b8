use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use zeroize::Zeroize;

use backend_lib::{
    config::Settings,
    credential,
    identity::MemoryIdentityStore,
    router, AppState,
};

#[derive(Parser)]
#[command(name = "examseat", about = "ExamSeat authentication backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the authentication HTTP server
    Serve {
        /// Path to a config file (defaults to examseat.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// JSON seed file of subjects to load into the in-memory store
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Hash a secret into the stored digest format
    Hash {
        secret: String,
    },
    /// Generate a random credential
    Generate {
        #[arg(default_value_t = 12)]
        length: usize,
    },
    /// Grade a candidate secret
    Strength {
        secret: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, seed } => serve(config, seed).await,
        Command::Hash { mut secret } => {
            let digest = credential::hash_wiping(&mut secret)
                .context("hashing secret")?;
            println!("{digest}");
            Ok(())
        },
        Command::Generate { length } => {
            let mut secret = credential::generate(length).context("generating credential")?;
            let grade = credential::assess_strength(&secret);
            println!("{secret}");
            eprintln!("strength: {grade}");
            secret.zeroize();
            Ok(())
        },
        Command::Strength { secret } => {
            let grade = credential::assess_strength(&secret);
            let acceptable = credential::is_acceptable(&secret);
            println!("{grade} (acceptable for new credentials: {acceptable})");
            Ok(())
        },
    }
}

async fn serve(config: Option<PathBuf>, seed: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = match &config {
        Some(path) => Settings::load_from(path.to_str().context("config path is not UTF-8")?)?,
        None => Settings::load()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .init();

    let store = Arc::new(MemoryIdentityStore::new());
    if let Some(path) = seed {
        let loaded = store.load_seed(&path).context("loading seed file")?;
        tracing::info!(loaded, path = %path.display(), "seeded identity store");
    } else {
        tracing::warn!("no seed file given; the identity store is empty");
    }

    let state = Arc::new(AppState::new(store, settings.clone()));
    let app = router::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
