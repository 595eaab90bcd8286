//! jobboard - command-line client for the job-board backend.
//!
//! Log in once, then browse and publish job offers, edit your profile and
//! upload a presentation video from the terminal.

mod app;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use jobboard_core::models::NewOffer;

/// Log file name in the cache directory
const LOG_FILE: &str = "jobboard.log";

#[derive(Parser)]
#[command(name = "jobboard", version, about = "Command-line client for the job board")]
struct Cli {
    /// Backend base URL (overrides config and JOBBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Discard the local session
    Logout {
        /// Also rotate the signing secret, invalidating every saved session
        #[arg(long)]
        all: bool,
    },
    /// Show the signed-in identity
    Whoami,
    /// Register a company account
    RegisterCompany {
        #[arg(long)]
        name: String,
        #[arg(long)]
        nit: String,
        #[arg(long)]
        email: String,
    },
    /// View or edit your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Browse or publish job offers
    #[command(subcommand)]
    Offers(OffersCommand),
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    Edit {
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        experience: Option<String>,
    },
    /// Upload a presentation video
    UploadVideo { path: PathBuf },
}

#[derive(Subcommand)]
enum OffersCommand {
    List {
        /// Match title or description
        #[arg(long)]
        query: Option<String>,
        /// Match modality
        #[arg(long)]
        location: Option<String>,
    },
    Create(CreateOfferArgs),
}

#[derive(Args)]
struct CreateOfferArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    salary: String,
    #[arg(long = "contract")]
    type_of_contract: String,
    #[arg(long)]
    schedule: String,
    #[arg(long)]
    modality: String,
    #[arg(long)]
    requirements: String,
    #[arg(long)]
    experience: String,
}

impl From<CreateOfferArgs> for NewOffer {
    fn from(args: CreateOfferArgs) -> Self {
        NewOffer {
            title: args.title,
            description: args.description,
            salary: args.salary,
            type_of_contract: args.type_of_contract,
            schedule: args.schedule,
            modality: args.modality,
            requirements: args.requirements,
            experience: args.experience,
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g., RUST_LOG=debug). Output goes to
/// stderr and, when the cache directory is available, to a log file there.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_dir = jobboard_core::Config::default().cache_dir().ok();
    let _guard = init_tracing(log_dir);
    info!("jobboard starting");

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut app = App::new(cli.api_url)?;

    match cli.command {
        Command::Login { email } => app.login(email).await,
        Command::Logout { all } => app.logout(all),
        Command::Whoami => app.whoami(),
        Command::RegisterCompany { name, nit, email } => app.register_company(name, nit, email).await,
        Command::Profile(ProfileCommand::Show) => app.show_profile().await,
        Command::Profile(ProfileCommand::Edit { description, experience }) => {
            app.edit_profile(description, experience).await
        }
        Command::Profile(ProfileCommand::UploadVideo { path }) => app.upload_video(&path).await,
        Command::Offers(OffersCommand::List { query, location }) => app.list_offers(query, location).await,
        Command::Offers(OffersCommand::Create(args)) => app.create_offer(args.into()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload_video() {
        let cli = Cli::try_parse_from(["jobboard", "profile", "upload-video", "intro.mp4"]).unwrap();
        match cli.command {
            Command::Profile(ProfileCommand::UploadVideo { path }) => {
                assert_eq!(path, PathBuf::from("intro.mp4"))
            }
            _ => panic!("expected upload-video"),
        }
    }

    #[test]
    fn test_parse_offer_create_maps_fields() {
        let cli = Cli::try_parse_from([
            "jobboard", "offers", "create",
            "--title", "Rust developer",
            "--description", "APIs",
            "--salary", "5000",
            "--contract", "Indefinite",
            "--schedule", "Full time",
            "--modality", "Remote",
            "--requirements", "Rust",
            "--experience", "2 years",
        ])
        .unwrap();
        let Command::Offers(OffersCommand::Create(args)) = cli.command else {
            panic!("expected offers create");
        };
        let offer: NewOffer = args.into();
        assert_eq!(offer.type_of_contract, "Indefinite");
        assert_eq!(offer.requirements, "Rust");
    }

    #[test]
    fn test_global_api_url() {
        let cli = Cli::try_parse_from(["jobboard", "offers", "list", "--api-url", "http://h/api"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://h/api"));
    }
}
