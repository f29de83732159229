use anyhow::bail;
use azimg::integrations::data_transfer_objects::{Architecture, Platform};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML file with the Azure configuration variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// OS image management commands
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ImageCommands {
    /// List OS images owned by the subscription or by another account
    List {
        /// List images owned by this account instead of the subscription
        #[arg(long, conflicts_with = "public")]
        owner: Option<String>,

        /// List the public library (Microsoft and partner images)
        #[arg(long)]
        public: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single OS image
    Get {
        /// Image id (the catalog Name)
        #[arg(required = true)]
        id: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search own and public OS images
    Search {
        /// Substring matched against id, name and description
        #[arg(long)]
        keyword: Option<String>,

        /// Platform filter (examples: 'windows', 'unix', 'ubuntu')
        #[arg(long)]
        platform: Option<Platform>,

        /// Architecture filter ('i32' or 'i64')
        #[arg(long)]
        architecture: Option<Architecture>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Capture a stopped virtual machine into a new OS image
    Capture {
        /// Virtual machine id, as 'service:role' or a single id
        #[arg(long)]
        vm_id: String,

        /// Name of the new image, generated when omitted
        #[arg(long)]
        name: Option<String>,

        /// Description stored as the image label
        #[arg(long)]
        description: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Remove an OS image owned by the subscription
    Remove {
        /// Image id (the catalog Name)
        #[arg(required = true)]
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Tell whether an OS image belongs to the public library
    IsPublic {
        /// Image id (the catalog Name)
        #[arg(required = true)]
        id: String,
    },

    /// Show what the adapter supports
    Capabilities {},
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved configuration variables, masked
    Show {},
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Read environment variables
    dotenvy::dotenv().ok();

    // Setup logging
    let log_file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open("azimg.log")
    {
        Ok(file) => file,
        Err(e) => bail!("Failed to open log file: {}", e),
    };

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_vars = azimg::config::load_config_vars(cli.config.as_deref())?;

    match &cli.command {
        Commands::Image { command } => match command {
            ImageCommands::List {
                owner,
                public,
                json,
            } => {
                commands::image::list(config_vars, owner.as_deref(), *public, *json).await?;
            }
            ImageCommands::Get { id, json } => {
                commands::image::get(config_vars, id, *json).await?;
            }
            ImageCommands::Search {
                keyword,
                platform,
                architecture,
                json,
            } => {
                commands::image::search(
                    config_vars,
                    keyword.as_deref(),
                    *platform,
                    *architecture,
                    *json,
                )
                .await?;
            }
            ImageCommands::Capture {
                vm_id,
                name,
                description,
                yes,
            } => {
                commands::image::capture(config_vars, vm_id, name.clone(), description, *yes)
                    .await?;
            }
            ImageCommands::Remove { id, yes } => {
                commands::image::remove(config_vars, id, *yes).await?;
            }
            ImageCommands::IsPublic { id } => {
                commands::image::is_public(config_vars, id).await?;
            }
            ImageCommands::Capabilities {} => {
                commands::image::capabilities(config_vars).await?;
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show {} => {
                commands::config::show(&config_vars)?;
            }
        },
    }

    Ok(())
}
