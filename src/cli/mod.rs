use clap::{Parser, Subcommand};

pub mod config;
pub mod init_config;
pub mod run;
pub mod verify;
pub mod version;

#[derive(Parser)]
#[command(name = "consent-gate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Group consent gate bot: mutes new members until they consent", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot service
    Run {
        /// Path to config file (default: ~/.local/share/consent-gate/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Write a commented default config file
    InitConfig {
        /// Path to config file (default: ~/.local/share/consent-gate/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the config and check the bot token against the API
    Verify {
        /// Path to config file (default: ~/.local/share/consent-gate/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run { config } => run::execute(config).await,
        Commands::InitConfig { config, force } => init_config::execute(config, force),
        Commands::Verify { config } => verify::execute(config).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
