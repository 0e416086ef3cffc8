use clap::{Parser, Subcommand};
use pac_file_util::logging;
use pac_file_util::output::console;
use pac_file_util::{GenerateOptions, PacConfig, PacFileService};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Proxy Auto Configuration (PAC) File Utility for Office 365.
#[derive(Parser)]
#[command(name = "pac-file-util", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with the Office 365 IP and URL web service
    #[command(name = "pac-file")]
    PacFile {
        #[command(subcommand)]
        command: PacFileCommands,
    },
}

#[derive(Subcommand)]
enum PacFileCommands {
    /// Generate the PAC file from a template file
    Generate {
        /// The PAC file template to be used in file generation
        #[arg(long, short = 'f', value_name = "PATH")]
        file: PathBuf,

        /// Generate even if the version did not change
        #[arg(long)]
        force: bool,

        /// Move rules shared by several events into a common section
        #[arg(long)]
        optimize: bool,

        /// Print an optimization report
        #[arg(long)]
        report: bool,
    },
    /// Check for updates from Microsoft
    #[command(name = "update-check")]
    UpdateCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    if let Err(e) = logging::init(logging::LOG_CONFIG_FILE) {
        eprintln!("{e}");
    }
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console::error(e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    let config = PacConfig::from_env()?;
    let mut service = PacFileService::new(config)?;

    let Commands::PacFile { command } = command;
    match command {
        PacFileCommands::Generate {
            file,
            force,
            optimize,
            report,
        } => {
            log::info!("Pac file action was requested for 'Generate'");
            let options = GenerateOptions {
                file,
                force,
                optimize,
                report,
            };
            service.generate(&options).await?;
        }
        PacFileCommands::UpdateCheck => {
            log::info!("Pac file action was requested for 'UpdateCheck'");
            service.check_for_updates().await?;
        }
    }
    Ok(())
}
