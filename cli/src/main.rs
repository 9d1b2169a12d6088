use clap::{Parser, Subcommand};
use emc_academy::Config;
use emc_academy::academy::{Verification, verify::list_certificates_for_user};
use emc_academy::auth::{UserClaims, generate_token};
use emc_academy::model::blob::CERT_COUNTER_NAMESPACE;

#[derive(Parser, Debug)]
#[command(about = "Maintenance tool for the EMC Academy backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mint an identity token for local testing
    Token {
        /// Opaque user id placed in `sub`
        #[arg(long)]
        sub: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Token lifetime in hours
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },

    #[command(flatten)]
    Storage(StorageCommand),
}

/// Commands that open the configured storage backend.
#[derive(Subcommand, Debug)]
pub enum StorageCommand {
    /// Look up a certificate number
    Verify { cert_no: String },

    /// List certificates held by a user
    Certificates { user_id: String },

    /// Show the last issued certificate sequence number
    Counter,

    /// Wipe all progress and certificates (the counter keeps running)
    Reset {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> emc_academy::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();
    let config = Config::get_or_init(cfg!(debug_assertions)).await;

    match args.command {
        Commands::Token {
            sub,
            name,
            email,
            hours,
        } => {
            let claims = UserClaims::new(sub, name, email, chrono::Duration::hours(hours));
            println!("{}", generate_token(&claims, config.app().jwt())?);
        }
        Commands::Storage(command) => run_storage_command(config, command).await?,
    }

    Ok(())
}

async fn run_storage_command(
    config: &Config,
    command: StorageCommand,
) -> emc_academy::error::AppResult<()> {
    let mm = emc_academy::build_model(config).await?;

    match command {
        StorageCommand::Verify { cert_no } => {
            let state = mm.progress().snapshot().await;
            match Verification::check(&state, &cert_no) {
                Verification::Valid { certificate } => {
                    println!("VALID");
                    println!("{}", serde_json::to_string_pretty(&certificate).unwrap_or_default());
                }
                Verification::Invalid => println!("INVALID"),
            }
        }

        StorageCommand::Certificates { user_id } => {
            let state = mm.progress().snapshot().await;
            for cert in list_certificates_for_user(&state, &user_id) {
                println!(
                    "{}\t{}\t{}",
                    cert.cert_no(),
                    cert.course_title(),
                    cert.issued_at().format("%Y-%m-%d")
                );
            }
        }

        StorageCommand::Counter => {
            let current = mm.counter().current(CERT_COUNTER_NAMESPACE).await?;
            println!("{current}");
        }

        StorageCommand::Reset { yes } => {
            if !yes {
                eprintln!("refusing to reset without --yes");
                std::process::exit(2);
            }
            mm.progress().reset().await?;
            println!("progress reset");
        }
    }

    Ok(())
}
