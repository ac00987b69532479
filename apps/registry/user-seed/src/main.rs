//! User Seed
//!
//! Creates sample users, attaches phones, and prints users as JSON.
//! Migrations are applied before any command runs.

use clap::{Parser, Subcommand};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::models::{DocumentProps, PhoneInput, PhoneProps, UpdateUser};
use domain_users::{CreateUser, PgUserRepository, UserService};
use eyre::{Result, eyre};
use migration::Migrator;
use tracing::info;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "user-seed")]
#[command(about = "Seed and inspect users in the registry database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a sample user with one primary phone
    Create {
        #[arg(short, long, default_value = "kawa@example.com")]
        email: String,

        #[arg(short, long, default_value = "kawa")]
        name: String,

        #[arg(long, default_value = "70119006405")]
        cpf: String,

        #[arg(long, default_value = "0005")]
        rg: String,

        #[arg(short, long, default_value = "84999221557")]
        phone: String,
    },

    /// Append a phone to an existing user
    AddPhone {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        number: String,

        /// Make this the primary phone; the current primary is demoted
        #[arg(long)]
        primary: bool,
    },

    /// Print a user as JSON
    Show {
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(
        config.database.clone(),
        Some(config.retry()),
    )
    .await?;

    database::postgres::check_health(&db).await?;
    database::postgres::run_migrations::<Migrator>(&db, "user-seed").await?;

    let service = UserService::new(PgUserRepository::new(db));

    match cli.command {
        Commands::Create {
            email,
            name,
            cpf,
            rg,
            phone,
        } => {
            let user = service
                .create_user(CreateUser {
                    email,
                    password_hash: "seeded-password-hash".to_string(),
                    name,
                    birth_date: None,
                    profile_picture: None,
                    address: None,
                    phones: vec![PhoneProps {
                        number: phone,
                        is_primary: true,
                    }],
                    document: DocumentProps {
                        rg,
                        cpf,
                        other_info: None,
                    },
                })
                .await?;

            info!(user_id = %user.id, "Seeded user");
            println!("{}", serde_json::to_string_pretty(&user)?);
        }

        Commands::AddPhone {
            email,
            number,
            primary,
        } => {
            let user = service
                .find_user_by_email(&email)
                .await?
                .ok_or_else(|| eyre!("No user with email {}", email))?;

            let mut phones: Vec<PhoneInput> = user
                .phones
                .iter()
                .map(|p| PhoneInput {
                    id: Some(p.id),
                    number: p.number.clone(),
                    is_primary: p.is_primary && !primary,
                })
                .collect();
            phones.push(PhoneInput {
                id: None,
                number,
                is_primary: primary,
            });

            let updated = service
                .update_user(
                    user.id,
                    UpdateUser {
                        phones: Some(phones),
                        ..Default::default()
                    },
                )
                .await?;

            info!(user_id = %updated.id, phones = updated.phones.len(), "Phone added");
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }

        Commands::Show { email } => {
            let user = service
                .find_user_by_email(&email)
                .await?
                .ok_or_else(|| eyre!("No user with email {}", email))?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }

    Ok(())
}
