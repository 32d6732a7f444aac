use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use edudesk::cli::{NewAdmin, create_admin};
use edudesk::edudesk_config::ValidationRules;
use edudesk::edudesk_db::{DatabaseConfig, init_db_pool, run_migrations};
use edudesk::modules::auth::repository::PgUserRepository;

#[derive(Parser)]
#[command(name = "edudesk-cli")]
#[command(about = "EduDesk CLI - Administrative tools for EduDesk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

fn prompt(label: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("failed to read {}", label.to_lowercase())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
        } => {
            let admin = NewAdmin {
                first_name: prompt("First name", first_name)?,
                last_name: prompt("Last name", last_name)?,
                email: prompt("Email address", email)?,
                password: Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()
                    .context("failed to read password")?,
            };

            let users = PgUserRepository::new(pool);
            let outcome = create_admin(&users, &ValidationRules::from_env(), admin).await;
            if let Some(error) = outcome.try_error() {
                bail!("could not create admin: {} ({})", error.display_message(), error.code());
            }

            let user = outcome.into_value();
            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", user.email);
            println!("   Name: {} {}", user.first_name, user.last_name);
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
        }
    }

    Ok(())
}
