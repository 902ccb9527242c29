//! Cabin back office
//!
//! Provides CLI interface for listing, creating, editing and deleting cabins

use anyhow::{Context, Result};
use cabindesk::backend::{PgCabinTable, S3PhotoBucket};
use cabindesk::cabins::draft_file::load_draft;
use cabindesk::config::AppConfig;
use cabindesk::{Cabin, CabinService};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Main entry point for the cabin tool
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run_app().await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// A command line checked before anything remote is touched
#[derive(Debug, PartialEq)]
enum Command {
    Init,
    List,
    Show(i64),
    Create(PathBuf),
    Edit(i64, PathBuf),
    Delete(i64),
}

fn parse_command(choice: &str, rest: &[String]) -> Result<Command> {
    let command = match (choice.trim(), rest) {
        ("init", []) => Command::Init,
        ("list", []) => Command::List,
        ("show", [id]) => Command::Show(parse_id(id)?),
        ("create", [draft_path]) => Command::Create(PathBuf::from(draft_path)),
        ("edit", [id, draft_path]) => Command::Edit(parse_id(id)?, PathBuf::from(draft_path)),
        ("delete", [id]) => Command::Delete(parse_id(id)?),
        _ => {
            println!("❌ Invalid command. Usage:");
            print_usage();
            anyhow::bail!("Invalid command: {} {}", choice, rest.join(" "));
        }
    };
    Ok(command)
}

async fn run_app() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (choice, rest) = match args.split_first() {
        Some((choice, rest)) => (choice.trim().to_string(), rest.to_vec()),
        None => prompt_choice()?,
    };
    let command = parse_command(&choice, &rest)?;

    // Expects config.json in the working directory unless CABINDESK_CONFIG points elsewhere.
    let config_path = env::var("CABINDESK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let app_config = AppConfig::load_from_json(&config_path)
        .context(format!("Failed to load application configuration from {}", config_path.display()))?;

    let table = PgCabinTable::connect(&app_config.database_url, app_config.max_connections)
        .await
        .context("Failed to connect to the cabin database")?;

    if command == Command::Init {
        table.ensure_schema().await.context("Failed to create the cabins table")?;
        return Ok(());
    }

    let photos = S3PhotoBucket::connect(&app_config.storage).await;
    let service = CabinService::new(Arc::new(table), Arc::new(photos), app_config.photo_links());

    match command {
        Command::Init => {}
        Command::List => {
            let cabins = service.list().await.context("Failed to list cabins")?;
            if cabins.is_empty() {
                println!("No cabins yet.");
            }
            for cabin in &cabins {
                print_cabin(cabin);
            }
        }
        Command::Show(id) => {
            let cabin = service.get(id).await.context("Failed to load cabin")?;
            print_cabin(&cabin);
        }
        Command::Create(draft_path) => {
            println!("🏕 Creating cabin from {}...", draft_path.display());
            let draft = load_draft(&draft_path).await?;
            let cabin = service.create(&draft).await.context("Cabin creation failed")?;
            print_cabin(&cabin);
        }
        Command::Edit(id, draft_path) => {
            println!("✏️ Editing cabin {} from {}...", id, draft_path.display());
            let draft = load_draft(&draft_path).await?;
            let cabin = service.update(id, &draft).await.context("Cabin edit failed")?;
            print_cabin(&cabin);
        }
        Command::Delete(id) => {
            println!("🗑 Deleting cabin {}...", id);
            service.delete(id).await.context("Cabin deletion failed")?;
        }
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("Cabin id must be a number, got '{}'", raw))
}

fn print_cabin(cabin: &Cabin) {
    println!(
        "#{} {} | fits {} | {:.2} (discount {:.2}) | {}",
        cabin.id, cabin.name, cabin.max_capacity, cabin.regular_price, cabin.discount, cabin.image
    );
}

fn print_usage() {
    println!("  init                     Create the cabins table");
    println!("  list                     List all cabins");
    println!("  show <id>                Show one cabin");
    println!("  create <draft.json>      Create a cabin");
    println!("  edit <id> <draft.json>   Edit a cabin");
    println!("  delete <id>              Delete a cabin and its photo");
}

/// Prompts for a command line when none was given
///
/// Returns the command and its arguments
fn prompt_choice() -> Result<(String, Vec<String>)> {
    use std::io::{stdin, stdout, Write};

    println!("Select an operation:");
    print_usage();
    print!("Enter your command: ");
    stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    stdin().read_line(&mut input).context("Failed to read user input")?;
    let mut words = input.split_whitespace().map(str::to_string);
    let choice = words.next().unwrap_or_default();
    Ok((choice, words.collect()))
}
