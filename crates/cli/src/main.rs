use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshelf_app::{modules, state::AppState};
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Administrative tooling for the Bookshelf service.
#[derive(Parser)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved configuration
    Config,
    /// Dump the merged OpenAPI document as JSON
    Openapi,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();

    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;

    match cli.command {
        Command::Config => {
            println!("{settings:#?}");
        }
        Command::Openapi => {
            let state = AppState::from_settings(&settings);
            let mut registry = ModuleRegistry::new();
            modules::register_all(&mut registry, &state);

            let spec = bookshelf_http::router::merged_openapi(&registry);
            println!(
                "{}",
                serde_json::to_string_pretty(&spec)
                    .with_context(|| "failed to render OpenAPI document")?
            );
        }
    }

    Ok(())
}
