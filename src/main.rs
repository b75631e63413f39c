use anyhow::Context;

use bookshelf_app::{modules, state::AppState};
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        "bookshelf-app bootstrap starting"
    );

    let state = AppState::from_settings(&settings);

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &state);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    bookshelf_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;

    tracing::info!("bookshelf-app shutdown complete");
    Ok(())
}
