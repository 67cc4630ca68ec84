//! Bookshelf application library
//!
//! Application modules plus the [`run`] bootstrap shared by the
//! `bookshelf-app` and `bookshelf-cli` binaries.

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;

/// Re-export commonly used types
pub use modules::*;

/// Build the default registry holding every application module.
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Run the service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry();
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("failed to initialize modules")?;
    registry
        .start_modules(&ctx)
        .await
        .context("failed to start modules")?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    // Stop modules even when the server failed, then report the first error.
    let stopped = registry.stop_modules().await;
    served?;
    stopped.context("failed to stop modules")?;

    tracing::info!("bookshelf shutdown complete");
    Ok(())
}
