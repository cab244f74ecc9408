/// Entity Resolution Service
///
/// Resolves externally supplied entity identifiers (email addresses,
/// usernames, group-email aliases) into concrete identity records held by a
/// Keycloak directory, expanding group aliases into their member entities.

mod api;
mod config;
mod context;
mod directory;
mod error;
mod metrics;
mod rate_limit;
mod resolution;
mod server;
#[cfg(test)]
mod testutil;

use config::ServerConfig;
use context::AppContext;
use error::ErsResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ErsResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entity_resolution=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config)?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
   ______      __  _ __           ____                  __
  / ____/___  / /_(_) /___  __   / __ \___  _________  / /   _____
 / __/ / __ \/ __/ / __/ / / /  / /_/ / _ \/ ___/ __ \/ / | / / _ \
/ /___/ / / / /_/ / /_/ /_/ /  / _, _/  __(__  ) /_/ / /| |/ /  __/
\____/_/ /_/\__/_/\__/\__, /  /_/ |_|\___/____/\____/_/ |___/\___/
                     /____/

        Entity Resolution Service v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
