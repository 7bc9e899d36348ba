//! # Checkout Demo
//!
//! Terminal rendition of the demo store checkout.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the payments backend
//! export SHOP_BACKEND_URL=http://localhost:4242
//!
//! # Run the store
//! checkout-demo
//! ```

mod shell;

use shell::LoggingObserver;
use shop_backend::HttpGateway;
use shop_core::OrderController;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .init();

    dotenvy::dotenv().ok();

    // Print banner
    print_banner();

    let gateway = Arc::new(HttpGateway::from_env()?);
    let controller = OrderController::with_observer(gateway, Arc::new(LoggingObserver));

    // Fetch config + catalog and build the zero-quantity cart;
    // an empty catalog is fatal here
    let snapshot = controller.bootstrap().await?;

    info!("Session: {}", controller.session_id());
    info!(
        "Store ready: {} products, currency {}",
        snapshot.items.len(),
        controller.currency()
    );

    shell::run(controller).await
}

fn print_banner() {
    println!(
        r#"
  🛒 Checkout RS 🛒
  ━━━━━━━━━━━━━━━━━
  Demo store checkout
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
