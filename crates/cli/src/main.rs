//! NY Pizza CLI - a terminal storefront client.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! pizza products
//!
//! # Sign in, fill the cart and check out
//! pizza login -e a@b.com -p secret
//! pizza cart add hfdwf0
//! pizza checkout
//!
//! # Add a product (admin only)
//! pizza add-product --name "Margherita" --price 9.50 --stock 10
//! ```
//!
//! Every invocation hydrates the signed-in user and cart from
//! `STOREFRONT_DATA_DIR`, fetches the catalog once, runs one command and
//! exits. See `ny_pizza_storefront::config` for environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ny_pizza_storefront::{Storefront, StorefrontConfig};

mod commands;
mod view;

#[derive(Parser)]
#[command(name = "pizza")]
#[command(author, version, about = "NY Pizza storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Products,
    /// Fetch the catalog again and list it
    Reload,
    /// Sign in
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Order everything in the cart
    Checkout,
    /// Create a product (admin only)
    AddProduct {
        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 9.50
        #[arg(long)]
        price: String,

        /// Units in stock
        #[arg(long, default_value = "")]
        stock: String,

        /// One-line description
        #[arg(long, default_value = "")]
        short_desc: String,

        /// Full description
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
    },
    /// Remove one unit of a product
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            view::error(&e);
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr; stdout is the command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ny_pizza_storefront=info,ny_pizza_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        view::error(&*e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = Storefront::from_config(config)?;
    app.subscribe(view::Terminal::default());
    app.start().await;

    match cli.command {
        Commands::Products => commands::catalog::list(&app),
        Commands::Reload => commands::catalog::reload(&app).await?,
        Commands::Login { email, password } => {
            commands::session::login(&app, email, password).await?;
        }
        Commands::Logout => commands::session::logout(&app),
        Commands::Whoami => commands::session::whoami(&app),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&app),
            CartAction::Add { id } => commands::cart::add(&app, &id)?,
            CartAction::Remove { id } => commands::cart::remove(&app, &id),
            CartAction::Clear => commands::cart::clear(&app),
        },
        Commands::Checkout => commands::cart::checkout(&app).await?,
        Commands::AddProduct {
            name,
            price,
            stock,
            short_desc,
            description,
        } => {
            let form = ny_pizza_storefront::forms::ProductForm {
                name,
                price,
                stock,
                short_desc,
                description,
                flash: None,
            };
            commands::catalog::add_product(&app, form).await?;
        }
    }
    Ok(())
}
