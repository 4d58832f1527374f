//! Shopfront CLI - browse, shop and administer the shopfront catalog.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! shopfront catalog list --category Electronics
//! shopfront catalog search headphones
//!
//! # Cart and wishlist
//! shopfront cart add 3 --quantity 2
//! shopfront wishlist move 7
//! shopfront cart show
//!
//! # Place an order
//! shopfront checkout --name "Asha Rao" --email asha@example.com --phone 9876543210 \
//!     --address "12 MG Road" --city Bengaluru --pincode 560001 --payment upi
//! shopfront orders --tab active --refresh
//!
//! # Administration (requires an admin session)
//! shopfront login --email admin@example.com --admin
//! shopfront admin orders status 12 shipped
//! ```
//!
//! # Environment Variables
//!
//! See `shopfront_storefront::config`. `RUST_LOG` overrides the default
//! `shopfront=info` filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_core::{CategoryId, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};
use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::orders::OrderTab;
use shopfront_storefront::state::AppState;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage saved products
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Place an order for everything in the cart
    Checkout(CheckoutArgs),
    /// Show placed orders
    Orders {
        /// Tab to show (`all`, `active`, `delivered`, `cancelled`)
        #[arg(short, long, default_value = "all")]
        tab: OrderTab,

        /// Fetch current statuses from the service first
        #[arg(long)]
        refresh: bool,
    },
    /// Sign in (password is read from `SHOPFRONT_PASSWORD` or stdin)
    Login {
        #[arg(short, long)]
        email: String,

        /// Use the administrator login
        #[arg(long)]
        admin: bool,
    },
    /// Sign out
    Logout,
    /// Administer the catalog, orders and accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally filtered
    List {
        /// Exact category name
        #[arg(short, long, default_value = "")]
        category: String,
    },
    /// Case-insensitive keyword search over the cached catalog
    Search {
        keyword: String,

        /// Ask the service instead of filtering locally
        #[arg(long)]
        remote: bool,
    },
    /// Show one product
    Show { id: ProductId },
    /// List categories present in the catalog
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart priced against the current catalog
    Show,
    /// Add a product
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Set {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Increase a line by one
    Inc { id: ProductId },
    /// Decrease a line by one (never below 1)
    Dec { id: ProductId },
    /// Remove a line
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add { id: ProductId },
    /// Forget a saved product
    Remove { id: ProductId },
    /// Move a saved product into the cart
    Move { id: ProductId },
    /// Forget all saved products
    Clear,
}

#[derive(clap::Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub pincode: String,
    /// `card`, `upi` or `cod`
    #[arg(long, default_value = "card")]
    pub payment: PaymentMethod,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Show dashboard counters
    Dashboard,
    /// Create, update or delete products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage customer accounts
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(clap::Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub price: rust_decimal::Decimal,
    #[arg(long)]
    pub category: String,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
    #[arg(long)]
    pub description: Option<String>,
    /// Release date (`YYYY-MM-DD`)
    #[arg(long)]
    pub release_date: Option<String>,
    /// Image file to upload with the product
    #[arg(long)]
    pub image: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product
    Create(ProductArgs),
    /// Replace a product's fields
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List all categories
    List,
    /// Create a category
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Create it hidden from the storefront
        #[arg(long)]
        inactive: bool,
    },
    /// Flip a category between active and inactive
    Toggle { id: CategoryId },
    /// Delete a category
    Delete { id: CategoryId },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders, optionally by status
    List {
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Show one order
    Show { id: OrderId },
    /// Change an order's status
    Status { id: OrderId, status: OrderStatus },
    /// Delete an order
    Delete { id: OrderId },
}

#[derive(Subcommand)]
enum UserAction {
    /// List accounts
    List,
    /// Block an account from signing in
    Block { id: UserId },
    /// Allow a blocked account to sign in again
    Unblock { id: UserId },
    /// Delete an account
    Delete { id: UserId },
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

    tracing::debug!("Sentry initialized");
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

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info,shopfront_storefront=info,shopfront_admin=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::load(config).await?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category } => commands::catalog::list(&state, &category).await?,
            CatalogAction::Search { keyword, remote } => {
                commands::catalog::search(&state, &keyword, remote).await?;
            }
            CatalogAction::Show { id } => commands::catalog::show(&state, id).await?,
            CatalogAction::Categories => commands::catalog::categories(&state).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await?,
            CartAction::Add { id, quantity } => commands::cart::add(&state, id, quantity).await?,
            CartAction::Set { id, quantity } => {
                commands::cart::set_quantity(&state, id, quantity).await?;
            }
            CartAction::Inc { id } => commands::cart::step(&state, id, true).await?,
            CartAction::Dec { id } => commands::cart::step(&state, id, false).await?,
            CartAction::Remove { id } => commands::cart::remove(&state, id).await?,
            CartAction::Clear => commands::cart::clear(&state).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&state),
            WishlistAction::Add { id } => commands::wishlist::add(&state, id).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&state, id).await?,
            WishlistAction::Move { id } => commands::wishlist::move_to_cart(&state, id).await?,
            WishlistAction::Clear => commands::wishlist::clear(&state).await?,
        },
        Commands::Checkout(args) => commands::checkout::run(&state, args).await?,
        Commands::Orders { tab, refresh } => {
            commands::checkout::orders(&state, tab, refresh).await?;
        }
        Commands::Login { email, admin } => commands::account::login(&state, email, admin).await?,
        Commands::Logout => commands::account::logout(&state).await?,
        Commands::Admin { action } => {
            let admin = commands::admin::connect(&state)?;
            match action {
                AdminAction::Dashboard => commands::admin::dashboard(&admin).await?,
                AdminAction::Products { action } => match action {
                    ProductAction::Create(fields) => {
                        commands::admin::create_product(&state, &admin, fields).await?;
                    }
                    ProductAction::Update { id, fields } => {
                        commands::admin::update_product(&state, &admin, id, fields).await?;
                    }
                    ProductAction::Delete { id } => {
                        commands::admin::delete_product(&state, &admin, id).await?;
                    }
                },
                AdminAction::Categories { action } => match action {
                    CategoryAction::List => commands::admin::list_categories(&admin).await?,
                    CategoryAction::Create {
                        name,
                        description,
                        inactive,
                    } => {
                        commands::admin::create_category(&admin, name, description, !inactive)
                            .await?;
                    }
                    CategoryAction::Toggle { id } => {
                        commands::admin::toggle_category(&admin, id).await?;
                    }
                    CategoryAction::Delete { id } => {
                        commands::admin::delete_category(&admin, id).await?;
                    }
                },
                AdminAction::Orders { action } => match action {
                    OrderAction::List { status } => {
                        commands::admin::list_orders(&admin, status).await?;
                    }
                    OrderAction::Show { id } => commands::admin::show_order(&admin, id).await?,
                    OrderAction::Status { id, status } => {
                        commands::admin::update_order_status(&admin, id, status).await?;
                    }
                    OrderAction::Delete { id } => commands::admin::delete_order(&admin, id).await?,
                },
                AdminAction::Users { action } => match action {
                    UserAction::List => commands::admin::list_users(&admin).await?,
                    UserAction::Block { id } => commands::admin::set_blocked(&admin, id, true).await?,
                    UserAction::Unblock { id } => {
                        commands::admin::set_blocked(&admin, id, false).await?;
                    }
                    UserAction::Delete { id } => commands::admin::delete_user(&admin, id).await?,
                },
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_quantity_parses() {
        let cli = Cli::try_parse_from(["shopfront", "cart", "set", "4", "-5"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Set { quantity: -5, .. }
            })
        ));
    }

    #[test]
    fn test_payment_and_tab_values() {
        assert!(
            Cli::try_parse_from([
                "shopfront", "checkout", "--name", "A", "--email", "a@b.co", "--phone",
                "9876543210", "--address", "x", "--city", "y", "--pincode", "560001",
                "--payment", "cod",
            ])
            .is_ok()
        );
        assert!(Cli::try_parse_from(["shopfront", "orders", "--tab", "cancelled"]).is_ok());
        assert!(matches!(
            Cli::try_parse_from(["shopfront", "orders", "--refresh"]).map(|c| c.command),
            Ok(Commands::Orders {
                tab: OrderTab::All,
                refresh: true
            })
        ));
        assert!(Cli::try_parse_from(["shopfront", "orders", "--tab", "returned"]).is_err());
    }
}
