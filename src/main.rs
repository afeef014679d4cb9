//! Storefront CLI
//!
//! Drives the client library end to end against a running backend: cart
//! operations, catalog browsing, local favorites, and session management.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use storefront_client::{
    auth::models::{LoginRequest, RegisterRequest},
    carts::models::CartState,
    catalog::filter::{self, ProductSort},
    config::ClientConfig,
    context::AppContext,
};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront API client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Cart operations
    Cart(CartCommand),

    /// Product listing and lookup
    Products(ProductsCommand),

    /// List categories
    Categories,

    /// Local favorites
    Favorites(FavoritesCommand),

    /// Log in and store the bearer token
    Login(LoginArgs),

    /// Create an account and store the bearer token
    Register(RegisterArgs),

    /// Log out and clear the bearer token
    Logout,
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Fetch and print the cart
    Show,

    /// Add a product
    Add {
        #[arg(long)]
        product: u64,

        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Change a line's quantity
    Update {
        #[arg(long)]
        item: u64,

        #[arg(long)]
        quantity: u32,
    },

    /// Remove a line
    Remove {
        #[arg(long)]
        item: u64,
    },

    /// Empty the cart
    Clear,

    /// Print the unit count
    Count,
}

#[derive(Debug, Args)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products with optional search, category filter, and sort
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<u64>,

        #[arg(long, value_enum, default_value = "newest")]
        sort: ProductSort,
    },

    /// Show a single product
    Show {
        #[arg(long)]
        id: u64,
    },
}

#[derive(Debug, Args)]
struct FavoritesCommand {
    #[command(subcommand)]
    command: FavoritesSubcommand,
}

#[derive(Debug, Subcommand)]
enum FavoritesSubcommand {
    /// Print the wishlist
    List,

    /// Favorite a product by id
    Add {
        #[arg(long)]
        id: u64,
    },

    /// Unfavorite a product by id
    Remove {
        #[arg(long)]
        id: u64,
    },

    /// Empty the wishlist
    Clear,
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    init_logging();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), String> {
    let ctx = AppContext::from_config(&cli.config)
        .map_err(|error| format!("failed to initialize client: {error}"))?;

    match cli.command {
        Commands::Cart(CartCommand { command }) => run_cart(&ctx, command).await,
        Commands::Products(ProductsCommand { command }) => run_products(&ctx, command).await,
        Commands::Categories => run_categories(&ctx).await,
        Commands::Favorites(FavoritesCommand { command }) => run_favorites(&ctx, command).await,
        Commands::Login(args) => run_login(&ctx, args).await,
        Commands::Register(args) => run_register(&ctx, args).await,
        Commands::Logout => ctx
            .logout()
            .await
            .map_err(|error| format!("logout failed: {error}")),
    }
}

async fn run_cart(ctx: &AppContext, command: CartSubcommand) -> Result<(), String> {
    match command {
        CartSubcommand::Show => {
            ctx.carts
                .fetch_cart()
                .await
                .map_err(|error| error.to_string())?;

            print_cart(&ctx.carts.state());
        }
        CartSubcommand::Add { product, quantity } => {
            ctx.carts
                .add_to_cart(product, quantity)
                .await
                .map_err(|error| describe_cart_failure(ctx, &error.to_string()))?;

            print_cart(&ctx.carts.state());
        }
        CartSubcommand::Update { item, quantity } => {
            ctx.carts
                .update_cart_item(item, quantity)
                .await
                .map_err(|error| describe_cart_failure(ctx, &error.to_string()))?;

            print_cart(&ctx.carts.state());
        }
        CartSubcommand::Remove { item } => {
            ctx.carts
                .remove_from_cart(item)
                .await
                .map_err(|error| describe_cart_failure(ctx, &error.to_string()))?;

            print_cart(&ctx.carts.state());
        }
        CartSubcommand::Clear => {
            ctx.carts
                .clear_cart()
                .await
                .map_err(|error| describe_cart_failure(ctx, &error.to_string()))?;

            println!("cart cleared");
        }
        CartSubcommand::Count => {
            println!("{}", ctx.carts.cart_count().await);
        }
    }

    Ok(())
}

/// Prefer the store's user-facing message over the raw error when present.
fn describe_cart_failure(ctx: &AppContext, fallback: &str) -> String {
    ctx.carts
        .state()
        .error
        .unwrap_or_else(|| fallback.to_string())
}

fn print_cart(state: &CartState) {
    if state.is_empty() {
        println!("cart is empty");
        return;
    }

    for item in &state.items {
        println!(
            "{}  {}  {} x {}",
            item.id, item.product.title, item.quantity, item.unit_price
        );
    }

    println!("subtotal: {}", state.summary.subtotal);
    println!("items: {}", state.summary.total_items);
}

async fn run_products(ctx: &AppContext, command: ProductsSubcommand) -> Result<(), String> {
    match command {
        ProductsSubcommand::List {
            search,
            category,
            sort,
        } => {
            let products = ctx
                .catalog
                .list_products()
                .await
                .map_err(|error| format!("failed to list products: {error}"))?;

            let mut view = filter::search(&products, search.as_deref().unwrap_or(""));

            if let Some(category) = category {
                view.retain(|product| product.category == Some(category));
            }

            for product in filter::sorted(view, sort) {
                println!("{}  {}  {}", product.id, product.title, product.price);
            }
        }
        ProductsSubcommand::Show { id } => {
            let product = ctx
                .catalog
                .get_product(id)
                .await
                .map_err(|error| format!("failed to fetch product: {error}"))?;

            println!("{}  {}  {}", product.id, product.title, product.price);

            if let Some(percentage) = product.discount_percentage() {
                println!("on sale: {} (-{percentage}%)", product.sale_price());
            }
        }
    }

    Ok(())
}

async fn run_categories(ctx: &AppContext) -> Result<(), String> {
    let categories = ctx
        .catalog
        .list_categories()
        .await
        .map_err(|error| format!("failed to list categories: {error}"))?;

    for category in categories {
        println!("{}  {}", category.id, category.title);
    }

    Ok(())
}

async fn run_favorites(ctx: &AppContext, command: FavoritesSubcommand) -> Result<(), String> {
    match command {
        FavoritesSubcommand::List => {
            for product in ctx.favorites.favorites() {
                println!("{}  {}  {}", product.id, product.title, product.price);
            }
        }
        FavoritesSubcommand::Add { id } => {
            let product = ctx
                .catalog
                .get_product(id)
                .await
                .map_err(|error| format!("failed to fetch product: {error}"))?;

            ctx.favorites.add(product);
        }
        FavoritesSubcommand::Remove { id } => ctx.favorites.remove(id),
        FavoritesSubcommand::Clear => ctx.favorites.clear(),
    }

    Ok(())
}

async fn run_login(ctx: &AppContext, args: LoginArgs) -> Result<(), String> {
    let session = ctx
        .auth
        .login(LoginRequest {
            email: args.email,
            password: args.password,
        })
        .await
        .map_err(|error| format!("login failed: {}", error.user_message()))?;

    println!("logged in as {}", session.user.name);

    Ok(())
}

async fn run_register(ctx: &AppContext, args: RegisterArgs) -> Result<(), String> {
    let session = ctx
        .auth
        .register(RegisterRequest {
            name: args.name,
            email: args.email,
            password: args.password,
        })
        .await
        .map_err(|error| format!("registration failed: {}", error.user_message()))?;

    println!("registered as {}", session.user.name);

    Ok(())
}
