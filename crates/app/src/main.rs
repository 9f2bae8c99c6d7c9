//! Storefront CLI

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use torque::{
    checkout::{self, PaymentMethod},
    items::{ItemDimensions, LineItem, LineItemId},
};
use torque_app::{
    config::AppConfig,
    context::AppContext,
    observability,
    shipping::{CarrierError, ShippingError},
};

#[derive(Debug, Parser)]
#[command(name = "torque", about = "Motorcycle-parts storefront cart", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect or mutate the cart
    Cart(CartCommand),

    /// Apply a coupon code
    Coupon(CouponCommand),

    /// Calculate the shipping fee for a destination
    Shipping(ShippingCommand),

    /// Derive the final payable total and submit the order
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add an item, merging quantities when it is already in the cart
    Add(AddItemArgs),

    /// Remove an item
    Remove {
        /// Line item identifier, e.g. "7201-red"
        id: String,
    },

    /// Set an item's quantity exactly; zero removes it
    Update {
        /// Line item identifier
        id: String,

        /// New quantity
        quantity: u32,
    },

    /// Show the cart contents and totals
    Show,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddItemArgs {
    /// Product identifier
    #[arg(long)]
    product: String,

    /// Selected variant identifier
    #[arg(long)]
    variant: Option<String>,

    /// Display name
    #[arg(long)]
    name: String,

    /// Unit price in reais, e.g. 199.90
    #[arg(long)]
    price: Decimal,

    /// Quantity to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Display image reference
    #[arg(long, default_value = "")]
    image_url: String,

    /// Variant label shown in the cart, e.g. a colour name
    #[arg(long)]
    color: Option<String>,

    /// Unit weight in kilograms
    #[arg(long, default_value_t = 0.0)]
    weight: f64,

    /// Unit height in centimetres
    #[arg(long, default_value_t = 0.0)]
    height: f64,

    /// Unit width in centimetres
    #[arg(long, default_value_t = 0.0)]
    width: f64,

    /// Unit length in centimetres
    #[arg(long, default_value_t = 0.0)]
    length: f64,
}

#[derive(Debug, Args)]
struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Apply a coupon code to the cart
    Apply {
        /// The code, case-insensitive
        code: String,
    },
}

#[derive(Debug, Args)]
struct ShippingCommand {
    #[command(subcommand)]
    command: ShippingSubcommand,
}

#[derive(Debug, Subcommand)]
enum ShippingSubcommand {
    /// Quote and record the shipping fee for a destination
    Quote {
        /// Destination postal code, e.g. 01310-100
        postal_code: String,
    },
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Payment method
    #[arg(long, value_enum)]
    payment: PaymentArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentArg {
    Pix,
    CreditCard,
    Boleto,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Pix => PaymentMethod::Pix,
            PaymentArg::CreditCard => PaymentMethod::CreditCard,
            PaymentArg::Boleto => PaymentMethod::Boleto,
        }
    }
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut ctx = AppContext::from_config(&cli.config).map_err(|error| error.to_string())?;

    match cli.command {
        Commands::Cart(CartCommand { command }) => match command {
            CartSubcommand::Add(args) => add_item(&mut ctx, args),
            CartSubcommand::Remove { id } => {
                ctx.carts.remove_item(&LineItemId::new(id));
                show_cart(&ctx)
            }
            CartSubcommand::Update { id, quantity } => {
                ctx.carts.update_quantity(&LineItemId::new(id), quantity);
                show_cart(&ctx)
            }
            CartSubcommand::Show => show_cart(&ctx),
            CartSubcommand::Clear => {
                ctx.carts.clear();
                println!("cart cleared");
                Ok(())
            }
        },
        Commands::Coupon(CouponCommand {
            command: CouponSubcommand::Apply { code },
        }) => apply_coupon(&mut ctx, &code),
        Commands::Shipping(ShippingCommand {
            command: ShippingSubcommand::Quote { postal_code },
        }) => quote_shipping(&mut ctx, &postal_code).await,
        Commands::Checkout(args) => checkout_cart(&mut ctx, args.payment.into()),
    }
}

fn add_item(ctx: &mut AppContext, args: AddItemArgs) -> Result<(), String> {
    let item = LineItem {
        id: LineItemId::from_parts(&args.product, args.variant.as_deref()),
        name: args.name,
        unit_price: rusty_money::Money::from_minor(price_to_minor(args.price)?, rusty_money::iso::BRL),
        quantity: args.quantity,
        image_url: args.image_url,
        variant_label: args.color,
        dimensions: ItemDimensions::new(args.weight, args.height, args.width, args.length),
    };

    ctx.carts
        .add_item(item)
        .map_err(|error| error.to_string())?;

    show_cart(ctx)
}

fn show_cart(ctx: &AppContext) -> Result<(), String> {
    let cart = ctx.carts.cart();

    if cart.is_empty() {
        println!("the cart is empty");
        return Ok(());
    }

    for item in cart.items() {
        let label = item
            .variant_label
            .as_deref()
            .map(|variant| format!(" ({variant})"))
            .unwrap_or_default();

        println!(
            "{}x {}{label} [{}] @ {}",
            item.quantity, item.name, item.id, item.unit_price
        );
    }

    let subtotal = cart.items_subtotal().map_err(|error| error.to_string())?;
    let total = cart.total_price().map_err(|error| error.to_string())?;

    println!("items:    {}", cart.total_items());
    println!("subtotal: {subtotal}");

    match cart.shipping_fee() {
        Some(fee) => println!("shipping: {fee}"),
        None => println!("shipping: not calculated"),
    }

    println!("discount: {}", cart.discount());
    println!("total:    {total}");

    Ok(())
}

fn apply_coupon(ctx: &mut AppContext, code: &str) -> Result<(), String> {
    let applied = ctx
        .carts
        .apply_discount(code)
        .map_err(|error| error.to_string())?;

    if applied {
        println!("coupon applied");
        show_cart(ctx)
    } else {
        println!("coupon not found");
        Ok(())
    }
}

async fn quote_shipping(ctx: &mut AppContext, destination: &str) -> Result<(), String> {
    let fee = ctx
        .shipping
        .calculate(destination, ctx.carts.cart().items())
        .await
        .map_err(|error| shipping_error_message(&error))?;

    ctx.carts
        .set_shipping_fee(fee)
        .map_err(|error| error.to_string())?;

    println!("shipping fee: {fee}");

    Ok(())
}

fn checkout_cart(ctx: &mut AppContext, method: PaymentMethod) -> Result<(), String> {
    let summary =
        checkout::summarize(ctx.carts.cart(), method).map_err(|error| error.to_string())?;

    println!("subtotal:  {}", summary.subtotal());
    println!("shipping: +{}", summary.shipping_fee());
    println!("discount: -{}", summary.discount());

    if summary.incentive().to_minor_units() > 0 {
        println!("incentive: -{}", summary.incentive());
    }

    println!("payable:   {}", summary.payable());

    ctx.carts.clear();
    println!("order submitted; cart cleared");

    Ok(())
}

/// Map shipping failures to the messages the storefront shows.
fn shipping_error_message(error: &ShippingError) -> String {
    match error {
        ShippingError::Postal(postal) => postal.to_string(),
        ShippingError::Carrier(CarrierError::Transport(_)) => {
            "could not reach the shipping service; check your connection".to_string()
        }
        ShippingError::Carrier(CarrierError::MissingCredentials) => error.to_string(),
        ShippingError::Carrier(_) => "shipping calculation failed; try again later".to_string(),
        ShippingError::Pricing(pricing) => pricing.to_string(),
    }
}

/// Convert a price in reais to minor units.
fn price_to_minor(price: Decimal) -> Result<i64, String> {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or_else(|| format!("price {price} cannot be represented"))
}
