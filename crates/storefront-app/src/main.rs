use anyhow::Context;
use storefront_core::application::checkout::PaymentReturn;
use storefront_core::application::order_store::OrderStore;
use storefront_core::catalog::Catalog;
use storefront_core::config::Config;
use storefront_core::currency::format_price;
use storefront_storage::{build_storage, Storage};
use tracing::info;

/// Scripted storefront session standing in for the browser views: browse
/// the catalog, fill the cart, complete payment through the simulated
/// redirect, then show order history. One store instance per session; a
/// real frontend would share this one instance across every screen.
fn main() -> anyhow::Result<()> {
    // Load .env for STORE_PATH when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = Config::from_env()?;
    let storage: Storage = build_storage(config.store_path.as_deref())?;
    let mut store = OrderStore::load(storage);

    let catalog = Catalog::demo();
    info!(
        products = catalog.all().len(),
        categories = catalog.categories().len() - 1,
        "catalog loaded"
    );

    if let Some(cart) = store.current_cart() {
        info!(
            order_id = %cart.id,
            lines = cart.items.len(),
            total = %format_price(cart.total_cents),
            "resuming cart from a previous session"
        );
    }

    let phone = catalog.get("1").context("demo catalog is missing product 1")?;
    let headphones = catalog.get("4").context("demo catalog is missing product 4")?;

    store.add_item(phone, 1);
    store.add_item(headphones, 2);
    store.set_quantity(&headphones.id, 1);

    let cart = store.current_cart().context("cart should exist after adding items")?;
    for line in &cart.items {
        info!(
            product = %line.product.name,
            quantity = line.quantity,
            line_total = %format_price(line.line_total_cents()),
            "cart line"
        );
    }
    info!(total = %format_price(cart.total_cents), "cart ready for checkout");

    // The payment link would now take over; its redirect back carries these
    // query parameters.
    let amount = cart.total_cents.to_string();
    let ret = PaymentReturn::from_params([
        ("orderNo", cart.id.as_str()),
        ("amount", amount.as_str()),
        ("description", "Storefront demo order"),
        ("linkCode", "DEMO-1"),
    ])?;
    let confirmed = store.complete_payment(&ret);
    info!(order_id = %confirmed.id, status = ?confirmed.status, "payment confirmed");

    for order in store.order_history() {
        info!(
            order_id = %order.id,
            status = ?order.status,
            total = %format_price(order.total_cents),
            placed_at = %order.created_at,
            "order history entry"
        );
    }

    Ok(())
}
