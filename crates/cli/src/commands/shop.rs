//! One-shot catalog and cart queries against the QKART backend.

use std::io::Write;

use qkart_core::{CartItem, CartSummary, Product, generate_cart_items};
use qkart_storefront::config::StorefrontConfig;
use qkart_storefront::qkart::{CommerceApi, QkartClient};
use qkart_storefront::session::SessionStore;
use tracing::info;

use super::CommandError;

/// List the catalog, or the products matching `search`.
///
/// A search with no matches prints nothing.
///
/// # Errors
///
/// Returns an error if the backend request fails.
pub async fn products(
    config: &StorefrontConfig,
    search: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let client = QkartClient::new(&config.api_endpoint);

    let products = match search.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => match client.search_products(text).await {
            Ok(products) => products,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e.into()),
        },
        None => client.get_products().await?,
    };

    info!(count = products.len(), "Fetched products");
    write_products(out, &products)?;
    Ok(())
}

/// Show the signed-in user's cart, resolved against the catalog.
///
/// # Errors
///
/// Returns [`CommandError::NotSignedIn`] without a stored session, or an
/// error if a backend request fails.
pub async fn cart(config: &StorefrontConfig, out: &mut impl Write) -> Result<(), CommandError> {
    let session = SessionStore::open(&config.session_file).await?.current();
    let token = session.token().ok_or(CommandError::NotSignedIn)?;

    let client = QkartClient::new(&config.api_endpoint);
    let entries = client.get_cart(token).await?;
    let catalog = client.get_products().await?;

    write_cart(out, &generate_cart_items(&entries, &catalog))?;
    Ok(())
}

fn write_products(out: &mut impl Write, products: &[Product]) -> std::io::Result<()> {
    for product in products {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{:.1}",
            product.id, product.name, product.category, product.cost, product.rating
        )?;
    }
    Ok(())
}

fn write_cart(out: &mut impl Write, items: &[CartItem]) -> std::io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Cart is empty");
    }

    for item in items {
        writeln!(
            out,
            "{}\t{} x {} @ {} = {}",
            item.product_id,
            item.qty,
            item.name,
            item.cost,
            item.line_cost()
        )?;
    }

    let summary = CartSummary::of(items);
    writeln!(
        out,
        "Total: {} ({} items)",
        summary.total_cost, summary.total_quantity
    )
}
