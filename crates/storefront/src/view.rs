//! Text rendering of the products page.
//!
//! The page is rendered from `templates/catalog.txt`. Everything the
//! template needs is precomputed here so the template stays declarative.

use askama::Template;
use qkart_core::layout::CatalogLayout;
use qkart_core::nav::{HeaderState, Page};
use qkart_core::{CartItem, CartSummary, Notification, Product, is_item_in_cart};

use crate::catalog::CatalogState;
use crate::session::Session;

/// Characters per grid column when laying out product names.
const CHARS_PER_COLUMN: usize = 3;
const MAX_STARS: usize = 5;

/// One product row in the grid.
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub cost: String,
    pub stars: String,
    pub in_cart: bool,
}

/// One line of the cart panel.
pub struct CartLineRow {
    pub id: String,
    pub name: String,
    pub qty: u32,
    pub cost: String,
    pub line_cost: String,
}

/// The cart panel, present only for signed-in users.
pub struct CartPanel {
    pub lines: Vec<CartLineRow>,
    pub total: String,
    pub quantity: u32,
}

/// Products page template.
#[derive(Template)]
#[template(path = "catalog.txt")]
pub struct CatalogTemplate {
    pub header: String,
    pub rule: String,
    pub loading: bool,
    pub empty: bool,
    pub products: Vec<ProductRow>,
    pub cart: Option<CartPanel>,
}

impl CatalogTemplate {
    /// Build the page from controller state and the current session.
    #[must_use]
    pub fn new(state: &CatalogState, session: &Session) -> Self {
        let layout = CatalogLayout::compute(session.is_authenticated(), state.catalog.len());
        let name_width = usize::from(layout.product_grid.columns()) * CHARS_PER_COLUMN;

        let username = session
            .is_authenticated()
            .then(|| session.username().unwrap_or_default());
        let header = HeaderState::resolve(false, username);

        Self {
            header: header_line(&header),
            rule: "-".repeat(name_width + 30),
            loading: state.loading,
            empty: state.show_empty_state(),
            products: state
                .display
                .iter()
                .map(|p| product_row(p, &state.cart, name_width))
                .collect(),
            cart: layout.show_cart_panel.then(|| cart_panel(&state.cart)),
        }
    }
}

/// Header line: logo on the left, session actions on the right.
#[must_use]
pub fn header_line(header: &HeaderState) -> String {
    let actions = match header {
        HeaderState::BackToExplore => format!("[back to explore -> {}]", Page::Products),
        HeaderState::SignedIn { username } => format!("{username}  [logout]"),
        HeaderState::SignedOut => format!(
            "[login -> {}]  [register -> {}]",
            Page::Login,
            Page::Register
        ),
    };
    format!("QKART  |  {actions}")
}

/// One notification as a terminal line.
#[must_use]
pub fn toast_line(notification: &Notification) -> String {
    format!("[{}] {}", notification.severity, notification.message)
}

fn product_row(product: &Product, cart: &[CartItem], name_width: usize) -> ProductRow {
    ProductRow {
        id: product.id.to_string(),
        name: fit(&product.name, name_width),
        cost: product.cost.to_string(),
        stars: stars(product.rating),
        in_cart: is_item_in_cart(cart, &product.id),
    }
}

fn cart_panel(items: &[CartItem]) -> CartPanel {
    let summary = CartSummary::of(items);
    CartPanel {
        lines: items
            .iter()
            .map(|item| CartLineRow {
                id: item.product_id.to_string(),
                name: item.name.clone(),
                qty: item.qty,
                cost: item.cost.to_string(),
                line_cost: item.line_cost().to_string(),
            })
            .collect(),
        total: summary.total_cost.to_string(),
        quantity: summary.total_quantity,
    }
}

/// Pad or truncate `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('~');
        out
    } else {
        format!("{text:<width$}")
    }
}

/// Rating as five stars, rounded to the nearest whole star.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn stars(rating: f64) -> String {
    let filled = (rating.round().clamp(0.0, 5.0) as usize).min(MAX_STARS);
    format!("{}{}", "★".repeat(filled), "☆".repeat(MAX_STARS - filled))
}
