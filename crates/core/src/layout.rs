//! Session-aware layout of the catalog page.
//!
//! The page is a 12-column grid. The product grid takes all of it unless the
//! user is signed in and there is something to show, in which case the cart
//! panel claims the last quarter.

/// Number of columns in the page grid.
pub const GRID_COLUMNS: u8 = 12;

/// Width of the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridWidth {
    /// All 12 columns.
    Full,
    /// 9 of 12 columns; the cart panel takes the remaining 3.
    ThreeQuarters,
}

impl GridWidth {
    /// Columns occupied by the product grid.
    #[must_use]
    pub const fn columns(self) -> u8 {
        match self {
            Self::Full => GRID_COLUMNS,
            Self::ThreeQuarters => 9,
        }
    }
}

/// Layout decisions for one render of the catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLayout {
    pub product_grid: GridWidth,
    pub show_cart_panel: bool,
}

impl CatalogLayout {
    /// Compute the layout from session state and the size of the catalog
    /// (not the filtered display set).
    #[must_use]
    pub const fn compute(authenticated: bool, catalog_len: usize) -> Self {
        let product_grid = if authenticated && catalog_len > 0 {
            GridWidth::ThreeQuarters
        } else {
            GridWidth::Full
        };

        Self {
            product_grid,
            show_cart_panel: authenticated,
        }
    }
}
