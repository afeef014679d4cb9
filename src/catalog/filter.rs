//! Derived catalog views.
//!
//! The backend returns full collections; search, category filtering,
//! sorting, and pagination are all computed client-side over the fetched
//! list. These helpers are pure so every consumer derives the same view.

use crate::catalog::models::Product;

/// Sort orders offered by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProductSort {
    /// Most recently created first. Products without a creation timestamp
    /// sort last.
    #[default]
    Newest,
    PriceAscending,
    PriceDescending,
    TitleAscending,
}

/// Case-insensitive title search. A blank term matches everything.
#[must_use]
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let term = term.trim().to_lowercase();

    products
        .iter()
        .filter(|product| term.is_empty() || product.title.to_lowercase().contains(&term))
        .collect()
}

/// Products belonging to the given category.
#[must_use]
pub fn by_category<'a>(products: &'a [Product], category_id: u64) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|product| product.category == Some(category_id))
        .collect()
}

/// Stable sort: products that compare equal keep their server-returned
/// order.
#[must_use]
pub fn sorted<'a>(mut products: Vec<&'a Product>, sort: ProductSort) -> Vec<&'a Product> {
    match sort {
        ProductSort::Newest => {
            products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        ProductSort::PriceAscending => {
            products.sort_by(|a, b| a.price.cmp(&b.price));
        }
        ProductSort::PriceDescending => {
            products.sort_by(|a, b| b.price.cmp(&a.price));
        }
        ProductSort::TitleAscending => {
            products.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
    }

    products
}

/// Number of pages needed for `total` items at `per_page` items each.
#[must_use]
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }

    total.div_ceil(per_page)
}

/// The 1-indexed `page` of `items`. Out-of-range pages are empty.
#[must_use]
pub fn page<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }

    let start = (page - 1).saturating_mul(per_page);
    let end = start.saturating_add(per_page).min(items.len());

    items.get(start..end).unwrap_or(&[])
}
