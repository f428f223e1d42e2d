//! Catalog view derivation.
//!
//! Turns an in-memory product list plus the shopper's filter, sort and page
//! selections into the slice of products shown on one catalog page. Pure and
//! synchronous; an empty result is not an error.

use std::cmp::Ordering;
use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::types::Product;

/// Products per catalog page.
pub const PAGE_SIZE: usize = 9;

/// Page links shown before the pager collapses into ellipses.
const MAX_VISIBLE_PAGES: u32 = 5;

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Alphabetical by name.
    Name,
}

impl SortKey {
    /// Parse from URL parameter value. Unknown values fall back to `Newest`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-low" | "price_asc" => Self::PriceLow,
            "price-high" | "price_desc" => Self::PriceHigh,
            "name" => Self::Name,
            _ => Self::Newest,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
        }
    }

    /// Label for the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Name => "Name",
        }
    }

    /// All sort keys in dropdown order.
    pub const ALL: [Self; 4] = [Self::Newest, Self::PriceLow, Self::PriceHigh, Self::Name];

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            // Undated documents go last
            Self::Newest => match (a.created_at, b.created_at) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Filter, sort and page selections for a catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Only products whose category equals this value.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Sort order.
    pub sort: SortKey,
    /// 1-based page number.
    pub page: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            sort: SortKey::default(),
            page: 1,
        }
    }
}

impl CatalogQuery {
    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && product.category.as_deref() != Some(category.as_str())
        {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }
}

/// One page of a derived catalog view.
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
    /// Products on the current page, in display order.
    pub items: Vec<&'a Product>,
    /// Current page after clamping (1-based).
    pub page: u32,
    /// `ceil(total_items / PAGE_SIZE)`; zero when nothing matched.
    pub total_pages: u32,
    /// Number of products that passed the filters.
    pub total_items: usize,
}

impl CatalogView<'_> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether no product matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

/// Filter, sort and paginate `products` according to `query`.
///
/// The requested page is clamped into `1..=max(total_pages, 1)`.
#[must_use]
pub fn derive_view<'a>(products: &'a [Product], query: &CatalogQuery) -> CatalogView<'a> {
    let mut matching: Vec<&Product> = products.iter().filter(|p| query.matches(p)).collect();
    matching.sort_by(|a, b| query.sort.compare(a, b));

    let total_items = matching.len();
    let total_pages = u32::try_from(total_items.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX);
    let page = query.page.clamp(1, total_pages.max(1));

    let start = (page as usize - 1).saturating_mul(PAGE_SIZE);
    let items = matching.into_iter().skip(start).take(PAGE_SIZE).collect();

    CatalogView {
        items,
        page,
        total_pages,
        total_items,
    }
}

/// An entry in the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// Link to a numbered page.
    Page(u32),
    /// Collapsed run of pages.
    Ellipsis,
}

/// Compute pager entries for `current` out of `total` pages.
///
/// Shows every page up to five; past that, the first and last pages stay
/// visible with the neighbourhood of the current page between ellipses.
#[must_use]
pub fn page_links(current: u32, total: u32) -> Vec<PageLink> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageLink::Page).collect();
    }

    let mut links = Vec::with_capacity(7);
    if current <= 3 {
        links.extend((1..=4).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total));
    } else if current >= total - 2 {
        links.push(PageLink::Page(1));
        links.push(PageLink::Ellipsis);
        links.extend((total - 3..=total).map(PageLink::Page));
    } else {
        links.push(PageLink::Page(1));
        links.push(PageLink::Ellipsis);
        links.extend((current - 1..=current + 1).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total));
    }
    links
}

/// Unique non-empty categories in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter_map(|p| p.category.as_deref())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(*c))
        .map(str::to_owned)
        .collect()
}

/// Lowest and highest price in the list, `None` when empty.
#[must_use]
pub fn price_bounds(products: &[Product]) -> Option<(Decimal, Decimal)> {
    let min = products.iter().map(|p| p.price).min()?;
    let max = products.iter().map(|p| p.price).max()?;
    Some((min, max))
}

/// Products highlighted in the featured strip: list positions 1 through 4.
#[must_use]
pub fn featured(products: &[Product]) -> &[Product] {
    products.get(1..products.len().min(5)).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn product(id: u32, price: i64, category: Option<&str>) -> Product {
        Product {
            id: format!("p{id}"),
            created_at: Some(Utc.timestamp_opt(1_700_000_000 + i64::from(id), 0).unwrap()),
            name: format!("Product {id:02}"),
            slug: format!("product-{id}"),
            price: Decimal::new(price, 0),
            category: category.map(String::from),
            shop_name: None,
            shop: None,
            image_url: None,
            description: None,
            in_stock: true,
            stock_quantity: None,
        }
    }

    fn catalog(n: u32) -> Vec<Product> {
        (1..=n)
            .map(|i| {
                let category = if i % 2 == 0 { "Home" } else { "Apparel" };
                product(i, i64::from((i * 37) % 101), Some(category))
            })
            .collect()
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("price-low"), SortKey::PriceLow);
        assert_eq!(SortKey::parse("price-high"), SortKey::PriceHigh);
        assert_eq!(SortKey::parse("name"), SortKey::Name);
        assert_eq!(SortKey::parse("newest"), SortKey::Newest);
        assert_eq!(SortKey::parse("bogus"), SortKey::Newest);
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), key);
        }
    }

    #[test]
    fn test_category_filter_selects_exact_subset() {
        let products = catalog(20);
        let query = CatalogQuery {
            category: Some("Home".to_string()),
            page: 1,
            ..CatalogQuery::default()
        };
        let view = derive_view(&products, &query);

        let expected = products
            .iter()
            .filter(|p| p.category.as_deref() == Some("Home"))
            .count();
        assert_eq!(view.total_items, expected);
        assert!(view.items.iter().all(|p| p.category.as_deref() == Some("Home")));
    }

    #[test]
    fn test_price_interval_is_inclusive() {
        let products = vec![
            product(1, 10, None),
            product(2, 20, None),
            product(3, 30, None),
        ];
        let query = CatalogQuery {
            min_price: Some(Decimal::new(10, 0)),
            max_price: Some(Decimal::new(20, 0)),
            ..CatalogQuery::default()
        };
        let view = derive_view(&products, &query);
        let ids: Vec<_> = view.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn test_price_low_is_non_decreasing() {
        let products = catalog(30);
        let query = CatalogQuery {
            sort: SortKey::PriceLow,
            ..CatalogQuery::default()
        };
        let mut all = Vec::new();
        for page in 1..=4 {
            let view = derive_view(&products, &CatalogQuery { page, ..query.clone() });
            all.extend(view.items.iter().map(|p| p.price));
        }
        assert_eq!(all.len(), 30);
        assert!(all.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_price_high_is_non_increasing() {
        let products = catalog(30);
        let view = derive_view(
            &products,
            &CatalogQuery {
                sort: SortKey::PriceHigh,
                ..CatalogQuery::default()
            },
        );
        assert!(view.items.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let mut products = vec![product(1, 1, None), product(2, 1, None), product(3, 1, None)];
        products[0].name = "banana".to_string();
        products[1].name = "Apple".to_string();
        products[2].name = "cherry".to_string();

        let view = derive_view(
            &products,
            &CatalogQuery {
                sort: SortKey::Name,
                ..CatalogQuery::default()
            },
        );
        let names: Vec<_> = view.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_newest_puts_undated_last() {
        let mut products = vec![product(1, 1, None), product(2, 1, None), product(3, 1, None)];
        products[1].created_at = None;

        let view = derive_view(&products, &CatalogQuery::default());
        let ids: Vec<_> = view.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn test_pagination_page_counts() {
        for n in [0_u32, 1, 8, 9, 10, 18, 19, 27, 100] {
            let products = catalog(n);
            let first = derive_view(&products, &CatalogQuery::default());
            let expected_pages = (n as usize).div_ceil(PAGE_SIZE);
            assert_eq!(first.total_pages as usize, expected_pages, "n = {n}");

            for page in 1..=first.total_pages {
                let view = derive_view(&products, &CatalogQuery { page, ..CatalogQuery::default() });
                if page < first.total_pages {
                    assert_eq!(view.items.len(), PAGE_SIZE);
                } else {
                    let rest = n as usize - PAGE_SIZE * (expected_pages - 1);
                    assert_eq!(view.items.len(), rest);
                }
            }
        }
    }

    #[test]
    fn test_page_is_clamped() {
        let products = catalog(10);
        let past_end = derive_view(&products, &CatalogQuery { page: 99, ..CatalogQuery::default() });
        assert_eq!(past_end.page, 2);
        assert_eq!(past_end.items.len(), 1);
        assert!(past_end.has_previous());
        assert!(!past_end.has_next());

        let zero = derive_view(&products, &CatalogQuery { page: 0, ..CatalogQuery::default() });
        assert_eq!(zero.page, 1);
        assert!(zero.has_next());
    }

    #[test]
    fn test_empty_catalog() {
        let view = derive_view(&[], &CatalogQuery::default());
        assert!(view.is_empty());
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 0);
        assert!(!view.has_next());
    }

    #[test]
    fn test_page_links_small() {
        assert!(page_links(1, 0).is_empty());
        assert_eq!(
            page_links(2, 3),
            vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]
        );
    }

    #[test]
    fn test_page_links_near_start() {
        use PageLink::{Ellipsis, Page};
        assert_eq!(
            page_links(2, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_page_links_near_end() {
        use PageLink::{Ellipsis, Page};
        assert_eq!(
            page_links(9, 10),
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_page_links_middle() {
        use PageLink::{Ellipsis, Page};
        assert_eq!(
            page_links(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_categories_unique_in_order() {
        let products = vec![
            product(1, 1, Some("Home")),
            product(2, 1, None),
            product(3, 1, Some("Apparel")),
            product(4, 1, Some("Home")),
            product(5, 1, Some("")),
        ];
        assert_eq!(categories(&products), vec!["Home", "Apparel"]);
    }

    #[test]
    fn test_price_bounds() {
        assert_eq!(price_bounds(&[]), None);
        let products = vec![product(1, 30, None), product(2, 5, None), product(3, 12, None)];
        assert_eq!(
            price_bounds(&products),
            Some((Decimal::new(5, 0), Decimal::new(30, 0)))
        );
    }

    #[test]
    fn test_featured_skips_first_and_caps_at_four() {
        let products = catalog(10);
        let ids: Vec<_> = featured(&products).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3", "p4", "p5"]);

        assert!(featured(&catalog(1)).is_empty());
        assert!(featured(&[]).is_empty());
        assert_eq!(featured(&catalog(3)).len(), 2);
    }
}
