//! Read-only projection of the product list for the review screen.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use databox_core::DomainError;

use crate::product::Product;

/// Visibility filter.
///
/// `Draft` selects products that are not online, which is not the same thing
/// as `WorkflowStatus::Draft`: a product reset back to draft after going
/// online stays online and is excluded here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    All,
    Online,
    Draft,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::All => "all",
            ViewMode::Online => "online",
            ViewMode::Draft => "draft",
        }
    }

    fn admits(&self, product: &Product) -> bool {
        match self {
            ViewMode::All => true,
            ViewMode::Online => product.is_online(),
            ViewMode::Draft => !product.is_online(),
        }
    }
}

impl FromStr for ViewMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(ViewMode::All),
            "online" => Ok(ViewMode::Online),
            "draft" => Ok(ViewMode::Draft),
            other => Err(DomainError::validation(format!("unknown view mode: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    query: String,
    view: ViewMode,
}

impl ProductFilter {
    pub fn new(query: impl AsRef<str>, view: ViewMode) -> Self {
        Self {
            query: query.as_ref().to_lowercase(),
            view,
        }
    }

    /// Case-insensitive substring match on SKU, raw title or AI title, then the view mode.
    pub fn matches(&self, product: &Product) -> bool {
        self.view.admits(product) && self.matches_query(product)
    }

    fn matches_query(&self, product: &Product) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let hit = |field: &str| field.to_lowercase().contains(&self.query);
        hit(product.sku().as_str())
            || hit(product.raw_title())
            || product.ai_title().is_some_and(hit)
    }

    /// Matching products in input order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

pub fn filter_products<'a>(products: &'a [Product], query: &str, view: ViewMode) -> Vec<&'a Product> {
    ProductFilter::new(query, view).apply(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::EnrichedContent;
    use crate::product::NewProduct;
    use databox_core::{ProductId, Sku};

    fn product(id: &str, sku: &str, title: &str, online: bool) -> Product {
        let mut p = Product::import(
            NewProduct {
                id: ProductId::new(id),
                sku: Sku::new(sku),
                raw_title: title.to_string(),
                raw_description: String::new(),
                buy_price: 1.0,
                sell_price: 2.0,
                stock: 1,
            },
            25.0,
        )
        .unwrap();
        p.is_online = online;
        p
    }

    fn products() -> Vec<Product> {
        vec![
            product("1", "A1", "Red Shoe", true),
            product("2", "B2", "Blue Shoe", false),
            product("3", "C3", "Green Hat", false),
        ]
    }

    fn ids(selected: Vec<&Product>) -> Vec<&str> {
        selected.into_iter().map(|p| p.id().as_str()).collect()
    }

    #[test]
    fn query_and_view_combine() {
        let products = products();
        assert_eq!(ids(filter_products(&products, "shoe", ViewMode::Draft)), vec!["2"]);
        assert_eq!(ids(filter_products(&products, "", ViewMode::Online)), vec!["1"]);
        assert_eq!(ids(filter_products(&products, "SHOE", ViewMode::All)), vec!["1", "2"]);
    }

    #[test]
    fn online_shoes_are_only_the_red_one() {
        let products = vec![
            product("1", "A1", "Red Shoe", true),
            product("2", "B2", "Blue Shoe", false),
        ];

        let selected = filter_products(&products, "shoe", ViewMode::Online);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].sku().as_str(), "A1");
    }

    #[test]
    fn sku_match_is_case_insensitive() {
        let products = products();
        assert_eq!(ids(filter_products(&products, "c3", ViewMode::All)), vec!["3"]);
    }

    #[test]
    fn ai_title_is_searched() {
        let mut products = products();
        let ticket = products[2].begin_enrichment(Some("key")).unwrap();
        products[2].resolve_enrichment(
            &ticket,
            Ok(EnrichedContent {
                title: "Woollen Beanie".into(),
                description: String::new(),
                category: "Hats".into(),
            }),
        );

        assert_eq!(ids(filter_products(&products, "beanie", ViewMode::All)), vec!["3"]);
    }

    #[test]
    fn draft_view_means_offline() {
        let mut products = products();
        products[0].reset_enrichment();
        assert!(products[0].is_online());
        assert!(ids(filter_products(&products, "", ViewMode::Draft)).iter().all(|id| *id != "1"));
    }

    #[test]
    fn view_mode_parses() {
        assert_eq!("Online".parse::<ViewMode>().unwrap(), ViewMode::Online);
        assert_eq!("".parse::<ViewMode>().unwrap(), ViewMode::All);
        assert!("archived".parse::<ViewMode>().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn view() -> impl Strategy<Value = ViewMode> {
            prop_oneof![Just(ViewMode::All), Just(ViewMode::Online), Just(ViewMode::Draft)]
        }

        fn catalog() -> impl Strategy<Value = Vec<Product>> {
            prop::collection::vec(("[A-Z]{2}[0-9]{1,3}", "[a-zA-Z ]{0,16}", any::<bool>()), 0..20)
                .prop_map(|rows| {
                    rows.into_iter()
                        .enumerate()
                        .map(|(i, (sku, title, online))| product(&i.to_string(), &sku, &title, online))
                        .collect()
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

            #[test]
            fn result_is_ordered_subsequence(products in catalog(), query in "[a-zA-Z0-9]{0,3}", view in view()) {
                let selected = filter_products(&products, &query, view);
                let mut cursor = products.iter();
                for p in &selected {
                    prop_assert!(cursor.any(|q| std::ptr::eq(q, *p)));
                }
            }

            #[test]
            fn every_selected_product_matches(products in catalog(), query in "[a-zA-Z0-9]{0,3}", view in view()) {
                let needle = query.to_lowercase();
                for p in filter_products(&products, &query, view) {
                    let text_hit = p.sku().as_str().to_lowercase().contains(&needle)
                        || p.raw_title().to_lowercase().contains(&needle);
                    prop_assert!(text_hit);
                    match view {
                        ViewMode::All => {}
                        ViewMode::Online => prop_assert!(p.is_online()),
                        ViewMode::Draft => prop_assert!(!p.is_online()),
                    }
                }
            }

            #[test]
            fn online_and_draft_partition_all(products in catalog(), query in "[a-z]{0,2}") {
                let all = filter_products(&products, &query, ViewMode::All).len();
                let online = filter_products(&products, &query, ViewMode::Online).len();
                let draft = filter_products(&products, &query, ViewMode::Draft).len();
                prop_assert_eq!(all, online + draft);
            }
        }
    }
}
