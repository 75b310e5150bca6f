//! Shop listing filters and sort orders.

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Sort order for the shop listing; unknown values fall back to newest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShopSort {
    PriceLow,
    PriceHigh,
    NameAsc,
    NameDesc,
    #[default]
    #[serde(other)]
    Newest,
}

impl ShopSort {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ShopSort::PriceLow => "p.price ASC, p.id",
            ShopSort::PriceHigh => "p.price DESC, p.id",
            ShopSort::NameAsc => "p.name ASC, p.id",
            ShopSort::NameDesc => "p.name DESC, p.id",
            ShopSort::Newest => "p.created_at DESC, p.id DESC",
        }
    }
}

/// A value bound to one shop filter placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Uuid(Uuid),
    Decimal(Decimal),
    Text(String),
}

/// Independent shop filters; every filter that is set narrows the result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopFilter {
    pub category_id: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
}

impl ShopFilter {
    /// SQL conditions (placeholders numbered from `$1`) and their bind values
    pub fn conditions(&self) -> (Vec<String>, Vec<FilterValue>) {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(category_id) = self.category_id {
            values.push(FilterValue::Uuid(category_id));
            conditions.push(format!("p.category_id = ${}", values.len()));
        }

        if let Some(min_price) = self.min_price {
            values.push(FilterValue::Decimal(min_price));
            conditions.push(format!("p.price >= ${}", values.len()));
        }

        if let Some(max_price) = self.max_price {
            values.push(FilterValue::Decimal(max_price));
            conditions.push(format!("p.price <= ${}", values.len()));
        }

        if let Some(search) = &self.search {
            values.push(FilterValue::Text(format!("%{}%", escape_like(search))));
            conditions.push(format!("p.name ILIKE ${} ESCAPE '\\'", values.len()));
        }

        (conditions, values)
    }

    pub fn where_clause(&self) -> (String, Vec<FilterValue>) {
        let (conditions, values) = self.conditions();
        if conditions.is_empty() {
            (String::new(), values)
        } else {
            (format!("WHERE {}", conditions.join(" AND ")), values)
        }
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn price(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_no_filters_no_where() {
        let (clause, values) = ShopFilter::default().where_clause();
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_filters_combine_as_intersection() {
        let category = Uuid::now_v7();
        let by_category = ShopFilter {
            category_id: Some(category),
            ..Default::default()
        };
        let by_price = ShopFilter {
            min_price: Some(price("5")),
            max_price: Some(price("20")),
            ..Default::default()
        };
        let both = ShopFilter {
            category_id: Some(category),
            min_price: Some(price("5")),
            max_price: Some(price("20")),
            ..Default::default()
        };

        let (category_conditions, category_values) = by_category.conditions();
        let (price_conditions, price_values) = by_price.conditions();
        let (both_conditions, both_values) = both.conditions();

        assert_eq!(category_conditions, vec!["p.category_id = $1"]);
        assert_eq!(price_conditions, vec!["p.price >= $1", "p.price <= $2"]);
        assert_eq!(
            both_conditions,
            vec!["p.category_id = $1", "p.price >= $2", "p.price <= $3"]
        );

        let mut union = category_values;
        union.extend(price_values);
        assert_eq!(both_values, union);

        let (clause, _) = both.where_clause();
        assert_eq!(
            clause,
            "WHERE p.category_id = $1 AND p.price >= $2 AND p.price <= $3"
        );
    }

    #[test]
    fn test_filters_are_idempotent() {
        let filter = ShopFilter {
            search: Some("fern".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.conditions(), filter.clone().conditions());
    }

    #[test]
    fn test_search_is_escaped_substring() {
        let filter = ShopFilter {
            search: Some("50%_off".to_string()),
            ..Default::default()
        };
        let (conditions, values) = filter.conditions();

        assert_eq!(conditions, vec!["p.name ILIKE $1 ESCAPE '\\'"]);
        assert_eq!(values, vec![FilterValue::Text("%50\\%\\_off%".to_string())]);
    }

    #[test]
    fn test_sort_parsing_falls_back_to_newest() {
        let sort: ShopSort = serde_json::from_str("\"price_low\"").unwrap();
        assert_eq!(sort, ShopSort::PriceLow);

        let sort: ShopSort = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(sort, ShopSort::Newest);
    }
}
