//! Data models for product records returned by the catalog API

use serde::Deserialize;

/// A product listing as returned by the remote catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    // Some categories (groceries) ship without a brand
    #[serde(default)]
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u64,
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Response envelope of both the paginated and the search endpoints
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "products": [
            {
                "id": 1,
                "title": "Essence Mascara Lash Princess",
                "description": "Popular mascara",
                "category": "beauty",
                "price": 9.99,
                "discountPercentage": 7.17,
                "rating": 4.94,
                "stock": 5,
                "tags": ["beauty", "mascara"],
                "brand": "Essence",
                "sku": "RCH45Q1A",
                "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/1/thumbnail.png",
                "images": ["https://cdn.dummyjson.com/products/images/beauty/1/1.png"]
            },
            {
                "id": 16,
                "title": "Apple",
                "description": "Fresh and crisp apples",
                "category": "groceries",
                "price": 1.99,
                "discountPercentage": 1.97,
                "rating": 2.96,
                "stock": 9,
                "thumbnail": "https://cdn.dummyjson.com/products/images/groceries/Apple/thumbnail.png"
            }
        ],
        "total": 194,
        "skip": 0,
        "limit": 2
    }"#;

    #[test]
    fn parses_page_and_ignores_unknown_fields() {
        let response: ProductsResponse = serde_json::from_str(PAGE).unwrap();

        assert_eq!(response.products.len(), 2);
        let mascara = &response.products[0];
        assert_eq!(mascara.id, 1);
        assert_eq!(mascara.brand, "Essence");
        assert!((mascara.discount_percentage - 7.17).abs() < f64::EPSILON);
        assert_eq!(mascara.images.len(), 1);
    }

    #[test]
    fn missing_brand_and_images_default_to_empty() {
        let response: ProductsResponse = serde_json::from_str(PAGE).unwrap();

        let apple = &response.products[1];
        assert_eq!(apple.brand, "");
        assert!(apple.images.is_empty());
    }

    #[test]
    fn body_without_products_is_rejected() {
        let result = serde_json::from_str::<ProductsResponse>(r#"{"message": "not found"}"#);
        assert!(result.is_err());
    }
}
