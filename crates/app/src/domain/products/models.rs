//! Product Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

pub type ProductUuid = TypedUuid<Product>;
pub type CommentUuid = TypedUuid<ProductComment>;

/// Product Model
///
/// `comments` is only populated on single-product reads; list reads leave
/// it empty.
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub unit_price: u64,
    pub image_url: Option<String>,
    pub discount_percent: u8,
    pub unit: String,
    pub comments: Vec<ProductComment>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Comment left on a product by a shopper.
#[derive(Debug, Clone)]
pub struct ProductComment {
    pub uuid: CommentUuid,
    pub author_name: String,
    pub phone: Option<String>,
    pub body: String,
    pub created_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub unit_price: u64,
    pub image_url: Option<String>,
    pub discount_percent: u8,
    pub unit: String,
}

/// Full-field product update. A `None` image keeps the stored one.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub unit_price: u64,
    pub image_url: Option<String>,
    pub discount_percent: u8,
    pub unit: String,
}

/// New Product Comment Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductComment {
    pub author_name: String,
    pub phone: Option<String>,
    pub body: String,
}

/// Pagination and search parameters for product listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductsQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for ProductsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
        }
    }
}

/// One page of products.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
}
