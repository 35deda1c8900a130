//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use botica_app::domain::products::models::ProductsQuery;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

/// One page of products.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsPageResponse {
    /// The products on this page
    pub items: Vec<ProductResponse>,

    /// Total number of products matching the query
    pub total_count: u64,

    /// Total number of pages at the requested page size
    pub total_pages: u32,

    /// The page this response covers (1-based)
    pub current_page: u32,
}

/// Product Index Handler
///
/// Returns one page of the catalog, optionally filtered by a
/// case-insensitive name search.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    search: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = ProductsQuery {
        page: page.into_inner().unwrap_or(1),
        limit: limit.into_inner().unwrap_or(20),
        search: search.into_inner(),
    };

    let page = state
        .app
        .products
        .list_products(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsPageResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        total_count: page.total_count,
        total_pages: page.total_pages,
        current_page: page.current_page,
    }))
}
