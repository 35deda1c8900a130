//! Get Product Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use botica_app::domain::products::models::{Product, ProductComment};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Longer description shown on the product page
    pub description: String,

    /// The price of the product in minor currency units
    pub unit_price: u64,

    /// URL of the product image, if one has been set
    pub image_url: Option<String>,

    /// Discount applied at display time, in percent
    pub discount_percent: u8,

    /// Display unit, e.g. "box" or "bottle"
    pub unit: String,

    /// Shopper comments; only populated on single-product reads
    pub comments: Vec<ProductCommentResponse>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            description: product.description,
            unit_price: product.unit_price,
            image_url: product.image_url,
            discount_percent: product.discount_percent,
            unit: product.unit,
            comments: product
                .comments
                .into_iter()
                .map(ProductCommentResponse::from)
                .collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Product Comment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductCommentResponse {
    /// The unique identifier of the comment
    pub uuid: Uuid,

    /// Name the commenter signed with
    pub author_name: String,

    /// Contact phone number, if the commenter left one
    pub phone: Option<String>,

    /// Comment text
    pub body: String,

    /// The date and time the comment was created
    pub created_at: String,
}

impl From<ProductComment> for ProductCommentResponse {
    fn from(comment: ProductComment) -> Self {
        Self {
            uuid: comment.uuid.into(),
            author_name: comment.author_name,
            phone: comment.phone,
            body: comment.body,
            created_at: comment.created_at.to_string(),
        }
    }
}

/// Get Product Handler
///
/// Returns a product together with its comments.
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use botica_app::domain::products::{
        MockProductsService, ProductsServiceError, models::ProductUuid,
    };

    use crate::test_helpers::{make_comment, make_product, products_service};

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products/{product}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_product_with_comments() -> TestResult {
        let uuid = ProductUuid::new();

        let mut product = make_product(uuid);

        product.comments.push(make_comment("Worked well"));

        let mut repo = MockProductsService::new();

        repo.expect_get_product()
            .once()
            .withf(move |p| *p == uuid)
            .return_once(move |_| Ok(product));

        repo.expect_list_products().never();
        repo.expect_create_product().never();
        repo.expect_update_product().never();
        repo.expect_delete_product().never();
        repo.expect_add_comment().never();

        let response: ProductResponse = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert_eq!(response.comments.len(), 1);
        assert_eq!(response.comments[0].body, "Worked well");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut repo = MockProductsService::new();

        repo.expect_get_product()
            .once()
            .withf(move |p| *p == uuid)
            .return_once(|_| Err(ProductsServiceError::NotFound));

        repo.expect_list_products().never();
        repo.expect_create_product().never();
        repo.expect_update_product().never();
        repo.expect_delete_product().never();
        repo.expect_add_comment().never();

        let res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_invalid_uuid_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_get_product().never();
        repo.expect_list_products().never();
        repo.expect_create_product().never();
        repo.expect_update_product().never();
        repo.expect_delete_product().never();
        repo.expect_add_comment().never();

        let res = TestClient::get("http://example.com/products/123")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
