//! Add Product Comment Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use botica_app::domain::products::models::NewProductComment;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductCommentResponse},
    state::State,
};

/// Add Product Comment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCommentRequest {
    pub author_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub body: String,
}

impl From<AddCommentRequest> for NewProductComment {
    fn from(request: AddCommentRequest) -> Self {
        NewProductComment {
            author_name: request.author_name,
            phone: request.phone,
            body: request.body,
        }
    }
}

/// Add Product Comment Handler
#[endpoint(
    tags("products"),
    summary = "Add Product Comment",
    responses(
        (status_code = StatusCode::CREATED, description = "Comment added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<AddCommentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductCommentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let comment = state
        .app
        .products
        .add_comment(product.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(comment.into()))
}
