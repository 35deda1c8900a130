//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{
            CommentUuid, NewProduct, NewProductComment, Product, ProductComment, ProductPage,
            ProductUpdate, ProductUuid, ProductsQuery,
        },
        repository::PgProductsRepository,
    },
};

const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        query: ProductsQuery,
    ) -> Result<ProductPage, ProductsServiceError> {
        let page = query.page.max(1);
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        let offset = i64::from(page - 1) * i64::from(limit);

        let pattern = query
            .search
            .as_deref()
            .filter(|term| !term.trim().is_empty())
            .map(|term| format!("%{term}%"));

        let mut tx = self.db.begin().await?;

        let total = self
            .repository
            .count_products(&mut tx, pattern.as_deref())
            .await?;

        let products = self
            .repository
            .list_products(&mut tx, pattern.as_deref(), i64::from(limit), offset)
            .await?;

        tx.commit().await?;

        let total_count = u64::try_from(total).unwrap_or(0);
        let total_pages = u32::try_from(total_count.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);

        Ok(ProductPage {
            items: products,
            total_count,
            total_pages,
            current_page: page,
        })
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.repository.get_product(&mut tx, product).await?;

        let comments = self
            .repository
            .get_product_comments(&mut tx, product)
            .await?;

        tx.commit().await?;

        found.comments.extend(comments);

        Ok(found)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        if product.name.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let unit_price = i64::try_from(product.unit_price)?;
        let discount_percent = i16::from(product.discount_percent);

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product(
                &mut tx,
                product.uuid,
                &product.name,
                &product.description,
                unit_price,
                product.image_url.as_deref(),
                discount_percent,
                &product.unit,
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        if update.name.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let unit_price = i64::try_from(update.unit_price)?;
        let discount_percent = i16::from(update.discount_percent);

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update, unit_price, discount_percent)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn add_comment(
        &self,
        product: ProductUuid,
        comment: NewProductComment,
    ) -> Result<ProductComment, ProductsServiceError> {
        if comment.author_name.trim().is_empty() || comment.body.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_product_comment(&mut tx, CommentUuid::new(), product, &comment)
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves one page of products, optionally filtered by a
    /// case-insensitive name search.
    async fn list_products(
        &self,
        query: ProductsQuery,
    ) -> Result<ProductPage, ProductsServiceError>;

    /// Retrieve a single product, including its comments.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Updates a product. Existing cart snapshots are never touched.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Records a shopper comment against a product.
    async fn add_comment(
        &self,
        product: ProductUuid,
        comment: NewProductComment,
    ) -> Result<ProductComment, ProductsServiceError>;
}
