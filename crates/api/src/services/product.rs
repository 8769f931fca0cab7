// Product service: catalog management and line pricing
// Decision: Deleting a product marks it DELETED; placed orders keep their lines
// Decision: Only ACTIVE products can be carted or checked out
// Decision: Stock is checked when pricing a line but never decremented

use std::cmp::Ordering;
use std::sync::Arc;
use storefront_core::{
    listing::{cmp_f64, paginate},
    LineItem, Page, Product, ProductStatus, SortOrder,
};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::api::common::ListQuery;
use crate::api::validation::MAX_LINE_QUANTITY;
use crate::api::products::{CreateProductRequest, UpdateProductRequest};
use crate::storage::{CreateProductRow, Database, UpdateProduct};

pub struct ProductService {
    db: Arc<Database>,
}

impl ProductService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateProductRequest) -> ServiceResult<Product> {
        let input = CreateProductRow {
            product_name: req.product_name.trim().to_string(),
            product_description: req.product_description,
            image: req.image,
            original_price: req.original_price,
            discount_price: req.discount_price,
            selling_price: req.selling_price,
            quantity: req.quantity,
            unit_of_measure: req.unit_of_measure,
            hsn_code: req.hsn_code,
        };
        let product = self.db.create_product(input).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Catalog listing. Only ACTIVE products unless `include_inactive`.
    pub async fn list(&self, query: &ListQuery, include_inactive: bool) -> ServiceResult<Page<Product>> {
        let search = query.search();
        let mut products: Vec<Product> = self
            .db
            .list_products()
            .await?
            .into_iter()
            .filter(|p| include_inactive || p.is_purchasable())
            .filter(|p| match &search {
                Some(pattern) => pattern.matches_any([
                    p.product_name.as_str(),
                    p.product_description.as_deref().unwrap_or(""),
                ]),
                None => true,
            })
            .collect();

        sort_products(&mut products, query.sort_key(), query.sort_order());

        Ok(paginate(products, query.skip(), query.limit()))
    }

    pub async fn get(&self, id: Uuid, include_inactive: bool) -> ServiceResult<Product> {
        self.db
            .get_product(id)
            .await?
            .filter(|p| include_inactive || p.is_purchasable())
            .ok_or(ServiceError::NotFound("Product"))
    }

    pub async fn update(&self, id: Uuid, req: UpdateProductRequest) -> ServiceResult<Product> {
        let input = UpdateProduct {
            product_name: req.product_name.map(|s| s.trim().to_string()),
            product_description: req.product_description,
            image: req.image,
            original_price: req.original_price,
            discount_price: req.discount_price,
            selling_price: req.selling_price,
            quantity: req.quantity,
            unit_of_measure: req.unit_of_measure,
            hsn_code: req.hsn_code,
            status: req.status,
        };
        self.db
            .update_product(id, input)
            .await?
            .ok_or(ServiceError::NotFound("Product"))
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<Product> {
        let input = UpdateProduct {
            status: Some(ProductStatus::Deleted),
            ..Default::default()
        };
        let product = self
            .db
            .update_product(id, input)
            .await?
            .ok_or(ServiceError::NotFound("Product"))?;
        tracing::info!(product_id = %product.id, "Product deleted");
        Ok(product)
    }

    /// Price `quantity` units of a product at its current selling price.
    pub async fn price_line(&self, product_id: Uuid, quantity: u32) -> ServiceResult<LineItem> {
        let product = self.get(product_id, false).await?;
        Self::line_for(&product, quantity)
    }

    /// Price units of an already loaded product, checking them against the line limit.
    pub fn line_for(product: &Product, quantity: u32) -> ServiceResult<LineItem> {
        Self::check_line_quantity(product, quantity)?;
        Ok(LineItem {
            id: Uuid::now_v7(),
            product_id: product.id,
            name: product.product_name.clone(),
            price: product.selling_price,
            quantity,
        })
    }

    /// A line may hold no more than the product's stock, nor more than `MAX_LINE_QUANTITY`.
    pub fn check_line_quantity(product: &Product, quantity: u32) -> ServiceResult<()> {
        if quantity > product.quantity {
            return Err(ServiceError::invalid(format!(
                "Insufficient stock for {}",
                product.product_name
            )));
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(ServiceError::invalid(format!(
                "Quantity must be at most {}",
                MAX_LINE_QUANTITY
            )));
        }
        Ok(())
    }
}

fn sort_products(products: &mut [Product], key: &str, order: SortOrder) {
    let compare: fn(&Product, &Product) -> Ordering = match key {
        "updatedAt" | "updated_at" => |a, b| a.updated_at.cmp(&b.updated_at),
        "productName" | "product_name" => |a, b| a.product_name.cmp(&b.product_name),
        "sellingPrice" | "selling_price" => |a, b| cmp_f64(a.selling_price, b.selling_price),
        "quantity" => |a, b| a.quantity.cmp(&b.quantity),
        _ => |a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
    };
    products.sort_by(|a, b| order.apply(compare(a, b)));
}
