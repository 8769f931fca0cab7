// Cart service
// Decision: One cart per user, created lazily on first access
// Decision: Lines are priced when added; later catalog price changes do not reprice them

use std::sync::Arc;
use storefront_core::{Cart, LineItem};
use uuid::Uuid;

use super::{ProductService, ServiceError, ServiceResult};
use crate::storage::Database;

pub struct CartService {
    db: Arc<Database>,
    products: Arc<ProductService>,
}

impl CartService {
    pub fn new(db: Arc<Database>, products: Arc<ProductService>) -> Self {
        Self { db, products }
    }

    pub async fn get(&self, user_id: Uuid) -> ServiceResult<Cart> {
        Ok(self.db.update_cart(user_id, |cart| cart.clone()).await?)
    }

    /// Add units of a product. Returns the cart and the (possibly merged) line.
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> ServiceResult<(Cart, LineItem)> {
        let product = self.products.get(product_id, false).await?;
        let line = ProductService::line_for(&product, quantity)?;

        // Bound the merged line, not just the units being added
        let (cart, line) = self
            .db
            .update_cart(user_id, |cart: &mut Cart| -> ServiceResult<(Cart, LineItem)> {
                let merged = cart
                    .quantity_after_add(product_id, quantity)
                    .ok_or_else(|| ServiceError::invalid("Quantity is too large"))?;
                ProductService::check_line_quantity(&product, merged)?;
                let line = cart.add_item(line).clone();
                Ok((cart.clone(), line))
            })
            .await??;
        tracing::debug!(%user_id, %product_id, quantity, "Item added to cart");
        Ok((cart, line))
    }

    pub async fn get_item(&self, user_id: Uuid, item_id: Uuid) -> ServiceResult<LineItem> {
        let cart = self.get(user_id).await?;
        cart.item(item_id)
            .cloned()
            .ok_or(ServiceError::NotFound("Cart item"))
    }

    pub async fn update_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: u32,
    ) -> ServiceResult<Cart> {
        let line = self.get_item(user_id, item_id).await?;
        let product = self.products.get(line.product_id, false).await?;
        ProductService::check_line_quantity(&product, quantity)?;

        self.db
            .update_cart(user_id, |cart| {
                cart.set_quantity(item_id, quantity).then(|| cart.clone())
            })
            .await?
            .ok_or(ServiceError::NotFound("Cart item"))
    }

    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> ServiceResult<Cart> {
        self.db
            .update_cart(user_id, |cart| cart.remove_item(item_id).then(|| cart.clone()))
            .await?
            .ok_or(ServiceError::NotFound("Cart item"))
    }

    /// Lines ready for checkout. Every product must still be on sale with enough stock.
    /// The cart itself is left untouched.
    pub async fn checkout_lines(&self, user_id: Uuid) -> ServiceResult<Vec<LineItem>> {
        let cart = self.get(user_id).await?;
        for line in &cart.items {
            let product = match self.products.get(line.product_id, false).await {
                Ok(product) => product,
                Err(ServiceError::NotFound(_)) => {
                    return Err(ServiceError::invalid(format!(
                        "{} is no longer available",
                        line.name
                    )))
                }
                Err(e) => return Err(e),
            };
            ProductService::check_line_quantity(&product, line.quantity)?;
        }
        Ok(cart.items)
    }

    /// Drop lines that have been ordered. Lines added since checkout began stay.
    pub async fn remove_lines(&self, user_id: Uuid, line_ids: &[Uuid]) -> ServiceResult<Cart> {
        Ok(self
            .db
            .update_cart(user_id, |cart| {
                for id in line_ids {
                    cart.remove_item(*id);
                }
                cart.clone()
            })
            .await?)
    }
}
