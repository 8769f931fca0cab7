// Order service
// Decision: The ordering user always comes from the session, never from the request body
// Decision: An order without items checks out the user's cart
// Decision: Orders of other users read as not found to non-admins

use std::cmp::Ordering;
use std::sync::Arc;
use storefront_core::{
    listing::{cmp_f64, paginate},
    LineItem, Order, OrderStatus, Page, PaymentStatus, SortOrder,
};
use uuid::Uuid;

use super::{CartService, ProductService, ServiceError, ServiceResult};
use crate::api::common::ListQuery;
use crate::api::orders::CreateOrderRequest;
use crate::storage::{CreateOrderRow, Database};

/// Who is asking. Admins see every order.
#[derive(Debug, Clone, Copy)]
pub struct Requester {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Requester {
    fn can_see(&self, order: &Order) -> bool {
        self.is_admin || order.user_id == self.user_id
    }
}

pub struct OrderService {
    db: Arc<Database>,
    products: Arc<ProductService>,
    carts: Arc<CartService>,
}

impl OrderService {
    pub fn new(db: Arc<Database>, products: Arc<ProductService>, carts: Arc<CartService>) -> Self {
        Self {
            db,
            products,
            carts,
        }
    }

    pub async fn create(&self, user_id: Uuid, req: CreateOrderRequest) -> ServiceResult<Order> {
        if !req.shipping_address.is_complete() {
            return Err(ServiceError::invalid("Shipping address is incomplete"));
        }

        let from_cart = req.items.is_empty();
        let items = if from_cart {
            self.carts.checkout_lines(user_id).await?
        } else {
            let mut items: Vec<LineItem> = Vec::with_capacity(req.items.len());
            for item in &req.items {
                items.push(self.products.price_line(item.product_id, item.quantity).await?);
            }
            items
        };

        if items.is_empty() {
            return Err(ServiceError::invalid("Order has no items"));
        }

        let order = self
            .db
            .create_order(CreateOrderRow {
                user_id,
                items,
                shipping_address: req.shipping_address,
                payment_method: req.payment_method,
            })
            .await?;

        // Only once the order is stored
        if from_cart {
            let ordered: Vec<Uuid> = order.items.iter().map(|i| i.id).collect();
            self.carts.remove_lines(user_id, &ordered).await?;
        }

        tracing::info!(
            order_id = %order.id,
            %user_id,
            total_amount = order.total_amount,
            "Order placed"
        );
        Ok(order)
    }

    pub async fn list(&self, requester: Requester, query: &ListQuery) -> ServiceResult<Page<Order>> {
        let owner = (!requester.is_admin).then_some(requester.user_id);
        let search = query.search();
        let mut orders: Vec<Order> = self
            .db
            .list_orders(owner)
            .await?
            .into_iter()
            .filter(|o| match &search {
                Some(pattern) => pattern.matches_any(o.items.iter().map(|i| i.name.as_str())),
                None => true,
            })
            .collect();

        sort_orders(&mut orders, query.sort_key(), query.sort_order());

        Ok(paginate(orders, query.skip(), query.limit()))
    }

    pub async fn get(&self, id: Uuid, requester: Requester) -> ServiceResult<Order> {
        self.db
            .get_order(id)
            .await?
            .filter(|o| requester.can_see(o))
            .ok_or(ServiceError::NotFound("Order"))
    }

    /// Move an order along its lifecycle. Payment is marked completed once paid.
    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> ServiceResult<Order> {
        let order = self
            .db
            .update_order(id, |order| {
                if !order.status.can_transition_to(status) {
                    return Err(ServiceError::invalid(format!(
                        "Cannot change order status from {} to {}",
                        order.status, status
                    )));
                }
                order.status = status;
                if status == OrderStatus::Paid {
                    order.payment_status = PaymentStatus::Completed;
                }
                Ok(order.clone())
            })
            .await?
            .ok_or(ServiceError::NotFound("Order"))??;

        tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");
        Ok(order)
    }

    /// Cancel an order. Owners may cancel their own; admins any.
    pub async fn cancel(&self, id: Uuid, requester: Requester) -> ServiceResult<Order> {
        self.get(id, requester).await?;
        self.update_status(id, OrderStatus::Canceled).await
    }
}

fn sort_orders(orders: &mut [Order], key: &str, order: SortOrder) {
    let compare: fn(&Order, &Order) -> Ordering = match key {
        "updatedAt" | "updated_at" => |a, b| a.updated_at.cmp(&b.updated_at),
        "totalAmount" | "total_amount" => |a, b| cmp_f64(a.total_amount, b.total_amount),
        _ => |a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
    };
    orders.sort_by(|a, b| order.apply(compare(a, b)));
}
