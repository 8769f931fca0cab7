// In-memory storage
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// Everything lives in HashMaps behind RwLocks and is lost on restart.
// Methods stay async so handlers and services read the same way a networked
// store would be called.

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use storefront_core::{total_amount, Cart, Order, OrderStatus, PaymentStatus, Product};
use uuid::Uuid;

use super::models::*;
use super::StoreError;

#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<Uuid, UserRow>>,
    products: RwLock<HashMap<Uuid, Product>>,
    // Keyed by owner, one cart per user
    carts: RwLock<HashMap<Uuid, Cart>>,
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Users
    // ============================================

    /// Insert a user. Fails with `StoreError::DuplicateEmail` if the email is taken.
    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let email = input.email.to_lowercase();
        let mut users = self.users.write();
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email).into());
        }

        let now = Self::now();
        let id = Uuid::now_v7();
        let row = UserRow {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email,
            password_hash: input.password_hash,
            mobile_number: input.mobile_number,
            role: input.role,
            status: Default::default(),
            profile_picture: input.profile_picture,
            gender: input.gender,
            address: input.address,
            state: input.state,
            country: input.country,
            city: input.city,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, row.clone());
        Ok(row)
    }

    /// Case-insensitive lookup.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.users.read().get(&id).cloned())
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> Result<Option<UserRow>> {
        let mut users = self.users.write();
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }
        if let Some(password_hash) = input.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(status) = input.status {
            user.status = status;
        }
        if input.mobile_number.is_some() {
            user.mobile_number = input.mobile_number;
        }
        if input.profile_picture.is_some() {
            user.profile_picture = input.profile_picture;
        }
        if input.gender.is_some() {
            user.gender = input.gender;
        }
        if input.address.is_some() {
            user.address = input.address;
        }
        if input.state.is_some() {
            user.state = input.state;
        }
        if input.country.is_some() {
            user.country = input.country;
        }
        if input.city.is_some() {
            user.city = input.city;
        }
        user.updated_at = Self::now();
        Ok(Some(user.clone()))
    }

    /// All users, unordered. Filtering and sorting happen in the service layer.
    pub async fn list_users(&self) -> Result<Vec<UserRow>> {
        Ok(self.users.read().values().cloned().collect())
    }

    // ============================================
    // Products
    // ============================================

    pub async fn create_product(&self, input: CreateProductRow) -> Result<Product> {
        let now = Self::now();
        let product = Product {
            id: Uuid::now_v7(),
            product_name: input.product_name,
            product_description: input.product_description,
            image: input.image,
            original_price: input.original_price,
            discount_price: input.discount_price,
            selling_price: input.selling_price,
            quantity: input.quantity,
            unit_of_measure: input.unit_of_measure,
            hsn_code: input.hsn_code,
            status: Default::default(),
            created_at: now,
            updated_at: now,
        };
        self.products.write().insert(product.id, product.clone());
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.read().get(&id).cloned())
    }

    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> Result<Option<Product>> {
        let mut products = self.products.write();
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(product_name) = input.product_name {
            product.product_name = product_name;
        }
        if input.product_description.is_some() {
            product.product_description = input.product_description;
        }
        if input.image.is_some() {
            product.image = input.image;
        }
        if let Some(price) = input.original_price {
            product.original_price = price;
        }
        if let Some(price) = input.discount_price {
            product.discount_price = price;
        }
        if let Some(price) = input.selling_price {
            product.selling_price = price;
        }
        if let Some(quantity) = input.quantity {
            product.quantity = quantity;
        }
        if let Some(unit) = input.unit_of_measure {
            product.unit_of_measure = unit;
        }
        if input.hsn_code.is_some() {
            product.hsn_code = input.hsn_code;
        }
        if let Some(status) = input.status {
            product.status = status;
        }
        product.updated_at = Self::now();
        Ok(Some(product.clone()))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().values().cloned().collect())
    }

    // ============================================
    // Carts
    // ============================================

    pub async fn get_cart(&self, user_id: Uuid) -> Result<Option<Cart>> {
        Ok(self.carts.read().get(&user_id).cloned())
    }

    /// Run `f` against the user's cart under the write lock, creating an empty
    /// cart first if the user has none.
    pub async fn update_cart<R>(&self, user_id: Uuid, f: impl FnOnce(&mut Cart) -> R) -> Result<R> {
        let mut carts = self.carts.write();
        let cart = carts
            .entry(user_id)
            .or_insert_with(|| Cart::empty(Uuid::now_v7(), user_id, Self::now()));
        let result = f(cart);
        cart.updated_at = Self::now();
        Ok(result)
    }

    // ============================================
    // Orders
    // ============================================

    pub async fn create_order(&self, input: CreateOrderRow) -> Result<Order> {
        let now = Self::now();
        let order = Order {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            total_amount: total_amount(&input.items),
            items: input.items,
            status: OrderStatus::Pending,
            shipping_address: input.shipping_address,
            payment_method: input.payment_method,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.orders.write().insert(order.id, order.clone());
        Ok(order)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.orders.read().get(&id).cloned())
    }

    /// Orders of one user, or every order when `user_id` is `None`.
    pub async fn list_orders(&self, user_id: Option<Uuid>) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .values()
            .filter(|o| user_id.map_or(true, |uid| o.user_id == uid))
            .cloned()
            .collect())
    }

    /// Run `f` against an order under the write lock.
    /// Returns `None` if the order does not exist.
    pub async fn update_order<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Order) -> R,
    ) -> Result<Option<R>> {
        let mut orders = self.orders.write();
        let Some(order) = orders.get_mut(&id) else {
            return Ok(None);
        };
        let result = f(order);
        order.updated_at = Self::now();
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{LineItem, PaymentMethod, Role, ShippingAddress};

    fn user_input(email: &str) -> CreateUserRow {
        CreateUserRow {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
            mobile_number: None,
            role: Role::Customer,
            profile_picture: None,
            gender: None,
            address: None,
            state: None,
            country: None,
            city: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("John@Example.com")).await.unwrap();
        assert_eq!(user.email, "john@example.com");

        let err = db
            .create_user(user_input("john@example.COM"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::DuplicateEmail(_))
        ));

        let found = db.get_user_by_email("JOHN@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let db = InMemoryDatabase::new();
        let user = db.create_user(user_input("a@b.c")).await.unwrap();

        let updated = db
            .update_user(
                user.id,
                UpdateUser {
                    city: Some("Paris".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.city.as_deref(), Some("Paris"));
        assert_eq!(updated.first_name, "John");

        assert!(db
            .update_user(Uuid::now_v7(), UpdateUser::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_cart_creates_on_first_use() {
        let db = InMemoryDatabase::new();
        let user_id = Uuid::now_v7();
        assert!(db.get_cart(user_id).await.unwrap().is_none());

        let count = db
            .update_cart(user_id, |cart| {
                cart.add_item(LineItem {
                    id: Uuid::now_v7(),
                    product_id: Uuid::now_v7(),
                    name: "Mug".to_string(),
                    price: 7.5,
                    quantity: 2,
                });
                cart.items.len()
            })
            .await
            .unwrap();
        assert_eq!(count, 1);

        let cart = db.get_cart(user_id).await.unwrap().unwrap();
        assert_eq!(cart.user_id, user_id);
        assert_eq!(cart.total_amount, 15.0);
    }

    #[tokio::test]
    async fn test_orders_filtered_by_user() {
        let db = InMemoryDatabase::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        let address = ShippingAddress {
            street: "1 Main St".into(),
            city: "Springfield".into(),
            zip_code: "12345".into(),
            country: "US".into(),
        };

        for user_id in [alice, alice, bob] {
            db.create_order(CreateOrderRow {
                user_id,
                items: vec![],
                shipping_address: address.clone(),
                payment_method: PaymentMethod::Paypal,
            })
            .await
            .unwrap();
        }

        assert_eq!(db.list_orders(Some(alice)).await.unwrap().len(), 2);
        assert_eq!(db.list_orders(Some(bob)).await.unwrap().len(), 1);
        assert_eq!(db.list_orders(None).await.unwrap().len(), 3);
    }
}
