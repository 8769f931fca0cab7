// Storage records and write inputs
//
// Products, carts and orders are stored as their domain types.
// Users get a dedicated row because the password digest must never leave storage.

use chrono::{DateTime, Utc};
use storefront_core::{
    user::full_name, LineItem, PaymentMethod, ProductStatus, Role, ShippingAddress, User,
    UserStatus,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Stored lower-cased
    pub email: String,
    pub password_hash: String,
    pub mobile_number: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub profile_picture: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            full_name: full_name(&self.first_name, &self.last_name),
            email: self.email.clone(),
            mobile_number: self.mobile_number.clone(),
            role: self.role,
            status: self.status,
            profile_picture: self.profile_picture.clone(),
            gender: self.gender.clone(),
            address: self.address.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile_number: Option<String>,
    pub role: Role,
    pub profile_picture: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
    pub mobile_number: Option<String>,
    pub status: Option<UserStatus>,
    pub profile_picture: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProductRow {
    pub product_name: String,
    pub product_description: Option<String>,
    pub image: Option<String>,
    pub original_price: f64,
    pub discount_price: f64,
    pub selling_price: f64,
    pub quantity: u32,
    pub unit_of_measure: u32,
    pub hsn_code: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub image: Option<String>,
    pub original_price: Option<f64>,
    pub discount_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub quantity: Option<u32>,
    pub unit_of_measure: Option<u32>,
    pub hsn_code: Option<String>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderRow {
    pub user_id: Uuid,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}
