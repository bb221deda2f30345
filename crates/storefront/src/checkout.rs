//! Checkout form validation and order submission.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shophub_core::{Address, CustomerContact, Email, Order, OrderId};
use thiserror::Error;

use crate::cart_store::CartStore;
use crate::orders::OrderBook;
use crate::storage::StorageError;

/// Country used when the form leaves it blank.
pub const DEFAULT_COUNTRY: &str = "US";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}-?[0-9]{3}-?[0-9]{4}$").expect("Invalid regex"));

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("Invalid regex"));

const REQUIRED: &str = "This field is required";
const INVALID_EMAIL: &str = "Please enter a valid email address";
const INVALID_PHONE: &str = "Please enter a valid phone number (e.g., 123-456-7890)";
const INVALID_ZIP: &str = "Please enter a valid 5-digit ZIP code";

/// Raw checkout form as submitted by the client.
///
/// Missing fields deserialize as empty strings so they are reported as
/// field errors rather than rejected wholesale.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: Option<String>,
}

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    /// Names of the failing fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Checkout failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// One or more form fields failed validation.
    #[error("Invalid fields: {0}")]
    Invalid(FieldErrors),

    /// The order could not be persisted. The cart is unchanged.
    #[error("Failed to save order: {0}")]
    Storage(#[from] StorageError),
}

/// Validate a checkout form, reporting every failing field.
///
/// # Errors
///
/// Returns the [`FieldErrors`] when any field is missing or malformed.
pub fn validate(form: &CheckoutForm) -> Result<CustomerContact, FieldErrors> {
    let mut errors = FieldErrors::default();

    let mut required = |field: &'static str, value: &str| {
        let value = value.trim();
        if value.is_empty() {
            errors.insert(field, REQUIRED);
        }
        value.to_string()
    };
    let full_name = required("full_name", &form.full_name);
    let street = required("street", &form.street);
    let city = required("city", &form.city);
    let state = required("state", &form.state);
    let email = required("email", &form.email);
    let phone = required("phone", &form.phone);
    let zip = required("zip", &form.zip);

    let parsed_email = if email.is_empty() {
        None
    } else if EMAIL_RE.is_match(&email) {
        Email::parse(&email).ok()
    } else {
        None
    };
    if !email.is_empty() && parsed_email.is_none() {
        errors.insert("email", INVALID_EMAIL);
    }
    if !phone.is_empty() && !PHONE_RE.is_match(&phone) {
        errors.insert("phone", INVALID_PHONE);
    }
    if !zip.is_empty() && !ZIP_RE.is_match(&zip) {
        errors.insert("zip", INVALID_ZIP);
    }

    let country = form
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_COUNTRY)
        .to_string();

    match parsed_email {
        Some(email) if errors.is_empty() => Ok(CustomerContact {
            full_name,
            email,
            phone,
            address: Address {
                street,
                city,
                state,
                zip,
                country,
            },
        }),
        _ => Err(errors),
    }
}

/// Generate an order id: `ORD-<unix millis>-<9 uppercase alphanumerics>`.
///
/// Not collision-proof.
pub fn generate_order_id(now: DateTime<Utc>, rng: &mut impl Rng) -> OrderId {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let suffix: String = (0..9)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET.get(idx).copied().map_or('0', char::from)
        })
        .collect();
    OrderId::new(format!("ORD-{}-{suffix}", now.timestamp_millis()))
}

/// Turn the current cart into an order.
///
/// The cart must be non-empty and the form valid. The order is appended to
/// `orders` before the cart is cleared, so a storage failure leaves the cart
/// intact.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] before looking at the form,
/// [`CheckoutError::Invalid`] with every failing field, or
/// [`CheckoutError::Storage`] if the order list cannot be written.
pub fn submit(
    cart_store: &mut CartStore,
    orders: &OrderBook,
    form: &CheckoutForm,
) -> Result<OrderId, CheckoutError> {
    let cart = cart_store.get_cart();
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let customer = validate(form).map_err(CheckoutError::Invalid)?;

    let now = Utc::now();
    let order = Order::snapshot(
        generate_order_id(now, &mut rand::rng()),
        now,
        customer,
        &cart,
        cart_store.catalog(),
        cart_store.policy(),
    );
    orders.append(&order)?;
    cart_store.clear();

    tracing::info!(
        order_id = %order.id(),
        items = order.item_count(),
        total = %order.totals().total,
        "Order placed"
    );
    Ok(order.id().clone())
}
