use chrono::Utc;
use storefront_types::domain::order::{Order, OrderStatus, ShippingAddress};
use storefront_types::ports::key_value_store::KeyValueStore;
use tracing::debug;

use crate::application::order_store::OrderStore;
use crate::errors::CheckoutError;

/// Payment method recorded on orders that complete through the external
/// payment link.
pub const PAYMENT_METHOD_LINK: &str = "Payment Link";

/// The query parameters the payment service appends when redirecting back
/// into the storefront.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReturn {
    pub order_no: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub link_code: Option<String>,
}

impl PaymentReturn {
    /// Builds from already-decoded query pairs (`orderNo`, `amount`,
    /// `description`, `linkCode`). `orderNo` and `amount` are required;
    /// unknown parameters are ignored.
    pub fn from_params<'a, I>(params: I) -> Result<Self, CheckoutError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut order_no = None;
        let mut amount = None;
        let mut description = None;
        let mut link_code = None;

        for (key, value) in params {
            match key {
                "orderNo" => order_no = Some(value.to_string()),
                "amount" => amount = Some(value.to_string()),
                "description" => description = Some(value.to_string()),
                "linkCode" => link_code = Some(value.to_string()),
                _ => {}
            }
        }

        let order_no = order_no.ok_or(CheckoutError::MissingParam("orderNo"))?;
        let amount = amount.ok_or(CheckoutError::MissingParam("amount"))?;
        let amount_cents = amount
            .parse::<i64>()
            .map_err(|_| CheckoutError::InvalidAmount(amount))?;

        Ok(Self {
            order_no,
            amount_cents,
            description,
            link_code,
        })
    }
}

/// The demo has no address capture step; completed payments all carry this
/// record.
fn placeholder_shipping() -> ShippingAddress {
    ShippingAddress {
        full_name: "Customer".into(),
        street: "Payment completed via payment link".into(),
        city: "Online".into(),
        state: "Digital".into(),
        zip_code: "00000".into(),
        country: "Laos".into(),
        phone: "-".into(),
    }
}

impl<S: KeyValueStore> OrderStore<S> {
    /// Reconciles a payment redirect against the collection. The matching
    /// `in-cart` order is finalized to `delivered` with the placeholder
    /// shipping/payment record; an order that already left the cart is
    /// returned unchanged (the confirmation page may be revisited). When no
    /// order matches at all, a minimal delivered order is synthesized from
    /// the returned amount so the confirmation view always has something to
    /// render — it is not added to the collection.
    pub fn complete_payment(&mut self, ret: &PaymentReturn) -> Order {
        match self.get_order(&ret.order_no) {
            Some(order) if order.status == OrderStatus::InCart => {
                self.attach_checkout_record(
                    &ret.order_no,
                    placeholder_shipping(),
                    PAYMENT_METHOD_LINK.to_string(),
                );
                self.update_status(&ret.order_no, OrderStatus::Delivered);
                self.get_order(&ret.order_no).unwrap_or(order)
            }
            Some(order) => {
                debug!(order_id = %order.id, status = ?order.status, "payment return for an already-finalized order");
                order
            }
            None => {
                debug!(order_no = %ret.order_no, "payment return for an unknown order; synthesizing confirmation");
                Order {
                    id: ret.order_no.clone(),
                    items: Vec::new(),
                    total_cents: ret.amount_cents,
                    status: OrderStatus::Delivered,
                    created_at: Utc::now(),
                    shipping_address: Some(placeholder_shipping()),
                    payment_method: Some(PAYMENT_METHOD_LINK.to_string()),
                }
            }
        }
    }
}
