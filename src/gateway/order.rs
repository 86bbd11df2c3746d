use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::cart::LineItem;

/// Customer contact details collected by the checkout form. All four fields
/// are required there; `missing_fields` reports every blank one by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerDetails {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.address.trim().is_empty() {
            missing.push("address");
        }
        missing
    }
}

/// One order line as submitted to the gateway, price rounded to whole
/// currency units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

/// The payload sent to the payment gateway when a checkout is submitted.
///
/// Ephemeral: built from the cart at submission time and not persisted. No
/// fractional currency units leave the crate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub order_id: String,
    pub amount: i64,
    pub customer: CustomerDetails,
    pub items: Vec<OrderItem>,
}

impl OrderSubmission {
    /// Build a submission from cart line items. When no order id is supplied
    /// one is generated from the current epoch millis.
    pub fn from_cart(
        order_id: Option<String>,
        customer: CustomerDetails,
        items: &[LineItem],
    ) -> Self {
        let total: f64 = items.iter().map(LineItem::subtotal).sum();
        OrderSubmission {
            order_id: order_id.unwrap_or_else(generated_order_id),
            amount: total.round() as i64,
            customer,
            items: items
                .iter()
                .map(|item| OrderItem {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    price: item.price.round() as i64,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

pub(crate) fn generated_order_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("ORDER-{}", millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ava".to_string(),
            email: "ava@example.edu".to_string(),
            phone: "555-0101".to_string(),
            address: "12 Campus Way".to_string(),
        }
    }

    fn line(id: &str, price: f64, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: format!("Product {}", id),
            price,
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn missing_fields_lists_every_blank() {
        let complete = customer();
        assert!(complete.missing_fields().is_empty());

        let partial = CustomerDetails {
            name: "  ".to_string(),
            email: String::new(),
            ..customer()
        };
        assert_eq!(partial.missing_fields(), vec!["name", "email"]);
    }

    #[test]
    fn from_cart_rounds_to_whole_units() {
        let order = OrderSubmission::from_cart(
            Some("ORDER-1".to_string()),
            customer(),
            &[line("P1", 49999.6, 2), line("P2", 100.4, 1)],
        );

        assert_eq!(order.order_id, "ORDER-1");
        // 49999.6 * 2 + 100.4 = 100099.6
        assert_eq!(order.amount, 100100);
        assert_eq!(order.items[0].price, 50000);
        assert_eq!(order.items[1].price, 100);
    }

    #[test]
    fn generated_order_id_has_prefix() {
        let order = OrderSubmission::from_cart(None, customer(), &[line("P1", 10.0, 1)]);
        assert!(order.order_id.starts_with("ORDER-"));
        assert!(order.order_id.len() > "ORDER-".len());
        assert!(order.order_id["ORDER-".len()..]
            .chars()
            .all(|c| c.is_ascii_digit()));
    }
}
