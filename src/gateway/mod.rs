mod client;
mod order;
mod status;

pub use client::{GatewayClient, GatewayError, GatewayToken, PaymentOutcome, PaymentPrompt};
pub(crate) use order::generated_order_id;
pub use order::{CustomerDetails, OrderItem, OrderSubmission};
pub use status::{StatusReport, TransactionStatus};
