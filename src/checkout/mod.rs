mod error;
mod flow;

pub use error::CheckoutError;
pub use flow::{CheckoutFlow, CheckoutState};
