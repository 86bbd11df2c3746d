//! Cart, checkout, and payment-status reconciliation core for a campus
//! sustainability store. The catalog, the payment gateway, and durable
//! client storage are collaborators reached through traits; this crate owns
//! the cart state, the payment-session lifecycle, and the polling that
//! discovers payment outcomes the embedded gateway UI never delivered.

mod cart;
mod catalog;
mod checkout;
mod error;
mod gateway;
mod notice;
mod reconcile;
mod record;
mod session;
mod stock;
mod storage;

#[cfg(feature = "http")]
pub mod api;

pub use cart::{CartStore, LineItem};
pub use catalog::{CatalogClient, CatalogError, Product};
pub use checkout::{CheckoutError, CheckoutFlow, CheckoutState};
pub use error::StorageError;
pub use gateway::{
    CustomerDetails, GatewayClient, GatewayError, GatewayToken, OrderItem, OrderSubmission,
    PaymentOutcome, PaymentPrompt, StatusReport, TransactionStatus,
};
pub use notice::{Notice, NoticeCenter, NoticeKind};
pub use reconcile::{
    GatewayProbe, ProbeError, ReconcileError, ReconcileHandle, ReconcileStats, ReconcileWorker,
    Reconciler, Resolution, StatusProbe,
};
pub use record::{RecordError, StoredRecord};
pub use session::{ActiveSession, SessionManager};
pub use stock::StockOracle;
pub use storage::{MemoryStorage, Storage};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
