//! Checkout orchestration: validate the cart, submit the order, drive the
//! embedded payment UI, and hand unresolved outcomes to reconciliation.
//!
//! The flow is a state machine over a single checkout attempt. It is driven
//! by one caller at a time (UI event handlers), so its methods take
//! `&mut self`; the stores it mutates are shared with the reconciliation
//! worker through `Arc`.

use std::sync::Arc;

use crate::cart::{CartStore, LineItem};
use crate::catalog::Product;
use crate::gateway::{
    CustomerDetails, GatewayClient, OrderSubmission, PaymentOutcome, PaymentPrompt,
    TransactionStatus,
};
use crate::notice::NoticeCenter;
use crate::reconcile::{GatewayProbe, ReconcileError, Reconciler, Resolution};
use crate::session::SessionManager;
use crate::stock::StockOracle;
use crate::storage::Storage;

use super::error::CheckoutError;

/// Where a checkout attempt currently stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    FormOpen,
    Submitting,
    AwaitingGateway,
    Completed,
    Cancelled,
}

pub struct CheckoutFlow<S, G, P> {
    cart: Arc<CartStore<S>>,
    stock: Arc<StockOracle>,
    sessions: Arc<SessionManager<S>>,
    gateway: Arc<G>,
    prompt: Arc<P>,
    notices: Arc<NoticeCenter>,
    reconciler: Reconciler<S>,
    state: CheckoutState,
}

impl<S, G, P> CheckoutFlow<S, G, P>
where
    S: Storage,
    G: GatewayClient,
    P: PaymentPrompt,
{
    pub fn new(
        cart: Arc<CartStore<S>>,
        stock: Arc<StockOracle>,
        sessions: Arc<SessionManager<S>>,
        gateway: Arc<G>,
        prompt: Arc<P>,
        notices: Arc<NoticeCenter>,
    ) -> Self {
        let reconciler = Reconciler::new(
            Arc::clone(&cart),
            Arc::clone(&sessions),
            Arc::clone(&notices),
        );
        CheckoutFlow {
            cart,
            stock,
            sessions,
            gateway,
            prompt,
            notices,
            reconciler,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Gate for cart mutations: the cart is frozen while a payment session
    /// is active.
    pub fn guard_cart_mutation(&self) -> Result<(), CheckoutError> {
        if self.sessions.is_payment_in_progress()? {
            self.notices.warning(
                "A payment is in progress. Complete or cancel it before changing your cart.",
            );
            return Err(CheckoutError::PaymentInProgress);
        }
        Ok(())
    }

    /// Add one unit of a product, bounded by the stock snapshot.
    pub fn add_to_cart(&self, product: &Product) -> Result<(), CheckoutError> {
        self.guard_cart_mutation()?;

        let requested = self.cart.quantity_of(&product.id)? + 1;
        if !self.stock.allows(&product.id, requested) {
            return Err(self.reject_for_stock(&product.id, &product.name));
        }

        self.cart.add(LineItem::of(product))?;
        Ok(())
    }

    /// Stock-validated quantity change. A quantity below 1 removes the item.
    pub fn update_cart_quantity(&self, id: &str, quantity: u32) -> Result<(), CheckoutError> {
        self.guard_cart_mutation()?;

        if quantity >= 1 && !self.stock.allows(id, quantity) {
            let name = self
                .cart
                .items()?
                .into_iter()
                .find(|item| item.id == id)
                .map(|item| item.name)
                .unwrap_or_else(|| id.to_string());
            return Err(self.reject_for_stock(id, &name));
        }

        self.cart.update_quantity(id, quantity)?;
        Ok(())
    }

    pub fn remove_from_cart(&self, id: &str) -> Result<(), CheckoutError> {
        self.guard_cart_mutation()?;
        self.cart.remove(id)?;
        Ok(())
    }

    /// Open the customer form. Rejected when the cart is empty, a payment is
    /// already in flight, or any line item exceeds its stock snapshot.
    pub fn begin(&mut self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Idle | CheckoutState::Completed | CheckoutState::Cancelled => {}
            _ => {
                return Err(CheckoutError::InvalidState {
                    operation: "begin checkout",
                    state: self.state.clone(),
                })
            }
        }

        if self.sessions.is_payment_in_progress()? {
            self.notices
                .warning("You have a pending payment. Resume it or wait for it to resolve.");
            return Err(CheckoutError::PaymentInProgress);
        }

        let items = self.cart.items()?;
        if items.is_empty() {
            self.notices.error("Your cart is empty.");
            return Err(CheckoutError::EmptyCart);
        }

        for item in &items {
            if !self.stock.allows(&item.id, item.quantity) {
                return Err(self.reject_for_stock(&item.id, &item.name));
            }
        }

        self.state = CheckoutState::FormOpen;
        Ok(())
    }

    /// Close the customer form without submitting.
    pub fn close_form(&mut self) {
        if self.state == CheckoutState::FormOpen {
            self.state = CheckoutState::Idle;
        }
    }

    /// Submit the customer form: create the gateway transaction, persist the
    /// session, then run the embedded payment UI and dispatch its outcome.
    ///
    /// The session is persisted before the form is considered dismissed, so
    /// an interruption between the gateway response and the UI teardown
    /// cannot lose the pending payment.
    pub fn submit(&mut self, customer: CustomerDetails) -> Result<PaymentOutcome, CheckoutError> {
        if self.state != CheckoutState::FormOpen {
            return Err(CheckoutError::InvalidState {
                operation: "submit checkout",
                state: self.state.clone(),
            });
        }

        let missing = customer.missing_fields();
        if !missing.is_empty() {
            self.notices.error("Please fill in all required fields.");
            return Err(CheckoutError::MissingFields(missing));
        }

        self.state = CheckoutState::Submitting;

        let items = match self.cart.items() {
            Ok(items) => items,
            Err(err) => {
                self.state = CheckoutState::FormOpen;
                return Err(err.into());
            }
        };
        let order = OrderSubmission::from_cart(None, customer, &items);

        let credential = match self.gateway.create_transaction(&order) {
            Ok(credential) => credential,
            Err(err) => {
                self.state = CheckoutState::FormOpen;
                self.notices
                    .error("Could not start payment. Please try again.");
                return Err(err.into());
            }
        };

        if credential.token.trim().is_empty() {
            self.state = CheckoutState::FormOpen;
            self.notices
                .error("Could not start payment. Please try again.");
            return Err(CheckoutError::MissingToken);
        }

        if let Err(err) = self.sessions.begin(&credential.token, &order.order_id) {
            self.state = CheckoutState::FormOpen;
            return Err(err.into());
        }

        self.state = CheckoutState::AwaitingGateway;
        let outcome = self.prompt.pay(&credential.token);
        self.dispatch_outcome(&order.order_id, &outcome)?;
        Ok(outcome)
    }

    /// Re-open the payment UI for a persisted session, after confirming the
    /// order has not already reached a terminal state.
    pub fn resume_payment(&mut self) -> Result<PaymentOutcome, CheckoutError> {
        let session = self
            .sessions
            .current()?
            .ok_or(CheckoutError::NoPendingPayment)?;

        let probe = GatewayProbe::new(Arc::clone(&self.gateway));
        match self.reconciler.run_once(&probe) {
            Ok(Some(Resolution::Completed)) => {
                self.state = CheckoutState::Completed;
                return Ok(PaymentOutcome::Success);
            }
            Ok(Some(Resolution::Reverted(status))) => {
                self.state = CheckoutState::Idle;
                return Err(CheckoutError::NotResumable(status));
            }
            Ok(Some(Resolution::StillPending)) => {}
            Ok(None) => return Err(CheckoutError::NoPendingPayment),
            // The check failed, not the payment; the token may still be
            // good, so reopen the UI anyway.
            Err(ReconcileError::Probe(_)) => {}
            Err(ReconcileError::Storage(err)) => return Err(err.into()),
        }

        self.state = CheckoutState::AwaitingGateway;
        let outcome = self.prompt.pay(&session.token);
        self.dispatch_outcome(&session.order_id, &outcome)?;
        Ok(outcome)
    }

    fn dispatch_outcome(
        &mut self,
        order_id: &str,
        outcome: &PaymentOutcome,
    ) -> Result<(), CheckoutError> {
        match outcome {
            PaymentOutcome::Success => {
                self.reconciler
                    .resolve(order_id, &TransactionStatus::Success)?;
                self.state = CheckoutState::Completed;
            }
            PaymentOutcome::Pending => {
                // Resolution is deferred to the reconciliation worker.
                self.notices
                    .info("Your payment is being processed. We'll update your order shortly.");
            }
            PaymentOutcome::Error(_) => {
                self.sessions.clear_if(order_id)?;
                self.notices.error("Payment failed. Please try again.");
                self.state = CheckoutState::FormOpen;
            }
            PaymentOutcome::Closed => {
                // The token stays valid for resumption; check right away
                // whether the order resolved behind the closed window.
                self.state = CheckoutState::Cancelled;
                self.notices
                    .info("Payment window closed. You can resume your payment from the cart.");
                let probe = GatewayProbe::new(Arc::clone(&self.gateway));
                if let Ok(Some(Resolution::Completed)) = self.reconciler.run_once(&probe) {
                    self.state = CheckoutState::Completed;
                }
            }
        }
        Ok(())
    }

    fn reject_for_stock(&self, id: &str, name: &str) -> CheckoutError {
        let available = self.stock.available(id).unwrap_or(0);
        self.notices.error(format!(
            "Not enough stock for {}. Only {} left.",
            name, available
        ));
        CheckoutError::InsufficientStock {
            id: id.to_string(),
            name: name.to_string(),
            available,
        }
    }
}
