#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use greencart::{
    CartStore, CheckoutFlow, GatewayClient, GatewayError, GatewayToken, MemoryStorage,
    NoticeCenter, OrderSubmission, PaymentOutcome, PaymentPrompt, ProbeError, Product,
    SessionManager, StatusProbe, StatusReport,
};

pub fn product(id: &str, name: &str, price: f64, quantity: u32) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        quantity,
        image: format!("/images/{}.png", id),
        category: "campus".to_string(),
    }
}

pub fn report(status: &str, order_id: &str) -> StatusReport {
    StatusReport {
        transaction_status: status.to_string(),
        status_code: "200".to_string(),
        order_id: order_id.to_string(),
    }
}

pub fn pending_report(order_id: &str) -> StatusReport {
    report("pending", order_id)
}

/// The shared service objects one browser session would hold.
pub struct Stores {
    pub storage: Arc<MemoryStorage>,
    pub cart: Arc<CartStore<MemoryStorage>>,
    pub sessions: Arc<SessionManager<MemoryStorage>>,
    pub notices: Arc<NoticeCenter>,
}

pub fn stores() -> Stores {
    let storage = Arc::new(MemoryStorage::new());
    let cart = Arc::new(CartStore::open(Arc::clone(&storage)));
    let sessions = Arc::new(SessionManager::open(Arc::clone(&storage)));
    let notices = Arc::new(NoticeCenter::new());
    Stores {
        storage,
        cart,
        sessions,
        notices,
    }
}

pub fn flow(
    stores: &Stores,
    gateway: Arc<MockGateway>,
    prompt: Arc<MockPrompt>,
) -> CheckoutFlow<MemoryStorage, MockGateway, MockPrompt> {
    CheckoutFlow::new(
        Arc::clone(&stores.cart),
        Arc::new(greencart::StockOracle::new()),
        Arc::clone(&stores.sessions),
        gateway,
        prompt,
        Arc::clone(&stores.notices),
    )
}

/// Gateway double with scripted responses. When a script runs dry it keeps
/// answering: a fresh token for creates, a pending report for status.
#[derive(Default)]
pub struct MockGateway {
    create_responses: Mutex<VecDeque<Result<GatewayToken, GatewayError>>>,
    status_responses: Mutex<VecDeque<Result<StatusReport, GatewayError>>>,
    pub created: Mutex<Vec<OrderSubmission>>,
    pub status_requests: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        MockGateway::default()
    }

    pub fn push_create(&self, response: Result<GatewayToken, GatewayError>) {
        self.create_responses.lock().unwrap().push_back(response);
    }

    pub fn push_status(&self, response: Result<StatusReport, GatewayError>) {
        self.status_responses.lock().unwrap().push_back(response);
    }

    pub fn created_orders(&self) -> Vec<OrderSubmission> {
        self.created.lock().unwrap().clone()
    }

    pub fn status_request_count(&self) -> usize {
        self.status_requests.lock().unwrap().len()
    }
}

impl GatewayClient for MockGateway {
    fn create_transaction(&self, order: &OrderSubmission) -> Result<GatewayToken, GatewayError> {
        self.created.lock().unwrap().push(order.clone());
        self.create_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(GatewayToken {
                    token: "tok-test".to_string(),
                    redirect_url: None,
                })
            })
    }

    fn transaction_status(&self, order_id: &str) -> Result<StatusReport, GatewayError> {
        self.status_requests
            .lock()
            .unwrap()
            .push(order_id.to_string());
        self.status_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(pending_report(order_id)))
    }
}

/// Embedded-payment-UI double. Scripted outcomes; dry script closes the
/// window.
#[derive(Default)]
pub struct MockPrompt {
    outcomes: Mutex<VecDeque<PaymentOutcome>>,
    pub tokens: Mutex<Vec<String>>,
}

impl MockPrompt {
    pub fn new() -> Self {
        MockPrompt::default()
    }

    pub fn push(&self, outcome: PaymentOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn pay_count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }
}

impl PaymentPrompt for MockPrompt {
    fn pay(&self, token: &str) -> PaymentOutcome {
        self.tokens.lock().unwrap().push(token.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PaymentOutcome::Closed)
    }
}

/// Status probe double for the reconciliation worker. A dry script keeps
/// reporting pending so the loop stays alive.
#[derive(Default)]
pub struct ScriptedProbe {
    responses: Mutex<VecDeque<Result<StatusReport, ProbeError>>>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        ScriptedProbe::default()
    }

    pub fn push(&self, response: Result<StatusReport, ProbeError>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

impl StatusProbe for ScriptedProbe {
    fn probe(&self, order_id: &str) -> Result<StatusReport, ProbeError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(pending_report(order_id)))
    }
}
