//! Fixtures shared by unit tests.

use std::collections::VecDeque;
use std::future::Future;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};

use shopfront_core::ProductId;

use crate::api::{ApiError, CatalogItem, CatalogSource};

type Reply = Result<Vec<CatalogItem>, ApiError>;

/// A plain available product with the given price in whole units.
pub fn item(id: i64, name: &str, price: i64) -> CatalogItem {
    CatalogItem {
        id: ProductId::new(id),
        name: name.to_string(),
        description: None,
        brand: None,
        price: Decimal::from(price),
        category: None,
        release_date: None,
        available: true,
        stock_quantity: Some(10),
        image_name: None,
    }
}

/// Error a scripted source returns when a test asks for a failure.
pub fn unreachable_error() -> ApiError {
    ApiError::Status {
        endpoint: "GET /products".to_string(),
        status: 503,
        message: "catalog service unavailable".to_string(),
    }
}

/// Catalog source whose replies are delivered by the test.
///
/// Each call to `fetch_catalog` takes the next pending reply channel in
/// order and reports its call index on `started`, so a test can hold a
/// response back while issuing a newer one.
pub struct ScriptedSource {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    started: mpsc::UnboundedSender<usize>,
    calls: Mutex<usize>,
}

/// Test-side handles for a [`ScriptedSource`].
pub struct Script {
    pub senders: Vec<oneshot::Sender<Reply>>,
    pub started: mpsc::UnboundedReceiver<usize>,
}

impl ScriptedSource {
    /// A source expecting `calls` fetches, each answered through `Script`.
    pub fn new(calls: usize) -> (Self, Script) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let mut senders = Vec::with_capacity(calls);
        let mut receivers = VecDeque::with_capacity(calls);
        for _ in 0..calls {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            receivers.push_back(rx);
        }
        (
            Self {
                replies: Mutex::new(receivers),
                started: started_tx,
                calls: Mutex::new(0),
            },
            Script {
                senders,
                started: started_rx,
            },
        )
    }

    /// A source that answers immediately with the given replies in order.
    pub fn ready(replies: Vec<Reply>) -> Self {
        let (source, script) = Self::new(replies.len());
        for (tx, reply) in script.senders.into_iter().zip(replies) {
            let _ = tx.send(reply);
        }
        source
    }
}

impl CatalogSource for ScriptedSource {
    fn fetch_catalog(&self) -> impl Future<Output = Reply> + Send {
        let index = {
            let mut calls = self.calls.lock();
            *calls += 1;
            *calls - 1
        };
        let reply = self.replies.lock().pop_front();
        let _ = self.started.send(index);
        async move {
            match reply {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(unreachable_error())),
                None => Err(unreachable_error()),
            }
        }
    }
}
