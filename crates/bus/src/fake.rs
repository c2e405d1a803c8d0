// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fake bus for tests. Publishing fans a message out to every
//! still-alive subscription whose pattern matches, using the same NATS
//! wildcard rules as the real transport.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::bus::{Bus, BusMessage, Subscription};
use crate::error::BusError;
use crate::subject_match::subject_matches;

#[derive(Clone, Default)]
pub struct FakeBus {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    subscribers: Mutex<Vec<(String, mpsc::UnboundedSender<BusMessage>)>>,
    published: Mutex<Vec<BusMessage>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published so far, in publish order. Useful for asserting
    /// what the worker emitted (e.g. replay re-publishes, worker logs).
    pub fn published(&self) -> Vec<BusMessage> {
        self.inner.published.lock().clone()
    }

    pub fn published_on(&self, subject: &str) -> Vec<BusMessage> {
        self.published().into_iter().filter(|m| m.subject == subject).collect()
    }
}

struct FakeSubscription {
    rx: mpsc::UnboundedReceiver<BusMessage>,
}

#[async_trait]
impl Subscription for FakeSubscription {
    async fn next(&mut self) -> Option<BusMessage> {
        self.rx.recv().await
    }
}

#[async_trait]
impl Bus for FakeBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let message = BusMessage { subject: subject.to_string(), payload };
        self.inner.published.lock().push(message.clone());
        let mut subscribers = self.inner.subscribers.lock();
        subscribers.retain(|(pattern, tx)| {
            if subject_matches(pattern, subject) {
                tx.send(message.clone()).is_ok()
            } else {
                !tx.is_closed()
            }
        });
        Ok(())
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>, BusError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.subscribers.lock().push((subject.to_string(), tx));
        Ok(Box::new(FakeSubscription { rx }))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
