// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pub/sub transport abstraction (spec §6 "Bus subjects", §9 "Async
//! iterator subscription loops → cancelable channels"). One production
//! implementation over NATS; one in-memory fake for tests.

use async_trait::async_trait;

use crate::error::BusError;

#[derive(Debug, Clone)]
pub struct BusMessage {
    pub subject: String,
    pub payload: Vec<u8>,
}

/// A live subscription. Each subject subscription loop (spec §5) owns one of
/// these and calls `next()` until it returns `None` (the bus connection
/// closed) or the loop's cancellation token fires.
#[async_trait]
pub trait Subscription: Send {
    async fn next(&mut self) -> Option<BusMessage>;
}

#[async_trait]
pub trait Bus: Send + Sync {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError>;
    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>, BusError>;
}

pub struct NatsBus {
    client: async_nats::Client,
}

impl NatsBus {
    pub async fn connect(url: &str) -> Result<Self, BusError> {
        let client = async_nats::connect(url).await.map_err(|e| BusError::Connect(e.to_string()))?;
        Ok(Self { client })
    }
}

struct NatsSubscription {
    inner: async_nats::Subscriber,
}

#[async_trait]
impl Subscription for NatsSubscription {
    async fn next(&mut self) -> Option<BusMessage> {
        use futures_util::StreamExt;
        let msg = self.inner.next().await?;
        Some(BusMessage { subject: msg.subject.to_string(), payload: msg.payload.to_vec() })
    }
}

#[async_trait]
impl Bus for NatsBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| BusError::Publish(e.to_string()))
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>, BusError> {
        let inner = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| BusError::Subscribe(e.to_string()))?;
        Ok(Box::new(NatsSubscription { inner }))
    }
}
