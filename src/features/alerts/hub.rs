//! Per-user in-app topics.
//!
//! Each user gets a `broadcast` channel created on first subscription. Topics
//! without live receivers are pruned on publish and on every new subscription.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::alerts::dtos::AlertMessage;

/// Messages buffered per topic before slow subscribers start lagging
const TOPIC_CAPACITY: usize = 32;

#[async_trait]
pub trait AlertPublisher: Send + Sync {
    /// Returns how many subscribers received the message
    async fn publish(&self, user_id: Uuid, message: AlertMessage) -> Result<usize>;
}

#[derive(Default)]
pub struct AlertHub {
    topics: RwLock<HashMap<Uuid, broadcast::Sender<AlertMessage>>>,
}

impl AlertHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<AlertMessage> {
        let mut topics = self.topics.write().await;
        topics.retain(|id, sender| *id == user_id || sender.receiver_count() > 0);
        topics
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    pub async fn topic_count(&self) -> usize {
        self.topics.read().await.len()
    }
}

#[async_trait]
impl AlertPublisher for AlertHub {
    async fn publish(&self, user_id: Uuid, message: AlertMessage) -> Result<usize> {
        let sender = self.topics.read().await.get(&user_id).cloned();
        let Some(sender) = sender else {
            tracing::debug!("No in-app subscribers for user {}", user_id);
            return Ok(0);
        };

        match sender.send(message) {
            Ok(receivers) => Ok(receivers),
            Err(_) => {
                let mut topics = self.topics.write().await;
                if topics
                    .get(&user_id)
                    .is_some_and(|sender| sender.receiver_count() == 0)
                {
                    topics.remove(&user_id);
                }
                Ok(0)
            }
        }
    }
}
