//! WebSocket Connection Hub
//!
//! Tracks live connections, their owning user, and which snapshot topics
//! each one follows.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::messages::{ServerMessage, Topic, WsEvent};

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Subscription key: (user id, topic)
type SubscriptionKey = (String, Topic);

/// Manages all WebSocket connections and subscriptions
pub struct ConnectionHub {
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    subscriptions: RwLock<HashMap<SubscriptionKey, HashSet<ConnectionId>>>,
    config: HubConfig,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    pub user_id: String,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    pub subscriptions: HashSet<Topic>,
}

impl ConnectionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a new connection for a signed-in user
    pub async fn register(
        &self,
        user_id: &str,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                user_id: user_id.to_string(),
                sender,
                subscriptions: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, user_id = %user_id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection and drop all of its subscriptions
    pub async fn unregister(&self, id: &str) {
        let handle = self.connections.write().await.remove(id);

        if let Some(handle) = handle {
            let mut subs = self.subscriptions.write().await;
            for topic in handle.subscriptions {
                let key = (handle.user_id.clone(), topic);
                if let Some(subscribers) = subs.get_mut(&key) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&key);
                    }
                }
            }
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Subscribe a connection to topics
    ///
    /// Unknown topic names are skipped. Returns the topics now followed.
    pub async fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<Topic>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut subscribed = Vec::new();

        for name in topics {
            let topic = match name.parse::<Topic>() {
                Ok(topic) => topic,
                Err(_) => {
                    tracing::warn!(topic = %name, "Invalid topic ignored");
                    continue;
                }
            };

            handle.subscriptions.insert(topic);
            subs.entry((handle.user_id.clone(), topic))
                .or_default()
                .insert(id.to_string());

            if !subscribed.contains(&topic) {
                subscribed.push(topic);
            }
        }

        tracing::debug!(connection_id = %id, topics = ?subscribed, "Subscribed to topics");
        Ok(subscribed)
    }

    /// Unsubscribe a connection from topics
    pub async fn unsubscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<Topic>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut unsubscribed = Vec::new();

        for topic in topics.iter().filter_map(|t| t.parse::<Topic>().ok()) {
            if handle.subscriptions.remove(&topic) {
                unsubscribed.push(topic);

                let key = (handle.user_id.clone(), topic);
                if let Some(subscribers) = subs.get_mut(&key) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&key);
                    }
                }
            }
        }

        tracing::debug!(connection_id = %id, topics = ?unsubscribed, "Unsubscribed from topics");
        Ok(unsubscribed)
    }

    /// Deliver an event to every connection of its user following its topic
    ///
    /// Returns how many connections received it.
    ///
    /// Locks are taken connections first, subscriptions second, the same
    /// order as `subscribe`/`unsubscribe`.
    pub async fn broadcast(&self, event: &WsEvent) -> usize {
        let connections = self.connections.read().await;
        let subscriber_ids: Vec<ConnectionId> = {
            let subs = self.subscriptions.read().await;
            let key = (event.user_id.clone(), event.topic);
            subs.get(&key).into_iter().flatten().cloned().collect()
        };

        let mut sent_count = 0;
        for id in &subscriber_ids {
            if let Some(handle) = connections.get(id) {
                if handle.sender.send(event.message.clone()).is_ok() {
                    sent_count += 1;
                }
            }
        }

        if sent_count > 0 {
            tracing::trace!(
                user_id = %event.user_id,
                topic = %event.topic,
                subscribers = sent_count,
                "Broadcast snapshot"
            );
        }
        sent_count
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let handle = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        handle.sender.send(message).map_err(|_| HubError::SendFailed)
    }

    /// Whether any connection of this user follows the topic
    pub async fn has_subscribers(&self, user_id: &str, topic: Topic) -> bool {
        self.subscriptions
            .read()
            .await
            .contains_key(&(user_id.to_string(), topic))
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Get the number of connections following a user's topic
    pub async fn subscription_count(&self, user_id: &str, topic: Topic) -> usize {
        self.subscriptions
            .read()
            .await
            .get(&(user_id.to_string(), topic))
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register("alice", tx).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register("alice", tx).await.unwrap();

        let subscribed = hub
            .subscribe(&id, topics(&["jobs", "bogus", "jobs"]))
            .await
            .unwrap();
        assert_eq!(subscribed, vec![Topic::Jobs]);
        assert_eq!(hub.subscription_count("alice", Topic::Jobs).await, 1);

        let unsubscribed = hub.unsubscribe(&id, topics(&["jobs"])).await.unwrap();
        assert_eq!(unsubscribed, vec![Topic::Jobs]);
        assert!(!hub.has_subscribers("alice", Topic::Jobs).await);
    }

    #[tokio::test]
    async fn test_unregister_drops_subscriptions() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register("alice", tx).await.unwrap();
        hub.subscribe(&id, topics(&["jobs", "dashboard"])).await.unwrap();

        hub.unregister(&id).await;

        assert!(!hub.has_subscribers("alice", Topic::Jobs).await);
        assert!(!hub.has_subscribers("alice", Topic::Dashboard).await);
        assert!(matches!(
            hub.subscribe(&id, topics(&["jobs"])).await,
            Err(HubError::ConnectionNotFound)
        ));
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = ConnectionHub::new(HubConfig { max_connections: 2 });

        let (tx1, _) = mpsc::unbounded_channel();
        let (tx2, _) = mpsc::unbounded_channel();
        let (tx3, _) = mpsc::unbounded_channel();

        hub.register("a", tx1).await.unwrap();
        hub.register("b", tx2).await.unwrap();
        let result = hub.register("c", tx3).await;

        assert!(matches!(result, Err(HubError::TooManyConnections(2))));
    }

    #[tokio::test]
    async fn test_broadcast_is_scoped_to_user_and_topic() {
        let hub = ConnectionHub::new(HubConfig::default());

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();

        let alice_jobs = hub.register("alice", tx1).await.unwrap();
        let alice_dash = hub.register("alice", tx2).await.unwrap();
        let bob_jobs = hub.register("bob", tx3).await.unwrap();

        hub.subscribe(&alice_jobs, topics(&["jobs"])).await.unwrap();
        hub.subscribe(&alice_dash, topics(&["dashboard"])).await.unwrap();
        hub.subscribe(&bob_jobs, topics(&["jobs"])).await.unwrap();

        let sent = hub.broadcast(&WsEvent::jobs("alice", vec![])).await;
        assert_eq!(sent, 1);

        assert!(matches!(
            rx1.try_recv(),
            Ok(ServerMessage::JobsSnapshot { .. })
        ));
        assert!(rx2.try_recv().is_err());
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_subscribe_racing_broadcast_completes() {
        let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register("alice", tx).await.unwrap();
        tokio::spawn(async move { while rx.recv().await.is_some() {} });

        let subscriber = {
            let hub = Arc::clone(&hub);
            let id = id.clone();
            tokio::spawn(async move {
                for _ in 0..2_000 {
                    hub.subscribe(&id, topics(&["jobs"])).await.unwrap();
                    hub.unsubscribe(&id, topics(&["jobs"])).await.unwrap();
                }
            })
        };
        let broadcaster = {
            let hub = Arc::clone(&hub);
            tokio::spawn(async move {
                for _ in 0..2_000 {
                    hub.broadcast(&WsEvent::jobs("alice", vec![])).await;
                }
            })
        };

        let finished = tokio::time::timeout(std::time::Duration::from_secs(20), async {
            subscriber.await.unwrap();
            broadcaster.await.unwrap();
        })
        .await;
        assert!(finished.is_ok(), "hub locks deadlocked");
        assert!(!hub.has_subscribers("alice", Topic::Jobs).await);
    }
}
