//! Message-broker bridge
//!
//! Thin pass-through over an MQTT client: publishes chat envelopes to the
//! outbound topic and buffers whatever arrives on the inbound topic. No
//! delivery guarantees beyond the client's own QoS are implemented here.

pub mod envelope;

pub use envelope::{Envelope, EnvelopeMeta, MessageKind};

use crate::config::RelayConfig;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Cap on buffered inbound messages; oldest entries are dropped first
const INBOUND_BUFFER_CAP: usize = 256;

/// A message received from the broker
#[derive(Debug, Clone, Serialize)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: String,
    pub received_at: DateTime<Utc>,
}

struct RelayConn {
    client: AsyncClient,
    event_task: JoinHandle<()>,
}

/// Broker bridge with a connect/disconnect lifecycle
///
/// All transport is delegated to `rumqttc`; this type only manages the
/// client's lifecycle and an inbound ring buffer for the UI to poll.
pub struct RelayBridge {
    config: RelayConfig,
    conn: tokio::sync::Mutex<Option<RelayConn>>,
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
}

impl RelayBridge {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            conn: tokio::sync::Mutex::new(None),
            inbound: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Connect to the broker and subscribe to the inbound topic
    ///
    /// Connecting while already connected is a no-op.
    pub async fn connect(&self) -> AppResult<()> {
        let mut conn = self.conn.lock().await;
        if conn.is_some() {
            tracing::debug!("Relay already connected");
            return Ok(());
        }

        let client_id = format!("switchboard-{}", uuid::Uuid::new_v4());
        let mut options = MqttOptions::new(&client_id, &self.config.host, self.config.port);
        options.set_keep_alive(Duration::from_secs(60));
        options.set_clean_session(true);

        let (client, mut event_loop) = AsyncClient::new(options, 10);

        client
            .subscribe(&self.config.subscribe_topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| AppError::Relay(format!("subscribe failed: {e}")))?;

        let inbound = self.inbound.clone();
        let event_task = tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let message = InboundMessage {
                            topic: publish.topic.clone(),
                            payload: String::from_utf8_lossy(&publish.payload).into_owned(),
                            received_at: Utc::now(),
                        };
                        tracing::debug!(topic = %message.topic, "Relay message received");
                        push_inbound(&inbound, message);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        // rumqttc reconnects on the next poll; back off so a
                        // dead broker doesn't spin the task.
                        tracing::warn!(error = %e, "Relay event loop error");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            client_id = %client_id,
            "Relay connected"
        );

        *conn = Some(RelayConn { client, event_task });
        Ok(())
    }

    /// Disconnect from the broker and stop the event loop
    ///
    /// Disconnecting while not connected is a no-op.
    pub async fn disconnect(&self) -> AppResult<()> {
        let mut conn = self.conn.lock().await;
        if let Some(RelayConn { client, event_task }) = conn.take() {
            if let Err(e) = client.disconnect().await {
                tracing::warn!(error = %e, "Relay disconnect was not clean");
            }
            event_task.abort();
            tracing::info!("Relay disconnected");
        }
        Ok(())
    }

    /// Publish an envelope to the outbound topic
    pub async fn publish(&self, envelope: &Envelope) -> AppResult<()> {
        let conn = self.conn.lock().await;
        let Some(RelayConn { client, .. }) = conn.as_ref() else {
            return Err(AppError::Relay("not connected to broker".to_string()));
        };

        let payload = serde_json::to_vec(envelope)
            .map_err(|e| AppError::Internal(format!("failed to serialize envelope: {e}")))?;

        client
            .publish(
                &self.config.publish_topic,
                QoS::AtLeastOnce,
                false,
                payload,
            )
            .await
            .map_err(|e| AppError::Relay(format!("publish failed: {e}")))?;

        tracing::debug!(topic = %self.config.publish_topic, "Envelope published");
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Snapshot of buffered inbound messages, oldest first
    pub fn recent(&self) -> Vec<InboundMessage> {
        let inbound = self.inbound.lock().unwrap_or_else(|e| e.into_inner());
        inbound.iter().cloned().collect()
    }
}

fn push_inbound(buffer: &Mutex<VecDeque<InboundMessage>>, message: InboundMessage) {
    let mut buffer = buffer.lock().unwrap_or_else(|e| e.into_inner());
    if buffer.len() >= INBOUND_BUFFER_CAP {
        buffer.pop_front();
    }
    buffer.push_back(message);
}
