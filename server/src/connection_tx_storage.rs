use std::collections::HashMap;

use tokio::sync::mpsc::error::TrySendError;
use system::{ConnectionId, ServerEvent};

use crate::error::TransportError;

pub type ConnectionTx = tokio::sync::mpsc::Sender<ServerEvent>;

/// How hard the transport tries to hand an event to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Waits for room in the connection's queue. Never dropped, in order.
    Reliable,
    /// Dropped when the connection's queue is full.
    BestEffort,
}

/// Outbound queues of every live connection.
pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(connection_id)
    }

    pub fn len(&self) -> usize {
        self.connection_txs.len()
    }

    pub async fn send(
        &self,
        to: &ConnectionId,
        message: ServerEvent,
        delivery: Delivery,
    ) -> Result<(), TransportError> {
        let tx = self
            .connection_txs
            .get(to)
            .ok_or(TransportError::UnknownConnection(*to))?;
        match delivery {
            Delivery::Reliable => tx
                .send(message)
                .await
                .map_err(|_| TransportError::Closed(*to)),
            Delivery::BestEffort => match tx.try_send(message) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => {
                    log::debug!("Dropped best-effort event to congested connection {}", to);
                    Ok(())
                }
                Err(TrySendError::Closed(_)) => Err(TransportError::Closed(*to)),
            },
        }
    }

    /// Sends `event` to every connection but `without`. Returns the
    /// connections found closed on the way.
    pub async fn publish(
        &self,
        event: ServerEvent,
        without: Option<&ConnectionId>,
        delivery: Delivery,
    ) -> Vec<ConnectionId> {
        let mut closed = Vec::new();
        for connection_id in self.connection_txs.keys() {
            if without == Some(connection_id) {
                continue;
            }
            match self.send(connection_id, event.clone(), delivery).await {
                Ok(()) => {}
                Err(TransportError::Closed(id)) => closed.push(id),
                Err(err) => log::warn!("Broadcast failed: {}", err),
            }
        }
        closed
    }

    /// Connections whose receiving side is gone.
    pub fn closed(&self) -> Vec<ConnectionId> {
        self.connection_txs
            .iter()
            .filter(|(_, tx)| tx.is_closed())
            .map(|(connection_id, _)| *connection_id)
            .collect()
    }
}
