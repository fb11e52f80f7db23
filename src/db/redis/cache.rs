use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for cached catalog reads
///
/// List keys carry the filter's stable token so equivalent queries
/// share one slot; single-destination keys carry the id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Destination(String),
    DestinationList(String),
    DestinationCount,
    PopularTop(usize),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Destination(id) => write!(f, "dest:{}", id),
            CacheKey::DestinationList(token) => write!(f, "dests:{}", token),
            CacheKey::DestinationCount => write!(f, "dest_count"),
            CacheKey::PopularTop(limit) => write!(f, "dests_top:{}", limit),
        }
    }
}

/// Creates the Redis client the cache reads and writes through
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// One queued cache write, already serialized
struct PendingWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed cache with a write-behind queue
///
/// Reads hit Redis directly; writes are queued to a background task so
/// a slow Redis never sits on the request path.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Handle for stopping the background writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer to drain its queue and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Builds the cache and spawns its background writer
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer_client = redis_client.clone();
        tokio::spawn(run_writer(writer_client, write_rx, shutdown_rx));

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Looks a key up in Redis
    ///
    /// `None` on a miss; a hit is deserialized from the stored JSON.
    pub async fn read<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        cached
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    /// Queues a value for the background writer and returns immediately
    ///
    /// A value that fails to serialize is logged and dropped rather
    /// than surfaced; the cache is an accelerator, not a store of
    /// record.
    pub fn write_behind<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!("Cache writer is gone, dropping write");
        }
    }
}

/// Background loop applying queued writes
///
/// On shutdown the queue is closed first, so every write already
/// accepted still lands before the task exits.
async fn run_writer(
    client: Client,
    mut write_rx: mpsc::UnboundedReceiver<PendingWrite>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::info!("Cache writer started");

    loop {
        tokio::select! {
            Some(write) = write_rx.recv() => {
                if let Err(e) = persist(&client, write).await {
                    tracing::error!(error = %e, "Cache write failed");
                }
            }
            _ = shutdown_rx.recv() => {
                write_rx.close();

                let mut flushed = 0usize;
                while let Some(write) = write_rx.recv().await {
                    match persist(&client, write).await {
                        Ok(()) => flushed += 1,
                        Err(e) => {
                            tracing::error!(error = %e, "Cache write failed during flush")
                        }
                    }
                }

                tracing::info!(flushed, "Cache writer stopped");
                break;
            }
        }
    }
}

/// Applies one write with its TTL
async fn persist(client: &Client, write: PendingWrite) -> AppResult<()> {
    let mut conn = client.get_multiplexed_async_connection().await?;
    let _: () = conn.set_ex(write.key, write.value, write.ttl).await?;
    Ok(())
}
