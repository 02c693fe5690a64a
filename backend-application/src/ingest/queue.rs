use tokio::sync::{mpsc, Mutex};

use backend_domain::{ContainerTransaction, LogEvent, QueueStats};

/// Fixed-capacity FIFO. A full queue rejects the newest item.
pub struct BoundedQueue<T> {
    tx: mpsc::Sender<T>,
    rx: Mutex<mpsc::Receiver<T>>,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Returns `false` when the item was discarded because the queue is full.
    pub fn enqueue(&self, item: T) -> bool {
        self.tx.try_send(item).is_ok()
    }

    /// Removes up to `max_items` entries in FIFO order.
    pub async fn drain(&self, max_items: usize) -> Vec<T> {
        let mut rx = self.rx.lock().await;
        let mut batch = Vec::new();
        while batch.len() < max_items {
            match rx.try_recv() {
                Ok(item) => batch.push(item),
                Err(_) => break,
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

/// The two independent buffers fed by event sources.
pub struct IngestionQueues {
    pub logs: BoundedQueue<LogEvent>,
    pub containers: BoundedQueue<ContainerTransaction>,
}

impl IngestionQueues {
    pub fn new(capacity: usize) -> Self {
        Self {
            logs: BoundedQueue::new(capacity),
            containers: BoundedQueue::new(capacity),
        }
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            log_queue: self.logs.len(),
            container_queue: self.containers.len(),
            capacity: self.logs.capacity(),
        }
    }
}
