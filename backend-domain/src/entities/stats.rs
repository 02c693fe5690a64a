// Runtime statistics snapshots

use serde::Serialize;

/// Connection pool utilisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub active: u32,
    pub idle: u32,
    pub total: u32,
    pub waiting: u32,
}

impl std::fmt::Display for PoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Active: {}, Idle: {}, Total: {}, Waiting: {}",
            self.active, self.idle, self.total, self.waiting
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub log_queue: usize,
    pub container_queue: usize,
    pub capacity: usize,
}

impl std::fmt::Display for QueueStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Log queue: {}, Container queue: {} (capacity {})",
            self.log_queue, self.container_queue, self.capacity
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionCount {
    pub action: String,
    pub count: u64,
}

/// Action histogram over an epoch-second window, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSummary {
    pub total: u64,
    pub from: u32,
    pub to: u32,
    pub counts: Vec<ActionCount>,
}

impl ActionSummary {
    pub fn new(from: u32, to: u32, counts: Vec<ActionCount>) -> Self {
        Self {
            total: counts.iter().map(|c| c.count).sum(),
            from,
            to,
            counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_stats_display() {
        let stats = PoolStats {
            active: 2,
            idle: 3,
            total: 5,
            waiting: 0,
        };
        assert_eq!(stats.to_string(), "Active: 2, Idle: 3, Total: 5, Waiting: 0");
    }

    #[test]
    fn summary_total_is_sum_of_counts() {
        let summary = ActionSummary::new(
            10,
            20,
            vec![
                ActionCount { action: "Login".into(), count: 3 },
                ActionCount { action: "Chat".into(), count: 4 },
            ],
        );
        assert_eq!(summary.total, 7);
        assert_eq!((summary.from, summary.to), (10, 20));
    }
}
