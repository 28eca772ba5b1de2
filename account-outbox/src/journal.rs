// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

pub const JOURNAL_TARGET: &str = "journal";

/// Append-only record of node operations, one topic per subsystem. Entries
/// are key/value metadata attached to an operation name; readers filter by
/// the `journal` tracing target.
pub trait Journal: Send + Sync {
    fn record(&self, operation: &str, meta: &[(&'static str, String)]);
}

pub struct TracingJournal {
    topic: String,
}

impl TracingJournal {
    pub fn new(topic: impl Into<String>) -> anyhow::Result<Self> {
        let topic = topic.into();
        anyhow::ensure!(!topic.is_empty(), "journal topic must not be empty");
        Ok(Self { topic })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl Journal for TracingJournal {
    fn record(&self, operation: &str, meta: &[(&'static str, String)]) {
        tracing::info!(
            target: JOURNAL_TARGET,
            topic = %self.topic,
            operation = %operation,
            meta = ?meta,
        );
    }
}
