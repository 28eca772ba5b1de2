// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::sync::Arc;

use opentelemetry::metrics::Counter;
use opentelemetry::metrics::Gauge;
use opentelemetry::metrics::Meter;

/// Observation points the queue publishes into. Implementations must be
/// thread-safe; both gauges are reported after every mutator, the expired
/// counter once per sender drained by an expiration pass.
pub trait QueueMetrics: Send + Sync {
    fn report_queue_size(&self, size: i64);

    fn report_oldest_stamp(&self, stamp: u64);

    fn report_expired_messages(&self, count: u64);
}

#[derive(Clone)]
pub struct MessageQueueMetrics(Arc<MessageQueueMetricsInner>);

struct MessageQueueMetricsInner {
    queue_size: Gauge<i64>,
    queue_oldest: Gauge<u64>,
    queue_expire: Counter<u64>,
}

impl MessageQueueMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self(Arc::new(MessageQueueMetricsInner {
            queue_size: meter
                .i64_gauge("message_queue_size")
                .with_description("The size of the message queue")
                .build(),
            queue_oldest: meter
                .u64_gauge("message_queue_oldest")
                .with_description("The stamp of the oldest message in the queue or zero when empty")
                .build(),
            queue_expire: meter
                .u64_counter("message_queue_expire")
                .with_description("The number of messages expired from the queue")
                .build(),
        }))
    }
}

impl QueueMetrics for MessageQueueMetrics {
    fn report_queue_size(&self, size: i64) {
        self.0.queue_size.record(size, &[]);
    }

    fn report_oldest_stamp(&self, stamp: u64) {
        self.0.queue_oldest.record(stamp, &[]);
    }

    fn report_expired_messages(&self, count: u64) {
        self.0.queue_expire.add(count, &[]);
    }
}
