// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use thiserror::Error;

/// Failures surfaced by queue mutators. The queue never retries; nonce gaps
/// point at the producer, an inconsistency means published blocks reference
/// messages the queue has never seen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("invalid nonce {got} in queue update, expected {expected}")]
    NonceGap { got: u64, expected: u64 },

    #[error("next message for {sender} has nonce {head_nonce}, expected {expected_nonce}")]
    Inconsistency { sender: String, head_nonce: u64, expected_nonce: u64 },
}
