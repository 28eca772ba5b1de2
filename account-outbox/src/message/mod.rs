// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::fmt::Debug;
use std::hash::Hash;

use serde::Deserialize;
use serde::Serialize;

#[cfg(test)]
pub mod stub;

/// A signed message the queue can track. The queue never looks inside the
/// message beyond the sending account and the nonce assigned at signing
/// time.
pub trait OutboundMessage: Debug + Clone + Sync + Send + Serialize + for<'b> Deserialize<'b> {
    type Address: Debug + Clone + Eq + Hash + Ord + Sync + Send;

    fn sender(&self) -> Self::Address;

    fn nonce(&self) -> u64;
}
