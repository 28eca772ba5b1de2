// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

pub mod journal;
pub mod message;
pub mod metrics;
pub mod queue;
pub mod utilities;

pub use queue::MessageQueue;
pub use queue::QueueError;
pub use queue::QueuedMessage;
