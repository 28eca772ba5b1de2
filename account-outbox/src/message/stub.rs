// 2022-2024 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use serde::Deserialize;
use serde::Serialize;

use crate::message::OutboundMessage;

#[cfg(test)]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MessageStub {
    sender: u64,
    nonce: u64,
}

#[cfg(test)]
impl MessageStub {
    pub fn new(sender: u64, nonce: u64) -> Self {
        Self { sender, nonce }
    }
}

#[cfg(test)]
impl OutboundMessage for MessageStub {
    type Address = u64;

    fn sender(&self) -> Self::Address {
        self.sender
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }
}
