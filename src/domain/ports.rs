use super::element::{Element, ElementTree};
use crate::error::TransportError;
use async_trait::async_trait;

/// Submits a request tree to the gateway and returns the parsed response.
///
/// Implementations must keep element order and text exactly as built, and
/// report network-level failures as `TransportError` rather than synthesizing
/// a gateway response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(
        &self,
        request: &Element,
        client_txn_id: Option<&str>,
    ) -> Result<ElementTree, TransportError>;
}

pub type TransportBox = Box<dyn Transport>;

/// Supplies client transaction ids for requests that don't carry one.
pub trait ClientTxnIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

pub type ClientTxnIdGeneratorBox = Box<dyn ClientTxnIdGenerator>;
