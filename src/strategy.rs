use async_trait::async_trait;

use crate::dispatcher::Fleet;
use crate::types::request::FloorRequest;

/// Decides which car should take a hallway call.
#[async_trait]
pub trait Strategy: Send + Sync + 'static {
    /// Index of the chosen car in `fleet`, or `None` when no car wants the
    /// call. The dispatcher then falls back to its round-robin pick.
    async fn select(&self, fleet: &Fleet, request: &FloorRequest) -> Option<usize>;
}
