//! Seam between the dispatcher and whatever checks an identifier

use async_trait::async_trait;
use docaudit_net::{ExistenceProber, HeadTransport};
use docaudit_types::Outcome;

/// Something that turns one identifier into a final outcome
///
/// Implementations must never fail: every problem is folded into the
/// returned [`Outcome`].
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    async fn probe(&self, identifier: &str) -> Outcome;
}

#[async_trait]
impl<T> Probe for ExistenceProber<T>
where
    T: HeadTransport + 'static,
{
    async fn probe(&self, identifier: &str) -> Outcome {
        ExistenceProber::probe(self, identifier).await
    }
}
