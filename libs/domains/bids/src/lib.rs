//! Bid-side projection of the auction event stream.

mod projector;
mod snapshot;

pub use projector::BidProjector;
pub use snapshot::{AuctionSnapshot, InMemorySnapshotStore, SnapshotStore, StoreError};
