//! Search-side projection of the auction event stream.

mod item;
mod projector;
mod store;

pub use item::SearchItem;
pub use projector::SearchProjector;
pub use store::{InMemorySearchStore, SearchStore, StoreError};
