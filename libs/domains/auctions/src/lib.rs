//! Auction domain: the event contracts the auction service publishes and
//! the compensator that repairs failed projections of them.

mod alert;
mod compensator;
mod contracts;

pub use alert::{AlertSink, LogAlertSink};
pub use compensator::CreatedFaultCompensator;
pub use contracts::{AuctionCreated, AuctionDeleted, AuctionUpdated};
