//! Cross-service auction event contracts.
//!
//! These types are the wire format between the auction service and its
//! downstream projections. Changing a field here is a breaking change for
//! every consumer; additive evolution only.

use chrono::{DateTime, Utc};
use messaging::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A new auction was committed by the auction service.
///
/// Carries the full denormalized snapshot so consumers never need to call
/// back into the owning service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionCreated {
    pub id: Uuid,
    pub reserve_price: i64,
    pub seller: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub mileage: i32,
    pub year: i32,
    pub image_url: String,
    pub auction_start: DateTime<Utc>,
    pub auction_end: DateTime<Utc>,
}

impl Message for AuctionCreated {
    const TOPIC: &'static str = "auction.created";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

/// Mutable item details changed on an existing auction.
///
/// `None` means "no change", never "clear": consumers merge the present
/// fields into their projection and leave the rest alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionUpdated {
    pub id: Uuid,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub year: Option<i32>,
}

impl Message for AuctionUpdated {
    const TOPIC: &'static str = "auction.updated";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

/// An auction was removed by the auction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionDeleted {
    pub id: Uuid,
}

impl Message for AuctionDeleted {
    const TOPIC: &'static str = "auction.deleted";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
pub(crate) fn created_fixture() -> AuctionCreated {
    use chrono::TimeZone;

    AuctionCreated {
        id: Uuid::new_v4(),
        reserve_price: 20_000,
        seller: "alice".into(),
        make: "Ford".into(),
        model: "GT".into(),
        color: "white".into(),
        mileage: 50_000,
        year: 2020,
        image_url: "https://cdn.example.com/ford-gt.jpg".into(),
        auction_start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        auction_end: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    }
}
