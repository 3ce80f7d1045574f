//! The denormalized search record.

use chrono::{DateTime, Utc};
use domain_auctions::{AuctionCreated, AuctionUpdated};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One searchable auction, keyed by the auction id.
///
/// Built entirely from event payloads; the search service never reads the
/// auction service's database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: Uuid,
    pub seller: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub mileage: i32,
    pub year: i32,
    pub reserve_price: i64,
    pub image_url: String,
    pub auction_start: DateTime<Utc>,
    pub auction_end: DateTime<Utc>,
}

impl SearchItem {
    /// Merge the fields an update carries; `None` leaves the current value.
    pub fn apply(&mut self, update: &AuctionUpdated) {
        if let Some(make) = &update.make {
            self.make = make.clone();
        }
        if let Some(model) = &update.model {
            self.model = model.clone();
        }
        if let Some(color) = &update.color {
            self.color = color.clone();
        }
        if let Some(mileage) = update.mileage {
            self.mileage = mileage;
        }
        if let Some(year) = update.year {
            self.year = year;
        }
    }
}

impl From<&AuctionCreated> for SearchItem {
    fn from(event: &AuctionCreated) -> Self {
        Self {
            id: event.id,
            seller: event.seller.clone(),
            make: event.make.clone(),
            model: event.model.clone(),
            color: event.color.clone(),
            mileage: event.mileage,
            year: event.year,
            reserve_price: event.reserve_price,
            image_url: event.image_url.clone(),
            auction_start: event.auction_start,
            auction_end: event.auction_end,
        }
    }
}
