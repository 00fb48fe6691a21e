pub mod api;
pub mod catalog;
pub mod flagged_feed;
pub mod observer;

pub use api::ApiError;
pub use catalog::ArtistCatalog;
pub use flagged_feed::FlaggedItemFeed;
pub use observer::{NullObserver, ReviewSummary, ViewObserver};
