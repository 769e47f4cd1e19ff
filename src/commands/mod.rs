//! CLI command implementations.

pub mod check;
pub mod offers;

pub use check::CheckCommand;
pub use offers::{OfferQuery, OfferService, OffersCommand};
