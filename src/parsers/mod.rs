//! Pure parsing of scraped content: listing pages into records and
//! free-text addresses into components.

pub mod address;
pub mod listing;
pub mod tagger;

#[cfg(test)]
mod tests;

pub use address::{normalize, normalize_with};
pub use listing::parse_listing;
pub use tagger::{AddressLabel, AddressTagger, RuleTagger, TagError, TaggedAddress};
