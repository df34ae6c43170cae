pub mod candidates;
pub mod prices;

pub use candidates::{top_candidate, CandidatePair};
pub use prices::{PairWindow, PriceStore, PriceStoreData};
