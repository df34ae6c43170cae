pub mod detail;
pub mod ranking;
pub mod universe;

pub use detail::{pair_detail, parse_pair_id, PairDetail, DEFAULT_DETAIL_TAIL};
pub use ranking::{rank_pairs, PairRanking, PairStatus, PairTag, RankedPair};
pub use universe::{universe_summary, UniverseSummary};
