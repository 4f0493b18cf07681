//! Consistency analysis
//!
//! Finds sibling pairs that have not been classified yet. The analyzer is
//! always run against the current state: resolving one pair can rewire the
//! children list it scanned, so results are never cached or batched.

pub mod estranged;

pub use estranged::{find_all_estranged_pairs, find_estranged_pair, EstrangedPair};
