//! Resolution protocol
//!
//! Turns estranged sibling pairs into classified ones by asking an
//! [`Oracle`]. Each pair goes through an explicit [`PairResolution`] state
//! value; [`resolve_pair`] and [`resolve_all`] drive it synchronously.

pub mod driver;
pub mod oracle;
pub mod protocol;

pub use driver::{insert_edge, insert_ent};
pub use oracle::{Oracle, OrderAnswer, OrderQuestion, ResolutionEvent, ScriptedOracle};
pub use protocol::{
    drive, resolve_all, resolve_pair, Answer, Decision, PairResolution, Question,
    ResolutionOutcome,
};
