//! Classification oracle
//!
//! The oracle is whatever can answer questions about two Ents: a person at
//! a terminal, a scripted test, a remote client. The resolution protocol
//! blocks on each call; cancellation is up to the implementation, which can
//! abandon a pair by declining.

use std::collections::VecDeque;

use crate::errors::ConflictReason;
use crate::model::Ent;

/// What the protocol asks about the order of a pair `(a, b)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderQuestion {
    /// Both orderings are legal: pick one, or neither
    Either,
    /// Only `a -> b` is legal: confirm it
    ForcedAParent,
    /// Only `b -> a` is legal: confirm it
    ForcedBParent,
}

/// Answer to an [`OrderQuestion`]
///
/// For a forced question, answering with the forced direction confirms it
/// and anything else declines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAnswer {
    AParentOfB,
    BParentOfA,
    Neither,
}

impl OrderAnswer {
    /// Check if this answer accepts the direction a forced question offers
    pub fn confirms(self, question: OrderQuestion) -> bool {
        matches!(
            (question, self),
            (OrderQuestion::ForcedAParent, OrderAnswer::AParentOfB)
                | (OrderQuestion::ForcedBParent, OrderAnswer::BParentOfA)
        )
    }
}

/// Progress reported back to the oracle's front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionEvent {
    PairFound {
        a: String,
        b: String,
    },
    MarkedExclusive {
        a: String,
        b: String,
    },
    MarkedOverlap {
        a: String,
        b: String,
    },
    Ordered {
        parent: String,
        child: String,
        pruned: usize,
    },
    LeftUnresolved {
        a: String,
        b: String,
    },
    Conflict {
        a: String,
        b: String,
        reason: ConflictReason,
        conflicts: Vec<String>,
    },
}

impl std::fmt::Display for ResolutionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionEvent::PairFound { a, b } => {
                write!(f, "Additional information required for {} and {}.", a, b)
            }
            ResolutionEvent::MarkedExclusive { a, b } => {
                write!(f, "OK, {} and {} are exclusive now.", a, b)
            }
            ResolutionEvent::MarkedOverlap { a, b } => {
                write!(f, "OK, {} and {} overlap now.", a, b)
            }
            ResolutionEvent::Ordered {
                parent,
                child,
                pruned,
            } => {
                write!(f, "{} is now a parent of {}.", parent, child)?;
                if *pruned > 0 {
                    write!(f, " Removed {} redundant edge(s).", pruned)?;
                }
                Ok(())
            }
            ResolutionEvent::LeftUnresolved { a, b } => write!(
                f,
                "{} and {} were left unrelated; the hierarchy is incomplete.",
                a, b
            ),
            ResolutionEvent::Conflict {
                a,
                b,
                reason,
                conflicts,
            } => write!(
                f,
                "Error: cannot relate {} and {}: {} (conflicting: {}).",
                a,
                b,
                reason,
                conflicts.join(", ")
            ),
        }
    }
}

/// Source of answers for the resolution protocol
pub trait Oracle {
    /// Are `a` and `b` disjoint sets?
    fn ask_exclusive(&mut self, a: &Ent, b: &Ent) -> bool;

    /// Do `a` and `b` partially intersect?
    fn ask_overlap(&mut self, a: &Ent, b: &Ent) -> bool;

    /// Which of `a` and `b` contains the other?
    fn ask_order(&mut self, a: &Ent, b: &Ent, question: OrderQuestion) -> OrderAnswer;

    /// Receive a progress or error report
    fn report(&mut self, _event: &ResolutionEvent) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scripted {
    Exclusive(bool),
    Overlap(bool),
    Order(OrderAnswer),
}

/// Oracle that replays a fixed list of answers
///
/// Answers are consumed in order. When the next scripted answer is for a
/// different question, or the script is exhausted, the oracle declines
/// (`false` / `Neither`) without consuming anything. Every question and
/// report is recorded for later inspection.
///
/// # Example
///
/// ```
/// use ents_core::resolution::{OrderAnswer, ScriptedOracle};
///
/// let oracle = ScriptedOracle::new()
///     .exclusive(false)
///     .overlap(false)
///     .order(OrderAnswer::AParentOfB);
/// assert_eq!(oracle.remaining(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    script: VecDeque<Scripted>,
    asked: Vec<String>,
    events: Vec<ResolutionEvent>,
}

impl ScriptedOracle {
    /// An oracle with an empty script, which declines everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclusive(mut self, answer: bool) -> Self {
        self.script.push_back(Scripted::Exclusive(answer));
        self
    }

    pub fn overlap(mut self, answer: bool) -> Self {
        self.script.push_back(Scripted::Overlap(answer));
        self
    }

    pub fn order(mut self, answer: OrderAnswer) -> Self {
        self.script.push_back(Scripted::Order(answer));
        self
    }

    /// Questions asked so far, as `"<kind> <a> <b>"`
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Reports received so far
    pub fn events(&self) -> &[ResolutionEvent] {
        &self.events
    }

    /// Scripted answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn take(&mut self, matches: impl Fn(&Scripted) -> bool) -> Option<Scripted> {
        if self.script.front().is_some_and(matches) {
            self.script.pop_front()
        } else {
            None
        }
    }
}

impl Oracle for ScriptedOracle {
    fn ask_exclusive(&mut self, a: &Ent, b: &Ent) -> bool {
        self.asked.push(format!("exclusive {} {}", a.name(), b.name()));
        matches!(
            self.take(|s| matches!(s, Scripted::Exclusive(_))),
            Some(Scripted::Exclusive(true))
        )
    }

    fn ask_overlap(&mut self, a: &Ent, b: &Ent) -> bool {
        self.asked.push(format!("overlap {} {}", a.name(), b.name()));
        matches!(
            self.take(|s| matches!(s, Scripted::Overlap(_))),
            Some(Scripted::Overlap(true))
        )
    }

    fn ask_order(&mut self, a: &Ent, b: &Ent, question: OrderQuestion) -> OrderAnswer {
        self.asked
            .push(format!("order {} {} {:?}", a.name(), b.name(), question));
        match self.take(|s| matches!(s, Scripted::Order(_))) {
            Some(Scripted::Order(answer)) => answer,
            _ => OrderAnswer::Neither,
        }
    }

    fn report(&mut self, event: &ResolutionEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntId;

    fn ents() -> (Ent, Ent) {
        (
            Ent::new(EntId::new(1), "a".to_string()),
            Ent::new(EntId::new(2), "b".to_string()),
        )
    }

    #[test]
    fn test_confirms_only_forced_direction() {
        assert!(OrderAnswer::AParentOfB.confirms(OrderQuestion::ForcedAParent));
        assert!(!OrderAnswer::BParentOfA.confirms(OrderQuestion::ForcedAParent));
        assert!(!OrderAnswer::Neither.confirms(OrderQuestion::ForcedBParent));
        assert!(!OrderAnswer::AParentOfB.confirms(OrderQuestion::Either));
    }

    #[test]
    fn test_empty_script_declines_everything() {
        let (a, b) = ents();
        let mut oracle = ScriptedOracle::new();

        assert!(!oracle.ask_exclusive(&a, &b));
        assert!(!oracle.ask_overlap(&a, &b));
        assert_eq!(
            oracle.ask_order(&a, &b, OrderQuestion::Either),
            OrderAnswer::Neither
        );
        assert_eq!(oracle.asked().len(), 3);
    }

    #[test]
    fn test_mismatched_answer_is_not_consumed() {
        let (a, b) = ents();
        let mut oracle = ScriptedOracle::new().overlap(true);

        assert!(!oracle.ask_exclusive(&a, &b));
        assert_eq!(oracle.remaining(), 1);
        assert!(oracle.ask_overlap(&a, &b));
        assert_eq!(oracle.remaining(), 0);
    }

    #[test]
    fn test_event_messages() {
        let event = ResolutionEvent::Ordered {
            parent: "Animal".into(),
            child: "Mammal".into(),
            pruned: 1,
        };
        assert_eq!(
            event.to_string(),
            "Animal is now a parent of Mammal. Removed 1 redundant edge(s)."
        );
    }
}
