use std::collections::BTreeSet;
use std::time::Instant;

use crate::analysis::{find_estranged_pair, EstrangedPair};
use crate::errors::{ConflictReason, EntsError, Result};
use crate::model::EntId;
use crate::ops::relation_ops::names_of;
use crate::ops::{
    connect_and_prune, parental_conflicts, set_exclusive, set_overlap, Edge, Tree,
};
use crate::{log_op_end, log_op_error, log_op_start};

use super::oracle::{Oracle, OrderAnswer, OrderQuestion, ResolutionEvent};

/// Result of resolving one pair, or all pairs under a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Every pair of children is classified
    NoPairsFound,
    /// The pair was classified
    PairResolved,
    /// The oracle declined to relate a pair; it stays estranged
    PairUnresolved,
}

impl std::fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ResolutionOutcome::NoPairsFound => "NoPairsFound",
            ResolutionOutcome::PairResolved => "PairResolved",
            ResolutionOutcome::PairUnresolved => "PairUnresolved",
        };
        f.write_str(text)
    }
}

/// The question a paused [`PairResolution`] is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Exclusive,
    Overlap,
    Order(OrderQuestion),
}

/// An answer fed into a [`PairResolution`]
///
/// A yes/no question treats anything but `Yes` as no. An order question
/// treats anything but `Order(..)` as `Neither`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Order(OrderAnswer),
}

impl From<bool> for Answer {
    fn from(yes: bool) -> Self {
        if yes {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

/// What the protocol concluded about a pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Exclusive,
    Overlap,
    Order { parent: EntId, child: EntId },
    Unresolved,
    Conflict {
        reason: ConflictReason,
        conflicts: BTreeSet<EntId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PairState {
    AskExclusive,
    AskOverlap,
    AskOrder(OrderQuestion),
    Done(Decision),
}

/// Resolution state for one estranged pair
///
/// A plain value: the host reads [`question`](Self::question), obtains an
/// answer however it likes, and feeds it to [`answer`](Self::answer). The
/// Tree is only read while answering; mutation happens in
/// [`apply`](Self::apply) once a decision is reached. This lets a host pause
/// between questions as long as nothing else mutates the Tree meanwhile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairResolution {
    pair: EstrangedPair,
    state: PairState,
    conflicts: BTreeSet<EntId>,
}

impl PairResolution {
    pub fn new(pair: EstrangedPair) -> Self {
        Self {
            pair,
            state: PairState::AskExclusive,
            conflicts: BTreeSet::new(),
        }
    }

    pub fn pair(&self) -> EstrangedPair {
        self.pair
    }

    /// The pending question, or `None` once decided
    pub fn question(&self) -> Option<Question> {
        match self.state {
            PairState::AskExclusive => Some(Question::Exclusive),
            PairState::AskOverlap => Some(Question::Overlap),
            PairState::AskOrder(question) => Some(Question::Order(question)),
            PairState::Done(_) => None,
        }
    }

    /// The decision, once reached
    pub fn decision(&self) -> Option<&Decision> {
        match &self.state {
            PairState::Done(decision) => Some(decision),
            _ => None,
        }
    }

    /// Ents that make one or both orderings illegal
    pub fn conflicts(&self) -> &BTreeSet<EntId> {
        &self.conflicts
    }

    /// Feed the answer to the pending question
    ///
    /// Answering a decided resolution does nothing.
    ///
    /// # Errors
    ///
    /// Returns `EntNotFound` if the pair's Ents are not in this Tree.
    pub fn answer(&mut self, tree: &Tree, answer: Answer) -> Result<()> {
        let EstrangedPair { a, b } = self.pair;

        let next = match (&self.state, answer) {
            (PairState::AskExclusive, Answer::Yes) => PairState::Done(Decision::Exclusive),
            (PairState::AskExclusive, _) => PairState::AskOverlap,
            (PairState::AskOverlap, Answer::Yes) => PairState::Done(Decision::Overlap),
            (PairState::AskOverlap, _) => {
                let (state, conflicts) = order_state(tree, a, b)?;
                self.conflicts = conflicts;
                state
            }
            (PairState::AskOrder(question), answer) => {
                let answer = match answer {
                    Answer::Order(order) => order,
                    _ => OrderAnswer::Neither,
                };
                self.decide_order(*question, answer, a, b)
            }
            (PairState::Done(_), _) => return Ok(()),
        };
        self.state = next;
        Ok(())
    }

    fn decide_order(
        &self,
        question: OrderQuestion,
        answer: OrderAnswer,
        a: EntId,
        b: EntId,
    ) -> PairState {
        let decision = match question {
            OrderQuestion::Either => match answer {
                OrderAnswer::AParentOfB => Decision::Order {
                    parent: a,
                    child: b,
                },
                OrderAnswer::BParentOfA => Decision::Order {
                    parent: b,
                    child: a,
                },
                OrderAnswer::Neither => Decision::Unresolved,
            },
            forced if answer.confirms(forced) => {
                let (parent, child) = if forced == OrderQuestion::ForcedAParent {
                    (a, b)
                } else {
                    (b, a)
                };
                Decision::Order { parent, child }
            }
            _ => Decision::Conflict {
                reason: ConflictReason::ForcedOrderDeclined,
                conflicts: self.conflicts.clone(),
            },
        };
        PairState::Done(decision)
    }

    /// Apply the decision to the Tree
    ///
    /// Returns the edges pruned by an ordering decision. Undecided,
    /// unresolved and conflicting resolutions leave the Tree untouched.
    ///
    /// # Errors
    ///
    /// Returns `EntNotFound` if the pair's Ents are not in this Tree.
    pub fn apply(&self, tree: &mut Tree) -> Result<Vec<Edge>> {
        let EstrangedPair { a, b } = self.pair;
        match self.decision() {
            Some(Decision::Exclusive) => set_exclusive(tree, a, b).map(|_| Vec::new()),
            Some(Decision::Overlap) => set_overlap(tree, a, b).map(|_| Vec::new()),
            Some(Decision::Order { parent, child }) => connect_and_prune(tree, *parent, *child),
            Some(Decision::Unresolved) | Some(Decision::Conflict { .. }) | None => Ok(Vec::new()),
        }
    }
}

/// The order question for a pair, or a conflict if neither direction is legal
fn order_state(tree: &Tree, a: EntId, b: EntId) -> Result<(PairState, BTreeSet<EntId>)> {
    let a_over_b = parental_conflicts(tree, a, b)?;
    let b_over_a = parental_conflicts(tree, b, a)?;
    let conflicts: BTreeSet<EntId> = a_over_b.union(&b_over_a).copied().collect();

    let state = match (a_over_b.is_empty(), b_over_a.is_empty()) {
        (true, true) => PairState::AskOrder(OrderQuestion::Either),
        (true, false) => PairState::AskOrder(OrderQuestion::ForcedAParent),
        (false, true) => PairState::AskOrder(OrderQuestion::ForcedBParent),
        (false, false) => PairState::Done(Decision::Conflict {
            reason: ConflictReason::BothOrderingsIllegal,
            conflicts: conflicts.clone(),
        }),
    };
    Ok((state, conflicts))
}

/// Ask the oracle the pending questions until a decision is reached
///
/// # Errors
///
/// Returns `EntNotFound` if the pair's Ents are not in this Tree.
pub fn drive(
    tree: &Tree,
    resolution: &mut PairResolution,
    oracle: &mut dyn Oracle,
) -> Result<()> {
    let EstrangedPair { a, b } = resolution.pair();
    while let Some(question) = resolution.question() {
        let (ent_a, ent_b) = (tree.get(a)?, tree.get(b)?);
        let answer = match question {
            Question::Exclusive => Answer::from(oracle.ask_exclusive(ent_a, ent_b)),
            Question::Overlap => Answer::from(oracle.ask_overlap(ent_a, ent_b)),
            Question::Order(order) => Answer::Order(oracle.ask_order(ent_a, ent_b, order)),
        };
        resolution.answer(tree, answer)?;
    }
    Ok(())
}

/// Classify one estranged pair with the oracle's help
///
/// Exclusive and overlap answers are recorded directly. An ordering is
/// applied with `connect_and_prune`, after which the new parent's children
/// are resolved in turn.
///
/// # Errors
///
/// * `ResolutionConflict` - If both orderings are illegal, or the only legal
///   one was declined. The Tree is unchanged by this pair.
/// * `EntNotFound` - If the pair's Ents are not in this Tree
pub fn resolve_pair(
    tree: &mut Tree,
    pair: EstrangedPair,
    oracle: &mut dyn Oracle,
) -> Result<ResolutionOutcome> {
    resolve_pair_tracked(tree, pair, oracle).map(|(outcome, _)| outcome)
}

/// Resolve pairs under `parent` until every child pair is classified
///
/// Returns `NoPairsFound` when the children are fully classified, and
/// `PairUnresolved` when the oracle left a pair unrelated, either directly
/// under `parent` or in a subtree reached by recursion. Conflicts are
/// propagated without retry.
///
/// # Errors
///
/// * `ResolutionConflict` - See [`resolve_pair`]
/// * `EntNotFound` - If `parent` is not an Ent of this Tree
pub fn resolve_all(
    tree: &mut Tree,
    parent: EntId,
    oracle: &mut dyn Oracle,
) -> Result<ResolutionOutcome> {
    let start = Instant::now();
    log_op_start!("resolve_all", parent = %tree.display_name(parent));

    match resolve_all_inner(tree, parent, oracle) {
        Ok((outcome, resolved)) => {
            log_op_end!(
                "resolve_all",
                duration_ms = start.elapsed().as_millis() as u64,
                parent = %tree.display_name(parent),
                outcome = %outcome,
                resolved
            );
            Ok(outcome)
        }
        Err(err) => {
            log_op_error!(
                "resolve_all",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                parent = %tree.display_name(parent)
            );
            Err(err)
        }
    }
}

fn resolve_all_inner(
    tree: &mut Tree,
    parent: EntId,
    oracle: &mut dyn Oracle,
) -> Result<(ResolutionOutcome, usize)> {
    tree.get(parent)?;
    let mut incomplete = false;
    let mut resolved = 0usize;

    while let Some(pair) = find_estranged_pair(tree, parent)? {
        let (outcome, left_below) = resolve_pair_tracked(tree, pair, oracle)?;
        incomplete |= left_below;
        if outcome == ResolutionOutcome::PairUnresolved {
            return Ok((ResolutionOutcome::PairUnresolved, resolved));
        }
        resolved += 1;
    }

    let outcome = if incomplete {
        ResolutionOutcome::PairUnresolved
    } else {
        ResolutionOutcome::NoPairsFound
    };
    Ok((outcome, resolved))
}

/// Resolve one pair; the flag reports a pair left unresolved by recursion
fn resolve_pair_tracked(
    tree: &mut Tree,
    pair: EstrangedPair,
    oracle: &mut dyn Oracle,
) -> Result<(ResolutionOutcome, bool)> {
    let start = Instant::now();
    let (name_a, name_b) = (tree.display_name(pair.a), tree.display_name(pair.b));
    log_op_start!("resolve_pair", a = %name_a, b = %name_b);

    let result = resolve_pair_inner(tree, pair, oracle, name_a.clone(), name_b.clone());
    match &result {
        Ok((outcome, _)) => {
            log_op_end!(
                "resolve_pair",
                duration_ms = start.elapsed().as_millis() as u64,
                a = %name_a,
                b = %name_b,
                outcome = %outcome
            );
        }
        Err(err) => {
            log_op_error!(
                "resolve_pair",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                a = %name_a,
                b = %name_b
            );
        }
    }
    result
}

fn resolve_pair_inner(
    tree: &mut Tree,
    pair: EstrangedPair,
    oracle: &mut dyn Oracle,
    name_a: String,
    name_b: String,
) -> Result<(ResolutionOutcome, bool)> {
    oracle.report(&ResolutionEvent::PairFound {
        a: name_a.clone(),
        b: name_b.clone(),
    });

    let mut resolution = PairResolution::new(pair);
    drive(tree, &mut resolution, oracle)?;
    let pruned = resolution.apply(tree)?;

    match resolution.decision() {
        Some(Decision::Exclusive) => {
            oracle.report(&ResolutionEvent::MarkedExclusive {
                a: name_a,
                b: name_b,
            });
            Ok((ResolutionOutcome::PairResolved, false))
        }
        Some(Decision::Overlap) => {
            oracle.report(&ResolutionEvent::MarkedOverlap {
                a: name_a,
                b: name_b,
            });
            Ok((ResolutionOutcome::PairResolved, false))
        }
        Some(Decision::Order { parent, child }) => {
            let parent = *parent;
            oracle.report(&ResolutionEvent::Ordered {
                parent: tree.display_name(parent),
                child: tree.display_name(*child),
                pruned: pruned.len(),
            });
            let below = resolve_all(tree, parent, oracle)?;
            Ok((
                ResolutionOutcome::PairResolved,
                below == ResolutionOutcome::PairUnresolved,
            ))
        }
        Some(Decision::Unresolved) | None => {
            oracle.report(&ResolutionEvent::LeftUnresolved {
                a: name_a,
                b: name_b,
            });
            Ok((ResolutionOutcome::PairUnresolved, false))
        }
        Some(Decision::Conflict { reason, conflicts }) => {
            let conflicts = names_of(tree, conflicts);
            oracle.report(&ResolutionEvent::Conflict {
                a: name_a.clone(),
                b: name_b.clone(),
                reason: *reason,
                conflicts: conflicts.clone(),
            });
            Err(EntsError::ResolutionConflict {
                a: name_a,
                b: name_b,
                reason: *reason,
                conflicts,
            })
        }
    }
}
