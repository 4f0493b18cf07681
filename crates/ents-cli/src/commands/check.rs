//! Check command
//!
//! Usage: ents check <PATH>

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use ents_core::rules::invariants;
use ents_core::{find_all_estranged_pairs, log_op_end, log_op_start, snapshot};
use ents_core::{EngineConfig, EntId, Tree};

use super::CommandResult;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Snapshot file to check
    pub path: PathBuf,
}

/// What a check found, as printable lines
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub violations: Vec<String>,
    pub estranged: Vec<String>,
}

/// Execute check command
///
/// Invariant violations fail the command. Estranged pairs are reported but
/// an incomplete Tree is still valid.
pub fn execute(args: CheckArgs, config: EngineConfig) -> CommandResult {
    let start = Instant::now();
    log_op_start!("check", path = %args.path.display());

    let raw = snapshot::read_snapshot(&args.path)?;
    let tree = Tree::from_snapshot_unvalidated(&raw, config)?;
    let report = check_tree(&tree);

    println!("Tree \"{}\": {} Ents", tree.name(), tree.ent_count());
    for line in &report.violations {
        println!("violation: {}", line);
    }
    for line in &report.estranged {
        println!("unclassified: {}", line);
    }

    log_op_end!(
        "check",
        duration_ms = start.elapsed().as_millis() as u64,
        violations = report.violations.len(),
        estranged = report.estranged.len()
    );

    if report.violations.is_empty() {
        println!("OK");
        Ok(())
    } else {
        Err(format!("{} invariant violation(s)", report.violations.len()).into())
    }
}

/// Run every invariant finder and the estranged-pair scan
pub fn check_tree(tree: &Tree) -> CheckReport {
    let name = |id: EntId| tree.display_name(id);
    let mut violations = Vec::new();

    for (parent, child) in invariants::find_unmirrored_edges(tree) {
        violations.push(format!(
            "edge {} -> {} is recorded on one side only",
            name(parent),
            name(child)
        ));
    }
    for parent in invariants::find_root_parents(tree) {
        violations.push(format!("root has parent {}", name(parent)));
    }
    for orphan in invariants::find_orphans(tree) {
        violations.push(format!("{} has no parent", name(orphan)));
    }
    for ent in invariants::find_cycles(tree) {
        violations.push(format!("{} is on a parent/child cycle", name(ent)));
    }
    for (a, b) in invariants::find_asymmetric_exclusives(tree) {
        violations.push(format!(
            "{} is exclusive with {} but not the reverse",
            name(a),
            name(b)
        ));
    }
    for (a, b) in invariants::find_asymmetric_overlaps(tree) {
        violations.push(format!("{} overlaps {} but not the reverse", name(a), name(b)));
    }
    for (a, b) in invariants::find_contradictory_pairs(tree) {
        violations.push(format!(
            "{} and {} are related in more than one way",
            name(a),
            name(b)
        ));
    }
    // Redundancy is meaningless on a cyclic graph
    if invariants::find_cycles(tree).is_empty() {
        for (parent, child) in invariants::find_redundant_edges(tree) {
            violations.push(format!(
                "edge {} -> {} is implied by a longer path",
                name(parent),
                name(child)
            ));
        }
    }

    let estranged = find_all_estranged_pairs(tree)
        .into_iter()
        .map(|(parent, pair)| {
            format!(
                "{} and {} under {}",
                name(pair.a),
                name(pair.b),
                name(parent)
            )
        })
        .collect();

    CheckReport {
        violations,
        estranged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ents_core::ops::{connect, set_exclusive};

    #[test]
    fn test_clean_tree_reports_estranged_only() {
        let mut tree = Tree::new("t");
        tree.create("Sea").unwrap();
        tree.create("Lake").unwrap();

        let report = check_tree(&tree);

        assert!(report.violations.is_empty());
        assert_eq!(report.estranged, vec!["Sea and Lake under root".to_string()]);
    }

    #[test]
    fn test_redundant_edge_is_reported() {
        let mut tree = Tree::new("t");
        let a = tree.create("a").unwrap();
        let b = tree.add_under_parent("b", Some(a)).unwrap();
        let root = tree.root();
        connect(&mut tree, root, b).unwrap();

        let report = check_tree(&tree);

        assert_eq!(
            report.violations,
            vec!["edge root -> b is implied by a longer path".to_string()]
        );
    }

    #[test]
    fn test_marker_between_classified_siblings() {
        let mut tree = Tree::new("t");
        let a = tree.create("a").unwrap();
        let b = tree.create("b").unwrap();
        set_exclusive(&mut tree, a, b).unwrap();

        let report = check_tree(&tree);

        assert!(report.violations.is_empty());
        assert!(report.estranged.is_empty());
    }
}
