//! Show command
//!
//! Usage: ents show <PATH>

use std::path::PathBuf;

use clap::Args;
use ents_core::{snapshot, EngineConfig, EntId, Tree};

use super::CommandResult;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Snapshot file to print
    pub path: PathBuf,
}

/// Execute show command
pub fn execute(args: ShowArgs, config: EngineConfig) -> CommandResult {
    let tree = snapshot::load(&args.path, config)?;
    print!("{}", render_tree(&tree));
    Ok(())
}

/// Render a Tree as an indented outline, one Ent per line
///
/// An Ent with several parents appears under each of them. Exclusive and
/// overlap markers follow the name in brackets.
pub fn render_tree(tree: &Tree) -> String {
    let mut out = format!("{}\n", tree.name());
    render_ent(tree, tree.root(), 0, &mut out);
    out
}

fn render_ent(tree: &Tree, id: EntId, depth: usize, out: &mut String) {
    let Ok(ent) = tree.get(id) else {
        return;
    };

    out.push_str(&"  ".repeat(depth));
    out.push_str(ent.name());
    for (label, ids) in [("excl", ent.exclusives()), ("overlap", ent.overlaps())] {
        if !ids.is_empty() {
            let names: Vec<String> = ids.iter().map(|other| tree.display_name(*other)).collect();
            out.push_str(&format!(" [{}: {}]", label, names.join(", ")));
        }
    }
    out.push('\n');

    if depth >= tree.config().max_traversal_depth {
        return;
    }
    for child in ent.children() {
        render_ent(tree, *child, depth + 1, out);
    }
}
