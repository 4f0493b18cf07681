//! Shell command
//!
//! Usage: ents shell [--file <PATH>] [--name <NAME>]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use ents_core::ops::{ancestors, descendants};
use ents_core::resolution::{insert_edge, insert_ent, resolve_all, ResolutionOutcome};
use ents_core::{snapshot, EngineConfig, Ent, EntId, EntsError, Tree};

use crate::stdio_oracle::StdioOracle;

use super::CommandResult;

#[derive(Debug, Args)]
pub struct ShellArgs {
    /// Snapshot to open; created on first save if it does not exist
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Name for a new Tree
    #[arg(short, long, default_value = "ents")]
    pub name: String,
}

/// Execute shell command
pub fn execute(args: ShellArgs, config: EngineConfig) -> CommandResult {
    let max_attempts = config.max_answer_attempts;
    let tree = match &args.file {
        Some(path) if path.exists() => snapshot::load(path, config)?,
        _ => Tree::with_config(args.name, config),
    };

    let stdin = io::stdin();
    let oracle = StdioOracle::new(stdin.lock(), io::stdout(), max_attempts);
    let mut shell = Shell::new(tree, args.file, oracle);
    shell.run()?;
    Ok(())
}

const HELP: &str = "\
Commands with no argument:
\tf\t\tPrint the Ent of focus
\tp\t\tList the focus' parents
\tc\t\tList the focus' children
\ts\t\tList the focus' siblings, by parent
\tanc\t\tList the focus' ancestors
\tdesc\t\tList the focus' descendants
\ta\t\tClassify the focus' children
\tsave\t\tSave to the current file
\th, help\t\tPrint this help
\texit\t\tLeave the shell
Commands with one argument:
\tf NAME\t\tChange focus to NAME
\tn NAME\t\tCreate NAME under root and focus it
\tp NAME\t\tMake NAME a parent of the focus
\tsave PATH\tSave to PATH and remember it";

/// Interactive session with a focus Ent
///
/// Commands and oracle answers are read from the same input, so questions
/// raised by a command are answered inline before the next command.
pub struct Shell<R, W> {
    tree: Tree,
    focus: EntId,
    file: Option<PathBuf>,
    io: StdioOracle<R, W>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(tree: Tree, file: Option<PathBuf>, io: StdioOracle<R, W>) -> Self {
        let focus = tree.root();
        Self {
            tree,
            focus,
            file,
            io,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_parts(self) -> (Tree, W) {
        (self.tree, self.io.into_output())
    }

    /// Read and run commands until `exit` or end of input
    ///
    /// # Errors
    ///
    /// Returns an error only if the output cannot be written.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.io.output(), "Tree: {}", self.tree.name())?;
        self.print_focus()?;

        loop {
            write!(self.io.output(), ">")?;
            self.io.output().flush()?;
            let Some(line) = self.io.read_line() else {
                writeln!(self.io.output())?;
                return Ok(());
            };

            let line = line.trim();
            let (command, argument) = match line.split_once(char::is_whitespace) {
                Some((command, rest)) => (command, Some(rest.trim())),
                None => (line, None),
            };
            tracing::debug!(command, "shell command");

            match (command, argument) {
                ("", None) => {}
                ("exit" | "e", None) => {
                    writeln!(self.io.output(), "Exiting...")?;
                    return Ok(());
                }
                ("h" | "help", None) => writeln!(self.io.output(), "{}", HELP)?,
                ("f", None) => self.print_focus()?,
                ("f", Some(name)) => self.change_focus(name)?,
                ("n", Some(name)) => self.new_ent(name)?,
                ("p", None) => self.list_parents()?,
                ("p", Some(name)) => self.add_parent(name)?,
                ("c", None) => self.list_children()?,
                ("s", None) => self.list_siblings()?,
                ("anc", None) => self.list_ancestors()?,
                ("desc", None) => self.list_descendants()?,
                ("a", None) => self.resolve_focus()?,
                ("save", path) => self.save(path)?,
                _ => writeln!(self.io.output(), "Unknown command. Type h for help.")?,
            }
        }
    }

    fn focus_name(&self) -> String {
        self.tree.display_name(self.focus)
    }

    fn print_focus(&mut self) -> io::Result<()> {
        let name = self.focus_name();
        writeln!(self.io.output(), "Focus: {}", name)
    }

    fn print_names(&mut self, ids: impl IntoIterator<Item = EntId>) -> io::Result<()> {
        let names: Vec<String> = ids
            .into_iter()
            .map(|id| self.tree.display_name(id))
            .collect();
        for name in names {
            writeln!(self.io.output(), "\t{}", name)?;
        }
        Ok(())
    }

    fn report_error(&mut self, err: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.io.output(), "Error: {}", err)
    }

    fn report_outcome(&mut self, outcome: ResolutionOutcome) -> io::Result<()> {
        match outcome {
            ResolutionOutcome::NoPairsFound | ResolutionOutcome::PairResolved => Ok(()),
            ResolutionOutcome::PairUnresolved => writeln!(
                self.io.output(),
                "Some pairs were left unclassified; the hierarchy is incomplete."
            ),
        }
    }

    fn change_focus(&mut self, name: &str) -> io::Result<()> {
        match self.tree.get_by_name(name) {
            None => writeln!(self.io.output(), "No Ent found with that name."),
            Some(id) if id == self.focus => {
                writeln!(self.io.output(), "That Ent is already the focus.")
            }
            Some(id) => {
                self.focus = id;
                self.print_focus()
            }
        }
    }

    fn new_ent(&mut self, name: &str) -> io::Result<()> {
        match insert_ent(&mut self.tree, name, None, &mut self.io) {
            Ok((id, outcome)) => {
                self.focus = id;
                self.print_focus()?;
                self.report_outcome(outcome)
            }
            Err(err @ EntsError::ResolutionConflict { .. }) => {
                // The new Ent stays in the Tree
                if let Some(id) = self.tree.get_by_name(name) {
                    self.focus = id;
                }
                self.report_error(err)
            }
            Err(err) => self.report_error(err),
        }
    }

    fn add_parent(&mut self, name: &str) -> io::Result<()> {
        let Some(parent) = self.tree.get_by_name(name) else {
            return writeln!(self.io.output(), "No Ent found with that name.");
        };
        if parent == self.focus {
            return writeln!(self.io.output(), "Can't add the focus Ent as its own parent.");
        }

        let focus = self.focus_name();
        if self.focus_edges(Ent::parents).contains(&parent) {
            return writeln!(self.io.output(), "{} is already a parent of {}.", name, focus);
        }
        match ancestors(&self.tree, self.focus) {
            Ok(found) if found.contains(&parent) => {
                return writeln!(
                    self.io.output(),
                    "{} is already an ancestor of {}.",
                    name,
                    focus
                );
            }
            Ok(_) => {}
            Err(err) => return self.report_error(err),
        }

        match insert_edge(&mut self.tree, parent, self.focus, &mut self.io) {
            Ok(outcome) => {
                writeln!(self.io.output(), "{} is now a parent of {}.", name, focus)?;
                self.report_outcome(outcome)
            }
            Err(err) => self.report_error(err),
        }
    }

    fn list_parents(&mut self) -> io::Result<()> {
        if self.focus == self.tree.root() {
            return writeln!(self.io.output(), "By definition, root can not have any parents!");
        }
        let parents = self.focus_edges(Ent::parents);
        let name = self.focus_name();
        writeln!(self.io.output(), "Parents of \"{}\":", name)?;
        self.print_names(parents)
    }

    fn list_children(&mut self) -> io::Result<()> {
        let children = self.focus_edges(Ent::children);
        let name = self.focus_name();
        if children.is_empty() {
            return writeln!(self.io.output(), "\"{}\" has no children.", name);
        }
        writeln!(self.io.output(), "Children of \"{}\":", name)?;
        self.print_names(children)
    }

    fn list_siblings(&mut self) -> io::Result<()> {
        if self.focus == self.tree.root() {
            return writeln!(self.io.output(), "By definition, root can not have any siblings.");
        }
        let name = self.focus_name();
        for parent in self.focus_edges(Ent::parents) {
            let siblings: Vec<EntId> = self
                .tree
                .get(parent)
                .map(|p| p.children().to_vec())
                .unwrap_or_default()
                .into_iter()
                .filter(|id| *id != self.focus)
                .collect();

            let parent_name = self.tree.display_name(parent);
            writeln!(
                self.io.output(),
                "Siblings of {} through {}:",
                name,
                parent_name
            )?;
            if siblings.is_empty() {
                writeln!(self.io.output(), "\tNone")?;
            } else {
                self.print_names(siblings)?;
            }
        }
        Ok(())
    }

    fn list_ancestors(&mut self) -> io::Result<()> {
        let name = self.focus_name();
        match ancestors(&self.tree, self.focus) {
            Ok(found) if found.is_empty() => {
                writeln!(self.io.output(), "{} doesn't have any ancestors.", name)
            }
            Ok(found) => {
                writeln!(self.io.output(), "Ancestors of {}:", name)?;
                self.print_names(found)
            }
            Err(err) => self.report_error(err),
        }
    }

    fn list_descendants(&mut self) -> io::Result<()> {
        let name = self.focus_name();
        match descendants(&self.tree, self.focus) {
            Ok(found) if found.is_empty() => {
                writeln!(self.io.output(), "{} doesn't have any descendants.", name)
            }
            Ok(found) => {
                writeln!(self.io.output(), "Descendants of {}:", name)?;
                self.print_names(found)
            }
            Err(err) => self.report_error(err),
        }
    }

    fn resolve_focus(&mut self) -> io::Result<()> {
        match resolve_all(&mut self.tree, self.focus, &mut self.io) {
            Ok(ResolutionOutcome::NoPairsFound) => {
                writeln!(self.io.output(), "No estranged children found.")
            }
            Ok(outcome) => self.report_outcome(outcome),
            Err(err) => self.report_error(err),
        }
    }

    fn save(&mut self, path: Option<&str>) -> io::Result<()> {
        if let Some(path) = path {
            self.file = Some(PathBuf::from(path));
        }
        let Some(path) = self.file.clone() else {
            return writeln!(self.io.output(), "No file given. Use: save PATH");
        };

        match snapshot::save(&self.tree, &path) {
            Ok(()) => writeln!(self.io.output(), "Saved to {}", path.display()),
            Err(err) => {
                self.report_error(err)?;
                writeln!(self.io.output(), "File was not saved.")
            }
        }
    }

    fn focus_edges(&self, edges: fn(&Ent) -> &[EntId]) -> Vec<EntId> {
        self.tree
            .get(self.focus)
            .map(|ent| edges(ent).to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(tree: Tree, input: &str) -> (Tree, String) {
        let io = StdioOracle::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), 3);
        let mut shell = Shell::new(tree, None, io);
        shell.run().unwrap();
        let (tree, out) = shell.into_parts();
        (tree, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_new_ent_is_classified_inline() {
        // Animal vs Mammal: not exclusive, no overlap, Animal is the parent
        let input = "n Animal\nn Mammal\nn\nn\np\nf Animal\nc\nexit\n";
        let (tree, out) = run(Tree::new("zoo"), input);

        let animal = tree.require("Animal").unwrap();
        let mammal = tree.require("Mammal").unwrap();
        assert_eq!(tree.get(mammal).unwrap().parents(), &[animal]);
        assert_eq!(tree.get(tree.root()).unwrap().children(), &[animal]);
        assert!(out.contains("Additional information required for Animal and Mammal."));
        assert!(out.contains("Is Animal the parent or child of Mammal, or neither?"));
        assert!(out.contains("Animal is now a parent of Mammal."));
        assert!(out.contains("Children of \"Animal\":\n\tMammal"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_child_answer_reverses_order() {
        let input = "n Mammal\nn Animal\nn\nn\nc\nc\nexit\n";
        let (tree, out) = run(Tree::new("zoo"), input);

        let animal = tree.require("Animal").unwrap();
        let mammal = tree.require("Mammal").unwrap();
        assert_eq!(tree.get(mammal).unwrap().parents(), &[animal]);
        // Focus stays on the new Ent, Animal
        assert!(out.contains("Children of \"Animal\":\n\tMammal"));
    }

    #[test]
    fn test_unknown_commands_and_names() {
        let (_, out) = run(Tree::new("t"), "frobnicate\nf Ghost\np Ghost\np\ns\nexit\n");

        assert!(out.contains("Unknown command. Type h for help."));
        assert_eq!(out.matches("No Ent found with that name.").count(), 2);
        assert!(out.contains("root can not have any parents"));
        assert!(out.contains("root can not have any siblings"));
    }

    #[test]
    fn test_duplicate_name_is_reported() {
        let (tree, out) = run(Tree::new("t"), "n Rock\nn Rock\nexit\n");

        assert!(out.contains("Error: Name already taken: Rock"));
        assert_eq!(tree.ent_count(), 2);
    }

    #[test]
    fn test_add_parent_refuses_cycle() {
        let mut tree = Tree::new("t");
        let a = tree.create("a").unwrap();
        tree.add_under_parent("b", Some(a)).unwrap();

        let (_, out) = run(tree, "f a\np b\nexit\n");

        assert!(out.contains("Error: b cannot be a parent of a"));
    }

    #[test]
    fn test_add_parent_then_classify() {
        let mut tree = Tree::new("t");
        let animal = tree.create("Animal").unwrap();
        tree.add_under_parent("Bird", Some(animal)).unwrap();
        tree.create("Dog").unwrap();

        // Dog goes under Animal, then Bird/Dog are exclusive
        let (tree, out) = run(tree, "f Dog\np Animal\ny\nexit\n");

        let dog = tree.require("Dog").unwrap();
        let bird = tree.require("Bird").unwrap();
        assert_eq!(tree.get(dog).unwrap().parents(), &[animal]);
        assert!(tree.get(dog).unwrap().is_exclusive_with(bird));
        assert!(out.contains("Animal is now a parent of Dog."));
    }

    #[test]
    fn test_implied_parent_is_not_reported_as_new() {
        let mut tree = Tree::new("t");
        let animal = tree.create("Animal").unwrap();
        let mammal = tree.add_under_parent("Mammal", Some(animal)).unwrap();
        let dog = tree.add_under_parent("Dog", Some(mammal)).unwrap();

        let (tree, out) = run(tree, "f Dog\np Animal\np Mammal\nexit\n");

        assert!(out.contains("Animal is already an ancestor of Dog."));
        assert!(out.contains("Mammal is already a parent of Dog."));
        assert!(!out.contains("is now a parent of"));
        assert_eq!(tree.get(dog).unwrap().parents(), &[mammal]);
    }

    #[test]
    fn test_declined_pair_is_reported_incomplete() {
        let mut tree = Tree::new("t");
        tree.create("Sea").unwrap();
        tree.create("Lake").unwrap();

        let (_, out) = run(tree, "a\nn\nn\nn\nexit\n");

        assert!(out.contains("left unrelated"));
        assert!(out.contains("the hierarchy is incomplete"));
    }

    #[test]
    fn test_save_without_file() {
        let (_, out) = run(Tree::new("t"), "save\n");

        assert!(out.contains("No file given. Use: save PATH"));
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let mut tree = Tree::new("t");
        let a = tree.create("a").unwrap();
        tree.add_under_parent("b", Some(a)).unwrap();

        let (_, out) = run(tree, "f b\nanc\nf root\ndesc\n");

        assert!(out.contains("Ancestors of b:\n\troot\n\ta"));
        assert!(out.contains("Descendants of root:\n\ta\n\tb"));
    }
}
