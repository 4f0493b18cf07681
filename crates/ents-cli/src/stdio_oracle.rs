//! Line-oriented oracle over a reader and a writer
//!
//! Questions are written as prompts and answered one line at a time. An
//! unrecognized reply re-prompts, up to the configured number of attempts,
//! and then counts as a decline. End of input declines immediately.

use std::io::{BufRead, Write};

use ents_core::resolution::{Oracle, OrderAnswer, OrderQuestion, ResolutionEvent};
use ents_core::Ent;

pub struct StdioOracle<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
    write_failed: bool,
}

fn parse_yes_no(reply: &str) -> Option<bool> {
    match reply.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn parse_order(reply: &str) -> Option<OrderAnswer> {
    match reply.to_ascii_lowercase().as_str() {
        "p" | "parent" => Some(OrderAnswer::AParentOfB),
        "c" | "child" => Some(OrderAnswer::BParentOfA),
        "n" | "neither" => Some(OrderAnswer::Neither),
        _ => None,
    }
}

impl<R: BufRead, W: Write> StdioOracle<R, W> {
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        Self {
            input,
            output,
            max_attempts: max_attempts.max(1),
            write_failed: false,
        }
    }

    /// Next input line without its line ending, or `None` at end of input
    pub fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write and flush; the first failure is logged, later ones are dropped
    fn emit(&mut self, text: &str) {
        let result = self
            .output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush());
        if let Err(err) = result {
            if !self.write_failed {
                tracing::warn!(error = %err, "cannot write to oracle output");
            }
            self.write_failed = true;
        }
    }

    /// True once a prompt or report could not be written
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    fn ask<T>(&mut self, prompt: &str, hint: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        for attempt in 1..=self.max_attempts {
            self.emit(prompt);

            let line = self.read_line()?;
            if let Some(answer) = parse(line.trim()) {
                return Some(answer);
            }
            if attempt < self.max_attempts {
                self.emit(&format!("Please answer {}.\n", hint));
            }
        }

        tracing::warn!(attempts = self.max_attempts, "no recognizable answer; declining");
        self.emit("No valid answer; treating it as a decline.\n");
        None
    }

    fn confirm(&mut self, parent: &Ent, child: &Ent) -> bool {
        let prompt = format!(
            "So, {} must be the parent of {}. Correct?\ny/n: ",
            parent.name(),
            child.name()
        );
        self.ask(&prompt, "y or n", parse_yes_no).unwrap_or(false)
    }
}

impl<R: BufRead, W: Write> Oracle for StdioOracle<R, W> {
    fn ask_exclusive(&mut self, a: &Ent, b: &Ent) -> bool {
        let prompt = format!(
            "Are {} and {} exclusive to each other?\ny/n: ",
            a.name(),
            b.name()
        );
        self.ask(&prompt, "y or n", parse_yes_no).unwrap_or(false)
    }

    fn ask_overlap(&mut self, a: &Ent, b: &Ent) -> bool {
        let prompt = format!("Do {} and {} overlap?\ny/n: ", a.name(), b.name());
        self.ask(&prompt, "y or n", parse_yes_no).unwrap_or(false)
    }

    fn ask_order(&mut self, a: &Ent, b: &Ent, question: OrderQuestion) -> OrderAnswer {
        match question {
            OrderQuestion::Either => {
                let prompt = format!(
                    "Is {} the parent or child of {}, or neither?\np/c/n: ",
                    a.name(),
                    b.name()
                );
                self.ask(&prompt, "p, c or n", parse_order)
                    .unwrap_or(OrderAnswer::Neither)
            }
            OrderQuestion::ForcedAParent if self.confirm(a, b) => OrderAnswer::AParentOfB,
            OrderQuestion::ForcedBParent if self.confirm(b, a) => OrderAnswer::BParentOfA,
            _ => OrderAnswer::Neither,
        }
    }

    fn report(&mut self, event: &ResolutionEvent) {
        self.emit(&format!("{}\n", event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ents_core::Tree;
    use std::io::Cursor;

    fn oracle(input: &str, attempts: u32) -> StdioOracle<Cursor<Vec<u8>>, Vec<u8>> {
        StdioOracle::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), attempts)
    }

    fn pair() -> (Ent, Ent) {
        let mut tree = Tree::new("t");
        let a = tree.create("Cat").unwrap();
        let b = tree.create("Dog").unwrap();
        (tree.get(a).unwrap().clone(), tree.get(b).unwrap().clone())
    }

    fn written(oracle: StdioOracle<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(oracle.into_output()).unwrap()
    }

    #[test]
    fn test_yes_answer() {
        let (a, b) = pair();
        let mut oracle = oracle("y\n", 3);

        assert!(oracle.ask_exclusive(&a, &b));
        assert_eq!(
            written(oracle),
            "Are Cat and Dog exclusive to each other?\ny/n: "
        );
    }

    #[test]
    fn test_unrecognized_answer_reprompts() {
        let (a, b) = pair();
        let mut oracle = oracle("maybe\nYES\n", 3);

        assert!(oracle.ask_overlap(&a, &b));
        let out = written(oracle);
        assert_eq!(out.matches("Do Cat and Dog overlap?").count(), 2);
        assert!(out.contains("Please answer y or n."));
    }

    #[test]
    fn test_attempts_exhausted_declines() {
        let (a, b) = pair();
        let mut oracle = oracle("x\nx\nx\ny\n", 3);

        assert!(!oracle.ask_exclusive(&a, &b));
        assert!(written(oracle).contains("treating it as a decline"));
    }

    #[test]
    fn test_end_of_input_declines() {
        let (a, b) = pair();
        let mut oracle = oracle("", 3);

        assert_eq!(
            oracle.ask_order(&a, &b, OrderQuestion::Either),
            OrderAnswer::Neither
        );
    }

    #[test]
    fn test_order_answers() {
        let (a, b) = pair();
        let mut oracle = oracle("c\np\n", 3);

        assert_eq!(
            oracle.ask_order(&a, &b, OrderQuestion::Either),
            OrderAnswer::BParentOfA
        );
        assert_eq!(
            oracle.ask_order(&a, &b, OrderQuestion::Either),
            OrderAnswer::AParentOfB
        );
    }

    #[test]
    fn test_forced_question_confirms_with_yes() {
        let (a, b) = pair();
        let mut oracle = oracle("y\nn\n", 3);

        assert_eq!(
            oracle.ask_order(&a, &b, OrderQuestion::ForcedBParent),
            OrderAnswer::BParentOfA
        );
        assert_eq!(
            oracle.ask_order(&a, &b, OrderQuestion::ForcedAParent),
            OrderAnswer::Neither
        );
        assert!(written(oracle).contains("So, Dog must be the parent of Cat."));
    }

    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_closed_output_is_recorded_and_answers_still_read() {
        let (a, b) = pair();
        let mut oracle = StdioOracle::new(Cursor::new(b"y\n".to_vec()), ClosedOutput, 3);

        assert!(oracle.ask_exclusive(&a, &b));
        assert!(oracle.write_failed());
    }

    #[test]
    fn test_successful_writes_leave_no_failure() {
        let (a, b) = pair();
        let mut oracle = oracle("n\n", 3);

        assert!(!oracle.ask_overlap(&a, &b));
        assert!(!oracle.write_failed());
    }
}
