// crates/retag/src/prompt.rs
// Operator console: every prompt and message the update flow shows

use crate::error::Result;
use dialoguer::{Confirm, Input, Select};
use std::io::BufRead;

/// Console interaction used by the update flow
pub trait Operator {
    /// Print a block of text for the operator
    fn show(&mut self, text: &str);

    /// Free-text question; the raw answer is returned (may be empty)
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no question. Anything other than an explicit yes is `false`.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Choose one of `items`; `None` when nothing was chosen
    fn pick(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    /// One line of piped input; empty at end of input
    fn read_piped_line(&mut self) -> Result<String>;
}

/// `Operator` on the real terminal via dialoguer and stdin
#[derive(Debug, Default)]
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn show(&mut self, text: &str) {
        println!("{}", text);
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
    }

    fn pick(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }
        Ok(Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_opt()?)
    }

    fn read_piped_line(&mut self) -> Result<String> {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}
