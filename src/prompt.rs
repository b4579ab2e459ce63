//! Interactive overwrite confirmation.

use std::io::{self, IsTerminal};
use tracing::warn;

/// Answers yes/no questions posed by the batch driver.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on the terminal with a `[y/N]` confirmation.
///
/// Escaping the prompt, or running without a terminal to ask on, counts as a no.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
            warn!(question, "no terminal to ask on, answering no");
            return Ok(false);
        }

        let answer = dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact_opt()
            .map_err(io::Error::other)?;
        Ok(answer.unwrap_or(false))
    }
}

/// Replays canned answers in order and records every question asked.
///
/// Once the answers run out, every further question is answered no.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAnswers {
    answers: Vec<bool>,
    asked: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        let mut answers: Vec<bool> = answers.into_iter().collect();
        answers.reverse();
        Self {
            answers,
            asked: Vec::new(),
        }
    }

    /// The questions asked so far, oldest first.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Confirm for ScriptedAnswers {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop().unwrap_or(false))
    }
}
