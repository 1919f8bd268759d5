// User-facing questions and notices, injected into the mutations that need them

/// Whoever is on the other end of the keyboard
///
/// `confirm` blocks until the user answers. The TUI, the CLI and tests each
/// bring their own.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Ask a yes/no question
    fn confirm(&self, prompt: &str) -> bool;

    /// Show a notice the user has to acknowledge
    fn alert(&self, message: &str);
}

pub const CLEAR_PROMPT: &str = "Clear all stored articles in this collection?";
pub const DUPLICATE_ON_CREATE: &str = "Collection name already exists.";
pub const DUPLICATE_ON_RENAME: &str = "A collection with that name already exists.";

pub fn delete_prompt(name: &str) -> String {
    format!("Delete collection \"{}\"?", name)
}

/// Prompter with a fixed answer
///
/// Used when the question was already asked somewhere else, like a modal in
/// the TUI or `--yes` on the command line. Notices are kept for the caller.
#[derive(Debug, Default)]
pub struct Answered {
    answer: bool,
    notices: std::cell::RefCell<Vec<String>>,
}

impl Answered {
    pub fn yes() -> Self {
        Self {
            answer: true,
            ..Self::default()
        }
    }

    pub fn no() -> Self {
        Self::default()
    }

    /// Drain whatever notices came in
    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }
}

impl Prompter for Answered {
    fn confirm(&self, _prompt: &str) -> bool {
        self.answer
    }

    fn alert(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_collects_notices() {
        let prompter = Answered::yes();
        assert!(prompter.confirm("anything?"));
        prompter.alert("one");
        prompter.alert("two");
        assert_eq!(prompter.take_notices(), vec!["one", "two"]);
        assert!(prompter.take_notices().is_empty());

        assert!(!Answered::no().confirm("anything?"));
    }

    #[test]
    fn test_delete_prompt_quotes_name() {
        assert_eq!(delete_prompt("Drafts"), "Delete collection \"Drafts\"?");
    }
}
