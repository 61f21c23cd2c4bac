// file: src/modes/mod.rs
// description: console modes and the menu that switches between them
// reference: internal module structure

mod batch;
mod benchmark;
mod controller;
mod interactive;
pub mod questions;

pub use controller::{MenuState, ModeController};
pub use questions::load_questions;

const EXIT_WORDS: [&str; 3] = ["sair", "exit", "quit"];

pub fn is_exit_word(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_WORDS.contains(&input.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_words() {
        assert!(is_exit_word("sair"));
        assert!(is_exit_word(" QUIT "));
        assert!(is_exit_word("Exit"));
        assert!(!is_exit_word("sai"));
        assert!(!is_exit_word(""));
    }
}
