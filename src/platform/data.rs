//! Loading external data with fallbacks
//!
//! A missing or broken data file never stops the game: the error is logged
//! and the built-in data is used instead.

use crate::quiz::{CheatList, DataError, QuestionBank};

/// Parse a fetched/read question file, falling back to the built-in bank
pub fn questions_or_default(source: &str, text: Result<String, DataError>) -> QuestionBank {
    match text.and_then(|t| QuestionBank::from_json(&t)) {
        Ok(bank) => bank,
        Err(e) => {
            log::warn!("Could not load questions from {source}: {e}; using built-in topic");
            QuestionBank::default()
        }
    }
}

/// Parse a fetched/read cheat file, falling back to an empty list
pub fn cheats_or_empty(source: &str, text: Result<String, DataError>) -> CheatList {
    match text.and_then(|t| CheatList::from_json(&t)) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("Could not load cheats from {source}: {e}");
            CheatList::default()
        }
    }
}

/// Read a local data file
#[cfg(not(target_arch = "wasm32"))]
pub fn read_file(path: impl AsRef<std::path::Path>) -> Result<String, DataError> {
    Ok(std::fs::read_to_string(path)?)
}
