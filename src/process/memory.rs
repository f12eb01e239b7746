/*!
 * Process Memory
 * Variable store and append-only output log owned by a process
 */

use crate::core::types::Word;
use ahash::RandomState;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Memory {
    variables: HashMap<String, Word, RandomState>,
    output: Vec<String>,
}

impl Memory {
    /// Read a variable, declaring it as 0 on first access
    pub fn read(&mut self, name: &str) -> Word {
        if let Some(&value) = self.variables.get(name) {
            return value;
        }
        self.variables.insert(name.to_string(), 0);
        0
    }

    pub fn write(&mut self, name: &str, value: Word) {
        self.variables.insert(name.to_string(), value);
    }

    /// Non-declaring lookup
    pub fn get(&self, name: &str) -> Option<Word> {
        self.variables.get(name).copied()
    }

    pub fn log(&mut self, entry: String) {
        self.output.push(entry);
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Variables sorted by name
    pub fn variables(&self) -> Vec<(String, Word)> {
        let mut vars: Vec<_> = self
            .variables
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        vars.sort();
        vars
    }
}
