//! Arena-owned state machine

use super::loader::{self, TransitionTableLoader};
use super::state::{State, StateId};
use super::TableError;
use crate::config::compile_time::table_loading::MAX_STATES;
use crate::logging::codes;
use crate::{log_error, log_success};
use std::collections::HashMap;
use std::path::Path;

/// Single-byte input alphabet; wider characters never transition
pub const ALPHABET_SIZE: usize = 256;

/// States of one transition table plus the symbol-to-class map.
///
/// Read-only once loaded, apart from re-pointing the entry state.
#[derive(Debug, Clone)]
pub struct StateMachine {
    states: Vec<State>,
    index: HashMap<String, StateId>,
    alphabet: Vec<char>,
    classes: [Option<usize>; ALPHABET_SIZE],
    entry: Option<StateId>,
}

impl StateMachine {
    /// A machine with no states; every traversal stays at "no token"
    pub fn empty() -> Self {
        Self::with_alphabet(Vec::new())
    }

    /// Load a table, propagating resource failures
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let source = loader::read_table_source(path)?;
        let (machine, report) = TransitionTableLoader::parse(&source);

        if machine.len() > MAX_STATES {
            return Err(TableError::TooManyStates {
                count: machine.len(),
            });
        }

        log_success!(codes::success::TABLE_LOADED, "Transition table loaded",
            "table" => path.display(),
            "states" => machine.len(),
            "symbols" => machine.alphabet.len(),
            "dangling_transitions" => report.dangling_transitions,
            "absent_columns" => report.absent_columns
        );

        Ok(machine)
    }

    /// Load a table; an unreadable resource yields an empty machine
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(machine) => machine,
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "table" => path.display()
                );
                Self::empty()
            }
        }
    }

    pub(super) fn with_alphabet(alphabet: Vec<char>) -> Self {
        let mut classes = [None; ALPHABET_SIZE];
        for (class, symbol) in alphabet.iter().enumerate() {
            if let Some(slot) = classes.get_mut(*symbol as usize) {
                if slot.is_none() {
                    *slot = Some(class);
                }
            }
        }

        Self {
            states: Vec::new(),
            index: HashMap::new(),
            alphabet,
            classes,
            entry: None,
        }
    }

    /// Append a state; the first one added becomes the entry state
    pub(super) fn add_state(&mut self, name: &str, accepted_name: Option<&str>) -> StateId {
        let id = self.states.len();
        self.states
            .push(State::new(name, accepted_name, self.alphabet.len()));
        self.index.insert(name.to_string(), id);

        if self.entry.is_none() {
            self.entry = Some(id);
        }

        id
    }

    pub(super) fn add_transition(&mut self, from: StateId, class: usize, to: StateId) -> bool {
        self.states
            .get_mut(from)
            .map(|state| state.add_transition(class, to))
            .unwrap_or(false)
    }

    pub fn get_state(&self, name: &str) -> Option<&State> {
        self.state_id(name).map(|id| &self.states[id])
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    /// State by id. Ids handed out by this machine are always valid.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Entry point of every traversal; `None` only for an empty machine
    pub fn entry(&self) -> Option<StateId> {
        self.entry
    }

    /// Re-point the entry state at a declared state
    pub fn set_entry(&mut self, name: &str) -> Result<(), TableError> {
        let id = self.state_id(name).ok_or_else(|| TableError::UnknownState {
            name: name.to_string(),
        })?;
        self.entry = Some(id);
        Ok(())
    }

    /// Alphabet class of a character, if it appears in the table header
    pub fn class_of(&self, symbol: char) -> Option<usize> {
        self.classes.get(symbol as usize).copied().flatten()
    }

    /// Successor of `state` on `symbol`
    pub fn transition(&self, state: StateId, symbol: char) -> Option<StateId> {
        let class = self.class_of(symbol)?;
        self.states.get(state)?.destination(class)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Distinct header symbols in column order
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const LETTER_TABLE: &str = "Valid Chars,Accepted,a,b\n0,,1,\n1,Letter,,\n";

    #[test]
    fn test_lookup_by_name_and_id() {
        let (machine, _) = TransitionTableLoader::parse(LETTER_TABLE);

        assert_eq!(machine.len(), 2);
        assert_eq!(machine.entry(), machine.state_id("0"));

        let one = machine.get_state("1").unwrap();
        assert_eq!(one.accepted_name(), Some("Letter"));
        assert!(one.is_dead());
        assert!(machine.get_state("2").is_none());
    }

    #[test]
    fn test_transition_lookup() {
        let (machine, _) = TransitionTableLoader::parse(LETTER_TABLE);
        let zero = machine.state_id("0").unwrap();
        let one = machine.state_id("1").unwrap();

        assert_eq!(machine.transition(zero, 'a'), Some(one));
        assert_eq!(machine.transition(zero, 'b'), None);
        assert_eq!(machine.transition(zero, 'z'), None);
        assert_eq!(machine.transition(zero, 'é'), None);
        assert_eq!(machine.transition(zero, '\u{3a3}'), None);
        assert_eq!(machine.transition(one, 'a'), None);
    }

    #[test]
    fn test_set_entry() {
        let (mut machine, _) = TransitionTableLoader::parse(LETTER_TABLE);
        let one = machine.state_id("1");

        machine.set_entry("1").unwrap();
        assert_eq!(machine.entry(), one);

        assert_matches!(
            machine.set_entry("Start"),
            Err(TableError::UnknownState { name }) if name == "Start"
        );
        assert_eq!(machine.entry(), one);
    }

    #[test]
    fn test_empty_machine() {
        let machine = StateMachine::empty();
        assert!(machine.is_empty());
        assert_eq!(machine.entry(), None);
        assert_eq!(machine.transition(0, 'a'), None);
    }

    #[test]
    fn test_try_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, LETTER_TABLE).unwrap();

        let machine = StateMachine::try_load(&path).unwrap();
        assert_eq!(machine.len(), 2);
        assert_eq!(machine.alphabet(), &['a', 'b']);
    }

    #[test]
    fn test_unreadable_table_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        assert_matches!(
            StateMachine::try_load(&path),
            Err(TableError::Unreadable { .. })
        );
        assert!(StateMachine::load(&path).is_empty());
    }
}
