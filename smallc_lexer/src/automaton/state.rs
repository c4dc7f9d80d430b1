//! A single automaton state

/// Index of a state inside its owning `StateMachine`
pub type StateId = usize;

/// One row of a transition table.
///
/// `transitions` is dense and indexed by alphabet column; `None` means no
/// transition for that symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    name: String,
    accepted_name: Option<String>,
    transitions: Vec<Option<StateId>>,
    transition_count: usize,
}

impl State {
    pub(crate) fn new(name: &str, accepted_name: Option<&str>, columns: usize) -> Self {
        Self {
            name: name.to_string(),
            accepted_name: accepted_name.map(str::to_string),
            transitions: vec![None; columns],
            transition_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category produced when traversal halts here
    pub fn accepted_name(&self) -> Option<&str> {
        self.accepted_name.as_deref()
    }

    pub fn is_accepting(&self) -> bool {
        self.accepted_name.is_some()
    }

    /// A state without outgoing transitions halts traversal
    pub fn is_dead(&self) -> bool {
        self.transition_count == 0
    }

    pub fn transition_count(&self) -> usize {
        self.transition_count
    }

    pub(crate) fn destination(&self, column: usize) -> Option<StateId> {
        self.transitions.get(column).copied().flatten()
    }

    /// Install a transition unless the column already has one.
    /// Returns false when the earlier transition was kept.
    pub(crate) fn add_transition(&mut self, column: usize, destination: StateId) -> bool {
        match self.transitions.get_mut(column) {
            Some(slot) if slot.is_none() => {
                *slot = Some(destination);
                self.transition_count += 1;
                true
            }
            _ => false,
        }
    }

    /// `(column, destination)` pairs of every installed transition
    pub fn transitions(&self) -> impl Iterator<Item = (usize, StateId)> + '_ {
        self.transitions
            .iter()
            .enumerate()
            .filter_map(|(column, dest)| dest.map(|d| (column, d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_dead() {
        let state = State::new("2", None, 4);
        assert!(state.is_dead());
        assert!(!state.is_accepting());
        assert_eq!(state.destination(0), None);
        assert_eq!(state.destination(10), None);
    }

    #[test]
    fn test_first_transition_wins() {
        let mut state = State::new("0", Some("Letter"), 3);

        assert!(state.add_transition(1, 5));
        assert!(!state.add_transition(1, 6));
        assert!(!state.add_transition(3, 6));

        assert_eq!(state.destination(1), Some(5));
        assert_eq!(state.transition_count(), 1);
        assert!(!state.is_dead());
        assert_eq!(state.accepted_name(), Some("Letter"));
        assert_eq!(state.transitions().collect::<Vec<_>>(), vec![(1, 5)]);
    }
}
