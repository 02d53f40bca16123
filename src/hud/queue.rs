//! Ordered, replayable list of queued operations.

use super::args::Arg;

/// What a queued action does when it replays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Draw,
    /// Resets the transform state
    Clear,
    SetOpacity,
    SetTranslate,
    SetScale,
    SetStrength,
    SetColor,
    SetPrecision,
}

/// One queue entry: an operation plus its raw, un-normalized arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedAction {
    /// Keyed actions are replaced in place instead of appended
    pub id: Option<String>,
    pub operation: Operation,
    pub args: Vec<Arg>,
}

impl QueuedAction {
    pub fn new(operation: Operation, args: Vec<Arg>) -> Self {
        Self {
            id: None,
            operation,
            args,
        }
    }

    pub fn keyed(id: impl Into<String>, operation: Operation, args: Vec<Arg>) -> Self {
        Self {
            id: Some(id.into()),
            operation,
            args,
        }
    }
}

/// Actions in replay order.
///
/// Queues stay small (debug overlays), so id lookup is a linear scan.
#[derive(Clone, Debug, Default)]
pub struct ActionQueue {
    actions: Vec<QueuedAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends, or replaces the action with the same id in place.
    ///
    /// Returns the index the action now occupies.
    pub fn enqueue(&mut self, action: QueuedAction) -> usize {
        let existing = action
            .id
            .as_deref()
            .and_then(|id| self.position(id));
        match existing {
            Some(index) => {
                self.actions[index] = action;
                index
            }
            None => {
                self.actions.push(action);
                self.actions.len() - 1
            }
        }
    }

    /// Removes the keyed action `id`; returns whether one was found.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.actions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drops every action, keyed ones included, leaving a single clear marker.
    pub fn truncate_to_clear(&mut self) {
        self.actions.clear();
        self.actions
            .push(QueuedAction::new(Operation::Clear, Vec::new()));
    }

    /// Appends an argument to the action at `index`, if it still exists.
    pub fn push_arg(&mut self, index: usize, arg: Arg) {
        if let Some(action) = self.actions.get_mut(index) {
            action.args.push(arg);
        }
    }

    pub fn get(&self, index: usize) -> Option<&QueuedAction> {
        self.actions.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.actions
            .iter()
            .position(|action| action.id.as_deref() == Some(id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueuedAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_actions_replace_in_place() {
        let mut queue = ActionQueue::new();
        queue.enqueue(QueuedAction::new(Operation::Draw, vec![Arg::from(1)]));
        let first = queue.enqueue(QueuedAction::keyed("probe", Operation::Draw, vec![Arg::from(2)]));
        queue.enqueue(QueuedAction::new(Operation::Draw, vec![Arg::from(3)]));
        let second = queue.enqueue(QueuedAction::keyed("probe", Operation::Draw, vec![Arg::from(4)]));

        assert_eq!(first, second);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.get(1).map(|a| a.args.clone()), Some(vec![Arg::from(4)]));
    }

    #[test]
    fn remove_only_touches_matching_id() {
        let mut queue = ActionQueue::new();
        queue.enqueue(QueuedAction::keyed("a", Operation::Draw, Vec::new()));
        queue.enqueue(QueuedAction::new(Operation::SetScale, vec![Arg::from(2)]));
        assert!(!queue.remove("b"));
        assert!(queue.remove("a"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.position("a"), None);
    }

    #[test]
    fn truncate_leaves_single_clear() {
        let mut queue = ActionQueue::new();
        queue.enqueue(QueuedAction::keyed("a", Operation::Draw, Vec::new()));
        queue.enqueue(QueuedAction::new(Operation::Draw, Vec::new()));
        queue.truncate_to_clear();
        let ops: Vec<_> = queue.iter().map(|a| a.operation).collect();
        assert_eq!(ops, [Operation::Clear]);
    }

    #[test]
    fn push_arg_ignores_stale_index() {
        let mut queue = ActionQueue::new();
        let index = queue.enqueue(QueuedAction::new(Operation::Draw, Vec::new()));
        queue.push_arg(index, Arg::from("x"));
        queue.push_arg(index + 5, Arg::from("y"));
        assert_eq!(queue.get(index).map(|a| a.args.len()), Some(1));
    }
}
