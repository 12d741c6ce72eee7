//! Time-ordered backlog of pending commands.

use uplink_core::commands::DelayedCommand;
use uplink_core::types::CommandId;

/// Pending commands sorted ascending by time stamp. Equal stamps keep
/// insertion order.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<DelayedCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Insert at the binary-searched position, after any equal time stamps.
    pub fn insert(&mut self, command: DelayedCommand) -> usize {
        let pos = self
            .commands
            .partition_point(|c| c.time_stamp <= command.time_stamp);
        self.commands.insert(pos, command);
        pos
    }

    pub fn front(&self) -> Option<&DelayedCommand> {
        self.commands.first()
    }

    pub fn front_mut(&mut self) -> Option<&mut DelayedCommand> {
        self.commands.first_mut()
    }

    pub fn pop_front(&mut self) -> Option<DelayedCommand> {
        if self.commands.is_empty() {
            None
        } else {
            Some(self.commands.remove(0))
        }
    }

    /// Remove a command by id. Missing ids are a no-op.
    pub fn remove(&mut self, id: CommandId) -> Option<DelayedCommand> {
        let index = self.commands.iter().position(|c| c.id == id)?;
        Some(self.commands.remove(index))
    }

    pub fn retain(&mut self, keep: impl FnMut(&DelayedCommand) -> bool) {
        self.commands.retain(keep);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DelayedCommand> {
        self.commands.iter()
    }

    /// Commands due within `horizon` of `now`, front first.
    pub fn due_within(&self, now: f64, horizon: f64) -> impl Iterator<Item = &DelayedCommand> {
        self.commands
            .iter()
            .take_while(move |c| c.time_stamp <= now + horizon)
    }
}

impl<'a> IntoIterator for &'a CommandBuffer {
    type Item = &'a DelayedCommand;
    type IntoIter = std::slice::Iter<'a, DelayedCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uplink_core::enums::ActionGroup;

    fn stamped(t: f64) -> DelayedCommand {
        DelayedCommand::action_group(t, ActionGroup::Light)
    }

    #[test]
    fn test_insert_keeps_ascending_order() {
        let mut buffer = CommandBuffer::new();
        for t in [5.0, 1.0, 3.0, 4.0, 2.0, 0.5] {
            buffer.insert(stamped(t));
            let stamps: Vec<f64> = buffer.iter().map(|c| c.time_stamp).collect();
            assert!(stamps.windows(2).all(|w| w[0] <= w[1]), "{stamps:?}");
        }
        assert_eq!(buffer.front().map(|c| c.time_stamp), Some(0.5));
    }

    #[test]
    fn test_equal_stamps_insert_after_existing() {
        let mut buffer = CommandBuffer::new();
        let first = stamped(2.0);
        let second = stamped(2.0);
        let (first_id, second_id) = (first.id, second.id);
        buffer.insert(stamped(1.0));
        buffer.insert(first);
        assert_eq!(buffer.insert(second), 2);
        let ids: Vec<_> = buffer.iter().skip(1).map(|c| c.id).collect();
        assert_eq!(ids, vec![first_id, second_id]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut buffer = CommandBuffer::new();
        let cmd = stamped(1.0);
        let id = cmd.id;
        buffer.insert(cmd);
        assert!(buffer.remove(id).is_some());
        assert!(buffer.remove(id).is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_due_within_stops_at_horizon() {
        let mut buffer = CommandBuffer::new();
        for t in [1.0, 2.0, 3.0, 10.0] {
            buffer.insert(stamped(t));
        }
        assert_eq!(buffer.due_within(1.0, 2.0).count(), 3);
        assert_eq!(buffer.due_within(0.0, 0.5).count(), 0);
    }
}
