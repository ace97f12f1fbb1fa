use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::MoveDescriptor;

/// One resource's buffered reorder intents plus the armed debounce deadline.
#[derive(Debug)]
struct MoveBuffer {
    moves: Vec<MoveDescriptor>,
    deadline: Instant,
}

/// Buffers structural reorder intents per resource behind a debounce window
/// so a burst of repeated reorder keystrokes becomes one outgoing batch.
///
/// Moves are never merged or deduplicated: each one fully specifies its
/// item's new position, so the server applying them in original order lands
/// on the correct final placement even through redundant intermediates.
#[derive(Debug)]
pub struct Coalescer {
    window: Duration,
    buffers: HashMap<String, MoveBuffer>,
}

impl Coalescer {
    pub fn new(window: Duration) -> Self {
        Coalescer {
            window,
            buffers: HashMap::new(),
        }
    }

    /// Append a move and (re)arm the resource's debounce deadline.
    pub fn queue(&mut self, resource_id: &str, mv: MoveDescriptor, now: Instant) {
        let deadline = now + self.window;
        match self.buffers.get_mut(resource_id) {
            Some(buffer) => {
                buffer.moves.push(mv);
                buffer.deadline = deadline;
            }
            None => {
                self.buffers.insert(
                    resource_id.to_string(),
                    MoveBuffer {
                        moves: vec![mv],
                        deadline,
                    },
                );
            }
        }
    }

    /// Remove and return the whole buffer, disarming its timer. Atomic:
    /// nothing can observe a partially drained buffer.
    pub fn drain(&mut self, resource_id: &str) -> Vec<MoveDescriptor> {
        self.buffers
            .remove(resource_id)
            .map(|b| b.moves)
            .unwrap_or_default()
    }

    /// Resources whose debounce deadline has passed.
    pub fn due(&self, now: Instant) -> Vec<String> {
        self.buffers
            .iter()
            .filter(|(_, b)| b.deadline <= now)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Read-only view of a resource's buffered moves, oldest first.
    pub fn buffered(&self, resource_id: &str) -> &[MoveDescriptor] {
        self.buffers
            .get(resource_id)
            .map(|b| b.moves.as_slice())
            .unwrap_or_default()
    }

    pub fn is_empty(&self, resource_id: &str) -> bool {
        self.buffers.get(resource_id).is_none_or(|b| b.moves.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(id: &str, index: usize) -> MoveDescriptor {
        MoveDescriptor {
            id: id.into(),
            parent: None,
            index,
        }
    }

    #[test]
    fn queue_preserves_order_without_merging() {
        let now = Instant::now();
        let mut c = Coalescer::new(Duration::from_millis(100));
        // Redundant intermediate positions for the same item stay distinct.
        c.queue("out-1", mv("a", 1), now);
        c.queue("out-1", mv("a", 2), now);
        c.queue("out-1", mv("b", 0), now);

        let drained = c.drain("out-1");
        assert_eq!(drained, vec![mv("a", 1), mv("a", 2), mv("b", 0)]);
    }

    #[test]
    fn drain_empties_and_disarms() {
        let now = Instant::now();
        let mut c = Coalescer::new(Duration::from_millis(10));
        c.queue("out-1", mv("a", 0), now);
        assert_eq!(c.drain("out-1").len(), 1);
        assert!(c.is_empty("out-1"));
        // Timer is gone with the buffer.
        assert!(c.due(now + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn each_queue_rearms_the_deadline() {
        let now = Instant::now();
        let window = Duration::from_millis(100);
        let mut c = Coalescer::new(window);
        c.queue("out-1", mv("a", 0), now);
        // A second queue call 50ms later pushes the deadline past now+window.
        c.queue("out-1", mv("a", 1), now + Duration::from_millis(50));
        assert!(c.due(now + Duration::from_millis(120)).is_empty());
        assert_eq!(c.due(now + Duration::from_millis(160)), vec!["out-1".to_string()]);
    }

    #[test]
    fn due_is_per_resource() {
        let now = Instant::now();
        let mut c = Coalescer::new(Duration::from_millis(100));
        c.queue("out-1", mv("a", 0), now);
        c.queue("out-2", mv("b", 0), now + Duration::from_millis(80));

        let due = c.due(now + Duration::from_millis(110));
        assert_eq!(due, vec!["out-1".to_string()]);
    }
}
