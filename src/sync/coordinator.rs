use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::model::{Ack, Intent, MoveDescriptor, Payload};
use crate::remote::{RemoteError, Transport};

use super::coalescer::Coalescer;

pub type RequestId = u64;

/// A settled mutation request, handed back to the caller exactly once via
/// `poll`. Carries the ops that were sent so the caller can replay them
/// onto confirmed state (success) or rebuild optimistic state (failure).
#[derive(Debug)]
pub struct Outcome {
    pub request_id: RequestId,
    pub resource_id: String,
    pub ops: Vec<Intent>,
    pub result: Result<Ack, RemoteError>,
}

#[derive(Debug)]
struct Request {
    id: RequestId,
    resource_id: String,
    ops: Vec<Intent>,
}

#[derive(Debug, Default)]
struct ResourceQueue {
    pending: VecDeque<Request>,
    /// The dispatched request this queue is waiting on, if any.
    in_flight: Option<(RequestId, Vec<Intent>)>,
}

/// The single path by which mutation intents reach the server.
///
/// Guarantees per resource id: strict FIFO submission order, at most one
/// request in flight, and request i+1 is not dispatched until request i has
/// settled. Distinct resources are independent. A hung request stalls only
/// its own resource's queue.
///
/// Each dispatched request runs `Transport::mutate` on a worker thread that
/// does nothing else; completion comes back over an mpsc channel and is
/// harvested by `poll` on the UI thread. Once dispatched, a request cannot
/// be canceled — later actions on the same resource queue behind it.
///
/// The coordinator performs no retry and no rollback; callers own both.
pub struct Coordinator {
    transport: Arc<dyn Transport>,
    queues: HashMap<String, ResourceQueue>,
    moves: Coalescer,
    settled_tx: Sender<Outcome>,
    settled_rx: Receiver<Outcome>,
    next_id: RequestId,
}

impl Coordinator {
    pub fn new(transport: Arc<dyn Transport>, move_window: Duration) -> Self {
        let (settled_tx, settled_rx) = mpsc::channel();
        Coordinator {
            transport,
            queues: HashMap::new(),
            moves: Coalescer::new(move_window),
            settled_tx,
            settled_rx,
            next_id: 0,
        }
    }

    /// Submit one intent. Any intent other than a move first drains the
    /// resource's move buffer; drained moves are prepended so the user's
    /// structural edits are never reordered after a later edit.
    pub fn apply(&mut self, resource_id: &str, intent: Intent) -> RequestId {
        let mut ops = if intent.is_move() {
            Vec::new()
        } else {
            self.drained_moves(resource_id)
        };
        ops.push(intent);
        self.submit(resource_id, ops)
    }

    /// Submit a batch; ops execute server-side in the order supplied.
    /// Drains the move buffer exactly like `apply` unless the batch itself
    /// is all moves (the coalescer flush path).
    pub fn apply_batch(&mut self, resource_id: &str, ops: Vec<Intent>) -> RequestId {
        let mut all = if ops.iter().all(Intent::is_move) {
            Vec::new()
        } else {
            self.drained_moves(resource_id)
        };
        all.extend(ops);
        self.submit(resource_id, all)
    }

    /// Buffer a reorder intent behind the debounce window.
    pub fn queue_move(&mut self, resource_id: &str, mv: MoveDescriptor, now: Instant) {
        self.moves.queue(resource_id, mv, now);
    }

    /// Send the resource's buffered moves now instead of waiting out the
    /// debounce window. No-op on an empty buffer.
    pub fn flush_moves(&mut self, resource_id: &str) -> Option<RequestId> {
        let ops = self.drained_moves(resource_id);
        if ops.is_empty() {
            None
        } else {
            Some(self.submit(resource_id, ops))
        }
    }

    /// Harvest settled requests, dispatch successors, and flush any move
    /// buffers whose debounce deadline has passed. Called once per tick.
    pub fn poll(&mut self, now: Instant) -> Vec<Outcome> {
        let mut settled = Vec::new();
        while let Ok(outcome) = self.settled_rx.try_recv() {
            let resource_id = outcome.resource_id.clone();
            if let Some(queue) = self.queues.get_mut(&resource_id) {
                queue.in_flight = None;
            }
            self.pump(&resource_id);
            settled.push(outcome);
        }
        for resource_id in self.moves.due(now) {
            let ops = self.drained_moves(&resource_id);
            if !ops.is_empty() {
                self.submit(&resource_id, ops);
            }
        }
        settled
    }

    /// Every op not yet acknowledged for this resource, in causal order:
    /// in-flight request, then queued requests, then still-buffered moves.
    /// Lets the caller rebuild optimistic state on top of confirmed state.
    pub fn pending_ops(&self, resource_id: &str) -> Vec<Intent> {
        let mut ops = Vec::new();
        if let Some(queue) = self.queues.get(resource_id) {
            if let Some((_, in_flight)) = &queue.in_flight {
                ops.extend(in_flight.iter().cloned());
            }
            for request in &queue.pending {
                ops.extend(request.ops.iter().cloned());
            }
        }
        ops.extend(self.moves.buffered(resource_id).iter().cloned().map(Intent::Move));
        ops
    }

    /// True when nothing is queued, in flight, or buffered for any resource.
    pub fn is_idle(&self) -> bool {
        self.queues
            .iter()
            .all(|(id, q)| q.pending.is_empty() && q.in_flight.is_none() && self.moves.is_empty(id))
    }

    /// Unsettled requests for this resource (queued plus in-flight).
    pub fn backlog(&self, resource_id: &str) -> usize {
        self.queues
            .get(resource_id)
            .map(|q| q.pending.len() + usize::from(q.in_flight.is_some()))
            .unwrap_or(0)
    }

    fn drained_moves(&mut self, resource_id: &str) -> Vec<Intent> {
        self.moves
            .drain(resource_id)
            .into_iter()
            .map(Intent::Move)
            .collect()
    }

    fn submit(&mut self, resource_id: &str, ops: Vec<Intent>) -> RequestId {
        debug_assert!(!ops.is_empty());
        self.next_id += 1;
        let id = self.next_id;
        let queue = self.queues.entry(resource_id.to_string()).or_default();
        queue.pending.push_back(Request {
            id,
            resource_id: resource_id.to_string(),
            ops,
        });
        self.pump(resource_id);
        id
    }

    /// Dispatch the next queued request if the resource is idle.
    fn pump(&mut self, resource_id: &str) {
        let Some(queue) = self.queues.get_mut(resource_id) else {
            return;
        };
        if queue.in_flight.is_some() {
            return;
        }
        let Some(request) = queue.pending.pop_front() else {
            return;
        };
        queue.in_flight = Some((request.id, request.ops.clone()));

        let transport = Arc::clone(&self.transport);
        let settled_tx = self.settled_tx.clone();
        thread::spawn(move || {
            let payload = Payload::from_ops(request.ops.clone());
            let result = transport.mutate(&request.resource_id, &payload);
            // The receiver only disappears when the whole app is shutting down.
            let _ = settled_tx.send(Outcome {
                request_id: request.id,
                resource_id: request.resource_id,
                ops: request.ops,
                result,
            });
        });
    }
}
