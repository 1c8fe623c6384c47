// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Model-change transactions: batching scopes for structural mutations.
//!
//! Every structural edit funnels its change records through the address
//! space's pending queue. A transaction scope is a reentrant nesting counter:
//! nested [`AddressSpace::run_in_transaction`] calls extend the same batch,
//! and the queue flushes as one coalesced notification only when the
//! outermost scope exits. Mutations performed outside any scope flush
//! immediately as single-record batches.

use aspace_schema::{ModelChangeVerb, NodeId};

use crate::graph::AddressSpace;

/// One structural change, ephemeral within a transaction's lifetime.
///
/// `affected_type` is the type definition of the affected node when it has
/// one; it is never the reference type of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelChangeRecord {
    /// The node the change happened on or under.
    pub affected: NodeId,
    /// Type definition of the affected node, when it has one.
    pub affected_type: Option<NodeId>,
    /// What happened.
    pub verb: ModelChangeVerb,
}

/// Handle returned by [`AddressSpace::subscribe`], used to unsubscribe.
pub type SubscriberId = usize;

pub(crate) type ChangeSubscriber = Box<dyn FnMut(&[ModelChangeRecord])>;

impl AddressSpace {
    /// Registers a callback invoked with each flushed batch of change
    /// records. Collaborators (alarm engines, historians) use this stream to
    /// re-synchronize derived state.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&[ModelChangeRecord]) + 'static,
    {
        self.subscribers.push(Some(Box::new(callback)));
        self.subscribers.len() - 1
    }

    /// Removes a subscriber; returns `false` if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers
            .get_mut(id)
            .is_some_and(|slot| slot.take().is_some())
    }

    /// `true` when at least one subscriber is active.
    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.subscribers.iter().any(Option::is_some)
    }

    /// Runs `f` inside a model-change transaction.
    ///
    /// Reentrant: a transaction started while one is already open simply
    /// extends the same batch; nothing flushes until the outermost scope
    /// exits. The batch flushes even when `f` returns an error — the
    /// mutations it performed before failing really happened, and there is no
    /// automatic rollback at this layer.
    pub fn run_in_transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        self.tx_depth += 1;
        let result = f(self);
        self.tx_depth -= 1;
        if self.tx_depth == 0 {
            self.flush_changes();
        }
        result
    }

    /// Queues a change record for the current batch.
    ///
    /// No-op when the graph has no active subscribers.
    pub fn collect_change(&mut self, record: ModelChangeRecord) {
        if !self.has_subscribers() {
            return;
        }
        self.pending.push(record);
    }

    /// Flushes immediately when no transaction scope is open.
    pub(crate) fn flush_if_idle(&mut self) {
        if self.tx_depth == 0 {
            self.flush_changes();
        }
    }

    fn flush_changes(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        // Subscribers are moved out for the duration of the callbacks so a
        // callback adding a subscriber does not alias the list.
        let mut subs = std::mem::take(&mut self.subscribers);
        for subscriber in subs.iter_mut().flatten() {
            subscriber(&batch);
        }
        let added = std::mem::replace(&mut self.subscribers, subs);
        self.subscribers.extend(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(n: u32) -> ModelChangeRecord {
        ModelChangeRecord {
            affected: NodeId::numeric(1, n),
            affected_type: None,
            verb: ModelChangeVerb::NodeAdded,
        }
    }

    #[test]
    fn collect_without_subscribers_is_a_no_op() {
        let mut space = AddressSpace::new();
        space.collect_change(record(1));
        assert!(space.pending.is_empty());
    }

    #[test]
    fn nested_transactions_extend_one_batch() {
        let mut space = AddressSpace::new();
        let batches: Rc<RefCell<Vec<usize>>> = Rc::default();
        let sink = Rc::clone(&batches);
        space.subscribe(move |batch| sink.borrow_mut().push(batch.len()));

        let _: Result<(), ()> = space.run_in_transaction(|outer| {
            outer.collect_change(record(1));
            let _: Result<(), ()> = outer.run_in_transaction(|inner| {
                inner.collect_change(record(2));
                Ok(())
            });
            // The nested scope must not have flushed early.
            assert_eq!(outer.pending.len(), 2);
            outer.collect_change(record(3));
            Ok(())
        });
        assert_eq!(batches.borrow().as_slice(), &[3]);
    }

    #[test]
    fn unsubscribed_callbacks_stop_firing() {
        let mut space = AddressSpace::new();
        let count: Rc<RefCell<u32>> = Rc::default();
        let sink = Rc::clone(&count);
        let id = space.subscribe(move |_| *sink.borrow_mut() += 1);

        space.collect_change(record(1));
        space.flush_if_idle();
        assert_eq!(*count.borrow(), 1);

        assert!(space.unsubscribe(id));
        assert!(!space.unsubscribe(id));
        space.collect_change(record(2));
        space.flush_if_idle();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn error_inside_transaction_still_flushes_collected_records() {
        let mut space = AddressSpace::new();
        let batches: Rc<RefCell<Vec<usize>>> = Rc::default();
        let sink = Rc::clone(&batches);
        space.subscribe(move |batch| sink.borrow_mut().push(batch.len()));

        let result: Result<(), &str> = space.run_in_transaction(|s| {
            s.collect_change(record(1));
            Err("boom")
        });
        assert!(result.is_err());
        assert_eq!(batches.borrow().as_slice(), &[1]);
        assert_eq!(space.tx_depth, 0);
    }
}
