/*!
 * Throw Ledger
 * Per-object history of raised signals and retry bookkeeping
 */

use super::bus::{Subscription, ThrowBus};
use super::raise::Thrown;
use super::types::ThrowRecord;
use bitflags::bitflags;
use parking_lot::Mutex;
use std::sync::Arc;

bitflags! {
    /// Combined ledger status
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ThrowStatus: u8 {
        const CANCEL_REQUESTED = 1 << 0;
        const HAS_THROWN = 1 << 1;
        const HAS_RETRIED = 1 << 2;
    }
}

/// Ordered record of past signals with thrown/retry counters
#[derive(Debug, Clone, Default)]
pub struct ThrowLog {
    records: Vec<ThrowRecord>,
    thrown: u64,
    retries: u64,
    cancel_requested: bool,
}

impl ThrowLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ThrowRecord) {
        self.records.push(record);
        self.thrown += 1;
    }

    /// All appended records, in append order
    pub fn records(&self) -> &[ThrowRecord] {
        &self.records
    }

    /// Forget the records and start a new retry cycle
    pub fn clear(&mut self) {
        self.records.clear();
        self.thrown = 0;
        self.retries += 1;
    }

    pub fn thrown_count(&self) -> u64 {
        self.thrown
    }

    pub fn retry_count(&self) -> u64 {
        self.retries
    }

    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    pub fn status(&self) -> ThrowStatus {
        let mut status = ThrowStatus::empty();
        status.set(ThrowStatus::CANCEL_REQUESTED, self.cancel_requested);
        status.set(ThrowStatus::HAS_THROWN, self.thrown > 0);
        status.set(ThrowStatus::HAS_RETRIED, self.retries > 0);
        status
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Objects that keep their own throw history
pub trait Accumulates {
    fn throw_log(&self) -> &ThrowLog;
    fn throw_log_mut(&mut self) -> &mut ThrowLog;
}

impl Accumulates for ThrowLog {
    fn throw_log(&self) -> &ThrowLog {
        self
    }

    fn throw_log_mut(&mut self) -> &mut ThrowLog {
        self
    }
}

impl<E> Thrown<E> {
    /// Append a copy of this record to an accumulating owner
    pub fn record_into<A: Accumulates + ?Sized>(&self, owner: &mut A) -> &Self {
        owner.throw_log_mut().append(self.record().clone());
        self
    }
}

impl ThrowBus {
    /// Subscribe a handler that appends every published record to `log`
    pub fn subscribe_log(&self, log: Arc<Mutex<ThrowLog>>) -> Subscription {
        self.subscribe(move |_, signal| log.lock().append(signal.record().clone()))
    }
}
