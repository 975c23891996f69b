#![cfg(all(test, feature = "fs", target_os = "linux"))]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use libc::c_int;

use crate::fs::sync::SyncStrength;
use crate::fs::{Errno, RawIo, RawSync};

/// What the next primitive call on a [`ScriptedIo`] does.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Move at most this many bytes.
    Move(usize),
    /// Fail with this error code without moving anything.
    Fail(c_int),
}

/// A descriptor double that plays back a script of primitive outcomes.
///
/// Reads are served from `source` and writes land in `sink`, both treated as one file with a
/// shared position for non-positional calls. Once the script is exhausted every call moves as much
/// as it can, capped by `limit`.
#[derive(Debug, Default)]
pub struct ScriptedIo {
    script: RefCell<VecDeque<Step>>,
    limit: Option<usize>,
    source: Vec<u8>,
    sink: RefCell<Vec<u8>>,
    position: Cell<usize>,
    calls: Cell<usize>,
    offsets: RefCell<Vec<Option<u64>>>,
    rejected_syncs: Vec<(SyncStrength, c_int)>,
    syncs: RefCell<Vec<SyncStrength>>,
}

impl ScriptedIo {
    pub fn reading(source: &[u8]) -> ScriptedIo {
        ScriptedIo {
            source: source.to_vec(),
            ..Default::default()
        }
    }

    pub fn writing() -> ScriptedIo {
        ScriptedIo::default()
    }

    pub fn limit(mut self, limit: usize) -> ScriptedIo {
        self.limit = Some(limit);
        self
    }

    pub fn script<I: IntoIterator<Item = Step>>(self, steps: I) -> ScriptedIo {
        self.script.borrow_mut().extend(steps);
        self
    }

    pub fn reject_sync(mut self, strength: SyncStrength, code: c_int) -> ScriptedIo {
        self.rejected_syncs.push((strength, code));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn written(&self) -> Vec<u8> {
        self.sink.borrow().clone()
    }

    pub fn position(&self) -> usize {
        self.position.get()
    }

    pub fn offsets(&self) -> Vec<Option<u64>> {
        self.offsets.borrow().clone()
    }

    pub fn syncs(&self) -> Vec<SyncStrength> {
        self.syncs.borrow().clone()
    }

    /// Records the call and works out how many bytes it may move.
    fn next(&self, wanted: usize, offset: Option<u64>) -> Result<usize, Errno> {
        self.calls.set(self.calls.get() + 1);
        self.offsets.borrow_mut().push(offset);
        let step = self.script.borrow_mut().pop_front()
            .unwrap_or(Step::Move(self.limit.unwrap_or(usize::MAX)));
        match step {
            Step::Move(n) => Ok(n.min(wanted).min(self.limit.unwrap_or(usize::MAX))),
            Step::Fail(code) => Err(Errno(code)),
        }
    }

    fn read_from(&self, buf: &mut [u8], at: usize, allowed: usize) -> usize {
        let available = self.source.len().saturating_sub(at);
        let count = allowed.min(available);
        buf[..count].copy_from_slice(&self.source[at..at + count]);
        count
    }

    fn write_to(&self, buf: &[u8], at: usize, allowed: usize) -> usize {
        let mut sink = self.sink.borrow_mut();
        if sink.len() < at + allowed {
            sink.resize(at + allowed, 0);
        }
        sink[at..at + allowed].copy_from_slice(&buf[..allowed]);
        allowed
    }
}

impl RawIo for ScriptedIo {
    fn read_raw(&self, buf: &mut [u8]) -> Result<usize, Errno> {
        let allowed = self.next(buf.len(), None)?;
        let count = self.read_from(buf, self.position.get(), allowed);
        self.position.set(self.position.get() + count);
        Ok(count)
    }

    fn write_raw(&self, buf: &[u8]) -> Result<usize, Errno> {
        let allowed = self.next(buf.len(), None)?;
        let count = self.write_to(buf, self.position.get(), allowed);
        self.position.set(self.position.get() + count);
        Ok(count)
    }

    fn read_raw_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, Errno> {
        let allowed = self.next(buf.len(), Some(offset))?;
        Ok(self.read_from(buf, offset as usize, allowed))
    }

    fn write_raw_at(&self, buf: &[u8], offset: u64) -> Result<usize, Errno> {
        let allowed = self.next(buf.len(), Some(offset))?;
        Ok(self.write_to(buf, offset as usize, allowed))
    }
}

impl RawSync for ScriptedIo {
    fn sync_raw(&self, strength: SyncStrength) -> Result<(), Errno> {
        self.syncs.borrow_mut().push(strength);
        match self.rejected_syncs.iter().find(|(s, _)| *s == strength) {
            Some((_, code)) => Err(Errno(*code)),
            None => Ok(()),
        }
    }
}
