#![allow(dead_code, unreachable_pub)]

use harden_core::{Context, IndexedList, RecordingSink};
use harden_hive::{Access, Hive, HiveError, Key, KeyPath, MemoryHive, Value};
use parking_lot::Mutex;
use std::collections::BTreeMap;

pub const LIST_PATH: &str = r"Software\Policies\Explorer\DisallowRun";
pub const FLAG_PATH: &str = r"Software\Policies\Explorer";

pub fn path(p: &str) -> KeyPath {
    KeyPath::parse(p).unwrap()
}

pub fn list(bound: u32) -> IndexedList {
    IndexedList::builder().location(path(LIST_PATH)).bound(bound).build().unwrap()
}

/// Store operations a fault can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Open,
    Create,
    Delete,
    Get,
    Set,
    Remove,
    Names,
}

#[derive(Debug, Clone)]
struct Fault {
    op: Op,
    /// Location path, entry name, or written string value.
    target: String,
    remaining: Option<usize>,
}

/// A [`MemoryHive`] that fails chosen operations with `AccessDenied`.
#[derive(Debug, Default)]
pub struct FaultyHive {
    inner: MemoryHive,
    faults: Mutex<Vec<Fault>>,
    log: Mutex<Vec<(Op, String)>>,
}

impl FaultyHive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory(&self) -> &MemoryHive {
        &self.inner
    }

    /// Fails every `op` whose location, entry name, or written value equals `target`.
    pub fn fail(&self, op: Op, target: &str) {
        self.faults.lock().push(Fault { op, target: target.to_owned(), remaining: None });
    }

    /// Fails only the next matching call.
    pub fn fail_once(&self, op: Op, target: &str) {
        self.faults.lock().push(Fault { op, target: target.to_owned(), remaining: Some(1) });
    }

    pub fn clear_faults(&self) {
        self.faults.lock().clear();
    }

    /// Mutating calls seen so far, as `(op, target)`.
    pub fn mutations(&self) -> Vec<(Op, String)> {
        self.log
            .lock()
            .iter()
            .filter(|(op, _)| matches!(op, Op::Create | Op::Delete | Op::Set | Op::Remove))
            .cloned()
            .collect()
    }

    fn check(&self, op: Op, targets: &[&str]) -> Result<(), HiveError> {
        self.log.lock().push((op, targets.first().copied().unwrap_or_default().to_owned()));

        let mut faults = self.faults.lock();
        let hit = faults.iter_mut().find(|f| {
            f.op == op
                && f.remaining != Some(0)
                && targets.iter().any(|t| t.eq_ignore_ascii_case(&f.target))
        });
        let Some(fault) = hit else { return Ok(()) };
        if let Some(left) = fault.remaining.as_mut() {
            *left -= 1;
        }
        Err(HiveError::AccessDenied {
            message: fault.target.clone().into(),
            context: Some(format!("injected {op:?} fault").into()),
        })
    }
}

impl Hive for FaultyHive {
    fn open(&self, path: &KeyPath, access: Access) -> Result<Box<dyn Key + '_>, HiveError> {
        self.check(Op::Open, &[&path.to_string()])?;
        let inner = self.inner.open(path, access)?;
        Ok(Box::new(FaultyKey { hive: self, inner }))
    }

    fn create(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>, HiveError> {
        self.check(Op::Create, &[&path.to_string()])?;
        let inner = self.inner.create(path)?;
        Ok(Box::new(FaultyKey { hive: self, inner }))
    }

    fn delete(&self, path: &KeyPath) -> Result<(), HiveError> {
        self.check(Op::Delete, &[&path.to_string()])?;
        self.inner.delete(path)
    }
}

#[derive(Debug)]
struct FaultyKey<'h> {
    hive: &'h FaultyHive,
    inner: Box<dyn Key + 'h>,
}

impl Key for FaultyKey<'_> {
    fn path(&self) -> &KeyPath {
        self.inner.path()
    }

    fn get(&self, name: &str) -> Result<Value, HiveError> {
        self.hive.check(Op::Get, &[name])?;
        self.inner.get(name)
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), HiveError> {
        let text = value.as_str().map_or_else(|| value.to_string(), str::to_owned);
        self.hive.check(Op::Set, &[name, &text])?;
        self.inner.set(name, value)
    }

    fn remove(&self, name: &str) -> Result<(), HiveError> {
        self.hive.check(Op::Remove, &[name])?;
        self.inner.remove(name)
    }

    fn names(&self) -> Result<Vec<String>, HiveError> {
        self.hive.check(Op::Names, &[&self.inner.path().to_string()])?;
        self.inner.names()
    }
}

/// Slots of the list as `index -> value`, read straight from the store.
pub fn raw_slots(hive: &MemoryHive) -> BTreeMap<String, Value> {
    hive.snapshot()
        .into_iter()
        .find(|(location, _)| location.eq_ignore_ascii_case(LIST_PATH))
        .map(|(_, values)| values)
        .unwrap_or_default()
}

/// The activation flag as stored, if present.
pub fn raw_flag(hive: &MemoryHive) -> Option<Value> {
    hive.snapshot()
        .into_iter()
        .find(|(location, _)| location.eq_ignore_ascii_case(FLAG_PATH))
        .and_then(|(_, values)| values.get("DisallowRun").cloned())
}

/// Seeds the list with `values` at indices `1..`.
pub fn seed(hive: &dyn Hive, values: &[&str]) {
    let key = hive.create(&path(LIST_PATH)).unwrap();
    for (i, v) in values.iter().enumerate() {
        key.set(&(i + 1).to_string(), &Value::from(*v)).unwrap();
    }
}

pub fn set_flag(hive: &dyn Hive) {
    hive.create(&path(FLAG_PATH)).unwrap().set("DisallowRun", &Value::Dword(1)).unwrap();
}

pub fn strings(slots: &BTreeMap<String, Value>) -> Vec<(String, String)> {
    let mut pairs: Vec<(u32, String)> = slots
        .iter()
        .map(|(k, v)| (k.parse().unwrap(), v.as_str().unwrap().to_owned()))
        .collect();
    pairs.sort();
    pairs.into_iter().map(|(i, v)| (i.to_string(), v)).collect()
}

pub fn ctx<'a>(hive: &'a dyn Hive, sink: &'a RecordingSink) -> Context<'a> {
    Context::new(hive, sink)
}
