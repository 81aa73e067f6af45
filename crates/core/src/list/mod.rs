//! The ordered, gap-free list of string slots kept under one store location.
//!
//! Layout, for a list at `Explorer\DisallowRun`:
//!
//! ```text
//! Explorer                 DisallowRun = dword 1     (activation flag)
//! Explorer\DisallowRun     "1" = "cmd.exe"
//!                          "2" = "powershell.exe"
//! ```
//!
//! Occupied indices are always `1..=k`; the list location exists iff `k > 0`.

mod builder;
mod error;
mod slots;

pub use builder::{IndexedListBuilder, NoLocation, WithLocation};
pub use error::{ListError, ListErrorExt};
pub use slots::{Slots, parse_slot_name, slot_name};

use crate::context::Context;
use crate::sink::Event;
use harden_hive::{Access, Key, KeyPath, Value};

/// Result of [`IndexedList::remove_by_value`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Slots that held the value and were deleted.
    pub removed: usize,
    /// Slots left in the list afterwards.
    pub remaining: usize,
}

/// Descriptor of one managed list. Holds no state of its own; every call reads the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedList {
    location: KeyPath,
    flag_location: KeyPath,
    flag_name: String,
    bound: u32,
}

impl IndexedList {
    #[must_use = "The list is not built until you call .build()"]
    pub fn builder() -> IndexedListBuilder {
        IndexedListBuilder::new()
    }

    /// Location holding the slots.
    #[must_use]
    pub const fn location(&self) -> &KeyPath {
        &self.location
    }

    /// Location holding the activation flag, the parent of [`Self::location`].
    #[must_use]
    pub const fn flag_location(&self) -> &KeyPath {
        &self.flag_location
    }

    #[must_use]
    pub fn flag_name(&self) -> &str {
        &self.flag_name
    }

    #[must_use]
    pub const fn bound(&self) -> u32 {
        self.bound
    }

    /// Current slots; an absent list location reads as empty.
    ///
    /// # Errors
    /// [`ListError::StoreAccess`] if the location cannot be opened, [`ListError::StoreValue`]
    /// if an entry cannot be enumerated or a slot does not hold a string.
    pub fn entries(&self, ctx: &Context<'_>) -> Result<Slots, ListError> {
        Ok(self.read(ctx)?.unwrap_or_default())
    }

    /// Writes `value` at the smallest free index and returns that index.
    ///
    /// The list location is created when missing. A full list is detected before anything
    /// is written.
    ///
    /// # Errors
    /// [`ListError::StoreFull`] when every index up to the bound is taken, otherwise the
    /// store failure of the first step that failed.
    pub fn insert(&self, ctx: &Context<'_>, value: &str) -> Result<u32, ListError> {
        let slots = self.entries(ctx)?;
        let index = slots.first_free(self.bound).ok_or_else(|| ListError::StoreFull {
            location: self.location.to_string().into(),
            bound: self.bound,
            context: None,
        })?;

        let key = ctx.hive().create(&self.location).context("Creating list location")?;
        let name = slot_name(index);
        key.set(&name, &Value::from(value))
            .map_err(|e| ListError::value(e, format!("Writing slot {name}")))?;

        ctx.emit(Event::SlotWritten {
            location: self.location.to_string(),
            index,
            value: value.to_owned(),
        });
        Ok(index)
    }

    /// Deletes every slot holding `value`, then closes the gaps keeping the survivors' order.
    ///
    /// Survivors move down in ascending order, each written at its new index before its old
    /// entry is deleted. When no slot survives, the list location is deleted and the
    /// activation flag is cleared; otherwise the flag is left alone. An absent list is a
    /// no-op.
    ///
    /// # Errors
    /// A failure before anything was changed is returned as the store error itself. Once the
    /// list has been touched, any failure (including during cleanup) is
    /// [`ListError::RestoreIncomplete`].
    pub fn remove_by_value(
        &self,
        ctx: &Context<'_>,
        value: &str,
    ) -> Result<RemoveOutcome, ListError> {
        let Some(slots) = self.read(ctx)? else {
            return Ok(RemoveOutcome::default());
        };
        let (matches, survivors) = slots.partition(value);
        let outcome = RemoveOutcome { removed: matches.len(), remaining: survivors.len() };

        let key = ctx.hive().open(&self.location, Access::ALL).context("Opening list location")?;
        let mut touched = false;

        for (index, old) in matches {
            let name = slot_name(index);
            key.remove(&name)
                .map_err(|e| settle(ListError::value(e, format!("Deleting slot {name}")), touched))?;
            touched = true;
            ctx.emit(Event::SlotDeleted { location: self.location.to_string(), index, value: old });
        }

        for (to, (from, moved)) in (1u32..).zip(survivors) {
            if to == from {
                continue;
            }
            self.move_slot(ctx, &*key, from, to, &moved).map_err(|e| settle(e, touched))?;
            touched = true;
        }
        drop(key);

        if outcome.remaining == 0 {
            self.cleanup(ctx).map_err(ListError::into_incomplete)?;
        }
        Ok(outcome)
    }

    /// Whether any slot holds `value`. Scans every existing slot; an absent list holds nothing.
    ///
    /// # Errors
    /// See [`Self::entries`].
    pub fn contains(&self, ctx: &Context<'_>, value: &str) -> Result<bool, ListError> {
        Ok(self.position(ctx, value)?.is_some())
    }

    /// Lowest index holding `value`.
    ///
    /// # Errors
    /// See [`Self::entries`].
    pub fn position(&self, ctx: &Context<'_>, value: &str) -> Result<Option<u32>, ListError> {
        Ok(self.read(ctx)?.and_then(|slots| slots.position(value)))
    }

    /// Sets (`dword 1`) or clears the activation flag. Clearing deletes the entry; an absent
    /// flag or flag location is already clear.
    ///
    /// # Errors
    /// [`ListError::StoreAccess`] if the flag location cannot be opened or created,
    /// [`ListError::StoreValue`] if the entry cannot be written or deleted.
    pub fn set_activation_flag(&self, ctx: &Context<'_>, active: bool) -> Result<(), ListError> {
        if !active {
            return self.clear_flag(ctx);
        }

        let key = ctx.hive().create(&self.flag_location).context("Creating flag location")?;
        key.set(&self.flag_name, &Value::Dword(1))
            .map_err(|e| ListError::value(e, "Setting activation flag"))?;
        ctx.emit(Event::FlagSet {
            location: self.flag_location.to_string(),
            name: self.flag_name.clone(),
        });
        Ok(())
    }

    /// Whether the activation flag is present and non-zero.
    ///
    /// # Errors
    /// [`ListError::StoreAccess`] if the flag location exists but cannot be opened,
    /// [`ListError::StoreValue`] if the flag cannot be read as a number.
    pub fn is_active(&self, ctx: &Context<'_>) -> Result<bool, ListError> {
        let key = match ctx.hive().open(&self.flag_location, Access::READ) {
            Ok(key) => key,
            Err(err) if err.is_not_found() => return Ok(false),
            Err(err) => return Err(err).context("Opening flag location"),
        };
        match key.get_dword(&self.flag_name) {
            Ok(flag) => Ok(flag != 0),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(ListError::value(err, "Reading activation flag")),
        }
    }

    /// Reads all slots, or `None` when the list location does not exist.
    fn read(&self, ctx: &Context<'_>) -> Result<Option<Slots>, ListError> {
        let key = match ctx.hive().open(&self.location, Access::READ) {
            Ok(key) => key,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err).context("Opening list location"),
        };

        let names = key.names().map_err(|e| ListError::value(e, "Enumerating slots"))?;
        let mut slots = Slots::new();
        for (index, name) in names.iter().filter_map(|n| parse_slot_name(n).map(|i| (i, n))) {
            let value =
                key.get_string(name).map_err(|e| ListError::value(e, format!("Reading slot {name}")))?;
            slots.insert(index, value);
        }
        Ok(Some(slots))
    }

    fn move_slot(
        &self,
        ctx: &Context<'_>,
        key: &dyn Key,
        from: u32,
        to: u32,
        value: &str,
    ) -> Result<(), ListError> {
        let (old, new) = (slot_name(from), slot_name(to));
        key.set(&new, &Value::from(value))
            .map_err(|e| ListError::value(e, format!("Rewriting slot {old} as {new}")))?;
        key.remove(&old).map_err(|e| ListError::value(e, format!("Deleting moved slot {old}")))?;
        ctx.emit(Event::SlotMoved {
            location: self.location.to_string(),
            from,
            to,
            value: value.to_owned(),
        });
        Ok(())
    }

    /// Deletes the emptied list location and clears the activation flag.
    fn cleanup(&self, ctx: &Context<'_>) -> Result<(), ListError> {
        match ctx.hive().delete(&self.location) {
            Ok(()) => ctx.emit(Event::ListDeleted { location: self.location.to_string() }),
            Err(err) if err.is_not_found() => {},
            Err(err) => return Err(err).context("Deleting empty list location"),
        }
        self.clear_flag(ctx)
    }

    fn clear_flag(&self, ctx: &Context<'_>) -> Result<(), ListError> {
        let key = match ctx.hive().open(&self.flag_location, Access::ALL) {
            Ok(key) => key,
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err).context("Opening flag location"),
        };
        match key.remove(&self.flag_name) {
            Ok(()) => {
                ctx.emit(Event::FlagCleared {
                    location: self.flag_location.to_string(),
                    name: self.flag_name.clone(),
                });
                Ok(())
            },
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(ListError::value(err, "Clearing activation flag")),
        }
    }
}

/// Keeps the error as is before the first change, marks it incomplete afterwards.
fn settle(err: ListError, touched: bool) -> ListError {
    if touched { err.into_incomplete() } else { err }
}
