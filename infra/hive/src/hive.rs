//! The store-facing traits every backend implements.

use crate::error::HiveError;
use crate::path::KeyPath;
use crate::value::{Access, Value};
use std::fmt::Debug;

/// A hierarchical key-value store: nested named locations, each holding named, typed entries.
///
/// Handles returned by [`Hive::open`] and [`Hive::create`] are scoped: whatever the
/// backend acquired for them is released when the handle is dropped, on every exit path.
pub trait Hive: Debug + Send + Sync {
    /// Opens an existing location.
    ///
    /// # Errors
    /// Returns [`HiveError::KeyNotFound`] if the location does not exist, or
    /// [`HiveError::AccessDenied`] if the requested rights cannot be granted.
    fn open(&self, path: &KeyPath, access: Access) -> Result<Box<dyn Key + '_>, HiveError>;

    /// Opens a location for reading and writing, creating it and any missing ancestors.
    ///
    /// # Errors
    /// Returns a backend error if any part of the chain cannot be created.
    fn create(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>, HiveError>;

    /// Deletes a location together with its entries.
    ///
    /// # Errors
    /// Returns [`HiveError::KeyNotFound`] if it does not exist and
    /// [`HiveError::KeyNotEmpty`] if it still has sub-locations.
    fn delete(&self, path: &KeyPath) -> Result<(), HiveError>;

    /// Checks whether a location exists.
    ///
    /// # Errors
    /// Returns an error only for failures other than "not found".
    fn exists(&self, path: &KeyPath) -> Result<bool, HiveError> {
        match self.open(path, Access::READ) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// An open location.
pub trait Key: Debug {
    /// The location this handle refers to.
    fn path(&self) -> &KeyPath;

    /// Reads one entry.
    ///
    /// # Errors
    /// Returns [`HiveError::ValueNotFound`] if the entry does not exist.
    fn get(&self, name: &str) -> Result<Value, HiveError>;

    /// Writes one entry, replacing any previous value and type.
    ///
    /// # Errors
    /// Returns [`HiveError::AccessDenied`] for read-only handles.
    fn set(&self, name: &str, value: &Value) -> Result<(), HiveError>;

    /// Deletes one entry.
    ///
    /// # Errors
    /// Returns [`HiveError::ValueNotFound`] if the entry does not exist and
    /// [`HiveError::AccessDenied`] for read-only handles.
    fn remove(&self, name: &str) -> Result<(), HiveError>;

    /// Names of all entries under this location, in backend order.
    ///
    /// # Errors
    /// Returns a backend error if the location cannot be enumerated.
    fn names(&self) -> Result<Vec<String>, HiveError>;

    /// Reads a string entry.
    ///
    /// # Errors
    /// Returns [`HiveError::TypeMismatch`] if the entry holds another type.
    fn get_string(&self, name: &str) -> Result<String, HiveError> {
        match self.get(name)? {
            Value::String(s) => Ok(s),
            other => Err(type_mismatch(self.path(), name, "sz", &other)),
        }
    }

    /// Reads a 32-bit number entry.
    ///
    /// # Errors
    /// Returns [`HiveError::TypeMismatch`] if the entry holds another type.
    fn get_dword(&self, name: &str) -> Result<u32, HiveError> {
        match self.get(name)? {
            Value::Dword(v) => Ok(v),
            other => Err(type_mismatch(self.path(), name, "dword", &other)),
        }
    }
}

fn type_mismatch(path: &KeyPath, name: &str, expected: &str, found: &Value) -> HiveError {
    HiveError::TypeMismatch {
        message: format!(r"{path}\{name}").into(),
        context: Some(format!("expected {expected}, found {}", found.kind()).into()),
    }
}

pub(crate) fn check_writable(access: Access, path: &KeyPath) -> Result<(), HiveError> {
    if access.contains(Access::WRITE) {
        Ok(())
    } else {
        Err(HiveError::AccessDenied {
            message: path.to_string().into(),
            context: Some("Location was opened read-only".into()),
        })
    }
}

pub(crate) fn key_not_found(path: &KeyPath) -> HiveError {
    HiveError::KeyNotFound { message: path.to_string().into(), context: None }
}

pub(crate) fn value_not_found(path: &KeyPath, name: &str) -> HiveError {
    HiveError::ValueNotFound { message: format!(r"{path}\{name}").into(), context: None }
}
