//! Windows registry backend.

use crate::error::HiveError;
use crate::hive::{Hive, Key, check_writable, key_not_found, value_not_found};
use crate::path::{KeyPath, validate_name};
use crate::value::{Access, Value};
use std::io;
use tracing::debug;
use winreg::RegKey;
use winreg::enums::{
    HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_ALL_ACCESS, KEY_READ, RegDisposition, RegType,
};

/// The predefined registry tree a [`RegistryHive`] is rooted at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Root {
    #[default]
    CurrentUser,
    LocalMachine,
}

/// The live Windows registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryHive {
    root: Root,
}

impl RegistryHive {
    #[must_use]
    pub const fn new(root: Root) -> Self {
        Self { root }
    }

    #[must_use]
    pub const fn root(&self) -> Root {
        self.root
    }

    fn predef(self) -> RegKey {
        match self.root {
            Root::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
            Root::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
        }
    }
}

/// Registry paths use backslashes only.
fn native(path: &KeyPath) -> String {
    path.to_string()
}

fn map_key_error(err: io::Error, path: &KeyPath, op: &str) -> HiveError {
    match err.kind() {
        io::ErrorKind::NotFound => key_not_found(path),
        io::ErrorKind::PermissionDenied => HiveError::AccessDenied {
            message: path.to_string().into(),
            context: Some(format!("{op} was refused").into()),
        },
        _ => HiveError::Io { source: err, context: Some(format!("{op} failed: {path}").into()) },
    }
}

fn map_value_error(err: io::Error, path: &KeyPath, name: &str, op: &str) -> HiveError {
    match err.kind() {
        io::ErrorKind::NotFound => value_not_found(path, name),
        io::ErrorKind::PermissionDenied => HiveError::AccessDenied {
            message: format!(r"{path}\{name}").into(),
            context: Some(format!("{op} was refused").into()),
        },
        _ => HiveError::Io {
            source: err,
            context: Some(format!(r"{op} failed: {path}\{name}").into()),
        },
    }
}

impl Hive for RegistryHive {
    fn open(&self, path: &KeyPath, access: Access) -> Result<Box<dyn Key + '_>, HiveError> {
        let flags = if access.contains(Access::WRITE) { KEY_ALL_ACCESS } else { KEY_READ };
        let key = self
            .predef()
            .open_subkey_with_flags(native(path), flags)
            .map_err(|e| map_key_error(e, path, "OpenKey"))?;
        Ok(Box::new(RegistryKey { key, path: path.clone(), access }))
    }

    fn create(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>, HiveError> {
        let (key, disposition) = self
            .predef()
            .create_subkey(native(path))
            .map_err(|e| map_key_error(e, path, "CreateKey"))?;
        let created = matches!(disposition, RegDisposition::REG_CREATED_NEW_KEY);
        debug!(path = %path, created, "Location opened for writing");
        Ok(Box::new(RegistryKey { key, path: path.clone(), access: Access::ALL }))
    }

    fn delete(&self, path: &KeyPath) -> Result<(), HiveError> {
        // DeleteKey refuses keys with subkeys; report that the same way as other backends.
        let has_children = {
            let key = self
                .predef()
                .open_subkey_with_flags(native(path), KEY_READ)
                .map_err(|e| map_key_error(e, path, "OpenKey"))?;
            key.enum_keys().next().is_some()
        };
        if has_children {
            return Err(HiveError::KeyNotEmpty { message: path.to_string().into(), context: None });
        }
        self.predef().delete_subkey(native(path)).map_err(|e| map_key_error(e, path, "DeleteKey"))
    }
}

/// An open registry key; the handle is closed when this value is dropped.
#[derive(Debug)]
struct RegistryKey {
    key: RegKey,
    path: KeyPath,
    access: Access,
}

impl Key for RegistryKey {
    fn path(&self) -> &KeyPath {
        &self.path
    }

    fn get(&self, name: &str) -> Result<Value, HiveError> {
        let raw = self
            .key
            .get_raw_value(name)
            .map_err(|e| map_value_error(e, &self.path, name, "GetValue"))?;
        match raw.vtype {
            // Expansion is left to the consumer; the stored text is the value.
            RegType::REG_SZ | RegType::REG_EXPAND_SZ => self
                .key
                .get_value::<String, _>(name)
                .map(Value::String)
                .map_err(|e| map_value_error(e, &self.path, name, "GetStringValue")),
            RegType::REG_DWORD => self
                .key
                .get_value::<u32, _>(name)
                .map(Value::Dword)
                .map_err(|e| map_value_error(e, &self.path, name, "GetDWordValue")),
            other => Err(HiveError::TypeMismatch {
                message: format!(r"{}\{name}", self.path).into(),
                context: Some(format!("unsupported registry type {other:?}").into()),
            }),
        }
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), HiveError> {
        check_writable(self.access, &self.path)?;
        validate_name(name)?;
        let result = match value {
            Value::String(s) => self.key.set_value(name, s),
            Value::Dword(v) => self.key.set_value(name, v),
        };
        result.map_err(|e| map_value_error(e, &self.path, name, "SetValue"))
    }

    fn remove(&self, name: &str) -> Result<(), HiveError> {
        check_writable(self.access, &self.path)?;
        self.key.delete_value(name).map_err(|e| map_value_error(e, &self.path, name, "DeleteValue"))
    }

    fn names(&self) -> Result<Vec<String>, HiveError> {
        self.key
            .enum_values()
            .map(|entry| {
                entry
                    .map(|(name, _)| name)
                    .map_err(|e| map_key_error(e, &self.path, "EnumValue"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> KeyPath {
        format!(r"Software\hardentools-tests\{}", std::process::id()).parse().unwrap()
    }

    #[test]
    fn expandable_strings_read_as_strings() {
        let hive = RegistryHive::new(Root::CurrentUser);
        let path = scratch();
        let (raw_key, _) = RegKey::predef(HKEY_CURRENT_USER).create_subkey(native(&path)).unwrap();
        raw_key.set_value("1", &String::from(r"%SystemRoot%\cmd.exe")).unwrap();
        let mut raw = raw_key.get_raw_value("1").unwrap();
        raw.vtype = RegType::REG_EXPAND_SZ;
        raw_key.set_raw_value("1", &raw).unwrap();

        let value = hive.open(&path, Access::READ).unwrap().get("1");

        drop(raw_key);
        hive.delete(&path).unwrap();
        assert_eq!(value.unwrap(), Value::String(r"%SystemRoot%\cmd.exe".to_owned()));
    }
}
