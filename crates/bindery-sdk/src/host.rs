//! The host side of the boundary
//!
//! The embedder implements `HostInterface`. The registry negotiates the ABI
//! version through it at creation and reports every mutation, so the host can
//! mirror the class database on its side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::info::{MethodInfo, PropertyInfo};
use crate::kind::ValueKind;
use crate::string_name::StringName;

/// Version of the binary interface; serialized as `"major.minor.patch"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AbiVersion {
    /// Incompatible changes
    pub major: u32,
    /// Backwards-compatible additions
    pub minor: u32,
    /// Fixes
    pub patch: u32,
}

impl AbiVersion {
    /// Version this crate is built against
    pub const CURRENT: AbiVersion = AbiVersion::new(1, 0, 0);

    /// Create a version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        AbiVersion {
            major,
            minor,
            patch,
        }
    }

    /// Whether a host at this version can serve an extension requiring `required`.
    ///
    /// Majors must match and the host must be at least the required minor.
    pub fn is_compatible(&self, required: &AbiVersion) -> bool {
        self.major == required.major && self.minor >= required.minor
    }
}

impl Default for AbiVersion {
    fn default() -> Self {
        AbiVersion::CURRENT
    }
}

impl fmt::Display for AbiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Malformed version string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid ABI version '{0}': expected major.minor[.patch]")]
pub struct ParseAbiVersionError(pub String);

impl FromStr for AbiVersion {
    type Err = ParseAbiVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAbiVersionError(s.to_string());
        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;
        match parts[..] {
            [major, minor] => Ok(AbiVersion::new(major, minor, 0)),
            [major, minor, patch] => Ok(AbiVersion::new(major, minor, patch)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for AbiVersion {
    type Error = ParseAbiVersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AbiVersion> for String {
    fn from(version: AbiVersion) -> String {
        version.to_string()
    }
}

/// Registration notice for a class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescription {
    /// Class name
    pub name: StringName,
    /// Parent class name
    pub parent: StringName,
    /// Hidden from the editor and scripts' class lists
    pub is_virtual: bool,
    /// Cannot be instantiated
    pub is_abstract: bool,
    /// Visible to scripts
    pub is_exposed: bool,
}

/// Table of host callbacks.
///
/// Every notification has an empty default so hosts only implement what they
/// mirror.
pub trait HostInterface: Send + Sync {
    /// ABI version the host speaks
    fn abi_version(&self) -> AbiVersion;

    /// Whether the host knows a class that was not registered by the extension
    fn has_class(&self, name: &StringName) -> bool;

    /// A class was registered
    fn register_class(&self, _class: &ClassDescription) {}

    /// A class was torn down
    fn unregister_class(&self, _name: &StringName) {}

    /// A method was bound
    fn register_method(&self, _class: &StringName, _method: &MethodInfo) {}

    /// A property was added
    fn register_property(
        &self,
        _class: &StringName,
        _info: &PropertyInfo,
        _setter: &StringName,
        _getter: &StringName,
    ) {
    }

    /// A property group or subgroup was opened
    fn register_property_group(
        &self,
        _class: &StringName,
        _name: &str,
        _prefix: &str,
        _subgroup: bool,
    ) {
    }

    /// A signal was added
    fn register_signal(&self, _class: &StringName, _name: &StringName, _args: &[PropertyInfo]) {}

    /// An integer constant was bound
    fn register_integer_constant(
        &self,
        _class: &StringName,
        _enum_name: &StringName,
        _name: &StringName,
        _value: i64,
        _is_bitfield: bool,
    ) {
    }

    /// An overridable method was declared
    fn register_virtual_method(&self, _class: &StringName, _method: &MethodInfo) {}
}

/// Host that accepts everything and only knows `Object`
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostInterface for NullHost {
    fn abi_version(&self) -> AbiVersion {
        AbiVersion::CURRENT
    }

    fn has_class(&self, name: &StringName) -> bool {
        name == "Object"
    }
}

/// Kinds of a signal's parameters, in order
pub fn signal_parameter_kinds(args: &[PropertyInfo]) -> Vec<ValueKind> {
    args.iter().map(|a| a.kind).collect()
}
