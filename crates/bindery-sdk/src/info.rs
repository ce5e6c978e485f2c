//! Descriptive metadata for properties, arguments and methods
//!
//! These records are what the host sees when it introspects a class. They are
//! plain data; the registry builds them from the type metadata of bound
//! methods.

use crate::kind::ValueKind;
use crate::string_name::StringName;
use crate::value::Value;

/// Precision of an integer or real argument.
///
/// `Value` carries 64-bit ints and doubles; the metadata tells the host the
/// native width behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ArgumentMetadata {
    /// No precision information
    #[default]
    None = 0,
    #[allow(missing_docs)]
    IntIsInt8,
    #[allow(missing_docs)]
    IntIsInt16,
    #[allow(missing_docs)]
    IntIsInt32,
    #[allow(missing_docs)]
    IntIsInt64,
    #[allow(missing_docs)]
    IntIsUint8,
    #[allow(missing_docs)]
    IntIsUint16,
    #[allow(missing_docs)]
    IntIsUint32,
    #[allow(missing_docs)]
    IntIsUint64,
    #[allow(missing_docs)]
    RealIsFloat,
    #[allow(missing_docs)]
    RealIsDouble,
}

/// Editor hint attached to a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum PropertyHint {
    /// No hint
    #[default]
    None = 0,
    /// Numeric range, hint string `"min,max[,step]"`
    Range,
    /// Enumerated choices, hint string `"A,B,C"`
    Enum,
    /// Bit flags, hint string `"A,B,C"`
    Flags,
    /// File path
    File,
    /// Directory path
    Dir,
    /// Resource of the class named in the hint string
    ResourceType,
    /// Multiline text
    MultilineText,
    /// Node of the class named in the hint string
    NodeType,
    /// Array element type
    ArrayType,
}

/// Usage flags of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyUsage(pub u32);

impl PropertyUsage {
    /// Not stored, not shown
    pub const NONE: PropertyUsage = PropertyUsage(0);
    /// Serialized with the object
    pub const STORAGE: PropertyUsage = PropertyUsage(1 << 1);
    /// Shown in the editor
    pub const EDITOR: PropertyUsage = PropertyUsage(1 << 2);
    /// Property group marker
    pub const GROUP: PropertyUsage = PropertyUsage(1 << 7);
    /// Property subgroup marker
    pub const SUBGROUP: PropertyUsage = PropertyUsage(1 << 8);
    /// Read-only in the editor
    pub const READ_ONLY: PropertyUsage = PropertyUsage(1 << 28);
    /// Storage and editor
    pub const DEFAULT: PropertyUsage = PropertyUsage(Self::STORAGE.0 | Self::EDITOR.0);

    /// Whether every bit of `other` is set
    pub fn contains(self, other: PropertyUsage) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for PropertyUsage {
    fn default() -> Self {
        PropertyUsage::DEFAULT
    }
}

impl std::ops::BitOr for PropertyUsage {
    type Output = PropertyUsage;

    fn bitor(self, rhs: PropertyUsage) -> PropertyUsage {
        PropertyUsage(self.0 | rhs.0)
    }
}

/// Method flags
pub mod method_flags {
    /// Ordinary method
    pub const NORMAL: u32 = 1 << 0;
    /// Shown in the editor
    pub const EDITOR: u32 = 1 << 1;
    /// Receives `&C`
    pub const CONST: u32 = 1 << 2;
    /// Overridable by the host
    pub const VIRTUAL: u32 = 1 << 3;
    /// Accepts any number of arguments
    pub const VARARG: u32 = 1 << 4;
    /// No receiver
    pub const STATIC: u32 = 1 << 5;
    /// Flags used when none are given
    pub const DEFAULT: u32 = NORMAL;
}

/// Description of a property, argument or return value
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    /// Name (empty for return values)
    pub name: StringName,
    /// Kind; `Nil` means "any value"
    pub kind: ValueKind,
    /// Class name for object-valued entries
    pub class_name: StringName,
    /// Editor hint
    pub hint: PropertyHint,
    /// Hint argument
    pub hint_string: String,
    /// Usage flags
    pub usage: PropertyUsage,
}

impl PropertyInfo {
    /// Plain property of a kind
    pub fn new(kind: ValueKind, name: impl Into<StringName>) -> Self {
        PropertyInfo {
            name: name.into(),
            kind,
            class_name: StringName::empty(),
            hint: PropertyHint::None,
            hint_string: String::new(),
            usage: PropertyUsage::DEFAULT,
        }
    }

    /// Set the class name
    pub fn with_class_name(mut self, class_name: impl Into<StringName>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the hint and hint string
    pub fn with_hint(mut self, hint: PropertyHint, hint_string: impl Into<String>) -> Self {
        self.hint = hint;
        self.hint_string = hint_string.into();
        self
    }

    /// Set the usage flags
    pub fn with_usage(mut self, usage: PropertyUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Description of a bound or virtual method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Method name
    pub name: StringName,
    /// Return value, `None` when the method returns nothing
    pub return_value: Option<PropertyInfo>,
    /// Arguments in order
    pub arguments: Vec<PropertyInfo>,
    /// Trailing default argument values
    pub default_arguments: Vec<Value>,
    /// `method_flags` bits
    pub flags: u32,
    /// Return precision
    pub return_metadata: ArgumentMetadata,
    /// Per-argument precision
    pub argument_metadata: Vec<ArgumentMetadata>,
    /// Signature hash
    pub hash: u32,
}

impl MethodInfo {
    /// Method with no arguments and no return
    pub fn new(name: impl Into<StringName>) -> Self {
        MethodInfo {
            name: name.into(),
            return_value: None,
            arguments: Vec::new(),
            default_arguments: Vec::new(),
            flags: method_flags::DEFAULT,
            return_metadata: ArgumentMetadata::None,
            argument_metadata: Vec::new(),
            hash: 0,
        }
    }

    /// Whether a flag bit is set
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    /// Number of declared arguments
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_flags() {
        let usage = PropertyUsage::STORAGE | PropertyUsage::READ_ONLY;
        assert!(usage.contains(PropertyUsage::STORAGE));
        assert!(!usage.contains(PropertyUsage::EDITOR));
        assert!(PropertyUsage::default().contains(PropertyUsage::EDITOR));
    }

    #[test]
    fn test_property_builder() {
        let info = PropertyInfo::new(ValueKind::Int, "health")
            .with_hint(PropertyHint::Range, "0,100")
            .with_usage(PropertyUsage::STORAGE);
        assert_eq!(info.name, "health");
        assert_eq!(info.hint_string, "0,100");
        assert!(info.class_name.is_empty());
    }

    #[test]
    fn test_method_flags() {
        let mut info = MethodInfo::new("speak");
        info.flags |= method_flags::VIRTUAL | method_flags::CONST;
        assert!(info.has_flag(method_flags::VIRTUAL));
        assert!(!info.has_flag(method_flags::STATIC));
    }
}
