//! Registry and dispatch errors

use bindery_sdk::{AbiVersion, ObjectId, StringName, ValueKind};

/// Failure while building the class database.
///
/// None of these are fatal: the registry stays usable and the offending
/// registration is simply not applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    /// Host cannot serve the required interface version
    #[error("Host ABI {host} is incompatible with required {required}")]
    AbiMismatch {
        /// Version reported by the host
        host: AbiVersion,
        /// Version the registry was configured for
        required: AbiVersion,
    },

    /// Class already registered
    #[error("Class '{0}' is already registered")]
    DuplicateClass(StringName),

    /// Method name already bound in the class
    #[error("Method '{class}::{name}' is already bound")]
    DuplicateMethod {
        /// Class
        class: StringName,
        /// Method
        name: StringName,
    },

    /// Property name already used in the class
    #[error("Property '{class}::{name}' already exists")]
    DuplicateProperty {
        /// Class
        class: StringName,
        /// Property
        name: StringName,
    },

    /// Signal name already used in the class
    #[error("Signal '{class}::{name}' already exists")]
    DuplicateSignal {
        /// Class
        class: StringName,
        /// Signal
        name: StringName,
    },

    /// Constant name already used in the class
    #[error("Constant '{class}::{name}' already exists")]
    DuplicateConstant {
        /// Class
        class: StringName,
        /// Constant
        name: StringName,
    },

    /// Virtual method declared or overridden twice in the class
    #[error("Virtual method '{class}::{name}' is already registered")]
    DuplicateVirtual {
        /// Class
        class: StringName,
        /// Virtual method
        name: StringName,
    },

    /// Singleton name already taken
    #[error("Singleton '{0}' is already registered")]
    DuplicateSingleton(StringName),

    /// Parent is neither registered nor known to the host
    #[error("Class '{class}' has unknown parent '{parent}'")]
    MissingParent {
        /// Class being registered
        class: StringName,
        /// Parent it names
        parent: StringName,
    },

    /// Class is not registered
    #[error("Unknown class '{0}'")]
    UnknownClass(StringName),

    /// A regular method and a virtual method share a name in one class
    #[error("'{class}::{name}' is both a regular and a virtual method")]
    VirtualCollision {
        /// Class
        class: StringName,
        /// Colliding name
        name: StringName,
    },

    /// Accessor takes the wrong number of arguments
    #[error("Accessor '{accessor}' of property '{class}::{property}' takes {got} arguments, expected {expected}")]
    AccessorSignature {
        /// Class
        class: StringName,
        /// Property
        property: StringName,
        /// Getter or setter name
        accessor: StringName,
        /// Required argument count
        expected: usize,
        /// Actual argument count
        got: usize,
    },

    /// Accessor is not bound on the class or its parents
    #[error("Accessor '{accessor}' of property '{class}::{property}' is not bound")]
    MissingAccessor {
        /// Class
        class: StringName,
        /// Property
        property: StringName,
        /// Getter or setter name (empty when no getter was given)
        accessor: StringName,
    },

    /// Default arguments do not fit the method's signature
    #[error("Invalid default arguments for '{method}': {reason}")]
    InvalidDefaults {
        /// Method
        method: StringName,
        /// What is wrong
        reason: String,
    },

    /// Instance method of one class bound on an unrelated class
    #[error("Method receiver '{got}' is not '{expected}' or one of its bases")]
    ClassMismatch {
        /// Class being bound
        expected: StringName,
        /// Receiver class of the method
        got: StringName,
    },
}

/// Failure of a dynamic or direct call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// No method of that name on the class or its parents
    #[error("Invalid method '{class}::{method}'")]
    InvalidMethod {
        /// Class searched
        class: StringName,
        /// Method
        method: StringName,
    },

    /// Fewer arguments than required
    #[error("Too few arguments: expected at least {expected}, got {got}")]
    TooFewArguments {
        /// Minimum count
        expected: usize,
        /// Given count
        got: usize,
    },

    /// More arguments than declared
    #[error("Too many arguments: expected at most {expected}, got {got}")]
    TooManyArguments {
        /// Maximum count
        expected: usize,
        /// Given count
        got: usize,
    },

    /// Argument kind neither matches nor converts strictly
    #[error("Invalid argument {index}: expected {expected}, got {got}")]
    InvalidArgument {
        /// Zero-based position
        index: usize,
        /// Declared kind
        expected: ValueKind,
        /// Given kind
        got: ValueKind,
    },

    /// Instance method called without an instance
    #[error("Instance is null")]
    InstanceIsNull,

    /// Instance is not of the method's class
    #[error("Instance of '{got}' is not a '{expected}'")]
    InvalidInstance {
        /// Receiver class
        expected: StringName,
        /// Instance class
        got: StringName,
    },

    /// Class is not registered
    #[error("Unknown class '{0}'")]
    UnknownClass(StringName),

    /// No live object with that id
    #[error("Unknown object {0}")]
    UnknownObject(ObjectId),

    /// Object is locked by a call still in progress
    #[error("Object {0} is busy in another call")]
    InstanceBusy(ObjectId),

    /// No property of that name on the class or its parents
    #[error("Property '{class}::{property}' not found")]
    PropertyNotFound {
        /// Class searched
        class: StringName,
        /// Property
        property: StringName,
    },

    /// Property has no setter
    #[error("Property '{class}::{property}' is read-only")]
    ReadOnlyProperty {
        /// Class
        class: StringName,
        /// Property
        property: StringName,
    },

    /// Class is abstract or has no constructor
    #[error("Class '{0}' cannot be instantiated")]
    NotInstantiable(StringName),
}

/// Registration result
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Dispatch result
pub type DispatchResult<T> = Result<T, DispatchError>;
