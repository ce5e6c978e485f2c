//! Raw call convention
//!
//! Callers on the far side of a C boundary cannot receive a `Result`. They pass
//! a `CallErrorRecord` out-parameter instead; these entry points fill it from
//! the `DispatchError` and return a plain value.

use bindery_sdk::{NativePtr, NativePtrMut, Value};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::binding::MethodBinding;
use crate::error::DispatchError;
use crate::instance::ClassInstance;

/// Outcome code stored in `CallErrorRecord::error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum CallErrorCode {
    /// Success
    Ok = 0,
    /// No method of that name
    InvalidMethod = 1,
    /// Argument of the wrong kind
    InvalidArgument = 2,
    /// More arguments than declared
    TooManyArguments = 3,
    /// Fewer arguments than required
    TooFewArguments = 4,
    /// Instance method called without an instance
    InstanceIsNull = 5,
    /// Instance of the wrong class
    InvalidInstance = 6,
    /// Class not registered
    UnknownClass = 7,
    /// Stale object id
    UnknownObject = 8,
    /// No property of that name
    PropertyNotFound = 9,
    /// Property has no setter
    ReadOnlyProperty = 10,
    /// Class cannot be instantiated
    NotInstantiable = 11,
    /// Object is already in a call
    InstanceBusy = 12,
}

impl From<&DispatchError> for CallErrorCode {
    fn from(error: &DispatchError) -> Self {
        match error {
            DispatchError::InvalidMethod { .. } => CallErrorCode::InvalidMethod,
            DispatchError::InvalidArgument { .. } => CallErrorCode::InvalidArgument,
            DispatchError::TooManyArguments { .. } => CallErrorCode::TooManyArguments,
            DispatchError::TooFewArguments { .. } => CallErrorCode::TooFewArguments,
            DispatchError::InstanceIsNull => CallErrorCode::InstanceIsNull,
            DispatchError::InvalidInstance { .. } => CallErrorCode::InvalidInstance,
            DispatchError::UnknownClass(_) => CallErrorCode::UnknownClass,
            DispatchError::UnknownObject(_) => CallErrorCode::UnknownObject,
            DispatchError::PropertyNotFound { .. } => CallErrorCode::PropertyNotFound,
            DispatchError::ReadOnlyProperty { .. } => CallErrorCode::ReadOnlyProperty,
            DispatchError::NotInstantiable(_) => CallErrorCode::NotInstantiable,
            DispatchError::InstanceBusy(_) => CallErrorCode::InstanceBusy,
        }
    }
}

/// Out-parameter filled by the raw entry points.
///
/// For `InvalidArgument`, `argument` is the offending index and `expected` the
/// raw kind tag. For argument-count errors, `argument` is the count received
/// and `expected` the count required. Otherwise both are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct CallErrorRecord {
    /// A `CallErrorCode` as `u32`
    pub error: u32,
    /// Argument index or received count
    pub argument: i32,
    /// Expected kind tag or count
    pub expected: i32,
}

fn clamp(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl CallErrorRecord {
    /// Successful call
    pub const OK: CallErrorRecord = CallErrorRecord {
        error: 0,
        argument: 0,
        expected: 0,
    };

    /// Encode an error
    pub fn from_error(error: &DispatchError) -> Self {
        let code = u32::from(CallErrorCode::from(error));
        let (argument, expected) = match error {
            DispatchError::InvalidArgument { index, expected, .. } => {
                (clamp(*index), expected.to_raw() as i32)
            }
            DispatchError::TooManyArguments { expected, got }
            | DispatchError::TooFewArguments { expected, got } => (clamp(*got), clamp(*expected)),
            _ => (0, 0),
        };
        CallErrorRecord {
            error: code,
            argument,
            expected,
        }
    }

    /// Decoded code; `None` for a value this version does not know
    pub fn code(&self) -> Option<CallErrorCode> {
        CallErrorCode::try_from(self.error).ok()
    }

    /// Whether the call succeeded
    pub fn is_ok(&self) -> bool {
        self.error == 0
    }

    fn record<T>(&mut self, result: Result<T, DispatchError>) -> Option<T> {
        match result {
            Ok(value) => {
                *self = CallErrorRecord::OK;
                Some(value)
            }
            Err(err) => {
                *self = CallErrorRecord::from_error(&err);
                None
            }
        }
    }
}

/// Dynamic call reporting through `record`; returns `Nil` on failure
pub fn dispatch_call(
    binding: &MethodBinding,
    instance: Option<&mut dyn ClassInstance>,
    args: &[Value],
    record: &mut CallErrorRecord,
) -> Value {
    record
        .record(binding.call(instance, args))
        .unwrap_or_default()
}

/// Direct call reporting through `record`; `ret` is untouched on failure
///
/// # Safety
/// Same contract as [`MethodBinding::ptrcall`].
pub unsafe fn dispatch_ptrcall(
    binding: &MethodBinding,
    instance: Option<&mut dyn ClassInstance>,
    args: &[NativePtr],
    ret: NativePtrMut,
    record: &mut CallErrorRecord,
) {
    record.record(binding.ptrcall(instance, args, ret));
}
