//! Virtual method overrides
//!
//! A class overrides a virtual method by implementing `Overrides<V>` and
//! registering it with `ClassBuilder::override_virtual::<V>()`. Registration
//! stores a monomorphized trampoline plus the signature hash in the class's
//! own entry; a class that does not override gets no slot. Resolution walks
//! the parent chain and only hands out a pointer whose hash matches the
//! caller's expectation.

use bindery_sdk::{method_flags, MethodInfo, NativePtr, NativePtrMut, ReturnValue, StringName, ValueKind};

use crate::binding::{ArgTuple, ArgumentSpec};
use crate::error::DispatchError;
use crate::instance::{ClassInstance, NativeClass};

/// Direct-call entry point of an override
pub type VirtualFn =
    unsafe fn(&mut dyn ClassInstance, &[NativePtr], NativePtrMut) -> Result<(), DispatchError>;

/// Per-class record of an override
#[derive(Clone, Copy)]
pub struct VirtualSlot {
    /// Trampoline into the class's body
    pub function: VirtualFn,
    /// Signature hash the body was compiled against
    pub hash: u32,
}

impl std::fmt::Debug for VirtualSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualSlot")
            .field("function", &(self.function as usize as *const ()))
            .field("hash", &format_args!("{:#010x}", self.hash))
            .finish()
    }
}

/// Stable fingerprint of a signature.
///
/// CRC-32 over the return kind, the argument kinds and constness, each as
/// little-endian `u32`. Host and extension compute it the same way.
pub fn signature_hash(ret: Option<ValueKind>, args: &[ValueKind], is_const: bool) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    match ret {
        Some(kind) => {
            hasher.update(&1u32.to_le_bytes());
            hasher.update(&kind.to_raw().to_le_bytes());
        }
        None => hasher.update(&0u32.to_le_bytes()),
    }
    hasher.update(&(args.len() as u32).to_le_bytes());
    for kind in args {
        hasher.update(&kind.to_raw().to_le_bytes());
    }
    hasher.update(&(is_const as u32).to_le_bytes());
    hasher.finalize()
}

/// An overridable method: its name and signature.
pub trait VirtualMethod: 'static {
    /// Method name
    const NAME: &'static str;

    /// Receiver is `&self`
    const IS_CONST: bool = false;

    /// Argument tuple
    type Args: ArgTuple;

    /// Return type
    type Ret: ReturnValue;

    /// Signature hash
    fn hash() -> u32 {
        let ret = <Self::Ret as ReturnValue>::HAS_RETURN.then_some(<Self::Ret as ReturnValue>::KIND);
        let args: Vec<ValueKind> = Self::Args::specs().iter().map(|s| s.info.kind).collect();
        signature_hash(ret, &args, Self::IS_CONST)
    }

    /// Declaration sent to the host
    fn method_info() -> MethodInfo {
        let specs = Self::Args::specs();
        let mut info = MethodInfo::new(Self::NAME);
        info.flags = method_flags::VIRTUAL | if Self::IS_CONST { method_flags::CONST } else { 0 };
        info.return_value = <Self::Ret as ReturnValue>::return_info();
        info.return_metadata = <Self::Ret as ReturnValue>::METADATA;
        info.argument_metadata = specs.iter().map(|s: &ArgumentSpec| s.metadata).collect();
        info.arguments = specs
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let mut arg = s.info;
                arg.name = StringName::new(&format!("arg{}", i));
                arg
            })
            .collect();
        info.hash = Self::hash();
        info
    }
}

/// `C` provides its own body for `V`.
pub trait Overrides<V: VirtualMethod>: NativeClass {
    /// The overriding body
    fn call_virtual(&mut self, args: V::Args) -> V::Ret;
}

/// Trampoline stored in a slot for `C`'s override of `V`.
///
/// # Safety
/// `args[i]` must point to a live value of the i-th argument type of `V`, and
/// `ret` must be writable storage for `V::Ret` (ignored for `()`).
pub unsafe fn virtual_trampoline<C, V>(
    instance: &mut dyn ClassInstance,
    args: &[NativePtr],
    ret: NativePtrMut,
) -> Result<(), DispatchError>
where
    C: Overrides<V>,
    V: VirtualMethod,
{
    let count = <V::Args as ArgTuple>::COUNT;
    if args.len() < count {
        return Err(DispatchError::TooFewArguments {
            expected: count,
            got: args.len(),
        });
    }
    if args.len() > count {
        return Err(DispatchError::TooManyArguments {
            expected: count,
            got: args.len(),
        });
    }
    let this = crate::binding::receiver::<C>(Some(instance))?;
    let args = <V::Args as ArgTuple>::read_ptrs(args);
    <C as Overrides<V>>::call_virtual(this, args).write_return(ret);
    Ok(())
}

/// Slot for `C`'s override of `V`
pub fn slot_for<C, V>() -> VirtualSlot
where
    C: Overrides<V>,
    V: VirtualMethod,
{
    VirtualSlot {
        function: virtual_trampoline::<C, V>,
        hash: V::hash(),
    }
}
