//! Type-erased call adapters
//!
//! One adapter per receiver shape. Each is generic over the native callable
//! and its argument tuple, so a bound method is monomorphized once and then
//! stored behind `Box<dyn Callable>`.

use std::marker::PhantomData;

use bindery_sdk::{BoundType, NativePtr, NativePtrMut, ReturnValue, StringName, Value};

use super::args::{ArgTuple, ConstMethodFn, MethodFn, StaticFn};
use crate::error::DispatchError;
use crate::instance::{downcast_mut, ClassInstance, NativeClass};

/// Type-erased native callable.
///
/// Argument count and kinds are validated by `MethodBinding` before an adapter
/// is reached.
pub trait Callable: Send + Sync {
    /// Dynamic call with exactly the declared number of arguments
    fn call(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[Value],
    ) -> Result<Value, DispatchError>;

    /// Direct call.
    ///
    /// # Safety
    /// `args` must hold one pointer per declared argument, each to a live value
    /// of that argument's native type. `ret` must be writable storage for the
    /// return type, or may be null when there is no return.
    unsafe fn ptrcall(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[NativePtr],
        ret: NativePtrMut,
    ) -> Result<(), DispatchError>;
}

/// Locate the receiver of an instance method
pub(crate) fn receiver<'a, C: NativeClass>(
    instance: Option<&'a mut dyn ClassInstance>,
) -> Result<&'a mut C, DispatchError> {
    let instance = instance.ok_or(DispatchError::InstanceIsNull)?;
    let got = instance.class_name();
    downcast_mut::<C>(instance).ok_or_else(|| DispatchError::InvalidInstance {
        expected: StringName::new(C::CLASS_NAME),
        got,
    })
}

// ============================================================================
// Fixed-arity adapters
// ============================================================================

pub(crate) struct MutAdapter<C, F, Args, R> {
    f: F,
    _marker: PhantomData<fn(&mut C, Args) -> R>,
}

impl<C, F, Args, R> MutAdapter<C, F, Args, R> {
    pub(crate) fn new(f: F) -> Self {
        MutAdapter {
            f,
            _marker: PhantomData,
        }
    }
}

impl<C, F, Args, R> Callable for MutAdapter<C, F, Args, R>
where
    C: NativeClass,
    F: MethodFn<C, Args, R>,
    Args: ArgTuple,
    R: ReturnValue,
{
    fn call(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        let this = receiver::<C>(instance)?;
        let args = Args::from_values(args)?;
        Ok(self.f.invoke(this, args).into_return())
    }

    unsafe fn ptrcall(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[NativePtr],
        ret: NativePtrMut,
    ) -> Result<(), DispatchError> {
        let this = receiver::<C>(instance)?;
        let args = Args::read_ptrs(args);
        self.f.invoke(this, args).write_return(ret);
        Ok(())
    }
}

pub(crate) struct ConstAdapter<C, F, Args, R> {
    f: F,
    _marker: PhantomData<fn(&C, Args) -> R>,
}

impl<C, F, Args, R> ConstAdapter<C, F, Args, R> {
    pub(crate) fn new(f: F) -> Self {
        ConstAdapter {
            f,
            _marker: PhantomData,
        }
    }
}

impl<C, F, Args, R> Callable for ConstAdapter<C, F, Args, R>
where
    C: NativeClass,
    F: ConstMethodFn<C, Args, R>,
    Args: ArgTuple,
    R: ReturnValue,
{
    fn call(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        let this: &C = receiver::<C>(instance)?;
        let args = Args::from_values(args)?;
        Ok(self.f.invoke(this, args).into_return())
    }

    unsafe fn ptrcall(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[NativePtr],
        ret: NativePtrMut,
    ) -> Result<(), DispatchError> {
        let this: &C = receiver::<C>(instance)?;
        let args = Args::read_ptrs(args);
        self.f.invoke(this, args).write_return(ret);
        Ok(())
    }
}

pub(crate) struct StaticAdapter<F, Args, R> {
    f: F,
    _marker: PhantomData<fn(Args) -> R>,
}

impl<F, Args, R> StaticAdapter<F, Args, R> {
    pub(crate) fn new(f: F) -> Self {
        StaticAdapter {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, Args, R> Callable for StaticAdapter<F, Args, R>
where
    F: StaticFn<Args, R>,
    Args: ArgTuple,
    R: ReturnValue,
{
    fn call(
        &self,
        _instance: Option<&mut dyn ClassInstance>,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        let args = Args::from_values(args)?;
        Ok(self.f.invoke(args).into_return())
    }

    unsafe fn ptrcall(
        &self,
        _instance: Option<&mut dyn ClassInstance>,
        args: &[NativePtr],
        ret: NativePtrMut,
    ) -> Result<(), DispatchError> {
        let args = Args::read_ptrs(args);
        self.f.invoke(args).write_return(ret);
        Ok(())
    }
}

// ============================================================================
// Variadic adapter
// ============================================================================

pub(crate) struct VarargAdapter<C, F> {
    f: F,
    _marker: PhantomData<fn(&mut C)>,
}

impl<C, F> VarargAdapter<C, F> {
    pub(crate) fn new(f: F) -> Self {
        VarargAdapter {
            f,
            _marker: PhantomData,
        }
    }
}

impl<C, F> Callable for VarargAdapter<C, F>
where
    C: NativeClass,
    F: Fn(&mut C, &[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
{
    fn call(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        let this = receiver::<C>(instance)?;
        (self.f)(this, args)
    }

    unsafe fn ptrcall(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[NativePtr],
        ret: NativePtrMut,
    ) -> Result<(), DispatchError> {
        let this = receiver::<C>(instance)?;
        let values: Vec<Value> = args.iter().map(|&p| Value::read_ptr(p)).collect();
        let result = (self.f)(this, &values)?;
        if !ret.is_null() {
            result.write_ptr(ret);
        }
        Ok(())
    }
}
