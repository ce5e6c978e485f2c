//! Argument tuples and native callable shapes
//!
//! `ArgTuple` is implemented for tuples of up to eight `BoundType`s. The
//! `MethodFn`, `ConstMethodFn` and `StaticFn` traits are implemented for every
//! `Fn` of matching shape, so plain method paths like `Player::set_health`
//! can be bound directly.

use bindery_sdk::{ArgumentMetadata, BoundType, NativePtr, PropertyInfo, ReturnValue, Value};

use crate::error::DispatchError;

/// Compile-time description of one argument
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Kind, class name and hint; the name is filled in at bind time
    pub info: PropertyInfo,
    /// Native precision
    pub metadata: ArgumentMetadata,
}

impl ArgumentSpec {
    /// Describe an argument of type `T`
    pub fn of<T: BoundType>() -> Self {
        ArgumentSpec {
            info: T::property_info(""),
            metadata: T::ARG_METADATA,
        }
    }
}

/// Convert one dynamic argument
#[inline]
pub fn argument<T: BoundType>(args: &[Value], index: usize) -> Result<T, DispatchError> {
    let value = args.get(index).ok_or(DispatchError::TooFewArguments {
        expected: index + 1,
        got: args.len(),
    })?;
    T::from_value(value).map_err(|e| DispatchError::InvalidArgument {
        index,
        expected: e.to,
        got: e.from,
    })
}

/// A tuple of bound argument types
pub trait ArgTuple: Sized + 'static {
    /// Number of arguments
    const COUNT: usize;

    /// Per-argument descriptions
    fn specs() -> Vec<ArgumentSpec>;

    /// Convert from exactly `COUNT` values
    fn from_values(args: &[Value]) -> Result<Self, DispatchError>;

    /// Read from exactly `COUNT` native pointers.
    ///
    /// # Safety
    /// `args[i]` must point to a live value of the i-th tuple type.
    unsafe fn read_ptrs(args: &[NativePtr]) -> Self;
}

/// `Fn(&mut C, P1..Pn) -> R`
pub trait MethodFn<C, Args, R>: Send + Sync + 'static {
    /// Call with the receiver and the unpacked arguments
    fn invoke(&self, this: &mut C, args: Args) -> R;
}

/// `Fn(&C, P1..Pn) -> R`
pub trait ConstMethodFn<C, Args, R>: Send + Sync + 'static {
    /// Call with the receiver and the unpacked arguments
    fn invoke(&self, this: &C, args: Args) -> R;
}

/// `Fn(P1..Pn) -> R`
pub trait StaticFn<Args, R>: Send + Sync + 'static {
    /// Call with the unpacked arguments
    fn invoke(&self, args: Args) -> R;
}

macro_rules! impl_arity {
    ($count:expr; $($P:ident $a:ident $i:tt),*) => {
        impl<$($P: BoundType),*> ArgTuple for ($($P,)*) {
            const COUNT: usize = $count;

            fn specs() -> Vec<ArgumentSpec> {
                vec![$(ArgumentSpec::of::<$P>()),*]
            }

            #[allow(unused_variables)]
            fn from_values(args: &[Value]) -> Result<Self, DispatchError> {
                Ok(($(argument::<$P>(args, $i)?,)*))
            }

            #[allow(unused_variables)]
            unsafe fn read_ptrs(args: &[NativePtr]) -> Self {
                ($($P::read_ptr(args[$i]),)*)
            }
        }

        impl<C, F, R, $($P),*> MethodFn<C, ($($P,)*), R> for F
        where
            C: 'static,
            R: ReturnValue,
            $($P: BoundType,)*
            F: Fn(&mut C, $($P),*) -> R + Send + Sync + 'static,
        {
            #[inline]
            fn invoke(&self, this: &mut C, args: ($($P,)*)) -> R {
                let ($($a,)*) = args;
                (self)(this, $($a),*)
            }
        }

        impl<C, F, R, $($P),*> ConstMethodFn<C, ($($P,)*), R> for F
        where
            C: 'static,
            R: ReturnValue,
            $($P: BoundType,)*
            F: Fn(&C, $($P),*) -> R + Send + Sync + 'static,
        {
            #[inline]
            fn invoke(&self, this: &C, args: ($($P,)*)) -> R {
                let ($($a,)*) = args;
                (self)(this, $($a),*)
            }
        }

        impl<F, R, $($P),*> StaticFn<($($P,)*), R> for F
        where
            R: ReturnValue,
            $($P: BoundType,)*
            F: Fn($($P),*) -> R + Send + Sync + 'static,
        {
            #[inline]
            fn invoke(&self, args: ($($P,)*)) -> R {
                let ($($a,)*) = args;
                (self)($($a),*)
            }
        }
    };
}

impl_arity!(0;);
impl_arity!(1; P0 a0 0);
impl_arity!(2; P0 a0 0, P1 a1 1);
impl_arity!(3; P0 a0 0, P1 a1 1, P2 a2 2);
impl_arity!(4; P0 a0 0, P1 a1 1, P2 a2 2, P3 a3 3);
impl_arity!(5; P0 a0 0, P1 a1 1, P2 a2 2, P3 a3 3, P4 a4 4);
impl_arity!(6; P0 a0 0, P1 a1 1, P2 a2 2, P3 a3 3, P4 a4 4, P5 a5 5);
impl_arity!(7; P0 a0 0, P1 a1 1, P2 a2 2, P3 a3 3, P4 a4 4, P5 a5 5, P6 a6 6);
impl_arity!(8; P0 a0 0, P1 a1 1, P2 a2 2, P3 a3 3, P4 a4 4, P5 a5 5, P6 a6 6, P7 a7 7);

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_sdk::{GString, ValueKind};

    #[test]
    fn test_specs() {
        let specs = <(i32, f32, GString)>::specs();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].info.kind, ValueKind::Int);
        assert_eq!(specs[0].metadata, ArgumentMetadata::IntIsInt32);
        assert_eq!(specs[2].info.kind, ValueKind::String);
        assert_eq!(<()>::COUNT, 0);
    }

    #[test]
    fn test_from_values_reports_index() {
        let args = [Value::Int(1), Value::from("x")];
        assert_eq!(
            <(i64, i64)>::from_values(&args),
            Err(DispatchError::InvalidArgument {
                index: 1,
                expected: ValueKind::Int,
                got: ValueKind::String,
            })
        );
        assert_eq!(<(i64, bool)>::from_values(&[Value::Int(2), Value::Int(1)]), Ok((2, true)));
    }

    #[test]
    fn test_read_ptrs() {
        let a = 7i64;
        let b = GString::from("seven");
        let ptrs = [&a as *const i64 as NativePtr, &b as *const GString as NativePtr];
        let (x, y) = unsafe { <(i64, GString)>::read_ptrs(&ptrs) };
        assert_eq!(x, 7);
        assert_eq!(y, b);
    }

    #[test]
    fn test_fn_shapes() {
        struct Counter(i64);

        fn add(c: &mut Counter, by: i64) -> i64 {
            c.0 += by;
            c.0
        }
        fn get(c: &Counter) -> i64 {
            c.0
        }

        let mut c = Counter(1);
        assert_eq!(MethodFn::invoke(&add, &mut c, (2,)), 3);
        assert_eq!(ConstMethodFn::invoke(&get, &c, ()), 3);
        assert_eq!(StaticFn::invoke(&|a: i64, b: i64| a * b, (3, 4)), 12);
    }
}
