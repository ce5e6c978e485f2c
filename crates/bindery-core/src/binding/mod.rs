//! Method bindings
//!
//! A `MethodBinding` wraps one native callable and exposes it through two
//! paths: a dynamic call taking `Value`s, validated and converted at the
//! boundary, and a direct call taking pointers to already-agreed native
//! layouts. Both paths reach the same monomorphized adapter.

mod adapter;
mod args;

use std::borrow::Cow;

pub use adapter::Callable;
pub(crate) use adapter::receiver;
pub use args::{argument, ArgTuple, ArgumentSpec, ConstMethodFn, MethodFn, StaticFn};

use adapter::{ConstAdapter, MutAdapter, StaticAdapter, VarargAdapter};
use bindery_sdk::{
    method_flags, ArgumentMetadata, MethodInfo, NativePtr, NativePtrMut, PropertyInfo, ReturnValue,
    StringName, Value, ValueKind,
};

use crate::error::{DispatchError, RegistrationError};
use crate::instance::{ClassInstance, NativeClass};
use crate::virtuals::signature_hash;

/// One bound callable
pub struct MethodBinding {
    name: StringName,
    /// Receiver class for instance methods
    receiver: Option<StringName>,
    arguments: Vec<ArgumentSpec>,
    argument_names: Vec<StringName>,
    return_info: Option<PropertyInfo>,
    return_metadata: ArgumentMetadata,
    flags: u32,
    defaults: Vec<Value>,
    callable: Box<dyn Callable>,
}

impl std::fmt::Debug for MethodBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodBinding")
            .field("name", &self.name)
            .field("arguments", &self.argument_kinds())
            .field("return", &self.return_kind())
            .field("flags", &self.flags)
            .field("defaults", &self.defaults.len())
            .finish()
    }
}

impl MethodBinding {
    fn from_parts<Args: ArgTuple, R: ReturnValue>(
        name: impl Into<StringName>,
        receiver: Option<StringName>,
        flags: u32,
        callable: Box<dyn Callable>,
    ) -> Self {
        MethodBinding {
            name: name.into(),
            receiver,
            arguments: Args::specs(),
            argument_names: Vec::new(),
            return_info: R::return_info(),
            return_metadata: R::METADATA,
            flags,
            defaults: Vec::new(),
            callable,
        }
    }

    /// Bind `Fn(&mut C, P1..Pn) -> R`
    pub fn method<C, F, Args, R>(name: impl Into<StringName>, f: F) -> Self
    where
        C: NativeClass,
        F: MethodFn<C, Args, R>,
        Args: ArgTuple,
        R: ReturnValue,
    {
        Self::from_parts::<Args, R>(
            name,
            Some(StringName::new(C::CLASS_NAME)),
            method_flags::DEFAULT,
            Box::new(MutAdapter::<C, F, Args, R>::new(f)),
        )
    }

    /// Bind `Fn(&C, P1..Pn) -> R`
    pub fn const_method<C, F, Args, R>(name: impl Into<StringName>, f: F) -> Self
    where
        C: NativeClass,
        F: ConstMethodFn<C, Args, R>,
        Args: ArgTuple,
        R: ReturnValue,
    {
        Self::from_parts::<Args, R>(
            name,
            Some(StringName::new(C::CLASS_NAME)),
            method_flags::DEFAULT | method_flags::CONST,
            Box::new(ConstAdapter::<C, F, Args, R>::new(f)),
        )
    }

    /// Bind `Fn(P1..Pn) -> R`; callable without an instance
    pub fn static_method<F, Args, R>(name: impl Into<StringName>, f: F) -> Self
    where
        F: StaticFn<Args, R>,
        Args: ArgTuple,
        R: ReturnValue,
    {
        Self::from_parts::<Args, R>(
            name,
            None,
            method_flags::DEFAULT | method_flags::STATIC,
            Box::new(StaticAdapter::<F, Args, R>::new(f)),
        )
    }

    /// Bind a variadic method that checks its own arguments.
    ///
    /// The direct path expects every pointer to be a `Value`, and `ret` to be
    /// storage for a `Value`.
    pub fn vararg<C, F>(name: impl Into<StringName>, f: F) -> Self
    where
        C: NativeClass,
        F: Fn(&mut C, &[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        MethodBinding {
            name: name.into(),
            receiver: Some(StringName::new(C::CLASS_NAME)),
            arguments: Vec::new(),
            argument_names: Vec::new(),
            return_info: Some(PropertyInfo::new(ValueKind::Nil, "")),
            return_metadata: ArgumentMetadata::None,
            flags: method_flags::DEFAULT | method_flags::VARARG,
            defaults: Vec::new(),
            callable: Box::new(VarargAdapter::<C, F>::new(f)),
        }
    }

    /// Name the arguments in order
    pub fn with_arg_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StringName>,
    {
        self.argument_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set default values for the trailing arguments
    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = Value>) -> Self {
        self.defaults = defaults.into_iter().collect();
        self
    }

    /// Add `method_flags` bits
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    /// Method name
    #[inline]
    pub fn name(&self) -> &StringName {
        &self.name
    }

    /// Receiver class, `None` for static methods
    pub fn receiver(&self) -> Option<&StringName> {
        self.receiver.as_ref()
    }

    /// Declared argument count (zero for variadic methods)
    #[inline]
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Kind of each argument
    pub fn argument_kinds(&self) -> Vec<ValueKind> {
        self.arguments.iter().map(|a| a.info.kind).collect()
    }

    /// Kind of one argument
    pub fn argument_kind(&self, index: usize) -> Option<ValueKind> {
        self.arguments.get(index).map(|a| a.info.kind)
    }

    /// Return kind, `None` when nothing is returned
    pub fn return_kind(&self) -> Option<ValueKind> {
        self.return_info.as_ref().map(|r| r.kind)
    }

    /// Whether a value is returned
    pub fn has_return(&self) -> bool {
        self.return_info.is_some()
    }

    /// `method_flags` bits
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Callable without an instance
    pub fn is_static(&self) -> bool {
        self.flags & method_flags::STATIC != 0
    }

    /// Receiver is `&C`
    pub fn is_const(&self) -> bool {
        self.flags & method_flags::CONST != 0
    }

    /// Takes any number of `Value` arguments
    pub fn is_vararg(&self) -> bool {
        self.flags & method_flags::VARARG != 0
    }

    /// Default values of the trailing arguments
    pub fn defaults(&self) -> &[Value] {
        &self.defaults
    }

    /// Minimum number of arguments a dynamic call must supply
    pub fn required_argument_count(&self) -> usize {
        self.arguments.len().saturating_sub(self.defaults.len())
    }

    /// Stable fingerprint of the signature
    pub fn hash(&self) -> u32 {
        signature_hash(self.return_kind(), &self.argument_kinds(), self.is_const())
    }

    /// Full description for the host
    pub fn method_info(&self) -> MethodInfo {
        let arguments = self
            .arguments
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let mut info = spec.info.clone();
                info.name = self
                    .argument_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| StringName::new(&format!("arg{}", i)));
                info
            })
            .collect();

        MethodInfo {
            name: self.name.clone(),
            return_value: self.return_info.clone(),
            arguments,
            default_arguments: self.defaults.clone(),
            flags: self.flags,
            return_metadata: self.return_metadata,
            argument_metadata: self.arguments.iter().map(|a| a.metadata).collect(),
            hash: self.hash(),
        }
    }

    /// Check the defaults against the signature.
    ///
    /// With `convert_kinds`, each default is converted to its argument's kind so
    /// the dynamic path sees exact kinds.
    pub(crate) fn validate_defaults(&mut self, convert_kinds: bool) -> Result<(), RegistrationError> {
        if self.defaults.is_empty() {
            return Ok(());
        }
        if self.is_vararg() {
            return Err(RegistrationError::InvalidDefaults {
                method: self.name.clone(),
                reason: "variadic methods take no defaults".to_string(),
            });
        }
        let count = self.arguments.len();
        if self.defaults.len() > count {
            return Err(RegistrationError::InvalidDefaults {
                method: self.name.clone(),
                reason: format!("{} defaults for {} arguments", self.defaults.len(), count),
            });
        }
        if !convert_kinds {
            return Ok(());
        }

        let first = count - self.defaults.len();
        for (offset, default) in self.defaults.iter_mut().enumerate() {
            let kind = self.arguments[first + offset].info.kind;
            if kind == ValueKind::Nil || default.kind() == kind {
                continue;
            }
            match default.convert_to(kind) {
                Ok(converted) => *default = converted,
                Err(e) => {
                    return Err(RegistrationError::InvalidDefaults {
                        method: self.name.clone(),
                        reason: format!("argument {}: {}", first + offset, e),
                    })
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------------

    /// Dynamic call.
    ///
    /// Validates count and kinds, fills trailing defaults, then converts and
    /// invokes. Nothing reaches the native callable unless validation passes.
    pub fn call(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        if instance.is_none() && !self.is_static() {
            return Err(DispatchError::InstanceIsNull);
        }
        if self.is_vararg() {
            return self.callable.call(instance, args);
        }

        let count = self.arguments.len();
        if args.len() > count {
            return Err(DispatchError::TooManyArguments {
                expected: count,
                got: args.len(),
            });
        }
        let required = self.required_argument_count();
        if args.len() < required {
            return Err(DispatchError::TooFewArguments {
                expected: required,
                got: args.len(),
            });
        }

        for (index, (arg, spec)) in args.iter().zip(&self.arguments).enumerate() {
            let expected = spec.info.kind;
            let got = arg.kind();
            if expected != ValueKind::Nil && got != expected && !arg.can_convert_strict(expected) {
                return Err(DispatchError::InvalidArgument {
                    index,
                    expected,
                    got,
                });
            }
        }

        let args: Cow<'_, [Value]> = if args.len() == count {
            Cow::Borrowed(args)
        } else {
            let missing = count - args.len();
            let defaults = &self.defaults[self.defaults.len() - missing..];
            let mut full = Vec::with_capacity(count);
            full.extend_from_slice(args);
            full.extend_from_slice(defaults);
            Cow::Owned(full)
        };
        self.callable.call(instance, &args)
    }

    /// Direct call.
    ///
    /// # Safety
    /// `args` must hold one pointer per declared argument, each to a live value
    /// of that argument's native type (`Value` for variadic methods). `ret` must
    /// be writable storage for the return type; it is ignored when nothing is
    /// returned.
    pub unsafe fn ptrcall(
        &self,
        instance: Option<&mut dyn ClassInstance>,
        args: &[NativePtr],
        ret: NativePtrMut,
    ) -> Result<(), DispatchError> {
        if instance.is_none() && !self.is_static() {
            return Err(DispatchError::InstanceIsNull);
        }
        if !self.is_vararg() {
            let count = self.arguments.len();
            if args.len() > count {
                return Err(DispatchError::TooManyArguments {
                    expected: count,
                    got: args.len(),
                });
            }
            if args.len() < count {
                return Err(DispatchError::TooFewArguments {
                    expected: count,
                    got: args.len(),
                });
            }
        }
        self.callable.ptrcall(instance, args, ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_instance;
    use crate::registry::ClassBuilder;
    use bindery_sdk::{GString, Vector2};
    use std::mem::MaybeUninit;

    struct Calc {
        total: i64,
    }

    impl Calc {
        fn add(&mut self, a: i64, b: i64) -> i64 {
            self.total += a + b;
            a + b
        }

        fn total(&self) -> i64 {
            self.total
        }

        fn reset(&mut self) {
            self.total = 0;
        }

        fn label(&self, prefix: GString) -> GString {
            GString::from(format!("{}{}", prefix, self.total))
        }
    }

    impl NativeClass for Calc {
        const CLASS_NAME: &'static str = "Calc";
        const PARENT_NAME: &'static str = "Object";

        fn bind(_builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
            Ok(())
        }
    }

    class_instance!(Calc);

    struct Other;

    impl NativeClass for Other {
        const CLASS_NAME: &'static str = "Other";
        const PARENT_NAME: &'static str = "Object";

        fn bind(_builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
            Ok(())
        }
    }

    class_instance!(Other);

    fn add_binding() -> MethodBinding {
        let mut binding = MethodBinding::method("add", Calc::add)
            .with_arg_names(["a", "b"])
            .with_defaults([Value::Int(1)]);
        binding.validate_defaults(true).unwrap();
        binding
    }

    #[test]
    fn test_metadata() {
        let binding = add_binding();
        assert_eq!(binding.argument_count(), 2);
        assert_eq!(binding.argument_kinds(), vec![ValueKind::Int, ValueKind::Int]);
        assert_eq!(binding.return_kind(), Some(ValueKind::Int));
        assert_eq!(binding.required_argument_count(), 1);
        assert!(!binding.is_static() && !binding.is_const());

        let info = binding.method_info();
        assert_eq!(info.arguments[1].name, "b");
        assert_eq!(info.default_arguments, vec![Value::Int(1)]);
        assert_eq!(info.hash, binding.hash());

        let reset = MethodBinding::method("reset", Calc::reset);
        assert!(!reset.has_return());
        assert_eq!(reset.method_info().arguments.len(), 0);
    }

    #[test]
    fn test_defaults_fill_trailing() {
        let binding = add_binding();
        let mut calc = Calc { total: 0 };

        let result = binding.call(Some(&mut calc), &[Value::Int(5)]);
        assert_eq!(result, Ok(Value::Int(6)));

        let result = binding.call(Some(&mut calc), &[]);
        assert_eq!(
            result,
            Err(DispatchError::TooFewArguments { expected: 1, got: 0 })
        );
        assert_eq!(calc.total, 6);
    }

    #[test]
    fn test_argument_count_errors_never_reach_native() {
        let binding = add_binding();
        let mut calc = Calc { total: 0 };
        let args = [Value::Int(1), Value::Int(2), Value::Int(3)];
        assert_eq!(
            binding.call(Some(&mut calc), &args),
            Err(DispatchError::TooManyArguments { expected: 2, got: 3 })
        );
        assert_eq!(calc.total, 0);
    }

    #[test]
    fn test_argument_kinds_checked() {
        let binding = add_binding();
        let mut calc = Calc { total: 0 };

        assert_eq!(
            binding.call(Some(&mut calc), &[Value::Bool(true), Value::Int(2)]),
            Ok(Value::Int(3))
        );
        assert_eq!(
            binding.call(Some(&mut calc), &[Value::Float(1.5)]),
            Err(DispatchError::InvalidArgument {
                index: 0,
                expected: ValueKind::Int,
                got: ValueKind::Float,
            })
        );
    }

    #[test]
    fn test_instance_errors() {
        let binding = add_binding();
        assert_eq!(
            binding.call(None, &[Value::Int(1)]),
            Err(DispatchError::InstanceIsNull)
        );

        let mut other = Other;
        assert_eq!(
            binding.call(Some(&mut other), &[Value::Int(1)]),
            Err(DispatchError::InvalidInstance {
                expected: StringName::new("Calc"),
                got: StringName::new("Other"),
            })
        );
    }

    #[test]
    fn test_const_and_static() {
        let total = MethodBinding::const_method("total", Calc::total);
        assert!(total.is_const());
        let mut calc = Calc { total: 9 };
        assert_eq!(total.call(Some(&mut calc), &[]), Ok(Value::Int(9)));

        let length = MethodBinding::static_method("length", |v: Vector2| v.length());
        assert!(length.is_static());
        assert_eq!(
            length.call(None, &[Value::from(Vector2::new(3.0, 4.0))]),
            Ok(Value::Float(5.0))
        );
    }

    #[test]
    fn test_ptrcall_matches_call() {
        let label = MethodBinding::const_method("label", Calc::label);
        let mut calc = Calc { total: 4 };

        let dynamic = label.call(Some(&mut calc), &[Value::from("n=")]);

        let prefix = GString::from("n=");
        let args = [&prefix as *const GString as NativePtr];
        let mut ret = MaybeUninit::<GString>::uninit();
        let direct = unsafe {
            label
                .ptrcall(Some(&mut calc), &args, ret.as_mut_ptr() as NativePtrMut)
                .map(|_| ret.assume_init())
        };

        assert_eq!(dynamic, Ok(Value::from("n=4")));
        assert_eq!(direct.map(Value::from), dynamic);
    }

    #[test]
    fn test_ptrcall_requires_every_argument() {
        let binding = add_binding();
        let mut calc = Calc { total: 0 };
        let a = 1i64;
        let args = [&a as *const i64 as NativePtr];
        let result = unsafe { binding.ptrcall(Some(&mut calc), &args, std::ptr::null_mut()) };
        assert_eq!(
            result,
            Err(DispatchError::TooFewArguments { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_vararg() {
        let sum = MethodBinding::vararg("sum", |calc: &mut Calc, args: &[Value]| {
            let mut total = 0;
            for (index, arg) in args.iter().enumerate() {
                total += arg.as_int().ok_or(DispatchError::InvalidArgument {
                    index,
                    expected: ValueKind::Int,
                    got: arg.kind(),
                })?;
            }
            calc.total = total;
            Ok(Value::Int(total))
        });
        assert!(sum.is_vararg());

        let mut calc = Calc { total: 0 };
        let args = [Value::Int(1), Value::Int(2), Value::Int(3)];
        assert_eq!(sum.call(Some(&mut calc), &args), Ok(Value::Int(6)));
        assert!(sum.call(Some(&mut calc), &[Value::Nil]).is_err());

        let ptrs: Vec<NativePtr> = args.iter().map(|v| v as *const Value as NativePtr).collect();
        let mut ret = MaybeUninit::<Value>::uninit();
        let result = unsafe {
            sum.ptrcall(Some(&mut calc), &ptrs, ret.as_mut_ptr() as NativePtrMut)
                .map(|_| ret.assume_init())
        };
        assert_eq!(result, Ok(Value::Int(6)));
    }

    #[test]
    fn test_invalid_defaults() {
        let mut too_many = MethodBinding::method("add", Calc::add)
            .with_defaults([Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(matches!(
            too_many.validate_defaults(true),
            Err(RegistrationError::InvalidDefaults { .. })
        ));

        let mut wrong_kind =
            MethodBinding::method("add", Calc::add).with_defaults([Value::from(Vector2::ZERO)]);
        assert!(wrong_kind.validate_defaults(true).is_err());

        let mut converted =
            MethodBinding::method("add", Calc::add).with_defaults([Value::Float(2.0)]);
        converted.validate_defaults(true).unwrap();
        assert_eq!(converted.defaults(), &[Value::Int(2)]);
    }
}
