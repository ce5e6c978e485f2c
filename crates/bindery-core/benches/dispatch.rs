use std::sync::Arc;

use bindery_core::{class_instance, ClassBuilder, ClassRegistry, MethodBinding, NativeClass, RegistrationError};
use bindery_sdk::{NativePtr, NativePtrMut, NullHost, Value, Vector2};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

struct Body {
    position: Vector2,
}

impl Body {
    fn translate(&mut self, dx: f64, dy: f64) -> Vector2 {
        self.position = Vector2::new(self.position.x + dx as f32, self.position.y + dy as f32);
        self.position
    }

    fn get_mass(&self) -> i64 {
        10
    }
}

impl NativeClass for Body {
    const CLASS_NAME: &'static str = "Body";
    const PARENT_NAME: &'static str = "Object";

    fn bind(builder: &mut ClassBuilder<'_, Self>) -> Result<(), RegistrationError> {
        builder
            .method("translate", Body::translate)?
            .const_method("get_mass", Body::get_mass)?;
        Ok(())
    }

    fn create() -> Option<Self> {
        Some(Body {
            position: Vector2::ZERO,
        })
    }
}

class_instance!(Body);

fn registry() -> ClassRegistry {
    let mut registry = ClassRegistry::new(Arc::new(NullHost)).unwrap();
    registry.register::<Body>().unwrap();
    registry
}

fn bench_binding(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding");
    let binding = MethodBinding::method("translate", Body::translate);
    let mut body = Body {
        position: Vector2::ZERO,
    };

    let args = [Value::Float(1.0), Value::Float(2.0)];
    group.bench_function("call", |b| {
        b.iter(|| binding.call(Some(&mut body), black_box(&args)).unwrap());
    });

    let converted = [Value::Int(1), Value::Int(2)];
    group.bench_function("call_converting", |b| {
        b.iter(|| binding.call(Some(&mut body), black_box(&converted)).unwrap());
    });

    let (dx, dy) = (1.0f64, 2.0f64);
    let ptrs = [&dx as *const f64 as NativePtr, &dy as *const f64 as NativePtr];
    let mut out = Vector2::ZERO;
    group.bench_function("ptrcall", |b| {
        b.iter(|| unsafe {
            binding
                .ptrcall(Some(&mut body), black_box(&ptrs), &mut out as *mut Vector2 as NativePtrMut)
                .unwrap()
        });
    });

    group.finish();
}

fn bench_registry_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    let registry = registry();
    let mut body = Body {
        position: Vector2::ZERO,
    };

    for method in ["get_mass", "translate"] {
        group.bench_with_input(BenchmarkId::new("lookup", method), &method, |b, method| {
            b.iter(|| registry.lookup_method("Body", black_box(method)).is_some());
        });
    }

    group.bench_function("call_by_name", |b| {
        b.iter(|| registry.call(&mut body, black_box("get_mass"), &[]).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_binding, bench_registry_lookup);
criterion_main!(benches);
