use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

use particle_fields::field_engine::{Effect, FieldConfig, ParticleField, Vec2};
use particle_fields::renderer_engine::RecordingSurface;

fn field(config: FieldConfig, count: usize) -> ParticleField {
    let config = FieldConfig {
        particle_count: count,
        seed: Some(42),
        ..config
    };
    ParticleField::new(config, Vec2::new(1024.0, 768.0)).expect("valid preset")
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    for (name, config) in [
        ("light_particles", FieldConfig::light_particles()),
        ("fading_network", FieldConfig::fading_network()),
    ] {
        let mut f = field(config, 500);
        f.set_pointer(Some(Vec2::new(512.0, 384.0)));
        let mut time = 0.0;
        group.bench_function(name, |b| {
            b.iter(|| {
                time += 1.0 / 60.0;
                f.update(black_box(time));
            })
        });
    }
    group.finish();
}

fn bench_connect_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect_pass");
    for count in [100usize, 300] {
        let f = field(FieldConfig::constellation(), count);
        group.bench_function(format!("{count} particles"), |b| {
            b.iter_batched(
                || RecordingSurface::new(1024, 768),
                |mut surface| black_box(f.draw(&mut surface, 0.0)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_update, bench_connect_pass);
criterion_main!(benches);
