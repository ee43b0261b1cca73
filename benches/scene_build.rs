use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use folio_scene::core::{Idle, Viewport};
use folio_scene::scene::Geometry;
use folio_scene::texture::{ColorSpace, TextureHandle};
use folio_scene::{SceneDirector, SceneTextures};

fn textures() -> SceneTextures {
    let blank = |name: &str| TextureHandle::ready(name, ColorSpace::Srgb, RgbaImage::new(1, 1));
    SceneTextures {
        background: blank("bg.png"),
        avatar: blank("avatar.png"),
        moon: blank("moon.png"),
        moon_normal: blank("normal.png"),
    }
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");

    for tubular in [50u32, 100, 200] {
        group.bench_with_input(BenchmarkId::new("torus", tubular), &tubular, |b, &tubular| {
            b.iter(|| Geometry::torus(black_box(10.0), 3.0, 16, tubular))
        });
    }

    for segments in [8u32, 24, 64] {
        group.bench_with_input(BenchmarkId::new("sphere", segments), &segments, |b, &segments| {
            b.iter(|| Geometry::sphere(black_box(5.0), segments, segments))
        });
    }

    group.finish();
}

fn bench_director(c: &mut Criterion) {
    c.bench_function("director_build", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(black_box(7));
            SceneDirector::build(Viewport::new(1920, 1080), textures(), true, &mut rng)
        })
    });

    let mut rng = StdRng::seed_from_u64(7);
    let mut director = SceneDirector::build(Viewport::new(1920, 1080), textures(), true, &mut rng);

    c.bench_function("on_scroll", |b| b.iter(|| director.on_scroll(black_box(-500.0))));
    c.bench_function("animate_idle", |b| b.iter(|| director.animate(black_box(&Idle))));
}

criterion_group!(benches, bench_geometry, bench_director);
criterion_main!(benches);
