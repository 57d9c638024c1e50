use criterion::{criterion_group, criterion_main, Criterion};

use learngl::camera::{Camera, CameraMovement};

pub fn camera_update(c: &mut Criterion) {
    let mut camera = Camera::default();

    c.bench_function("camera_look", |b| {
        b.iter(|| camera.process_look(3.0, -2.0, true))
    });

    c.bench_function("camera_move", |b| {
        b.iter(|| camera.process_movement(CameraMovement::TurnRight, 0.016))
    });

    c.bench_function("camera_view", |b| b.iter(|| camera.view_matrix()));
}

criterion_group!(benches, camera_update);
criterion_main!(benches);
