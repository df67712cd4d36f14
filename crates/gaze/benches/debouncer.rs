use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gaze::{Debouncer, GazeCode, GazeConfig};

fn bench_debouncer(c: &mut Criterion) {
    let stream: Vec<GazeCode> = (0..3000)
        .map(|i| match i % 13 {
            0 => GazeCode::Left,
            1 => GazeCode::Center,
            _ => GazeCode::Right,
        })
        .collect();

    c.bench_function("debouncer_push_3000", |b| {
        b.iter(|| {
            let mut debouncer = Debouncer::new(&GazeConfig::default()).unwrap();
            let mut confirmed = 0;
            for code in &stream {
                if debouncer.push(black_box(*code)).is_some() {
                    confirmed += 1;
                }
            }
            confirmed
        })
    });
}

criterion_group!(benches, bench_debouncer);
criterion_main!(benches);
