use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use repsync::pose::{joint_angle, JointIndices, Point2, PoseFrame};
use repsync::protocol::{decode_server_message, encode_server_message, Player, ServerMessage};
use repsync::reps::RepDetector;
use repsync::room::RoomState;
use std::time::Duration;

/// Benchmark one elbow angle (runs every detection tick)
fn bench_joint_angle(c: &mut Criterion) {
    let shoulder = Point2::new(640.0, 200.0);
    let elbow = Point2::new(700.0, 330.0);
    let wrist = Point2::new(610.0, 420.0);

    c.bench_function("joint_angle", |b| {
        b.iter(|| black_box(joint_angle(black_box(shoulder), black_box(elbow), black_box(wrist))));
    });
}

/// Benchmark landmark extraction plus angle for a full 33-point frame
fn bench_frame_sample(c: &mut Criterion) {
    let frame = PoseFrame {
        timestamp: Duration::from_millis(1200),
        width: 1280,
        height: 720,
        landmarks: (0..33)
            .map(|i| Point2::new(i as f64 / 33.0, 1.0 - i as f64 / 33.0))
            .collect(),
    };
    let joints = JointIndices::default();

    c.bench_function("frame_angle_sample", |b| {
        b.iter(|| black_box(frame.angle_sample(&joints)));
    });
}

/// Benchmark detector throughput over whole rep cycles
fn bench_detector_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector_cycles");

    for reps in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(reps), reps, |b, &reps| {
            b.iter(|| {
                let mut detector = RepDetector::default();
                for _ in 0..reps {
                    for angle in [170.0, 130.0, 90.0, 60.0, 90.0, 130.0, 165.0] {
                        black_box(detector.observe(angle));
                    }
                }
                detector.count()
            });
        });
    }

    group.finish();
}

/// Benchmark decoding and applying a leaderboard snapshot
fn bench_snapshot_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_apply");

    for size in [2, 16, 128].iter() {
        let players: Vec<Player> = (0..*size)
            .map(|i| Player {
                id: format!("{:08x}", i),
                name: format!("Player {}", i),
                count: i as u32,
            })
            .collect();
        let text = encode_server_message(&ServerMessage::Leaderboard {
            room: "ABCD".to_string(),
            players,
        })
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            let state = RoomState::new();
            b.iter(|| {
                let message = decode_server_message(black_box(text)).unwrap();
                black_box(state.apply(message).ranked().len())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_joint_angle,
    bench_frame_sample,
    bench_detector_cycles,
    bench_snapshot_apply
);
criterion_main!(benches);
