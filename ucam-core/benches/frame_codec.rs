use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ucam_core::{frame, package, CommandId, PackageHeader};

fn bench_frame_codec(c: &mut Criterion) {
    c.bench_function("encode_snapshot", |b| {
        b.iter(|| frame::encode(black_box(CommandId::Snapshot), 0, 0x10, 0, 0))
    });

    let ack = [0xAA, 0x0E, 0x04, 0x00, 0x12, 0x00];
    c.bench_function("decode_ack", |b| b.iter(|| frame::decode(black_box(&ack))));
}

fn bench_verify_code(c: &mut Criterion) {
    let header = PackageHeader::new(3, 506);
    let payload = vec![0x5A; 506];
    c.bench_function("verify_code_506", |b| {
        b.iter(|| package::verify_code(black_box(&header), black_box(&payload)))
    });
}

criterion_group!(benches, bench_frame_codec, bench_verify_code);
criterion_main!(benches);
