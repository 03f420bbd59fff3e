//! Criterion benchmarks for thumbnail decoding.
//!
//! Run with: `cargo bench -p printpass-gcode`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use printpass_gcode::{decode_qoi, find_qoi_blocks};

/// Build a QOI stream mixing literal, diff, luma and run opcodes.
fn make_qoi(width: u32, height: u32) -> Vec<u8> {
    let mut data = b"qoif".to_vec();
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[3, 0]);

    for y in 0..height {
        data.extend_from_slice(&[0xfe, 0, (y % 256) as u8, 128]);
        let mut x = 1;
        while x < width {
            match x % 4 {
                0 => data.push(0x40 | (3 << 4) | (2 << 2) | 2),
                1 => data.extend_from_slice(&[0x80 | 33, 0x88]),
                2 => data.push(0xc0 | 1),
                _ => data.push(0x40 | (2 << 4) | (2 << 2) | 1),
            }
            x += if x % 4 == 2 { 2 } else { 1 };
        }
    }
    data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
    data
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("qoi_decode");

    for (w, h) in [(16u32, 16u32), (220, 124), (640, 480)] {
        let data = make_qoi(w, h);
        group.throughput(Throughput::Elements(u64::from(w * h)));
        group.bench_function(format!("{}x{}", w, h), |b| {
            b.iter(|| decode_qoi(black_box(&data)));
        });
    }

    group.finish();
}

fn bench_block_scan(c: &mut Criterion) {
    let encoded = STANDARD.encode(make_qoi(220, 124));
    let mut gcode = String::from("; thumbnail_QOI begin 220x124 0\n");
    for chunk in encoded.as_bytes().chunks(78) {
        gcode.push_str("; ");
        gcode.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        gcode.push('\n');
    }
    gcode.push_str("; thumbnail_QOI end\n");
    gcode.push_str(&"G1 X10.5 Y20.25 E0.0123\n".repeat(50_000));

    c.bench_function("find_qoi_blocks", |b| {
        b.iter(|| find_qoi_blocks(black_box(&gcode)).len());
    });
}

criterion_group!(benches, bench_decode, bench_block_scan);
criterion_main!(benches);
