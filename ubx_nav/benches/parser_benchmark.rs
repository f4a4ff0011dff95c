use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use ubx_nav::*;

const FIXES: u32 = 2_000;

/// Synthetic 10 Hz capture: NAV-PVT, an ACK-ACK and some idle filler per epoch
fn capture() -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..FIXES {
        data.extend_from_slice(
            &NavPvtBuilder {
                itow: i * 100,
                fix_type: 3,
                flags: 0x83,
                num_satellites: 20,
                lon: 123_456_780 + i as i32,
                lat: -77_123_400 - i as i32,
                height_msl: 15_000,
                vel_north: 3_000,
                vel_east: 4_000,
                head_motion: 4_500_000,
                ..NavPvtBuilder::default()
            }
            .into_packet_bytes(),
        );
        data.extend_from_slice(&encode_frame(0x0501, &[0x06, 0x01]));
        data.extend_from_slice(&[0xff; 4]);
    }
    data
}

fn parse_all(parser: &mut Parser, data: &[u8], chunk_size: usize) -> usize {
    let mut count = 0;
    for chunk in data.chunks(chunk_size) {
        parser.feed(chunk, &mut |_: Frame<'_>| {
            count += 1;
            true
        });
    }
    count
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = capture();
    for chunk in &[1, 99, 100, 101, 256, 512, 1000, 1024] {
        c.bench_function(&format!("parse_frames_{}", chunk), |b| {
            b.iter(|| {
                let mut parser = Parser::default();
                assert_eq!(
                    parse_all(&mut parser, black_box(&data), *chunk),
                    2 * FIXES as usize
                );
            })
        });
    }
    for chunk in &[100, 1024] {
        c.bench_function(&format!("client_snapshots_{}", chunk), |b| {
            b.iter(|| {
                let mut client = GnssClient::default();
                for part in black_box(&data).chunks(*chunk) {
                    client.feed(part);
                }
                assert_eq!(client.fixes(), u64::from(FIXES));
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
