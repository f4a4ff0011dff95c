//! A proptest generator for U-Blox NAV-PVT messages.
//!
//! Frames are serialized independently of the crate's own builder so the
//! decoder is checked against a second implementation of the layout.

use byteorder::{LittleEndian, WriteBytesExt};
use proptest::prelude::*;
use ubx_nav::{
    correction_age_secs, encode_frame, GnssClient, GpsTimeConfig, NavPvt, NavigationSnapshot,
    Frame, Parser, ParserStats, MAX_PAYLOAD_LEN,
};

const SYNC_CHAR_1: u8 = 0xB5;
const SYNC_CHAR_2: u8 = 0x62;

/// Represents the payload of a UBX-NAV-PVT message.
///
/// NAV-PVT payload is 92 bytes.
#[derive(Debug, Clone)]
pub struct NavPvtPayload {
    pub itow: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub sec: u8,
    pub valid: u8,
    pub t_acc: u32,
    pub nano: i32,
    pub fix_type: u8,
    pub flags: u8,
    pub flags2: u8,
    pub num_sv: u8,
    pub lon: i32,
    pub lat: i32,
    pub height: i32,
    pub h_msl: i32,
    pub h_acc: u32,
    pub v_acc: u32,
    pub vel_n: i32,
    pub vel_e: i32,
    pub vel_d: i32,
    pub g_speed: i32,
    pub head_mot: i32,
    pub s_acc: u32,
    pub head_acc: u32,
    pub p_dop: u16,
    pub flags3: u16,
    pub reserved: [u8; 4],
    pub head_veh: i32,
    pub mag_dec: i16,
    pub mag_acc: u16,
}

impl NavPvtPayload {
    /// Serializes the NavPvtPayload into a 92-byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wtr = Vec::with_capacity(92);
        wtr.write_u32::<LittleEndian>(self.itow).unwrap();
        wtr.write_u16::<LittleEndian>(self.year).unwrap();
        wtr.write_u8(self.month).unwrap();
        wtr.write_u8(self.day).unwrap();
        wtr.write_u8(self.hour).unwrap();
        wtr.write_u8(self.min).unwrap();
        wtr.write_u8(self.sec).unwrap();
        wtr.write_u8(self.valid).unwrap();
        wtr.write_u32::<LittleEndian>(self.t_acc).unwrap();
        wtr.write_i32::<LittleEndian>(self.nano).unwrap();
        wtr.write_u8(self.fix_type).unwrap();
        wtr.write_u8(self.flags).unwrap();
        wtr.write_u8(self.flags2).unwrap();
        wtr.write_u8(self.num_sv).unwrap();
        wtr.write_i32::<LittleEndian>(self.lon).unwrap();
        wtr.write_i32::<LittleEndian>(self.lat).unwrap();
        wtr.write_i32::<LittleEndian>(self.height).unwrap();
        wtr.write_i32::<LittleEndian>(self.h_msl).unwrap();
        wtr.write_u32::<LittleEndian>(self.h_acc).unwrap();
        wtr.write_u32::<LittleEndian>(self.v_acc).unwrap();
        wtr.write_i32::<LittleEndian>(self.vel_n).unwrap();
        wtr.write_i32::<LittleEndian>(self.vel_e).unwrap();
        wtr.write_i32::<LittleEndian>(self.vel_d).unwrap();
        wtr.write_i32::<LittleEndian>(self.g_speed).unwrap();
        wtr.write_i32::<LittleEndian>(self.head_mot).unwrap();
        wtr.write_u32::<LittleEndian>(self.s_acc).unwrap();
        wtr.write_u32::<LittleEndian>(self.head_acc).unwrap();
        wtr.write_u16::<LittleEndian>(self.p_dop).unwrap();
        wtr.write_u16::<LittleEndian>(self.flags3).unwrap();
        wtr.extend_from_slice(&self.reserved);
        wtr.write_i32::<LittleEndian>(self.head_veh).unwrap();
        wtr.write_i16::<LittleEndian>(self.mag_dec).unwrap();
        wtr.write_u16::<LittleEndian>(self.mag_acc).unwrap();
        wtr
    }
}

/// Calculates the 8-bit Fletcher-16 checksum used by u-blox.
fn calculate_checksum(data: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;
    for byte in data {
        ck_a = ck_a.wrapping_add(*byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }
    (ck_a, ck_b)
}

fn nav_pvt_payload_strategy() -> impl Strategy<Value = NavPvtPayload> {
    // Split into smaller tuples to avoid proptest tuple size limits
    let time = (
        any::<u32>(), // itow
        2000u16..2100,
        1u8..=12,
        1u8..=28,
        0u8..=23,
        0u8..=59,
        0u8..=59,
        any::<u8>(),  // valid
        any::<u32>(), // t_acc
        -999_999_999i32..=999_999_999,
    );

    let status = (
        0u8..=5,     // fix_type
        any::<u8>(), // flags
        any::<u8>(), // flags2
        any::<u8>(), // num_sv
    );

    let position = (
        -1_800_000_000i32..=1_800_000_000, // lon
        -900_000_000i32..=900_000_000,     // lat
        any::<i32>(),                      // height
        any::<i32>(),                      // h_msl
        any::<u32>(),                      // h_acc
        any::<u32>(),                      // v_acc
    );

    let motion = (
        -100_000i32..=100_000, // vel_n
        -100_000i32..=100_000, // vel_e
        -100_000i32..=100_000, // vel_d
        any::<i32>(),          // g_speed
        any::<i32>(),          // head_mot
        any::<u32>(),          // s_acc
        any::<u32>(),          // head_acc
    );

    let tail = (
        any::<u16>(),        // p_dop
        0u16..0x20,          // flags3
        any::<[u8; 4]>(),    // reserved
        any::<i32>(),        // head_veh
        any::<i16>(),        // mag_dec
        any::<u16>(),        // mag_acc
    );

    (time, status, position, motion, tail).prop_map(
        |(
            (itow, year, month, day, hour, min, sec, valid, t_acc, nano),
            (fix_type, flags, flags2, num_sv),
            (lon, lat, height, h_msl, h_acc, v_acc),
            (vel_n, vel_e, vel_d, g_speed, head_mot, s_acc, head_acc),
            (p_dop, flags3, reserved, head_veh, mag_dec, mag_acc),
        )| NavPvtPayload {
            itow,
            year,
            month,
            day,
            hour,
            min,
            sec,
            valid,
            t_acc,
            nano,
            fix_type,
            flags,
            flags2,
            num_sv,
            lon,
            lat,
            height,
            h_msl,
            h_acc,
            v_acc,
            vel_n,
            vel_e,
            vel_d,
            g_speed,
            head_mot,
            s_acc,
            head_acc,
            p_dop,
            flags3,
            reserved,
            head_veh,
            mag_dec,
            mag_acc,
        },
    )
}

/// A proptest strategy that generates a complete, valid UBX frame
/// containing a NAV-PVT message, along with the source payload struct.
pub fn ubx_nav_pvt_frame_strategy() -> impl Strategy<Value = (NavPvtPayload, Vec<u8>)> {
    nav_pvt_payload_strategy().prop_map(|payload_struct| {
        let payload = payload_struct.to_bytes();
        let class_id = 0x01;
        let message_id = 0x07;
        let length = payload.len() as u16;

        let mut frame_core = Vec::with_capacity(4 + payload.len());
        frame_core.push(class_id);
        frame_core.push(message_id);
        frame_core.write_u16::<LittleEndian>(length).unwrap();
        frame_core.extend_from_slice(&payload);

        let (ck_a, ck_b) = calculate_checksum(&frame_core);

        let mut final_frame = Vec::with_capacity(8 + payload.len());
        final_frame.push(SYNC_CHAR_1);
        final_frame.push(SYNC_CHAR_2);
        final_frame.extend_from_slice(&frame_core);
        final_frame.push(ck_a);
        final_frame.push(ck_b);

        (payload_struct, final_frame)
    })
}

/// Every frame the parser hands out for `parts`, plus its final counters
fn frames_seen<'a>(parts: impl Iterator<Item = &'a [u8]>) -> (Vec<(u16, Vec<u8>)>, ParserStats) {
    let mut parser = Parser::default();
    let mut seen = Vec::new();
    for part in parts {
        parser.feed(part, &mut |f: Frame<'_>| {
            seen.push((f.message_id(), f.payload().to_vec()));
            true
        });
    }
    (seen, parser.stats())
}

proptest! {
    #[test]
    fn test_decoder_with_generated_nav_pvt_frames((expected, frame) in ubx_nav_pvt_frame_strategy()) {
        let mut client = GnssClient::default();
        client.feed(&frame);

        let Some(p) = client.last_fix() else {
            panic!("Parser failed to parse a NAV-PVT valid packet");
        };

        prop_assert_eq!(p.itow, expected.itow);
        prop_assert_eq!(p.year, expected.year);
        prop_assert_eq!(p.month, expected.month);
        prop_assert_eq!(p.day, expected.day);
        prop_assert_eq!(p.sec, expected.sec);
        prop_assert_eq!(p.valid.bits(), expected.valid);
        prop_assert_eq!(p.time_accuracy, expected.t_acc);
        prop_assert_eq!(p.nanosec, expected.nano);
        prop_assert_eq!(p.fix_type, expected.fix_type);
        prop_assert_eq!(p.flags.bits(), expected.flags);
        prop_assert_eq!(p.flags2.bits(), expected.flags2);
        prop_assert_eq!(p.num_satellites, expected.num_sv);
        prop_assert_eq!(p.lon, expected.lon);
        prop_assert_eq!(p.lat, expected.lat);
        prop_assert_eq!(p.height, expected.height);
        prop_assert_eq!(p.height_msl, expected.h_msl);
        prop_assert_eq!(p.h_acc, expected.h_acc);
        prop_assert_eq!(p.v_acc, expected.v_acc);
        prop_assert_eq!(p.vel_north, expected.vel_n);
        prop_assert_eq!(p.vel_east, expected.vel_e);
        prop_assert_eq!(p.vel_down, expected.vel_d);
        prop_assert_eq!(p.g_speed, expected.g_speed);
        prop_assert_eq!(p.head_motion, expected.head_mot);
        prop_assert_eq!(p.s_acc, expected.s_acc);
        prop_assert_eq!(p.head_acc, expected.head_acc);
        prop_assert_eq!(p.pdop, expected.p_dop);
        prop_assert_eq!(p.flags3.invalid_llh(), expected.flags3 & 0x01 != 0);
        prop_assert_eq!(p.flags3.last_correction_age(), ((expected.flags3 >> 1) & 0x0f) as u8);
        prop_assert_eq!(&p.reserved1[2..], &expected.reserved[..]);
        prop_assert_eq!(p.head_vehicle, expected.head_veh);
        prop_assert_eq!(p.magnetic_declination, expected.mag_dec);
        prop_assert_eq!(p.magnetic_declination_accuracy, expected.mag_acc);
    }

    #[test]
    fn test_snapshot_invariants((expected, frame) in ubx_nav_pvt_frame_strategy()) {
        let mut client = GnssClient::default();
        client.feed(&frame);
        let Some(s) = client.reader().snapshot() else {
            panic!("no snapshot published");
        };

        prop_assert!((0.0..360.0).contains(&s.heading));
        prop_assert!(s.speed_3d + 1e-9 >= s.speed_2d);
        prop_assert!(s.speed_2d >= 0.0);
        prop_assert!((s.speed_over_ground_mph - s.speed_2d * 2.23694).abs() < 1e-9);
        prop_assert!((-90.0..=90.0).contains(&s.lat));
        prop_assert!((-180.0..=180.0).contains(&s.lon));
        prop_assert_eq!(s.satellites, expected.num_sv);
        prop_assert_eq!(s.gps_tow_ms, expected.itow);
        prop_assert_eq!(
            s.correction_age_secs,
            correction_age_secs(((expected.flags3 >> 1) & 0x0f) as u8)
        );
        // recomputing from the stored record gives the same snapshot
        let pvt: NavPvt = *client.last_fix().unwrap();
        prop_assert_eq!(NavigationSnapshot::from_fix(&pvt, &GpsTimeConfig::default()), s);
    }

    #[test]
    fn test_chunked_feed_matches_whole((_, frame) in ubx_nav_pvt_frame_strategy(), chunk in 1usize..120) {
        let mut whole = GnssClient::default();
        whole.feed(&frame);

        let mut chunked = GnssClient::default();
        for part in frame.chunks(chunk) {
            chunked.feed(part);
        }

        prop_assert_eq!(chunked.last_fix(), whole.last_fix());
        prop_assert_eq!(chunked.stats(), whole.stats());
    }

    #[test]
    fn test_any_frame_chunked_matches_whole(
        message_id in any::<u16>(),
        payload in prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_LEN),
        chunk in 1usize..700,
    ) {
        let frame = encode_frame(message_id, &payload);
        let whole = frames_seen(std::iter::once(frame.as_slice()));
        let chunked = frames_seen(frame.chunks(chunk));
        prop_assert_eq!(&whole.0, &vec![(message_id, payload)]);
        prop_assert_eq!(chunked, whole);
    }

    #[test]
    fn test_bit_flip_is_never_published((_, frame) in ubx_nav_pvt_frame_strategy(), pos in 2usize..100, bit in 0u8..8) {
        let mut bad = frame.clone();
        bad[pos] ^= 1 << bit;

        let mut client = GnssClient::default();
        client.feed(&bad);
        prop_assert_eq!(client.fixes(), 0);
        prop_assert!(client.reader().snapshot().is_none());
    }
}
