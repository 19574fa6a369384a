#![no_main]

use codec::PhysicsSyncData;
use libfuzzer_sys::fuzz_target;
use session::{PlayoutBuffer, PlayoutStep};
use wire::PacketNumber;

const MAX: usize = 8;
const LOW: usize = 4;

fuzz_target!(|data: &[u8]| {
    let mut buffer = PlayoutBuffer::new(MAX, LOW);

    // Pairs of bytes push a packet number; a zero high byte ticks instead.
    for chunk in data.chunks(2).take(2048) {
        match chunk {
            [0, _] | [_] => {
                let before = buffer.last_packet_number_read();
                let tick = buffer.tick();
                assert!(buffer.len() <= MAX);
                if let PlayoutStep::Full(packet) | PlayoutStep::Half(packet) = &tick.step {
                    assert!(packet.packet_number.is_newer_than(before));
                    assert_eq!(buffer.last_packet_number_read(), packet.packet_number);
                }
            }
            [hi, lo] => {
                let number = PacketNumber::new(u16::from_be_bytes([*hi, *lo]));
                buffer.push(PhysicsSyncData::empty(number));
            }
            [] => {}
        }
    }
});
