#![no_main]

use codec::PhysicsSyncData;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(packet) = PhysicsSyncData::decode_with_limits(data, &wire::Limits::for_testing()) else {
        return;
    };
    // anything that decodes must encode again with the same shape
    let bytes = packet.encode().expect("re-encode decoded packet");
    assert_eq!(bytes.len(), packet.encoded_bits().div_ceil(8));
    let again = PhysicsSyncData::decode(&bytes).expect("decode re-encoded packet");
    assert_eq!(again.packet_number, packet.packet_number);
    assert_eq!(again.nodes.len(), packet.nodes.len());
    assert_eq!(again.projectiles.len(), packet.projectiles.len());
    assert_eq!(again.sounds.len(), packet.sounds.len());
});
