#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx];
        idx += 1;

        if op & 0x80 == 0 {
            let _ = reader.read_bool();
        } else {
            // widths past 64 must be rejected, not panic
            let _ = reader.read_bits(op & 0x7F);
        }
        assert!(reader.bits_remaining() <= data.len() * 8);
    }
});
