use codec::{PacketNumber, PhysicsSyncData};
use proptest::prelude::*;
use session::{PlayoutBuffer, PlayoutStep};

#[derive(Debug, Clone)]
enum Op {
    Receive(u16),
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![(0u16..4096).prop_map(Op::Receive), Just(Op::Tick)]
}

proptest! {
    #[test]
    fn prop_buffer_invariants(
        max in 2usize..12,
        low_offset in 1usize..10,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let low = (max - 1).min(low_offset).max(1);
        let mut buffer = PlayoutBuffer::new(max, low);
        for op in ops {
            match op {
                Op::Receive(number) => {
                    buffer.push(PhysicsSyncData::empty(PacketNumber::new(number)));
                }
                Op::Tick => {
                    let before = buffer.last_packet_number_read();
                    let tick = buffer.tick();
                    prop_assert!(buffer.len() <= max);
                    match tick.step {
                        PlayoutStep::Full(packet) | PlayoutStep::Half(packet) => {
                            prop_assert!(packet.packet_number.is_newer_than(before));
                            prop_assert_eq!(buffer.last_packet_number_read(), packet.packet_number);
                        }
                        _ => prop_assert_eq!(buffer.last_packet_number_read(), before),
                    }
                    // survivors of the discard pass
                    let all_newer = buffer
                        .queued_numbers()
                        .all(|number| number.is_newer_than(before));
                    prop_assert!(all_newer);
                }
            }
        }
    }
}
