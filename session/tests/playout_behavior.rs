mod common;

use std::time::Duration;

use codec::{ObjectIndex, PacketNumber, PhysicsNodeData, PhysicsSyncData};
use common::{encoded_at, packet_at, Body, Recorder, World};
use glam::Vec3;
use session::{Blend, PlayoutBuffer, Role, StepKind, SyncConfig, SyncSession};

const TICK: Duration = Duration::from_millis(16);

fn client(recorder: &Recorder) -> SyncSession {
    let mut session = SyncSession::new(Role::Client, SyncConfig::default())
        .unwrap()
        .with_listener(recorder.clone());
    session
        .register_object(ObjectIndex::new(0), PhysicsNodeData::dead())
        .unwrap();
    session
}

fn world() -> World {
    let mut world = World::default();
    world.insert(0, Body::at(Vec3::ZERO));
    world
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn reordered_packets_discard_only_stale() {
    let mut buffer = PlayoutBuffer::new(8, 4).with_last_read(PacketNumber::new(4));
    for number in [5, 3, 7, 6] {
        buffer.push(PhysicsSyncData::empty(PacketNumber::new(number)));
    }
    let tick = buffer.tick();
    assert_eq!(tick.discarded, 1);
    let kept: Vec<u16> = buffer.queued_numbers().map(PacketNumber::get).collect();
    assert_eq!(kept, vec![5, 7, 6]);
}

#[test]
fn late_packet_behind_newer_one_is_dropped_after_consumption() {
    let recorder = Recorder::default();
    let mut session = client(&recorder);
    let mut world = world();
    let inbox = session.inbox();
    for number in [1, 2, 3, 4, 5, 7, 6, 8] {
        inbox.receive(packet_at(number, f32::from(number)));
    }

    let mut now = Duration::ZERO;
    for _ in 0..9 {
        session.update_from_received_data(now, &mut world).unwrap();
        now += TICK;
    }
    // 7 is consumed while 6 waits behind it, so 6 is stale by its turn
    let stats = session.stats();
    assert_eq!(stats.packets_discarded, 1);
    assert_eq!(stats.packets_applied, 6);
}

#[test]
fn wraparound_sequence_is_applied_in_order() {
    let recorder = Recorder::default();
    let mut session = client(&recorder);
    let mut world = world();
    let inbox = session.inbox();
    let send = |frame: u64| {
        let number = PacketNumber::from_frame(frame);
        inbox.receive(packet_at(number.get(), (frame - 4080) as f32));
    };

    for frame in 4081..4088 {
        send(frame);
    }
    let mut now = Duration::ZERO;
    for frame in 4088..=4110 {
        send(frame);
        session.update_from_received_data(now, &mut world).unwrap();
        now += TICK;
    }

    // frames 4081..=4102 applied, crossing 4095 -> 0 -> 1
    let stats = session.stats();
    assert_eq!(stats.packets_discarded, 0);
    assert_eq!(stats.packets_trimmed, 0);
    assert_eq!(stats.packets_applied, 22);
    assert!(close(world.body(0).position.x, 22.0));
}

#[test]
fn starvation_raises_delay_once_and_resumes_after_refill() {
    let recorder = Recorder::default();
    let mut session = client(&recorder);
    let mut world = world();
    let inbox = session.inbox();
    for number in 1..=8u16 {
        inbox.receive_bytes(&encoded_at(number, f32::from(number))).unwrap();
    }

    let mut now = Duration::ZERO;
    let mut steps = Vec::new();
    for _ in 0..30 {
        steps.push(session.update_from_received_data(now, &mut world).unwrap().step);
        now += TICK;
    }
    assert_eq!(steps[0], StepKind::Refilling);
    assert_eq!(steps[12], StepKind::Starved);
    assert!(steps[13..].iter().all(|step| *step == StepKind::Refilling));
    assert_eq!(recorder.delay_events(), vec![true]);
    assert!(session.has_network_delay());

    // refilling ticks never clear the indicator, however long they last
    now = Duration::from_secs(10);
    session.update_from_received_data(now, &mut world).unwrap();
    assert!(session.has_network_delay());

    for number in 9..=16u16 {
        inbox.receive_bytes(&encoded_at(number, f32::from(number))).unwrap();
    }
    let report = session.update_from_received_data(now, &mut world).unwrap();
    assert_eq!(report.step, StepKind::Refilling);
    assert_eq!(report.network_delay_changed, None);

    // the packet half-applied before the stall is finished first
    let report = session.update_from_received_data(now + TICK, &mut world).unwrap();
    assert_eq!(report.step, StepKind::Complete);
    assert_eq!(report.network_delay_changed, Some(false));
    assert!(close(world.body(0).position.x, 8.0));

    let report = session
        .update_from_received_data(now + TICK * 2, &mut world)
        .unwrap();
    assert_eq!(report.step, StepKind::Full);
    assert!(close(world.body(0).position.x, 9.0));
    assert_eq!(recorder.delay_events(), vec![true, false]);
    assert_eq!(session.stats().starvations, 1);
    assert_eq!(session.stats().delay_transitions, 2);
}

#[test]
fn delay_stays_up_within_lifetime() {
    let recorder = Recorder::default();
    let mut session = client(&recorder);
    let mut world = world();
    let inbox = session.inbox();
    let mut number = 1u16;
    let mut feed = |count: u16| {
        for _ in 0..count {
            inbox.receive(packet_at(number, 0.0));
            number += 1;
        }
    };

    feed(8);
    let mut now = Duration::ZERO;
    for _ in 0..14 {
        session.update_from_received_data(now, &mut world).unwrap();
        now += TICK;
    }
    assert!(session.has_network_delay());

    feed(8);
    session.update_from_received_data(now, &mut world).unwrap();
    // one second after the starvation: still flagged while consuming
    let report = session
        .update_from_received_data(Duration::from_secs(1), &mut world)
        .unwrap();
    assert_eq!(report.step, StepKind::Complete);
    assert!(session.has_network_delay());
    assert_eq!(recorder.delay_events(), vec![true]);
}

#[test]
fn half_weight_then_full_weight_on_low_buffer() {
    let recorder = Recorder::default();
    let mut session = client(&recorder);
    let mut world = world();
    let inbox = session.inbox();
    for number in 1..=8u16 {
        inbox.receive(packet_at(number, f32::from(number)));
    }

    let mut now = Duration::ZERO;
    let mut tick = |session: &mut SyncSession, world: &mut World| {
        let report = session.update_from_received_data(now, world).unwrap();
        now += TICK;
        report
    };

    assert_eq!(tick(&mut session, &mut world).step, StepKind::Refilling);
    for expected in 1..=4 {
        assert_eq!(tick(&mut session, &mut world).step, StepKind::Full);
        assert!(close(world.body(0).position.x, expected as f32));
    }
    assert_eq!(session.inbox().queued(), 4);

    let report = tick(&mut session, &mut world);
    assert_eq!(report.step, StepKind::Half);
    assert_eq!(world.applied.last(), Some(&(ObjectIndex::new(0), Blend::Halfway)));
    assert!(close(world.body(0).position.x, 4.5));
    assert_eq!(session.inbox().queued(), 3);
    assert_eq!(session.stats().packets_applied, 5);

    let report = tick(&mut session, &mut world);
    assert_eq!(report.step, StepKind::Complete);
    assert_eq!(world.applied.last(), Some(&(ObjectIndex::new(0), Blend::Snap)));
    assert!(close(world.body(0).position.x, 5.0));
    assert_eq!(session.inbox().queued(), 3);
    assert_eq!(session.stats().packets_applied, 5);
    assert_eq!(session.stats().half_weight_ticks, 1);
}

#[test]
fn dead_objects_are_not_applied() {
    let recorder = Recorder::default();
    let mut session = client(&recorder);
    let mut world = world();
    let inbox = session.inbox();
    for number in 1..=8u16 {
        let mut packet = packet_at(number, 3.0);
        packet.nodes[0] = PhysicsNodeData::dead();
        inbox.receive(packet);
    }
    for i in 0..3 {
        session
            .update_from_received_data(TICK * i, &mut world)
            .unwrap();
    }
    assert!(world.applied.is_empty());
    assert_eq!(world.body(0).position, Vec3::ZERO);
}
