#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use codec::{CollisionEvent, ObjectIndex, PacketNumber, PhysicsNodeData, PhysicsSyncData, Team};
use glam::{Quat, Vec3, Vec4};
use parking_lot::Mutex;
use session::{Blend, PhysicsSource, PhysicsTarget, SyncListener};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub alive: bool,
    pub team: Team,
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec4,
}

impl Body {
    pub fn at(position: Vec3) -> Self {
        Self {
            alive: true,
            team: Team::None,
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec4::ZERO,
        }
    }

    pub fn dead() -> Self {
        Self {
            alive: false,
            ..Self::at(Vec3::ZERO)
        }
    }
}

/// In-memory physics world usable on both sides.
#[derive(Debug, Default)]
pub struct World {
    pub bodies: BTreeMap<ObjectIndex, Body>,
    pub applied: Vec<(ObjectIndex, Blend)>,
    pub spawned: Vec<(ObjectIndex, Team)>,
    pub despawned: Vec<ObjectIndex>,
    /// Spawning into a slot hands out this index instead of the slot's own.
    pub respawn_as: BTreeMap<ObjectIndex, ObjectIndex>,
}

impl World {
    pub fn insert(&mut self, index: u16, body: Body) {
        self.bodies.insert(ObjectIndex::new(index), body);
    }

    pub fn body(&self, index: u16) -> Body {
        self.bodies[&ObjectIndex::new(index)]
    }
}

impl PhysicsSource for World {
    fn object_data(&self, index: ObjectIndex) -> Option<PhysicsNodeData> {
        let body = self.bodies.get(&index)?;
        if !body.alive {
            return Some(PhysicsNodeData::dead());
        }
        let data = if body.velocity == Vec3::ZERO {
            PhysicsNodeData::at_rest(body.position, body.orientation)
        } else {
            PhysicsNodeData::moving(
                body.position,
                body.orientation,
                body.velocity,
                body.angular_velocity,
            )
        };
        Some(data.with_team(body.team))
    }
}

impl PhysicsTarget for World {
    fn apply_object(&mut self, index: ObjectIndex, data: &PhysicsNodeData, blend: Blend) {
        self.applied.push((index, blend));
        let body = self.bodies.entry(index).or_insert_with(Body::dead);
        body.position = blend.position(body.position, data.position);
        body.orientation = blend.orientation(body.orientation, data.orientation);
        body.velocity = data.velocity;
        body.angular_velocity = data.angular_velocity;
    }

    fn projectile_is_alive(&self, index: ObjectIndex) -> bool {
        self.bodies.get(&index).is_some_and(|body| body.alive)
    }

    fn spawn_projectile(&mut self, index: ObjectIndex, team: Team) -> ObjectIndex {
        let spawned = self.respawn_as.get(&index).copied().unwrap_or(index);
        self.spawned.push((spawned, team));
        let body = self.bodies.entry(spawned).or_insert_with(Body::dead);
        body.alive = true;
        body.team = team;
        spawned
    }

    fn despawn_projectile(&mut self, index: ObjectIndex) {
        self.despawned.push(index);
        if let Some(body) = self.bodies.get_mut(&index) {
            body.alive = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Delay(bool),
    Sound(ObjectIndex, u8),
}

/// Listener that records into a shared log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn delay_events(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Delay(value) => Some(value),
                Event::Sound(..) => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<(ObjectIndex, u8)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Sound(index, note) => Some((index, note)),
                Event::Delay(_) => None,
            })
            .collect()
    }
}

impl SyncListener for Recorder {
    fn network_delay_changed(&mut self, has_network_delay: bool) {
        self.events.lock().push(Event::Delay(has_network_delay));
    }

    fn collision_sound(&mut self, index: ObjectIndex, event: CollisionEvent) {
        self.events.lock().push(Event::Sound(index, event.note));
    }
}

/// A packet carrying one resting object at `(x, 0, 0)`.
pub fn packet_at(number: u16, x: f32) -> PhysicsSyncData {
    PhysicsSyncData {
        packet_number: PacketNumber::new(number),
        nodes: vec![PhysicsNodeData::at_rest(
            Vec3::new(x, 0.0, 0.0),
            Quat::IDENTITY,
        )],
        projectiles: Vec::new(),
        sounds: Vec::new(),
    }
}

pub fn encoded_at(number: u16, x: f32) -> Vec<u8> {
    packet_at(number, x).encode().expect("encode test packet")
}
