use codec::{CollisionEvent, ObjectIndex, PhysicsNodeData, Team};
use glam::{Quat, Vec3, Vec4};
use session::{Blend, PhysicsSource, PhysicsTarget};

use crate::rng::Rng;

/// Half extent of the play area, inside the position range.
const ARENA: f32 = 40.0;
const FRICTION: f32 = 0.995;
const REST_SPEED: f32 = 0.05;
const PROJECTILE_LIFETIME: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub alive: bool,
    pub team: Team,
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    /// Axis in xyz, speed in w.
    pub angular_velocity: Vec4,
}

impl Body {
    const fn resting(position: Vec3) -> Self {
        Self {
            alive: true,
            team: Team::None,
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec4::ZERO,
        }
    }

    const fn dead() -> Self {
        Self {
            alive: false,
            ..Self::resting(Vec3::ZERO)
        }
    }

    fn snapshot(&self) -> PhysicsNodeData {
        if !self.alive {
            return PhysicsNodeData::dead();
        }
        let data = if self.velocity == Vec3::ZERO && self.angular_velocity.w == 0.0 {
            PhysicsNodeData::at_rest(self.position, self.orientation)
        } else {
            PhysicsNodeData::moving(
                self.position,
                self.orientation,
                self.velocity,
                self.angular_velocity,
            )
        };
        data.with_team(self.team)
    }
}

/// Authoritative world on the server: boxes bouncing in an arena plus a pool
/// of short-lived projectiles.
pub struct ServerWorld {
    bodies: Vec<Body>,
    object_count: usize,
    projectile_age: Vec<u32>,
    rng: Rng,
}

impl ServerWorld {
    pub fn new(objects: u16, projectiles: u16, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let mut bodies = Vec::with_capacity(usize::from(objects) + usize::from(projectiles));
        for idx in 0..objects {
            let position = random_point(&mut rng);
            let mut body = Body::resting(position);
            // every third object starts at rest
            if idx % 3 != 0 {
                body.velocity = random_velocity(&mut rng, 12.0);
                body.angular_velocity = random_spin(&mut rng);
            }
            bodies.push(body);
        }
        bodies.extend((0..projectiles).map(|_| Body::dead()));
        Self {
            bodies,
            object_count: usize::from(objects),
            projectile_age: vec![0; usize::from(projectiles)],
            rng,
        }
    }

    pub fn object_indices(&self) -> impl Iterator<Item = ObjectIndex> {
        (0..self.object_count).map(|idx| ObjectIndex::new(idx as u16))
    }

    pub fn projectile_indices(&self) -> impl Iterator<Item = ObjectIndex> {
        (self.object_count..self.bodies.len()).map(|idx| ObjectIndex::new(idx as u16))
    }

    pub fn snapshot(&self, index: ObjectIndex) -> Option<PhysicsNodeData> {
        self.bodies
            .get(usize::from(index.raw()))
            .map(Body::snapshot)
    }

    pub fn body(&self, index: ObjectIndex) -> Option<&Body> {
        self.bodies.get(usize::from(index.raw()))
    }

    /// Advances one tick and returns the wall hits it produced.
    pub fn step(&mut self, dt: f32) -> Vec<(ObjectIndex, CollisionEvent)> {
        self.cycle_projectiles();
        let mut hits = Vec::new();
        for (idx, body) in self.bodies.iter_mut().enumerate() {
            if !body.alive {
                continue;
            }
            body.position += body.velocity * dt;
            let mut hit_speed = 0.0f32;
            for axis in 0..3 {
                if body.position[axis].abs() > ARENA {
                    hit_speed = hit_speed.max(body.velocity[axis].abs());
                    body.position[axis] = body.position[axis].clamp(-ARENA, ARENA);
                    body.velocity[axis] = -body.velocity[axis];
                }
            }
            if hit_speed > 0.0 {
                let event = CollisionEvent::new(
                    36 + (self.rng.next_u32() % 48) as u8,
                    (hit_speed * 6.0).min(127.0) as u8,
                    self.rng.unit(),
                );
                hits.push((ObjectIndex::new(idx as u16), event));
            }

            let spin = body.angular_velocity;
            if spin.w != 0.0 {
                let turn = Quat::from_axis_angle(spin.truncate(), spin.w * dt);
                body.orientation = (turn * body.orientation).normalize();
            }

            body.velocity *= FRICTION;
            body.angular_velocity.w *= FRICTION;
            if body.velocity.length() < REST_SPEED {
                body.velocity = Vec3::ZERO;
                body.angular_velocity = Vec4::ZERO;
            }
        }
        hits
    }

    fn cycle_projectiles(&mut self) {
        let pool = &mut self.bodies[self.object_count..];
        for (slot, (body, age)) in pool.iter_mut().zip(&mut self.projectile_age).enumerate() {
            if body.alive {
                *age += 1;
                if *age > PROJECTILE_LIFETIME {
                    *body = Body::dead();
                }
            } else if self.rng.chance(1.0 / 30.0) {
                *age = 0;
                *body = Body {
                    team: if slot % 2 == 0 { Team::TeamA } else { Team::TeamB },
                    velocity: random_velocity(&mut self.rng, 30.0),
                    angular_velocity: random_spin(&mut self.rng),
                    ..Body::resting(Vec3::new(0.0, 1.0, 0.0))
                };
            }
        }
    }
}

impl PhysicsSource for ServerWorld {
    fn object_data(&self, index: ObjectIndex) -> Option<PhysicsNodeData> {
        self.snapshot(index)
    }
}

fn random_point(rng: &mut Rng) -> Vec3 {
    Vec3::new(
        rng.range_f32(-ARENA, ARENA),
        rng.range_f32(0.0, ARENA),
        rng.range_f32(-ARENA, ARENA),
    )
}

fn random_velocity(rng: &mut Rng, speed: f32) -> Vec3 {
    Vec3::new(
        rng.range_f32(-speed, speed),
        rng.range_f32(-speed, speed),
        rng.range_f32(-speed, speed),
    )
}

fn random_spin(rng: &mut Rng) -> Vec4 {
    let axis = Vec3::new(
        rng.range_f32(-1.0, 1.0),
        rng.range_f32(-1.0, 1.0),
        rng.range_f32(-1.0, 1.0),
    )
    .normalize_or(Vec3::Y);
    axis.extend(rng.range_f32(0.5, 4.0))
}

/// Client-side copy driven only by received packets.
#[derive(Default)]
pub struct MirrorWorld {
    bodies: Vec<Body>,
    pub spawned: u64,
    pub despawned: u64,
}

impl MirrorWorld {
    pub fn body(&self, index: ObjectIndex) -> Option<&Body> {
        self.bodies.get(usize::from(index.raw()))
    }

    fn slot(&mut self, index: ObjectIndex) -> &mut Body {
        let idx = usize::from(index.raw());
        if idx >= self.bodies.len() {
            self.bodies.resize(idx + 1, Body::dead());
        }
        &mut self.bodies[idx]
    }
}

impl PhysicsTarget for MirrorWorld {
    fn apply_object(&mut self, index: ObjectIndex, data: &PhysicsNodeData, blend: Blend) {
        let body = self.slot(index);
        body.alive = true;
        body.team = data.team;
        body.position = blend.position(body.position, data.position);
        body.orientation = blend.orientation(body.orientation, data.orientation);
        body.velocity = data.velocity;
        body.angular_velocity = data.angular_velocity;
    }

    fn projectile_is_alive(&self, index: ObjectIndex) -> bool {
        self.body(index).is_some_and(|body| body.alive)
    }

    fn spawn_projectile(&mut self, index: ObjectIndex, team: Team) -> ObjectIndex {
        self.spawned += 1;
        let body = self.slot(index);
        *body = Body {
            team,
            ..Body::resting(Vec3::ZERO)
        };
        index
    }

    fn despawn_projectile(&mut self, index: ObjectIndex) {
        self.despawned += 1;
        self.slot(index).alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_stay_in_arena() {
        let mut world = ServerWorld::new(9, 4, 5);
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        for idx in 0..13u16 {
            let body = world.body(ObjectIndex::new(idx)).unwrap();
            assert!(body.position.abs().max_element() <= ARENA);
        }
    }

    #[test]
    fn resting_objects_snapshot_without_velocity() {
        let world = ServerWorld::new(3, 0, 1);
        let data = world.object_data(ObjectIndex::new(0)).unwrap();
        assert!(data.is_alive);
        assert!(!data.is_moving);
        let data = world.object_data(ObjectIndex::new(1)).unwrap();
        assert!(data.is_moving);
    }

    #[test]
    fn mirror_spawns_and_despawns() {
        let mut mirror = MirrorWorld::default();
        let index = ObjectIndex::new(4);
        assert!(!mirror.projectile_is_alive(index));
        assert_eq!(mirror.spawn_projectile(index, Team::TeamB), index);
        assert!(mirror.projectile_is_alive(index));
        mirror.despawn_projectile(index);
        assert!(!mirror.projectile_is_alive(index));
        assert_eq!((mirror.spawned, mirror.despawned), (1, 1));
    }
}
