//! Per-body physics snapshots.

use bitstream::{BitReader, BitResult, BitWriter};
use glam::{Quat, Vec3, Vec4};
use schema::protocol::{
    ANGULAR_VELOCITY_AXIS, ANGULAR_VELOCITY_MAGNITUDE, MAX_COMPONENT_BITS, ORIENTATION, POSITION,
    VELOCITY,
};

use crate::Team;

const ALIVE_FIXED_BITS: usize = 1 // alive
    + 1 // moving
    + 3 * POSITION.bits() as usize
    + MAX_COMPONENT_BITS as usize
    + 3 * ORIENTATION.bits() as usize;

const MOVING_BITS: usize = 3 * VELOCITY.bits() as usize
    + 3 * ANGULAR_VELOCITY_AXIS.bits() as usize
    + ANGULAR_VELOCITY_MAGNITUDE.bits() as usize;

/// One rigid body's replicated state at a point in time.
///
/// Created fresh every tick from the live body and never mutated after
/// encoding. A dead snapshot transmits only its alive bit; a resting one omits
/// both velocities, which decode as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicsNodeData {
    pub is_alive: bool,
    /// Only meaningful when alive.
    pub is_moving: bool,
    pub team: Team,
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    /// Axis in `xyz`, magnitude in `w`.
    pub angular_velocity: Vec4,
}

impl Default for PhysicsNodeData {
    fn default() -> Self {
        Self::dead()
    }
}

impl PhysicsNodeData {
    /// A snapshot of a body that is not alive. Only the alive bit is sent.
    #[must_use]
    pub const fn dead() -> Self {
        Self {
            is_alive: false,
            is_moving: false,
            team: Team::None,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec4::ZERO,
        }
    }

    /// A live body that is not moving.
    #[must_use]
    pub const fn at_rest(position: Vec3, orientation: Quat) -> Self {
        Self {
            is_alive: true,
            position,
            orientation,
            ..Self::dead()
        }
    }

    /// A live, moving body.
    #[must_use]
    pub const fn moving(
        position: Vec3,
        orientation: Quat,
        velocity: Vec3,
        angular_velocity: Vec4,
    ) -> Self {
        Self {
            is_alive: true,
            is_moving: true,
            team: Team::None,
            position,
            orientation,
            velocity,
            angular_velocity,
        }
    }

    #[must_use]
    pub const fn with_team(mut self, team: Team) -> Self {
        self.team = team;
        self
    }

    /// Exact number of bits [`encode`](Self::encode) writes for this snapshot.
    #[must_use]
    pub const fn encoded_bits(&self) -> usize {
        if !self.is_alive {
            return 1;
        }
        let mut bits = ALIVE_FIXED_BITS + self.team.encoded_bits();
        if self.is_moving {
            bits += MOVING_BITS;
        }
        bits
    }

    pub fn encode(&self, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_bool(self.is_alive);
        if !self.is_alive {
            return Ok(());
        }
        writer.write_bool(self.is_moving);
        self.team.encode(writer);
        POSITION.write_vec3(self.position, writer)?;
        encode_orientation(self.orientation, writer)?;

        if !self.is_moving {
            return Ok(());
        }
        VELOCITY.write_vec3(self.velocity, writer)?;

        // an unset angular velocity may hold NaN; send zero instead
        let angular = if self.angular_velocity.is_nan() {
            Vec4::ZERO
        } else {
            self.angular_velocity
        };
        // a unit axis always fits the axis compressor
        ANGULAR_VELOCITY_AXIS.write_vec3(angular.truncate().normalize_or_zero(), writer)?;
        ANGULAR_VELOCITY_MAGNITUDE.write(angular.w, writer)
    }

    pub fn decode(reader: &mut BitReader<'_>) -> BitResult<Self> {
        let mut data = Self::dead();
        data.is_alive = reader.read_bool()?;
        if !data.is_alive {
            return Ok(data);
        }
        data.is_moving = reader.read_bool()?;
        data.team = Team::decode(reader)?;
        data.position = POSITION.read_vec3(reader)?;
        data.orientation = decode_orientation(reader)?;

        if !data.is_moving {
            return Ok(data);
        }
        data.velocity = VELOCITY.read_vec3(reader)?;
        let axis = ANGULAR_VELOCITY_AXIS.read_vec3(reader)?;
        let magnitude = ANGULAR_VELOCITY_MAGNITUDE.read(reader)?;
        let received = axis.extend(magnitude);
        // all-zero means the sender had no angular velocity to report
        if received != Vec4::ZERO {
            data.angular_velocity = received;
        }
        Ok(data)
    }
}

/// Smallest-three: the index of the largest component, then the other three.
///
/// The quaternion is negated when its largest component is negative, so the
/// receiver can always rebuild that component as a non-negative root.
fn encode_orientation(orientation: Quat, writer: &mut BitWriter) -> BitResult<()> {
    let mut components = unit_or_identity(orientation).to_array();
    let max_index = largest_component(&components);
    if components[max_index] < 0.0 {
        for component in &mut components {
            *component = -*component;
        }
    }

    writer.write_bits(max_index as u64, MAX_COMPONENT_BITS)?;
    for (index, component) in components.iter().enumerate() {
        if index != max_index {
            ORIENTATION.write(*component, writer)?;
        }
    }
    Ok(())
}

fn decode_orientation(reader: &mut BitReader<'_>) -> BitResult<Quat> {
    let max_index = reader.read_bits(MAX_COMPONENT_BITS)? as usize;
    let mut components = [0.0f32; 4];
    let mut square_sum = 0.0f32;
    for (index, component) in components.iter_mut().enumerate() {
        if index != max_index {
            *component = ORIENTATION.read(reader)?;
            square_sum += *component * *component;
        }
    }
    // quantization can push the sum past one
    components[max_index] = (1.0 - square_sum).max(0.0).sqrt();
    Ok(Quat::from_array(components).normalize())
}

fn largest_component(components: &[f32; 4]) -> usize {
    (1..4).fold(0, |max_index, index| {
        if components[index].abs() > components[max_index].abs() {
            index
        } else {
            max_index
        }
    })
}

fn unit_or_identity(orientation: Quat) -> Quat {
    let length_squared = orientation.length_squared();
    if length_squared.is_finite() && length_squared > f32::EPSILON {
        orientation.normalize()
    } else {
        Quat::IDENTITY
    }
}
