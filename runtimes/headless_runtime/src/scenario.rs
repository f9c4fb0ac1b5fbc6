// Scripted stick input for headless runs. Each script is a pure function of
// the frame index and the player's feet, so runs are reproducible.

use cgmath::{vec3, Deg, Quaternion, Rotation3, Vector3};
use clap::ValueEnum;
use locomotion::{physics::StaticShape, InputSnapshot};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Walk,
    Turn,
    Teleport,
    All,
}

const EYE_HEIGHT: f32 = 1.5;

/// Flat floor, a wall ahead of the spawn point and a low ledge to the right.
pub fn demo_level() -> Vec<StaticShape> {
    vec![
        StaticShape::Cuboid {
            center: vec3(0.0, -0.5, 0.0),
            half_extents: vec3(50.0, 0.5, 50.0),
        },
        StaticShape::Cuboid {
            center: vec3(0.0, 1.5, -12.0),
            half_extents: vec3(5.0, 1.5, 0.25),
        },
        StaticShape::Cuboid {
            center: vec3(6.0, 0.25, -4.0),
            half_extents: vec3(2.0, 0.25, 2.0),
        },
    ]
}

pub fn input_for(script: Script, frame: u32, frames: u32, feet: Vector3<f32>) -> InputSnapshot {
    match script {
        Script::Walk => walk(frame),
        Script::Turn => turn(frame),
        Script::Teleport => teleport(frame, feet),
        Script::All => {
            let third = (frames / 3).max(1);
            match frame / third {
                0 => walk(frame),
                1 => turn(frame - third),
                _ => teleport(frame - 2 * third, feet),
            }
        }
    }
}

fn walk(frame: u32) -> InputSnapshot {
    let input = match frame {
        0..=39 => InputSnapshot::default().with_movement(0.0, 1.0),
        40..=59 => InputSnapshot::default().with_movement(1.0, 0.0),
        _ => InputSnapshot::default(),
    };
    input.with_jump((20..24).contains(&frame))
}

fn turn(frame: u32) -> InputSnapshot {
    match frame {
        10..=24 => InputSnapshot::default().with_steering(0.9, 0.0),
        40..=54 => InputSnapshot::default().with_steering(-0.9, 0.0),
        _ => InputSnapshot::default(),
    }
}

fn teleport(frame: u32, feet: Vector3<f32>) -> InputSnapshot {
    let aim_rotation = Quaternion::from_angle_x(Deg(-25.0));
    let input = InputSnapshot::default().with_aim(feet + vec3(0.0, EYE_HEIGHT, 0.0), aim_rotation);
    match frame {
        10..=40 => input.with_steering(0.0, 0.8),
        _ => input,
    }
}
