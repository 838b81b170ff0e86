//! Player sprite selection
//!
//! A priority-ordered decision tree picks either one full-body frame or a
//! composite of torso, legs and arms. Selection is a pure function of the
//! player's state so drawing never mutates anything.

use glam::Vec2;

use crate::consts::{PLAYER_HEIGHT, PLAYFIELD_HEIGHT};
use crate::renderer::atlas::{self, SpriteRegion};

/// Walk cycle frame length (ms)
const RUN_FRAME_MS: i32 = 120;
/// Aim y below this counts as "aiming up" for the standing torso
const AIM_UP_TORSO: f32 = -0.5;
/// Lower bounds of arm buckets 1..=4 (screen y grows downward)
const ARM_BUCKETS: [f32; 4] = [-0.85, -0.35, 0.35, 0.85];

/// Depth band the player occupies; parts sort inside it by vertical position
const LAYER_MIN: f32 = 0.1;
const LAYER_SPAN: f32 = 0.8;
const PART_STEP: f32 = 0.0001;

/// Everything the selector looks at
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseInput {
    /// Wind-up phase while the special trigger runs
    pub trigger_phase: Option<usize>,
    /// (power group, phase) while a power is active
    pub power: Option<(usize, usize)>,
    pub respawning: bool,
    pub firing: bool,
    pub moving: bool,
    pub aim: Vec2,
    pub mirrored: bool,
    pub clock_ms: i32,
}

/// The chosen frame(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// Nothing drawn (respawning; a death animation would go here)
    Hidden,
    FullBody(SpriteRegion),
    Composite {
        torso: SpriteRegion,
        legs: Option<SpriteRegion>,
        /// Arm frame and whether it is drawn flipped against the body
        arms: Option<(SpriteRegion, bool)>,
    },
}

/// One sprite of the player relative to its top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosePart {
    pub region: SpriteRegion,
    pub offset: Vec2,
    pub layer: f32,
    pub flip_x: bool,
}

pub fn select_pose(input: &PoseInput) -> Pose {
    if let Some(phase) = input.trigger_phase {
        let frames = &atlas::PLAYER_WINDUP;
        return Pose::FullBody(frames[phase.min(frames.len() - 1)]);
    }
    if let Some((group, phase)) = input.power {
        let row = &atlas::PLAYER_POWER[group.min(atlas::PLAYER_POWER.len() - 1)];
        return Pose::FullBody(row[phase.min(row.len() - 1)]);
    }
    if input.respawning {
        return Pose::Hidden;
    }
    if !input.firing && !input.moving {
        return Pose::FullBody(atlas::PLAYER_IDLE);
    }

    let torso = match (input.moving, input.firing) {
        (true, true) => atlas::TORSO_FIRE_RUN,
        (true, false) => atlas::TORSO_RUN,
        _ if input.aim.y < AIM_UP_TORSO => atlas::TORSO_FIRE_STAND_UP,
        _ => atlas::TORSO_FIRE_STAND_SIDE,
    };

    let legs = if input.moving {
        let frame = (input.clock_ms.max(0) / RUN_FRAME_MS) as u16 % atlas::LEGS_RUN_FRAMES;
        Some(atlas::LEGS_RUN.frame(frame))
    } else {
        Some(atlas::LEGS_STAND_FIRE)
    };

    let arms = if input.firing { select_arms(input) } else { None };

    Pose::Composite { torso, legs, arms }
}

/// Vertical bucket 0 (straight up) .. 4 (straight down)
pub fn arm_bucket(aim_y: f32) -> u16 {
    ARM_BUCKETS.iter().take_while(|&&bound| aim_y >= bound).count() as u16
}

fn select_arms(input: &PoseInput) -> Option<(SpriteRegion, bool)> {
    let bucket = arm_bucket(input.aim.y);
    // Straight up while standing has no arm art yet
    if bucket == 0 && !input.moving {
        return None;
    }
    let facing_left = input.mirrored;
    let aiming_left = input.aim.x < 0.0;
    let backward = input.aim.x != 0.0 && aiming_left != facing_left;
    if backward {
        Some((atlas::ARMS_BACKWARD.frame(bucket), true))
    } else {
        Some((atlas::ARMS_FORWARD.frame(bucket), false))
    }
}

/// Depth for a player whose sprite top is at `y`
pub fn base_layer(y: f32) -> f32 {
    let foot = ((y + PLAYER_HEIGHT) / PLAYFIELD_HEIGHT).clamp(0.0, 1.0);
    LAYER_MIN + foot * LAYER_SPAN
}

/// Expand a pose into back-to-front parts (legs, torso, arms)
pub fn pose_parts(pose: Pose, y: f32, mirrored: bool) -> Vec<PosePart> {
    let base = base_layer(y);
    match pose {
        Pose::Hidden => Vec::new(),
        Pose::FullBody(region) => vec![PosePart {
            region,
            offset: Vec2::ZERO,
            layer: base,
            flip_x: mirrored,
        }],
        Pose::Composite { torso, legs, arms } => {
            let mut parts = Vec::with_capacity(3);
            if let Some(legs) = legs {
                parts.push(PosePart {
                    region: legs,
                    offset: Vec2::new(0.0, 12.0),
                    layer: base,
                    flip_x: mirrored,
                });
            }
            parts.push(PosePart {
                region: torso,
                offset: Vec2::ZERO,
                layer: base + PART_STEP,
                flip_x: mirrored,
            });
            if let Some((arms, flip)) = arms {
                parts.push(PosePart {
                    region: arms,
                    offset: Vec2::new(0.0, 4.0),
                    layer: base + PART_STEP * 2.0,
                    flip_x: mirrored != flip,
                });
            }
            parts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn firing(aim: Vec2, moving: bool, mirrored: bool) -> PoseInput {
        PoseInput {
            firing: true,
            moving,
            aim,
            mirrored,
            ..Default::default()
        }
    }

    #[test]
    fn test_trigger_beats_everything() {
        let input = PoseInput {
            trigger_phase: Some(1),
            power: Some((2, 1)),
            respawning: true,
            firing: true,
            ..Default::default()
        };
        assert_eq!(select_pose(&input), Pose::FullBody(atlas::PLAYER_WINDUP[1]));
    }

    #[test]
    fn test_power_frame_by_group_and_phase() {
        let input = PoseInput {
            power: Some((1, 2)),
            respawning: true,
            ..Default::default()
        };
        assert_eq!(select_pose(&input), Pose::FullBody(atlas::PLAYER_POWER[1][2]));
    }

    #[test]
    fn test_respawning_hidden() {
        let input = PoseInput {
            respawning: true,
            moving: true,
            ..Default::default()
        };
        assert_eq!(select_pose(&input), Pose::Hidden);
        assert!(pose_parts(Pose::Hidden, 100.0, false).is_empty());
    }

    #[test]
    fn test_idle() {
        assert_eq!(select_pose(&PoseInput::default()), Pose::FullBody(atlas::PLAYER_IDLE));
    }

    #[test]
    fn test_running_without_fire_has_no_arms() {
        let input = PoseInput {
            moving: true,
            clock_ms: RUN_FRAME_MS * 2,
            ..Default::default()
        };
        assert_eq!(
            select_pose(&input),
            Pose::Composite {
                torso: atlas::TORSO_RUN,
                legs: Some(atlas::LEGS_RUN.frame(2)),
                arms: None,
            }
        );
    }

    #[test]
    fn test_standing_fire_torso_split() {
        let up = select_pose(&firing(Vec2::new(0.3, -0.95), false, false));
        let side = select_pose(&firing(Vec2::new(1.0, 0.0), false, false));
        assert!(matches!(up, Pose::Composite { torso, .. } if torso == atlas::TORSO_FIRE_STAND_UP));
        assert!(matches!(side, Pose::Composite { torso, legs: Some(legs), .. }
            if torso == atlas::TORSO_FIRE_STAND_SIDE && legs == atlas::LEGS_STAND_FIRE));
    }

    #[test]
    fn test_arm_buckets() {
        assert_eq!(arm_bucket(-1.0), 0);
        assert_eq!(arm_bucket(-0.5), 1);
        assert_eq!(arm_bucket(0.0), 2);
        assert_eq!(arm_bucket(0.5), 3);
        assert_eq!(arm_bucket(1.0), 4);
    }

    #[test]
    fn test_straight_up_standing_has_no_arms() {
        let pose = select_pose(&firing(Vec2::new(0.0, -1.0), false, false));
        assert!(matches!(pose, Pose::Composite { arms: None, .. }));

        let pose = select_pose(&firing(Vec2::new(0.0, -1.0), true, false));
        assert!(matches!(pose, Pose::Composite { arms: Some((region, false)), .. }
            if region == atlas::ARMS_FORWARD.frame(0)));
    }

    #[test]
    fn test_backward_arms_relative_to_mirror() {
        let pose = select_pose(&firing(Vec2::new(-1.0, 0.0), true, false));
        assert!(matches!(pose, Pose::Composite { arms: Some((region, true)), .. }
            if region == atlas::ARMS_BACKWARD.frame(2)));

        let pose = select_pose(&firing(Vec2::new(-1.0, 0.0), true, true));
        assert!(matches!(pose, Pose::Composite { arms: Some((region, false)), .. }
            if region == atlas::ARMS_FORWARD.frame(2)));
    }

    #[test]
    fn test_parts_back_to_front() {
        let pose = select_pose(&firing(Vec2::new(1.0, 0.0), true, false));
        let parts = pose_parts(pose, 100.0, false);
        assert_eq!(parts.len(), 3);
        assert!(parts[0].layer < parts[1].layer && parts[1].layer < parts[2].layer);
        assert!(base_layer(50.0) < base_layer(100.0));
    }
}
