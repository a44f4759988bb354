//! Game configuration
//!
//! Every group deserializes with `#[serde(default)]`, so a config file only
//! needs the values it changes.

use hop_engine::config::Config;
use hop_engine::foundation::math::{constants::HALF_PI, Vec3};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Population and placement settings
    pub gameplay: GameplayConfig,

    /// Bunny movement settings
    pub bunny: BunnyConfig,

    /// Car handling settings
    pub vehicle: VehicleConfig,

    /// Collision thresholds and interaction tuning
    pub interaction: InteractionConfig,

    /// Follow-camera settings
    pub camera: CameraConfig,

    /// Shadow-casting light settings
    pub light: LightConfig,
}

impl Config for GameConfig {}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Bunnies activated at setup
    pub bunny_count: usize,

    /// Carrots activated at setup
    pub carrot_count: usize,

    /// Holes activated at setup
    pub hole_count: usize,

    /// Minimum distance between objects placed in one batch
    pub min_separation: f32,

    /// Samples tried per object before the separation is relaxed
    pub placement_attempts: usize,

    /// How many times the separation may be relaxed before placement fails
    pub max_relaxations: usize,

    /// Factor applied to the separation on each relaxation
    pub relax_factor: f32,

    /// Fixed RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            bunny_count: 100,
            carrot_count: 10,
            hole_count: 5,
            min_separation: 4.0,
            placement_attempts: 256,
            max_relaxations: 4,
            relax_factor: 0.5,
            seed: None,
        }
    }
}

/// Bunny configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BunnyConfig {
    /// Horizontal speed in units per second
    pub speed: f32,

    /// Length of one hop in seconds
    pub hop_duration: f32,

    /// Peak height of a hop
    pub hop_height: f32,

    /// Half size of the collision cube
    pub half_extent: f32,

    /// Distance kept from the edge of the play plane
    pub plane_margin: f32,

    /// Lift above the resting height
    pub ground_offset: f32,
}

impl Default for BunnyConfig {
    fn default() -> Self {
        Self {
            speed: 12.0,
            hop_duration: 1.2,
            hop_height: 3.2,
            half_extent: 1.2,
            plane_margin: 1.0,
            ground_offset: 0.5,
        }
    }
}

/// Car configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Speed gained per second of throttle
    pub acceleration: f32,

    /// Fraction of speed lost per tick without throttle
    pub decay: f32,

    /// Speed limit in both directions
    pub max_speed: f32,

    /// Yaw rate in radians per second
    pub turn_rate: f32,

    /// Wheel spin per unit of speed
    pub wheel_spin: f32,

    /// Margin from the low edge of the play plane
    pub low_margin: f32,

    /// Margin from the high edge of the play plane
    pub high_margin: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            acceleration: 0.18,
            decay: 0.05,
            max_speed: 0.5,
            turn_rate: 2.5,
            wheel_spin: 250.0,
            low_margin: 5.0,
            high_margin: 7.0,
        }
    }
}

/// Interaction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Anchor distance below which two bunnies are tested for overlap
    pub agent_threshold: f32,

    /// Anchor distance below which a bunny and a carrot are tested
    pub item_threshold: f32,

    /// Anchor distance below which a bunny and a hole are tested
    pub target_threshold: f32,

    /// Anchor distance below which a bunny and the car are tested
    pub hazard_threshold: f32,

    /// Scale applied to the overlap imbalance when pushing boxes apart
    pub separation_damping: f32,

    /// Speed scale of the lethal threshold
    pub lethal_base: f32,

    /// Upper bound of the lethal threshold factor
    pub lethal_ceiling: f32,

    /// How much a head-on alignment lowers the lethal threshold
    pub glancing_factor: f32,

    /// Car speed multiplier after hitting a bunny
    pub hazard_speed_damping: f32,

    /// Local position of a carried carrot under its bunny
    pub carry_offset: [f32; 3],

    /// Local position of a deposited carrot under its hole
    pub deposit_offset: [f32; 3],

    /// Scale of a deposited carrot
    pub deposit_scale: [f32; 3],

    /// Roll applied to a deposited carrot, in radians
    pub deposit_tilt: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            agent_threshold: 2.2,
            item_threshold: 3.4,
            target_threshold: 3.4,
            hazard_threshold: 10.0,
            separation_damping: 0.014,
            lethal_base: 0.55,
            lethal_ceiling: 1.01,
            glancing_factor: 0.5,
            hazard_speed_damping: 0.85,
            carry_offset: [0.0, 0.3, -0.8],
            deposit_offset: [0.0, 0.8, 0.0],
            deposit_scale: [0.1, 10.0, 0.1],
            deposit_tilt: HALF_PI,
        }
    }
}

impl InteractionConfig {
    /// Carry offset as a vector
    pub fn carry_offset(&self) -> Vec3 {
        Vec3::from(self.carry_offset)
    }

    /// Deposit offset as a vector
    pub fn deposit_offset(&self) -> Vec3 {
        Vec3::from(self.deposit_offset)
    }

    /// Deposit scale as a vector
    pub fn deposit_scale(&self) -> Vec3 {
        Vec3::from(self.deposit_scale)
    }

    /// Car speed above which a hit is lethal, given the alignment between
    /// the car's heading and the direction to the bunny
    pub fn lethal_speed(&self, alignment: f32) -> f32 {
        self.lethal_base * (self.lethal_ceiling - alignment.abs() * self.glancing_factor)
    }
}

/// Follow-camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// X offset from the tracked node
    pub offset_x: f32,

    /// Z offset from the tracked node
    pub offset_z: f32,

    /// Fixed camera height
    pub height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset_x: -20.0,
            offset_z: -20.0,
            height: 30.0,
        }
    }
}

/// Light configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// RGB color, 0-255 per channel
    pub color: [f32; 3],

    /// Up vector of the light's view
    pub direction: [f32; 3],

    /// Light position
    pub position: [f32; 3],

    /// Orthographic left bound
    pub left: f32,

    /// Orthographic right bound
    pub right: f32,

    /// Orthographic bottom bound
    pub bottom: f32,

    /// Orthographic top bound
    pub top: f32,

    /// Near plane
    pub near: f32,

    /// Far plane
    pub far: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: [255.0, 255.0, 255.0],
            direction: [0.3, 1.0, -0.4],
            position: [0.0, 0.17, -0.33],
            left: -115.0,
            right: 113.0,
            bottom: -89.0,
            top: 106.0,
            near: -300.0,
            far: 108.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hop_engine::config::ConfigFormat;

    #[test]
    fn test_partial_file_overrides_only_named_values() {
        let text = "[gameplay]\nbunny_count = 3\nseed = 42\n\n[vehicle]\nmax_speed = 1.0\n";
        let config = GameConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.gameplay.bunny_count, 3);
        assert_eq!(config.gameplay.seed, Some(42));
        assert_eq!(config.gameplay.carrot_count, 10);
        assert_eq!(config.vehicle.max_speed, 1.0);
        assert_eq!(config.vehicle.acceleration, 0.18);
        assert_eq!(config.interaction, InteractionConfig::default());
    }

    #[test]
    fn test_lethal_speed_is_lower_head_on() {
        let interaction = InteractionConfig::default();
        let head_on = interaction.lethal_speed(1.0);
        let glancing = interaction.lethal_speed(0.0);
        assert!(head_on < glancing);
        assert!((head_on - 0.55 * 0.51).abs() < 1e-6);
        assert_eq!(interaction.lethal_speed(-1.0), head_on);
    }
}
