use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CELLS_COUNT:u32 = 11;
pub const DEFAULT_CELL_SIZE:i32 = 25;
pub const DEFAULT_SNAKE_LENGTH:usize = 5;
pub const DEFAULT_FPS:u32 = 5;
pub const MILLISECONDS_BETWEEN_SPEED_INCREASE:u32 = 500;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppleShape {Circle,Square}

impl FromStr for AppleShape {
  type Err = ConfigError;

  fn from_str(s:&str) -> Result<Self,Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "circle" => Ok(AppleShape::Circle),
      "square" => Ok(AppleShape::Square),
      other    => Err(ConfigError::UnknownAppleShape(other.to_string()))
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("cells_count must be at least 2 (got {0})")]
  GridTooSmall(u32),
  #[error("cell_size must be positive (got {0})")]
  InvalidCellSize(i32),
  #[error("a {cells_count}x{cells_count} grid of {cell_size} unit cells does not fit in i32 coordinates")]
  SurfaceTooLarge { cells_count:u32, cell_size:i32 },
  #[error("initial snake length {length} exceeds the {cells} cells of the grid")]
  LengthTooLarge { length:usize, cells:u64 },
  #[error("initial_fps must be positive")]
  ZeroFps,
  #[error("initial snake length must be positive")]
  ZeroLength,
  #[error("ramp interval must be positive when the speed ramp is enabled")]
  ZeroRampInterval,
  #[error("unknown apple shape `{0}`, expected `circle` or `square`")]
  UnknownAppleShape(String),
  #[error("attribute `{attribute}` has invalid value `{value}`")]
  InvalidAttribute { attribute:&'static str, value:String },
}

/// Everything that distinguishes one snake variant from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
  pub cells_count: u32,
  pub cell_size: i32,
  pub initial_length: usize,
  pub initial_fps: u32,
  pub speed_ramp: bool,
  pub ramp_interval_ms: u32,
  pub apple_shape: AppleShape,
  pub button_input: bool,
  /// When false a turn straight back onto the neck is ignored.
  pub allow_reversal: bool,
}

impl Default for GameConfig {
  fn default() -> Self {
    GameConfig {
      cells_count: DEFAULT_CELLS_COUNT,
      cell_size: DEFAULT_CELL_SIZE,
      initial_length: DEFAULT_SNAKE_LENGTH,
      initial_fps: DEFAULT_FPS,
      speed_ramp: true,
      ramp_interval_ms: MILLISECONDS_BETWEEN_SPEED_INCREASE,
      apple_shape: AppleShape::Circle,
      button_input: true,
      allow_reversal: true,
    }
  }
}

impl GameConfig {
  /// Fixed speed, square apple, keyboard only.
  pub fn classic() -> Self {
    GameConfig {
      speed_ramp: false,
      apple_shape: AppleShape::Square,
      button_input: false,
      ..Default::default()
    }
  }

  /// Side of the surface, or None when it (plus the one cell the head may
  /// overshoot by) leaves the `i32` range.
  pub fn checked_surface_size(&self) -> Option<i32> {
    let side = i32::try_from(self.cells_count).ok()?.checked_mul(self.cell_size)?;
    side.checked_add(self.cell_size)?;
    Some(side)
  }

  /// Saturates for configurations `validate` rejects.
  pub fn surface_size(&self) -> i32 {
    self.checked_surface_size().unwrap_or(i32::MAX)
  }

  pub fn validate(&self) -> Result<(),ConfigError> {
    // the starting head sits one cell left of the centre
    if self.cells_count < 2 {return Err(ConfigError::GridTooSmall(self.cells_count))}
    if self.cell_size <= 0 {return Err(ConfigError::InvalidCellSize(self.cell_size))}
    if self.initial_fps == 0 {return Err(ConfigError::ZeroFps)}
    if self.initial_length == 0 {return Err(ConfigError::ZeroLength)}
    if self.checked_surface_size().is_none() {
      return Err(ConfigError::SurfaceTooLarge {
        cells_count: self.cells_count,
        cell_size: self.cell_size
      })
    }
    let cells = u64::from(self.cells_count) * u64::from(self.cells_count);
    if self.initial_length as u64 > cells {
      return Err(ConfigError::LengthTooLarge {length: self.initial_length, cells})
    }
    if self.speed_ramp && self.ramp_interval_ms == 0 {
      return Err(ConfigError::ZeroRampInterval)
    }
    Ok(())
  }

  /// Applies one `data-*` style override on top of the current values.
  pub fn apply_override(&mut self, attribute:&'static str, value:&str)
    -> Result<(),ConfigError>
  {
    let invalid = || ConfigError::InvalidAttribute {
      attribute,
      value: value.to_string()
    };
    match attribute {
      "data-cells-count"    => self.cells_count = value.trim().parse().map_err(|_| invalid())?,
      "data-cell-size"      => self.cell_size = value.trim().parse().map_err(|_| invalid())?,
      "data-initial-length" => self.initial_length = value.trim().parse().map_err(|_| invalid())?,
      "data-initial-fps"    => self.initial_fps = value.trim().parse().map_err(|_| invalid())?,
      "data-speed-ramp"     => self.speed_ramp = parse_flag(value).ok_or_else(invalid)?,
      "data-ramp-interval"  => self.ramp_interval_ms = value.trim().parse().map_err(|_| invalid())?,
      "data-apple-shape"    => self.apple_shape = value.parse()?,
      "data-buttons"        => self.button_input = parse_flag(value).ok_or_else(invalid)?,
      "data-allow-reversal" => self.allow_reversal = parse_flag(value).ok_or_else(invalid)?,
      _ => return Err(invalid())
    }
    Ok(())
  }
}

impl GameConfig {
  /// Default configuration with every attribute `lookup` knows applied on
  /// top. Bad values are skipped and reported; an override set that fails
  /// validation as a whole is discarded.
  pub fn from_attributes<F>(lookup:F) -> (GameConfig,Vec<ConfigError>)
  where
    F: Fn(&str) -> Option<String>
  {
    let mut config = GameConfig::default();
    let mut errors = Vec::new();
    for attribute in OVERRIDE_ATTRIBUTES {
      if let Some(value) = lookup(attribute) {
        if let Err(err) = config.apply_override(attribute, &value) {
          errors.push(err);
        }
      }
    }
    if let Err(err) = config.validate() {
      errors.push(err);
      config = GameConfig::default();
    }
    (config,errors)
  }
}

pub const OVERRIDE_ATTRIBUTES:[&str;9] = [
  "data-cells-count",
  "data-cell-size",
  "data-initial-length",
  "data-initial-fps",
  "data-speed-ramp",
  "data-ramp-interval",
  "data-apple-shape",
  "data-buttons",
  "data-allow-reversal",
];

fn parse_flag(value:&str) -> Option<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "" | "1" | "true" | "on" | "yes" => Some(true),
    "0" | "false" | "off" | "no"     => Some(false),
    _ => None
  }
}
