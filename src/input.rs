use crate::game_logic::Direction;

/// One of the four directional signals a player can give.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {Up,Down,Left,Right}

impl Intent {
  pub fn direction(self) -> Direction {
    match self {
      Intent::Up    => Direction::Up,
      Intent::Down  => Direction::Dn,
      Intent::Left  => Direction::Lf,
      Intent::Right => Direction::Rt,
    }
  }

  /// Arrow keys plus both ZQSD and WASD layouts.
  pub fn from_key(key:&str) -> Option<Intent> {
    match key {
      "ArrowUp"    | "z" | "Z" | "w" | "W" => Some(Intent::Up),
      "ArrowDown"  | "s" | "S"             => Some(Intent::Down),
      "ArrowLeft"  | "q" | "Q" | "a" | "A" => Some(Intent::Left),
      "ArrowRight" | "d" | "D"             => Some(Intent::Right),
      _ => None
    }
  }

  pub fn from_button_id(id:&str) -> Option<Intent> {
    match id {
      "up"    => Some(Intent::Up),
      "down"  => Some(Intent::Down),
      "left"  => Some(Intent::Left),
      "right" => Some(Intent::Right),
      _ => None
    }
  }

  pub const BUTTON_IDS:[&'static str;4] = ["up","down","left","right"];
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_keyboard_layouts_agree() {
    for (keys, intent) in [
      (["ArrowUp", "z", "w"], Intent::Up),
      (["ArrowLeft", "q", "a"], Intent::Left),
    ] {
      for key in keys {
        assert_eq!(Intent::from_key(key), Some(intent), "key {key}");
      }
    }
    assert_eq!(Intent::from_key("ArrowDown"), Some(Intent::Down));
    assert_eq!(Intent::from_key("S"), Some(Intent::Down));
    assert_eq!(Intent::from_key("d"), Some(Intent::Right));
  }

  #[test]
  fn test_unknown_key_is_ignored() {
    assert_eq!(Intent::from_key("Enter"), None);
    assert_eq!(Intent::from_key(" "), None);
  }

  #[test]
  fn test_buttons_map_to_unit_vectors() {
    let vectors: Vec<(i32,i32)> = Intent::BUTTON_IDS.iter()
      .map(|id| Intent::from_button_id(id).unwrap().direction().vector())
      .collect();
    assert_eq!(vectors, vec![(0,-1),(0,1),(-1,0),(1,0)]);
  }
}
