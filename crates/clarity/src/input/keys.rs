//! The closed set of bindable keys.
//!
//! Each key has a display name (`"W"`, `"F5"`, `"LSHIFT"`) and a numeric
//! code. The codes follow the GLFW key table, so keybind tables written for
//! GLFW-based tools load unchanged:
//!
//! ```text
//! SPACE        32
//! 0 ..= 9      48 ..= 57
//! A ..= Z      65 ..= 90
//! F1 ..= F12   290 ..= 301
//! LSHIFT LCTRL LALT    340 341 342
//! RSHIFT RCTRL RALT    344 345 346
//! ```

use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::error::AssetError;

macro_rules! key_table {
    ($($variant:ident => $name:literal, $code:literal, $winit:ident;)*) => {
        /// A key that can carry a binding.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "KeyRef", into = "String")]
        pub enum Key {
            $($variant,)*
        }

        impl Key {
            /// Every key, in code order.
            pub const ALL: &'static [Key] = &[$(Key::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Key::$variant => $name,)*
                }
            }

            /// The GLFW-compatible key code.
            pub const fn code(self) -> i32 {
                match self {
                    $(Key::$variant => $code,)*
                }
            }

            /// The key for a physical winit key code, if it is bindable.
            pub fn from_key_code(code: KeyCode) -> Option<Key> {
                match code {
                    $(KeyCode::$winit => Some(Key::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

key_table! {
    Space => "SPACE", 32, Space;
    Num0 => "0", 48, Digit0;
    Num1 => "1", 49, Digit1;
    Num2 => "2", 50, Digit2;
    Num3 => "3", 51, Digit3;
    Num4 => "4", 52, Digit4;
    Num5 => "5", 53, Digit5;
    Num6 => "6", 54, Digit6;
    Num7 => "7", 55, Digit7;
    Num8 => "8", 56, Digit8;
    Num9 => "9", 57, Digit9;
    A => "A", 65, KeyA;
    B => "B", 66, KeyB;
    C => "C", 67, KeyC;
    D => "D", 68, KeyD;
    E => "E", 69, KeyE;
    F => "F", 70, KeyF;
    G => "G", 71, KeyG;
    H => "H", 72, KeyH;
    I => "I", 73, KeyI;
    J => "J", 74, KeyJ;
    K => "K", 75, KeyK;
    L => "L", 76, KeyL;
    M => "M", 77, KeyM;
    N => "N", 78, KeyN;
    O => "O", 79, KeyO;
    P => "P", 80, KeyP;
    Q => "Q", 81, KeyQ;
    R => "R", 82, KeyR;
    S => "S", 83, KeyS;
    T => "T", 84, KeyT;
    U => "U", 85, KeyU;
    V => "V", 86, KeyV;
    W => "W", 87, KeyW;
    X => "X", 88, KeyX;
    Y => "Y", 89, KeyY;
    Z => "Z", 90, KeyZ;
    F1 => "F1", 290, F1;
    F2 => "F2", 291, F2;
    F3 => "F3", 292, F3;
    F4 => "F4", 293, F4;
    F5 => "F5", 294, F5;
    F6 => "F6", 295, F6;
    F7 => "F7", 296, F7;
    F8 => "F8", 297, F8;
    F9 => "F9", 298, F9;
    F10 => "F10", 299, F10;
    F11 => "F11", 300, F11;
    F12 => "F12", 301, F12;
    LShift => "LSHIFT", 340, ShiftLeft;
    LCtrl => "LCTRL", 341, ControlLeft;
    LAlt => "LALT", 342, AltLeft;
    RShift => "RSHIFT", 344, ShiftRight;
    RCtrl => "RCTRL", 345, ControlRight;
    RAlt => "RALT", 346, AltRight;
}

impl Key {
    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Key> {
        Key::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(name))
    }

    pub fn from_code(code: i32) -> Option<Key> {
        Key::ALL.iter().copied().find(|key| key.code() == code)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name().to_owned()
    }
}

/// How a key is written in a keybind table: by name or by code.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum KeyRef {
    Name(String),
    Code(i32),
}

impl TryFrom<KeyRef> for Key {
    type Error = AssetError;

    fn try_from(key: KeyRef) -> Result<Self, Self::Error> {
        match key {
            KeyRef::Name(name) => Key::from_name(&name).ok_or(AssetError::UnknownKey(name)),
            KeyRef::Code(code) => {
                Key::from_code(code).ok_or_else(|| AssetError::UnknownKey(code.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_glfw_table() {
        assert_eq!(Key::Space.code(), 32);
        assert_eq!(Key::Num0.code(), 48);
        assert_eq!(Key::Num9.code(), 57);
        assert_eq!(Key::A.code(), 65);
        assert_eq!(Key::Z.code(), 90);
        assert_eq!(Key::F1.code(), 290);
        assert_eq!(Key::F12.code(), 301);
        assert_eq!(Key::LShift.code(), 340);
        assert_eq!(Key::RShift.code(), 344);
        assert_eq!(Key::RAlt.code(), 346);
    }

    #[test]
    fn names_and_codes_are_unique() {
        let mut names: Vec<_> = Key::ALL.iter().map(|k| k.name()).collect();
        let mut codes: Vec<_> = Key::ALL.iter().map(|k| k.code()).collect();
        names.sort_unstable();
        names.dedup();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(names.len(), Key::ALL.len());
        assert_eq!(codes.len(), Key::ALL.len());
    }

    #[test]
    fn lookup_by_name_and_code() {
        assert_eq!(Key::from_name("w"), Some(Key::W));
        assert_eq!(Key::from_name("LShift"), Some(Key::LShift));
        assert_eq!(Key::from_name("Tab"), None);
        assert_eq!(Key::from_code(87), Some(Key::W));
        assert_eq!(Key::from_code(343), None);
    }

    #[test]
    fn winit_codes_map_to_keys() {
        assert_eq!(Key::from_key_code(KeyCode::KeyW), Some(Key::W));
        assert_eq!(Key::from_key_code(KeyCode::Digit7), Some(Key::Num7));
        assert_eq!(Key::from_key_code(KeyCode::ControlRight), Some(Key::RCtrl));
        assert_eq!(Key::from_key_code(KeyCode::Escape), None);
    }

    #[test]
    fn deserializes_from_name_or_code() {
        let keys: Vec<Key> = serde_json::from_str(r#"["A", 66, "f3", "space"]"#).unwrap();
        assert_eq!(keys, vec![Key::A, Key::B, Key::F3, Key::Space]);
        assert!(serde_json::from_str::<Key>(r#""Tab""#).is_err());
        assert_eq!(serde_json::to_string(&Key::LAlt).unwrap(), r#""LALT""#);
    }
}
