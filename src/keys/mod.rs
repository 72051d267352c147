//! Keyboard model: modifier masks, key codes, and the command router.
//!
//! Key codes are GDK-compatible keyvals so an engine adapter can forward
//! toolkit events without translation. Printable Latin-1 characters use
//! their code point; everything else comes from a small named table.

mod router;

pub use router::{BindingError, Command, KeyBindings, KeyRouter};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Bit set of keyboard modifiers held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    /// Caps lock. Ignored by the router.
    pub const LOCK: Self = Self(1 << 1);
    pub const CONTROL: Self = Self(1 << 2);
    /// Usually Alt.
    pub const MOD1: Self = Self(1 << 3);
    /// Usually Num lock. Ignored by the router.
    pub const MOD2: Self = Self(1 << 4);
    pub const SUPER: Self = Self(1 << 26);
    pub const HYPER: Self = Self(1 << 27);
    pub const META: Self = Self(1 << 28);

    /// Modifiers that take part in accelerator matching.
    pub const ACCELERATOR_MASK: Self = Self(
        Self::SHIFT.0 | Self::CONTROL.0 | Self::MOD1.0 | Self::SUPER.0 | Self::HYPER.0 | Self::META.0,
    );

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Errors from parsing key and chord names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty key name")]
    Empty,
    #[error("unknown key name: {0}")]
    UnknownKey(String),
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
}

/// A key code (GDK keyval).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(u32);

const UNICODE_KEYVAL_OFFSET: u32 = 0x0100_0000;

const NAMED_KEYS: &[(&str, u32)] = &[
    ("space", 0x0020),
    ("plus", 0x002b),
    ("comma", 0x002c),
    ("minus", 0x002d),
    ("period", 0x002e),
    ("slash", 0x002f),
    ("equal", 0x003d),
    ("bracketleft", 0x005b),
    ("backslash", 0x005c),
    ("bracketright", 0x005d),
    ("BackSpace", 0xff08),
    ("Tab", 0xff09),
    ("Return", 0xff0d),
    ("Escape", 0xff1b),
    ("Home", 0xff50),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Page_Up", 0xff55),
    ("Page_Down", 0xff56),
    ("End", 0xff57),
    ("F1", 0xffbe),
    ("F2", 0xffbf),
    ("F3", 0xffc0),
    ("F4", 0xffc1),
    ("F5", 0xffc2),
    ("F6", 0xffc3),
    ("F7", 0xffc4),
    ("F8", 0xffc5),
    ("F9", 0xffc6),
    ("F10", 0xffc7),
    ("F11", 0xffc8),
    ("F12", 0xffc9),
    ("Delete", 0xffff),
];

impl Key {
    #[must_use]
    pub const fn from_keyval(keyval: u32) -> Self {
        Self(keyval)
    }

    #[must_use]
    pub const fn keyval(self) -> u32 {
        self.0
    }

    /// Key code for a printable character.
    #[must_use]
    pub fn from_char(ch: char) -> Self {
        let cp = u32::from(ch);
        if (0x20..=0x7e).contains(&cp) || (0xa0..=0xff).contains(&cp) {
            Self(cp)
        } else {
            Self(UNICODE_KEYVAL_OFFSET | cp)
        }
    }

    /// Parses a key name: a named key (`Escape`, `F5`, `minus`) or a single character.
    pub fn from_name(name: &str) -> Result<Self, KeyParseError> {
        if name.is_empty() {
            return Err(KeyParseError::Empty);
        }
        if let Some((_, keyval)) = NAMED_KEYS
            .iter()
            .find(|(named, _)| named.eq_ignore_ascii_case(name))
        {
            return Ok(Self(*keyval));
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Ok(Self::from_char(ch)),
            _ => Err(KeyParseError::UnknownKey(name.to_string())),
        }
    }

    /// Canonical name, the inverse of [`Key::from_name`].
    #[must_use]
    pub fn name(self) -> String {
        if let Some((named, _)) = NAMED_KEYS.iter().find(|(_, keyval)| *keyval == self.0) {
            return (*named).to_string();
        }
        let cp = if self.0 & UNICODE_KEYVAL_OFFSET != 0 {
            self.0 & !UNICODE_KEYVAL_OFFSET
        } else {
            self.0
        };
        char::from_u32(cp).map_or_else(|| format!("0x{:x}", self.0), |ch| ch.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Parses a chord such as `ctrl+l` or `ctrl+shift+F5` into modifiers and key.
///
/// The last `+`-separated segment is the key, so `ctrl++` is control plus `+`.
pub fn parse_chord(chord: &str) -> Result<(Modifiers, Key), KeyParseError> {
    let chord = chord.trim();
    if chord.is_empty() {
        return Err(KeyParseError::Empty);
    }
    let (prefix, key_name) = match chord.rsplit_once('+') {
        Some((prefix, "")) => (prefix.strip_suffix('+').unwrap_or(prefix), "+"),
        Some((prefix, key)) => (prefix, key),
        None => ("", chord),
    };

    let mut modifiers = Modifiers::NONE;
    for part in prefix.split('+').filter(|part| !part.is_empty()) {
        let modifier = match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Modifiers::CONTROL,
            "shift" => Modifiers::SHIFT,
            "alt" | "mod1" => Modifiers::MOD1,
            "super" => Modifiers::SUPER,
            "hyper" => Modifiers::HYPER,
            "meta" => Modifiers::META,
            "lock" | "capslock" => Modifiers::LOCK,
            "numlock" | "mod2" => Modifiers::MOD2,
            _ => return Err(KeyParseError::UnknownModifier(part.to_string())),
        };
        modifiers = modifiers | modifier;
    }
    Ok((modifiers, Key::from_name(key_name)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name_ascii_uses_code_point() {
        assert_eq!(Key::from_name("l").unwrap().keyval(), 0x6c);
        assert_eq!(Key::from_name("0").unwrap().keyval(), 0x30);
        assert_eq!(Key::from_name("=").unwrap().keyval(), 0x3d);
    }

    #[test]
    fn test_key_from_name_named_keys_case_insensitive() {
        assert_eq!(Key::from_name("Escape").unwrap().keyval(), 0xff1b);
        assert_eq!(Key::from_name("escape").unwrap().keyval(), 0xff1b);
        assert_eq!(Key::from_name("F5").unwrap().keyval(), 0xffc2);
        assert_eq!(Key::from_name("minus").unwrap(), Key::from_char('-'));
    }

    #[test]
    fn test_key_from_name_rejects_unknown_and_empty() {
        assert_eq!(Key::from_name(""), Err(KeyParseError::Empty));
        assert_eq!(
            Key::from_name("NotAKey"),
            Err(KeyParseError::UnknownKey("NotAKey".to_string()))
        );
    }

    #[test]
    fn test_key_non_latin1_char_gets_unicode_offset() {
        let key = Key::from_char('ж');
        assert_eq!(key.keyval(), 0x0100_0000 | u32::from('ж'));
        assert_eq!(key.name(), "ж");
    }

    #[test]
    fn test_key_name_prefers_named_table() {
        assert_eq!(Key::from_char('-').name(), "minus");
        assert_eq!(Key::from_char('q').name(), "q");
        assert_eq!(Key::from_keyval(0xff1b).to_string(), "Escape");
    }

    #[test]
    fn test_parse_chord_ctrl_letter() {
        let (mods, key) = parse_chord("ctrl+l").unwrap();
        assert_eq!(mods, Modifiers::CONTROL);
        assert_eq!(key, Key::from_char('l'));
    }

    #[test]
    fn test_parse_chord_plus_key() {
        let (mods, key) = parse_chord("ctrl++").unwrap();
        assert_eq!(mods, Modifiers::CONTROL);
        assert_eq!(key, Key::from_char('+'));
    }

    #[test]
    fn test_parse_chord_multiple_modifiers_and_bare_key() {
        let (mods, key) = parse_chord("Ctrl+Shift+F5").unwrap();
        assert_eq!(mods, Modifiers::CONTROL | Modifiers::SHIFT);
        assert_eq!(key, Key::from_name("F5").unwrap());

        let (mods, key) = parse_chord("q").unwrap();
        assert_eq!(mods, Modifiers::NONE);
        assert_eq!(key, Key::from_char('q'));
    }

    #[test]
    fn test_parse_chord_unknown_modifier() {
        assert_eq!(
            parse_chord("hyperdrive+l"),
            Err(KeyParseError::UnknownModifier("hyperdrive".to_string()))
        );
    }

    #[test]
    fn test_modifiers_contains_and_mask() {
        let held = Modifiers::CONTROL | Modifiers::LOCK;
        assert!(held.contains(Modifiers::CONTROL));
        assert_eq!(held.intersection(Modifiers::ACCELERATOR_MASK), Modifiers::CONTROL);
    }
}
