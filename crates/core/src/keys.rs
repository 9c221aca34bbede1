//! Key name table: virtual-key codes and hardware scan codes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

/// A key the agent can watch or send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub name: &'static str,
    pub vk: u8,
    pub scan: u8,
}

// Set-1 scan codes, US layout
const TABLE: &[Key] = &[
    Key { name: "1", vk: 0x31, scan: 2 },
    Key { name: "2", vk: 0x32, scan: 3 },
    Key { name: "3", vk: 0x33, scan: 4 },
    Key { name: "4", vk: 0x34, scan: 5 },
    Key { name: "5", vk: 0x35, scan: 6 },
    Key { name: "6", vk: 0x36, scan: 7 },
    Key { name: "7", vk: 0x37, scan: 8 },
    Key { name: "8", vk: 0x38, scan: 9 },
    Key { name: "9", vk: 0x39, scan: 10 },
    Key { name: "0", vk: 0x30, scan: 11 },
    Key { name: "Q", vk: 0x51, scan: 16 },
    Key { name: "W", vk: 0x57, scan: 17 },
    Key { name: "E", vk: 0x45, scan: 18 },
    Key { name: "R", vk: 0x52, scan: 19 },
    Key { name: "T", vk: 0x54, scan: 20 },
    Key { name: "Y", vk: 0x59, scan: 21 },
    Key { name: "U", vk: 0x55, scan: 22 },
    Key { name: "I", vk: 0x49, scan: 23 },
    Key { name: "O", vk: 0x4F, scan: 24 },
    Key { name: "P", vk: 0x50, scan: 25 },
    Key { name: "A", vk: 0x41, scan: 30 },
    Key { name: "S", vk: 0x53, scan: 31 },
    Key { name: "D", vk: 0x44, scan: 32 },
    Key { name: "F", vk: 0x46, scan: 33 },
    Key { name: "G", vk: 0x47, scan: 34 },
    Key { name: "H", vk: 0x48, scan: 35 },
    Key { name: "J", vk: 0x4A, scan: 36 },
    Key { name: "K", vk: 0x4B, scan: 37 },
    Key { name: "L", vk: 0x4C, scan: 38 },
    Key { name: "Z", vk: 0x5A, scan: 44 },
    Key { name: "X", vk: 0x58, scan: 45 },
    Key { name: "C", vk: 0x43, scan: 46 },
    Key { name: "V", vk: 0x56, scan: 47 },
    Key { name: "B", vk: 0x42, scan: 48 },
    Key { name: "N", vk: 0x4E, scan: 49 },
    Key { name: "M", vk: 0x4D, scan: 50 },
    Key { name: "Ctrl", vk: 0x11, scan: 0x1D },
    Key { name: "Alt", vk: 0x12, scan: 0x38 },
    Key { name: "Shift", vk: 0x10, scan: 0x2A },
];

impl Key {
    /// Look up a key by name. Letters match either case; modifiers are
    /// case-insensitive.
    pub fn lookup(name: &str) -> Result<Key, KeyError> {
        TABLE
            .iter()
            .find(|k| k.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| KeyError::UnknownKey(name.to_string()))
    }

    /// Resolve a list of names, failing on the first unknown one.
    pub fn lookup_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Key>, KeyError> {
        names.iter().map(|n| Key::lookup(n.as_ref())).collect()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_letter_either_case() {
        assert_eq!(Key::lookup("F").unwrap(), Key { name: "F", vk: 0x46, scan: 33 });
        assert_eq!(Key::lookup("f").unwrap(), Key::lookup("F").unwrap());
    }

    #[test]
    fn test_lookup_modifiers() {
        assert_eq!(Key::lookup("Alt").unwrap().scan, 0x38);
        assert_eq!(Key::lookup("ctrl").unwrap().vk, 0x11);
    }

    #[test]
    fn test_digit_scan_codes() {
        assert_eq!(Key::lookup("1").unwrap().scan, 2);
        assert_eq!(Key::lookup("0").unwrap().scan, 11);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(Key::lookup("∅"), Err(KeyError::UnknownKey("∅".into())));
        assert!(Key::lookup("").is_err());
        assert!(Key::lookup("F1").is_err());
    }

    #[test]
    fn test_lookup_all_stops_on_unknown() {
        assert_eq!(Key::lookup_all(&["Alt", "P"]).unwrap().len(), 2);
        assert!(matches!(Key::lookup_all(&["Alt", "Meta"]), Err(KeyError::UnknownKey(k)) if k == "Meta"));
    }
}
