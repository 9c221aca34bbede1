use crate::keys::{Key, KeyError};
use super::Platform;

/// A global key combination polled once per tick, e.g. Alt + P.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    keys: Vec<Key>,
}

impl Hotkey {
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, KeyError> {
        Ok(Self::new(Key::lookup_all(names)?))
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// An empty combination never fires.
    pub fn is_held(&self, platform: &dyn Platform) -> bool {
        !self.keys.is_empty() && platform.keys_held(&self.keys)
    }
}

impl std::fmt::Display for Hotkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.keys.iter().map(|k| k.name).collect();
        f.write_str(&names.join(" + "))
    }
}

/// Physical state of a key combination via GetAsyncKeyState.
#[cfg(target_os = "windows")]
pub fn combo_held(keys: &[Key]) -> bool {
    use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;

    keys.iter().all(|k| {
        // high bit set while the key is down
        let state = unsafe { GetAsyncKeyState(k.vk as i32) };
        (state as u16) & 0x8000 != 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::stub::StubPlatform;

    #[test]
    fn test_display_joins_names() {
        let hk = Hotkey::parse(&["alt", "p"]).unwrap();
        assert_eq!(hk.to_string(), "Alt + P");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(Hotkey::parse(&["Alt", "F13"]), Err(KeyError::UnknownKey("F13".into())));
    }

    #[test]
    fn test_empty_combo_never_held() {
        let platform = StubPlatform::default();
        assert!(!Hotkey::new(Vec::new()).is_held(&platform));
    }
}
