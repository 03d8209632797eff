use crate::preferences::{PreferenceStore, KEEP_SCREEN_ON};
use serde::{Deserialize, Serialize};

/// Window flags the Java side applies (`FLAG_KEEP_SCREEN_ON`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowFlags {
    pub keep_screen_on: bool,
}

impl WindowFlags {
    pub fn from_store(store: &dyn PreferenceStore) -> Self {
        WindowFlags {
            keep_screen_on: store.get_bool(KEEP_SCREEN_ON, false),
        }
    }
}

/// Settings screen: one checkbox backed by the preference store
pub struct SettingsScreen<'a> {
    store: &'a mut dyn PreferenceStore,
    keep_screen_on: bool,
}

impl<'a> SettingsScreen<'a> {
    /// Read the stored value for the checkbox
    pub fn open(store: &'a mut dyn PreferenceStore) -> Self {
        let keep_screen_on = store.get_bool(KEEP_SCREEN_ON, false);
        SettingsScreen {
            store,
            keep_screen_on,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.keep_screen_on
    }

    pub fn window_flags(&self) -> WindowFlags {
        WindowFlags {
            keep_screen_on: self.keep_screen_on,
        }
    }

    /// Persist the new checkbox state immediately. A failed write is logged;
    /// the value still applies for this process.
    pub fn toggle(&mut self, checked: bool) -> WindowFlags {
        self.keep_screen_on = checked;
        match self.store.put_bool(KEEP_SCREEN_ON, checked) {
            Ok(()) => log::info!("KeepScreenOn set to {}", checked),
            Err(e) => log::warn!("Failed to persist KeepScreenOn={}: {}", checked, e),
        }
        self.window_flags()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{JsonPreferences, MemoryPreferences};

    #[test]
    fn test_toggle_reflected_on_reopen() {
        let mut store = MemoryPreferences::new();
        {
            let mut screen = SettingsScreen::open(&mut store);
            assert!(!screen.is_checked());
            let flags = screen.toggle(true);
            assert!(flags.keep_screen_on);
        }
        let screen = SettingsScreen::open(&mut store);
        assert!(screen.is_checked());
    }

    #[test]
    fn test_toggle_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = JsonPreferences::open(dir.path(), "AppSettings");
            let mut screen = SettingsScreen::open(&mut store);
            screen.toggle(true);
            screen.toggle(false);
            screen.toggle(true);
        }
        let mut store = JsonPreferences::open(dir.path(), "AppSettings");
        assert!(SettingsScreen::open(&mut store).is_checked());
        assert!(WindowFlags::from_store(&store).keep_screen_on);
    }

    #[test]
    fn test_toggle_survives_failed_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonPreferences::open(&dir.path().join("gone"), "AppSettings");
        let mut screen = SettingsScreen::open(&mut store);

        let flags = screen.toggle(true);
        assert!(flags.keep_screen_on);
        assert!(screen.is_checked());
        assert!(WindowFlags::from_store(&store).keep_screen_on);
        assert!(!dir.path().join("gone").exists());
    }
}
