//! File menu state and item identifiers

/// File menu item identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMenuItem {
    Open,
    Save,
    SaveAs,
    Close,
}

impl FileMenuItem {
    /// Items in menu order (after the optional project header)
    pub const ALL: [FileMenuItem; 4] = [
        FileMenuItem::Open,
        FileMenuItem::Save,
        FileMenuItem::SaveAs,
        FileMenuItem::Close,
    ];

    /// Stable identifier used by the UI for menu events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "file_open",
            Self::Save => "file_save",
            Self::SaveAs => "file_save_as",
            Self::Close => "file_close",
        }
    }

    /// Parse a menu event identifier
    pub fn from_id(s: &str) -> Option<Self> {
        match s {
            "file_open" => Some(Self::Open),
            "file_save" => Some(Self::Save),
            "file_save_as" => Some(Self::SaveAs),
            "file_close" => Some(Self::Close),
            _ => None,
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open...",
            Self::Save => "Save",
            Self::SaveAs => "Save as...",
            Self::Close => "Close",
        }
    }
}

/// Complete File menu state, pushed to the UI as one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMenuState {
    /// Project name shown as a header above the items, if a project is open
    pub header: Option<String>,
    pub open_enabled: bool,
    pub save_enabled: bool,
    pub save_as_enabled: bool,
    pub close_enabled: bool,
}

impl Default for FileMenuState {
    fn default() -> Self {
        Self {
            header: None,
            open_enabled: false,
            save_enabled: false,
            save_as_enabled: true,
            close_enabled: false,
        }
    }
}

impl FileMenuState {
    /// Show the project header and enable Save/Close
    pub fn set_project(&mut self, name: &str) {
        self.header = Some(name.to_string());
        self.save_enabled = true;
        self.close_enabled = true;
    }

    /// Remove the project header and disable Save/Close
    pub fn clear_project(&mut self) {
        self.header = None;
        self.save_enabled = false;
        self.close_enabled = false;
    }

    /// Enable Open only when there is something to open
    pub fn set_projects_available(&mut self, available: bool) {
        self.open_enabled = available;
    }

    /// Whether an item can currently be activated
    pub fn is_enabled(&self, item: FileMenuItem) -> bool {
        match item {
            FileMenuItem::Open => self.open_enabled,
            FileMenuItem::Save => self.save_enabled,
            FileMenuItem::SaveAs => self.save_as_enabled,
            FileMenuItem::Close => self.close_enabled,
        }
    }

    /// Items that can currently be activated, in menu order
    pub fn enabled_items(&self) -> impl Iterator<Item = FileMenuItem> + '_ {
        FileMenuItem::ALL
            .into_iter()
            .filter(|item| self.is_enabled(*item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_roundtrip() {
        for item in FileMenuItem::ALL {
            assert_eq!(FileMenuItem::from_id(item.as_str()), Some(item));
        }
        assert_eq!(FileMenuItem::from_id("file_quit"), None);
    }

    #[test]
    fn test_enabled_item_labels() {
        let mut menu = FileMenuState::default();
        let labels: Vec<&str> = menu.enabled_items().map(|i| i.label()).collect();
        assert_eq!(labels, vec!["Save as..."]);

        menu.set_projects_available(true);
        menu.set_project("test1");
        let labels: Vec<&str> = menu.enabled_items().map(|i| i.label()).collect();
        assert_eq!(labels, vec!["Open...", "Save", "Save as...", "Close"]);
    }

    #[test]
    fn test_project_toggles_save_and_close() {
        let mut menu = FileMenuState::default();
        assert!(!menu.is_enabled(FileMenuItem::Save));
        assert!(menu.is_enabled(FileMenuItem::SaveAs));

        menu.set_project("test1");
        assert_eq!(menu.header.as_deref(), Some("test1"));
        assert!(menu.is_enabled(FileMenuItem::Save));
        assert!(menu.is_enabled(FileMenuItem::Close));

        menu.clear_project();
        assert_eq!(menu.header, None);
        assert!(!menu.is_enabled(FileMenuItem::Close));
    }
}
