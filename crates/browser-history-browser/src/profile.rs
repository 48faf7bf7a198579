use std::path::PathBuf;

/// A browser profile whose history database exists on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePath {
    /// Directory name of the profile (`Default`, `Profile 1`, `abcd.default-release`)
    pub directory: String,
    /// Human readable name from the browser's own profile metadata, if any
    pub name: Option<String>,
    pub history_file: PathBuf,
}

impl ProfilePath {
    /// Label attached to every entry read from this profile
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.directory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_display_name() {
        let profile = ProfilePath {
            directory: "Profile 1".to_string(),
            name: Some("Work".to_string()),
            history_file: PathBuf::from("Profile 1/History"),
        };
        assert_eq!(profile.label(), "Work");
    }

    #[test]
    fn test_label_falls_back_to_directory() {
        let mut profile = ProfilePath {
            directory: "Default".to_string(),
            name: None,
            history_file: PathBuf::from("Default/History"),
        };
        assert_eq!(profile.label(), "Default");

        profile.name = Some(String::new());
        assert_eq!(profile.label(), "Default");
    }
}
