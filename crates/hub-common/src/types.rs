use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One row of the hub's recent-project or template list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub path: PathBuf,
}

impl fmt::Display for ProjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_entry_from_host_json() {
        let json = r#"{"name":"Demo","path":"/work/demo"}"#;
        let entry: ProjectEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "Demo");
        assert_eq!(entry.path, PathBuf::from("/work/demo"));
    }

    #[test]
    fn project_entry_list_from_host_json() {
        let json = r#"[{"name":"A","path":"/a"},{"name":"B","path":"/b"}]"#;
        let entries: Vec<ProjectEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "B");
    }

    #[test]
    fn project_entry_display() {
        let entry = ProjectEntry {
            name: "Demo".into(),
            path: PathBuf::from("/work/demo"),
        };
        assert_eq!(entry.to_string(), "Demo (/work/demo)");
    }

    #[test]
    fn project_entry_missing_path_is_rejected() {
        let json = r#"{"name":"Demo"}"#;
        assert!(serde_json::from_str::<ProjectEntry>(json).is_err());
    }
}
