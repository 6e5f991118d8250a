//! Resume data model and YAML loader.
//!
//! YAML input uses lowercase keys (`name`, `sections`, `where`, ...). The
//! serialized form, which templates and the JSON dump see, uses capitalized
//! keys (`Name`, `Sections`, `Where`, `URL`). Empty fields are omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ResumeError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase", deserialize = "lowercase"))]
pub struct Resume {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "Contact::is_empty")]
    pub contact: Contact,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase", deserialize = "lowercase"))]
pub struct Contact {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "Link::is_empty")]
    pub webpage: Link,
    #[serde(skip_serializing_if = "Link::is_empty")]
    pub linkedin: Link,
    #[serde(skip_serializing_if = "Link::is_empty")]
    pub github: Link,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.phone.is_empty()
            && self.address.is_empty()
            && self.email.is_empty()
            && self.webpage.is_empty()
            && self.linkedin.is_empty()
            && self.github.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase", deserialize = "lowercase"))]
pub struct Link {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(
        rename(serialize = "URL", deserialize = "url"),
        skip_serializing_if = "String::is_empty"
    )]
    pub url: String,
}

impl Link {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.url.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase", deserialize = "lowercase"))]
pub struct Section {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entry>,
}

/// One item of a section: a job, a degree, a project...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "PascalCase", deserialize = "lowercase"))]
pub struct Entry {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub what: String,
    #[serde(
        rename(serialize = "URL", deserialize = "url"),
        skip_serializing_if = "String::is_empty"
    )]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub r#where: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub when: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Resume {
    pub fn from_yaml_str(source: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

/// Reads and parses a resume YAML file.
pub fn load_resume(path: &Path) -> Result<Resume> {
    let source =
        std::fs::read_to_string(path).map_err(|e| ResumeError::io("Open input YAML", path, e))?;
    Resume::from_yaml_str(&source).map_err(|e| {
        ResumeError::Resume(format!("Read input YAML ({}) failed: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
name: Ada Lovelace
title: Analyst
contact:
  email: ada@example.com
  github:
    name: ada
    url: https://github.com/ada
sections:
  - name: Experience
    entries:
      - what: Notes on the Analytical Engine
        where: Taylor's Scientific Memoirs
        when: "1843"
        details:
          - First published algorithm
"#;

    #[test]
    fn parses_lowercase_yaml_keys() {
        let resume = Resume::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(resume.name, "Ada Lovelace");
        assert_eq!(resume.contact.email, "ada@example.com");
        assert_eq!(resume.contact.github.url, "https://github.com/ada");
        assert_eq!(resume.sections.len(), 1);
        let entry = &resume.sections[0].entries[0];
        assert_eq!(entry.r#where, "Taylor's Scientific Memoirs");
        assert_eq!(entry.when, "1843");
        assert_eq!(entry.details, vec!["First published algorithm"]);
        assert!(resume.summary.is_empty());
    }

    #[test]
    fn serializes_capitalized_keys_and_omits_empty_fields() {
        let resume = Resume::from_yaml_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&resume).unwrap();
        assert_eq!(value["Name"], "Ada Lovelace");
        assert_eq!(value["Contact"]["Github"]["URL"], "https://github.com/ada");
        assert_eq!(value["Sections"][0]["Entries"][0]["Where"], "Taylor's Scientific Memoirs");
        assert!(value.get("Summary").is_none());
        assert!(value["Contact"].get("Phone").is_none());
        assert!(value["Contact"].get("Webpage").is_none());
        assert!(value["Sections"][0]["Entries"][0].get("URL").is_none());
    }

    #[test]
    fn empty_document_yields_empty_resume() {
        let resume = Resume::from_yaml_str("{}").unwrap();
        assert_eq!(resume, Resume::default());
        assert_eq!(serde_json::to_string(&resume).unwrap(), "{}");
    }

    #[test]
    fn load_resume_reports_missing_file_as_io_error() {
        let err = load_resume(Path::new("definitely/missing.yaml")).unwrap_err();
        match err {
            ResumeError::Io(inner) => {
                assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
                assert!(inner.to_string().contains("definitely/missing.yaml"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn load_resume_reports_malformed_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sections: [unterminated").unwrap();
        let err = load_resume(file.path()).unwrap_err();
        assert!(matches!(err, ResumeError::Resume(ref m) if m.contains("Read input YAML")));
    }

    #[test]
    fn load_resume_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let resume = load_resume(file.path()).unwrap();
        assert_eq!(resume.title, "Analyst");
    }
}
