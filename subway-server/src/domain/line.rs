//! Line metadata.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{LineId, TopologyError};

/// A subway line's identity, name and display color.
///
/// The stations of a line are not held here; they are derived from the
/// line's sections by [`SectionChain`](super::SectionChain).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawLine")]
pub struct Line {
    id: LineId,
    name: String,
    color: String,
}

#[derive(Deserialize)]
struct RawLine {
    id: LineId,
    name: String,
    color: String,
}

impl TryFrom<RawLine> for Line {
    type Error = TopologyError;

    fn try_from(raw: RawLine) -> Result<Self, Self::Error> {
        Line::new(raw.id, raw.name, raw.color)
    }
}

impl Line {
    /// Create a line, rejecting a blank name or color.
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Self, TopologyError> {
        let name = name.into();
        let color = color.into();
        Self::validate(&name, &color)?;
        Ok(Line { id, name, color })
    }

    /// Check a name/color pair without building a line.
    pub fn validate(name: &str, color: &str) -> Result<(), TopologyError> {
        if name.trim().is_empty() {
            return Err(TopologyError::InvalidLine("name must not be blank"));
        }
        if color.trim().is_empty() {
            return Err(TopologyError::InvalidLine("color must not be blank"));
        }
        Ok(())
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Line {}

impl Hash for Line {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_line() {
        let line = Line::new(LineId(1), "Shinbundang", "bg-red-600").unwrap();
        assert_eq!(line.id(), LineId(1));
        assert_eq!(line.name(), "Shinbundang");
        assert_eq!(line.color(), "bg-red-600");
    }

    #[test]
    fn deserializing_checks_name_and_color() {
        let line: Line =
            serde_json::from_str(r#"{"id":2,"name":"Line 2","color":"green"}"#).unwrap();
        assert_eq!(line.name(), "Line 2");

        assert!(serde_json::from_str::<Line>(r#"{"id":2,"name":"","color":"green"}"#).is_err());
        assert!(serde_json::from_str::<Line>(r#"{"id":2,"name":"Line 2","color":" "}"#).is_err());
    }

    #[test]
    fn blank_name_or_color_rejected() {
        assert_eq!(
            Line::new(LineId(1), " ", "red").unwrap_err(),
            TopologyError::InvalidLine("name must not be blank")
        );
        assert_eq!(
            Line::new(LineId(1), "Line 2", "").unwrap_err(),
            TopologyError::InvalidLine("color must not be blank")
        );
    }

    #[test]
    fn equality_by_id() {
        let a = Line::new(LineId(1), "A", "red").unwrap();
        let b = Line::new(LineId(1), "B", "green").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Line::new(LineId(2), "A", "red").unwrap());
    }
}
