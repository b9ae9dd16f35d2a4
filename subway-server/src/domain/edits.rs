//! Planned changes to a line's section set.

use super::Section;

/// How a new section attaches to a line.
///
/// Rejected insertions never become an `Insertion`; they are the error side
/// of [`SectionChain::plan_insertion`](super::SectionChain::plan_insertion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The section extends the line past its first or last station.
    /// No existing section changes.
    EndExtension(Section),

    /// The section sits inside `covering`, which is replaced by `parts`
    /// (in path order).
    InteriorSplit {
        covering: Section,
        parts: [Section; 2],
    },
}

/// How a station leaves a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The station is an end of the line; its only section goes.
    DropSection(Section),

    /// The station is interior; `up` and `down` are replaced by `merged`.
    Merge {
        up: Section,
        down: Section,
        merged: Section,
    },
}

/// Sections to delete and insert, applied by storage as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionEdits {
    pub deletes: Vec<Section>,
    pub inserts: Vec<Section>,
}

impl SectionEdits {
    /// Apply to an in-memory section list.
    ///
    /// Returns `None`, leaving `sections` untouched, if any delete has no
    /// exact match.
    pub fn apply_to(&self, sections: &[Section]) -> Option<Vec<Section>> {
        let mut next = sections.to_vec();
        for delete in &self.deletes {
            let idx = next.iter().position(|s| s == delete)?;
            next.swap_remove(idx);
        }
        next.extend(self.inserts.iter().cloned());
        Some(next)
    }
}

impl From<Insertion> for SectionEdits {
    fn from(insertion: Insertion) -> Self {
        match insertion {
            Insertion::EndExtension(section) => SectionEdits {
                deletes: Vec::new(),
                inserts: vec![section],
            },
            Insertion::InteriorSplit { covering, parts } => SectionEdits {
                deletes: vec![covering],
                inserts: parts.into(),
            },
        }
    }
}

impl From<Removal> for SectionEdits {
    fn from(removal: Removal) -> Self {
        match removal {
            Removal::DropSection(section) => SectionEdits {
                deletes: vec![section],
                inserts: Vec::new(),
            },
            Removal::Merge { up, down, merged } => SectionEdits {
                deletes: vec![up, down],
                inserts: vec![merged],
            },
        }
    }
}
