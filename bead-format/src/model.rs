//! Pattern data structures

use std::collections::BTreeMap;

/// One color-repeat unit of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bead {
    /// Position in the authored sequence (0-based, dense)
    pub id: usize,
    /// Color name, lowercased
    pub color: String,
    /// How many physical beads of this color are strung consecutively
    pub count: u32,
    /// Playback progress marker
    pub read: bool,
}

/// Decoded bead pattern.
///
/// The bead sequence is fixed once built; only the per-bead `read` flags
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    name: String,
    columns: u32,
    rows: u32,
    beads: Vec<Bead>,
}

impl Pattern {
    /// Build a pattern from `(color, count)` pairs in authored order.
    ///
    /// Bead ids are assigned from the position in `beads`, and colors are
    /// lowercased, so the result always satisfies the dense-id invariant.
    pub fn new<I, S>(name: impl Into<String>, columns: u32, rows: u32, beads: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let beads = beads
            .into_iter()
            .enumerate()
            .map(|(id, (color, count))| Bead {
                id,
                color: color.as_ref().to_lowercase(),
                count,
                read: false,
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
            beads,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid width used for layout
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Informational row count
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    pub fn bead(&self, id: usize) -> Option<&Bead> {
        self.beads.get(id)
    }

    pub fn len(&self) -> usize {
        self.beads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    /// Set the read flag of a single bead. Out-of-range ids are ignored.
    pub fn set_read(&mut self, id: usize, read: bool) {
        if let Some(bead) = self.beads.get_mut(id) {
            bead.read = read;
        }
    }

    /// Mark beads `0..=id` read and everything after unread.
    pub fn mark_read_through(&mut self, id: usize) {
        for bead in &mut self.beads {
            bead.read = bead.id <= id;
        }
    }

    pub fn clear_read(&mut self) {
        for bead in &mut self.beads {
            bead.read = false;
        }
    }

    pub fn read_count(&self) -> usize {
        self.beads.iter().filter(|b| b.read).count()
    }

    /// True when there is at least one bead and every bead has been read.
    pub fn is_complete(&self) -> bool {
        !self.beads.is_empty() && self.beads.iter().all(|b| b.read)
    }

    /// Total number of physical beads across the whole pattern.
    pub fn total_units(&self) -> u64 {
        self.beads.iter().map(|b| u64::from(b.count)).sum()
    }

    /// Physical bead totals per color, ordered by color name.
    pub fn color_summary(&self) -> BTreeMap<String, u64> {
        let mut summary = BTreeMap::new();
        for bead in &self.beads {
            *summary.entry(bead.color.clone()).or_insert(0) += u64::from(bead.count);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pattern {
        Pattern::new(
            "Stripes",
            9,
            3,
            [("PURPLE", 1), ("Aqua", 9), ("purple", 1), ("aqua", 7)],
        )
    }

    #[test]
    fn test_new_assigns_dense_ids_and_lowercases() {
        let pattern = sample();
        assert_eq!(pattern.len(), 4);
        for (i, bead) in pattern.beads().iter().enumerate() {
            assert_eq!(bead.id, i);
            assert!(!bead.read);
        }
        assert_eq!(pattern.beads()[0].color, "purple");
        assert_eq!(pattern.beads()[1].color, "aqua");
    }

    #[test]
    fn test_empty_pattern_is_valid() {
        let pattern = Pattern::new("Empty", 0, 0, Vec::<(&str, u32)>::new());
        assert!(pattern.is_empty());
        assert!(!pattern.is_complete());
        assert_eq!(pattern.total_units(), 0);
    }

    #[test]
    fn test_mark_read_through() {
        let mut pattern = sample();
        pattern.set_read(3, true);
        pattern.mark_read_through(1);
        let flags: Vec<bool> = pattern.beads().iter().map(|b| b.read).collect();
        assert_eq!(flags, vec![true, true, false, false]);
        assert_eq!(pattern.read_count(), 2);
    }

    #[test]
    fn test_complete_and_clear() {
        let mut pattern = sample();
        pattern.mark_read_through(3);
        assert!(pattern.is_complete());
        pattern.clear_read();
        assert_eq!(pattern.read_count(), 0);
    }

    #[test]
    fn test_set_read_out_of_range_is_ignored() {
        let mut pattern = sample();
        pattern.set_read(42, true);
        assert_eq!(pattern.read_count(), 0);
    }

    #[test]
    fn test_color_summary() {
        let pattern = sample();
        let summary = pattern.color_summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary["aqua"], 16);
        assert_eq!(summary["purple"], 2);
        assert_eq!(pattern.total_units(), 18);
    }
}
