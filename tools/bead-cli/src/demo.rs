//! Built-in pattern played when no file is given

use bead_format::Pattern;

const DEMO_BEADS: [(&str, u32); 21] = [
    ("purple", 1),
    ("aqua", 9),
    ("purple", 1),
    ("aqua", 9),
    ("purple", 1),
    ("aqua", 9),
    ("purple", 1),
    ("aqua", 1),
    ("purple", 1),
    ("aqua", 7),
    ("purple", 1),
    ("aqua", 7),
    ("purple", 1),
    ("aqua", 1),
    ("purple", 1),
    ("aqua", 9),
    ("purple", 1),
    ("aqua", 9),
    ("purple", 1),
    ("aqua", 9),
    ("purple", 1),
];

/// A 9x9 purple-on-aqua square.
pub fn pattern() -> Pattern {
    Pattern::new("BeadReader", 9, 9, DEMO_BEADS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_fills_grid() {
        let pattern = pattern();
        assert_eq!(pattern.len(), 21);
        assert_eq!(
            pattern.total_units(),
            u64::from(pattern.rows() * pattern.columns())
        );
    }
}
