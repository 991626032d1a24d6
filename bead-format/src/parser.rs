//! Pattern markup parser
//!
//! ```xml
//! <pattern>
//!   <patternName>Stripes</patternName>
//!   <rows>9</rows>
//!   <columns>9</columns>
//!   <bead><color>Purple</color><count>1</count></bead>
//!   <bead><color>Aqua</color><count>9</count></bead>
//! </pattern>
//! ```
//!
//! Events from the pull parser are fed one at a time into [`PatternBuilder`].
//! Numeric fields that do not parse become 0 instead of failing the load.

use xml::reader::{EventReader, XmlEvent};

use crate::error::PatternError;
use crate::model::Pattern;

/// Parse pattern markup into a [`Pattern`].
///
/// Parsing stops at the end of the top-level `pattern` element; anything
/// after it is not read.
///
/// # Errors
/// * [`PatternError::Markup`] - the markup is not well formed
/// * [`PatternError::MissingPattern`] - no top-level `pattern` element closed
pub fn parse_pattern(data: &[u8]) -> Result<Pattern, PatternError> {
    let reader = EventReader::new(data);
    let mut builder = PatternBuilder::default();

    for event in reader {
        let event = event.map_err(|e| PatternError::Markup(e.to_string()))?;
        match event {
            XmlEvent::StartElement { name, .. } => builder.start_element(&name.local_name),
            XmlEvent::Characters(text) | XmlEvent::CData(text) => builder.characters(&text),
            XmlEvent::EndElement { name } => {
                if let Some(pattern) = builder.end_element(&name.local_name) {
                    tracing::debug!(
                        "Parsed pattern '{}' ({} beads)",
                        pattern.name(),
                        pattern.len()
                    );
                    return Ok(pattern);
                }
            }
            _ => {}
        }
    }

    Err(PatternError::MissingPattern)
}

/// Accumulates element events until a whole pattern has been seen.
#[derive(Debug, Default)]
pub struct PatternBuilder {
    /// Open elements, innermost last
    open: Vec<String>,
    name: String,
    rows: u32,
    columns: u32,
    beads: Vec<(String, u32)>,
    bead_color: String,
    bead_count: u32,
}

impl PatternBuilder {
    pub fn start_element(&mut self, name: &str) {
        if name == "bead" {
            self.bead_color.clear();
            self.bead_count = 0;
        }
        self.open.push(name.to_string());
    }

    pub fn characters(&mut self, text: &str) {
        let value = text.trim();
        if value.is_empty() {
            return;
        }

        match self.open.last().map(String::as_str) {
            Some("patternName") => self.name.push_str(value),
            Some("rows") => self.rows = parse_lenient(value),
            Some("columns") => self.columns = parse_lenient(value),
            Some("color") => self.bead_color.push_str(&value.to_lowercase()),
            Some("count") => self.bead_count = parse_lenient(value),
            _ => {}
        }
    }

    /// Close an element, returning the finished pattern when the top-level
    /// `pattern` element closes.
    pub fn end_element(&mut self, name: &str) -> Option<Pattern> {
        self.open.pop();

        if name == "bead" {
            let color = std::mem::take(&mut self.bead_color);
            self.beads.push((color, self.bead_count));
            self.bead_count = 0;
        }

        if name == "pattern" && self.open.is_empty() {
            let beads = std::mem::take(&mut self.beads);
            return Some(Pattern::new(
                std::mem::take(&mut self.name),
                self.columns,
                self.rows,
                beads,
            ));
        }

        None
    }
}

fn parse_lenient(value: &str) -> u32 {
    value.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRIPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<pattern>
    <patternName>Stripes</patternName>
    <rows>9</rows>
    <columns>9</columns>
    <bead>
        <color>PURPLE</color>
        <count>1</count>
    </bead>
    <bead>
        <color>Aqua</color>
        <count>9</count>
    </bead>
    <bead>
        <color>light blue</color>
        <count>25</count>
    </bead>
</pattern>
"#;

    #[test]
    fn test_parse_pattern() {
        let pattern = parse_pattern(STRIPES.as_bytes()).unwrap();
        assert_eq!(pattern.name(), "Stripes");
        assert_eq!(pattern.rows(), 9);
        assert_eq!(pattern.columns(), 9);
        assert_eq!(pattern.len(), 3);

        let beads = pattern.beads();
        assert_eq!((beads[0].id, beads[0].color.as_str(), beads[0].count), (0, "purple", 1));
        assert_eq!((beads[1].id, beads[1].color.as_str(), beads[1].count), (1, "aqua", 9));
        assert_eq!(
            (beads[2].id, beads[2].color.as_str(), beads[2].count),
            (2, "light blue", 25)
        );
        assert!(beads.iter().all(|b| !b.read));
    }

    #[test]
    fn test_ids_follow_document_order() {
        let mut xml = String::from("<pattern><patternName>Many</patternName>");
        for i in 0..50 {
            xml.push_str(&format!("<bead><color>c{}</color><count>{}</count></bead>", i, i));
        }
        xml.push_str("</pattern>");

        let pattern = parse_pattern(xml.as_bytes()).unwrap();
        assert_eq!(pattern.len(), 50);
        for (i, bead) in pattern.beads().iter().enumerate() {
            assert_eq!(bead.id, i);
            assert_eq!(bead.color, format!("c{}", i));
            assert_eq!(bead.count, i as u32);
        }
    }

    #[test]
    fn test_lenient_numbers() {
        let xml = "<pattern>\
            <rows>many</rows><columns>-3</columns>\
            <bead><color>red</color><count>0</count></bead>\
            <bead><color>blue</color></bead>\
            <bead><color>green</color><count>ten</count></bead>\
            <bead><color>white</color><count>  </count></bead>\
            </pattern>";
        let pattern = parse_pattern(xml.as_bytes()).unwrap();
        assert_eq!(pattern.rows(), 0);
        assert_eq!(pattern.columns(), 0);
        assert_eq!(pattern.len(), 4);
        assert!(pattern.beads().iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_missing_color_and_name() {
        let xml = "<pattern><bead><count>3</count></bead></pattern>";
        let pattern = parse_pattern(xml.as_bytes()).unwrap();
        assert_eq!(pattern.name(), "");
        assert_eq!(pattern.beads()[0].color, "");
        assert_eq!(pattern.beads()[0].count, 3);
    }

    #[test]
    fn test_empty_pattern() {
        let pattern = parse_pattern(b"<pattern><patternName>None</patternName></pattern>").unwrap();
        assert!(pattern.is_empty());
        assert_eq!(pattern.name(), "None");
    }

    #[test]
    fn test_entities_and_cdata_in_text() {
        let xml = "<pattern><patternName>Salt &amp; Pepper</patternName>\
            <bead><color><![CDATA[Black]]></color><count>2</count></bead></pattern>";
        let pattern = parse_pattern(xml.as_bytes()).unwrap();
        assert_eq!(pattern.name(), "Salt & Pepper");
        assert_eq!(pattern.beads()[0].color, "black");
    }

    #[test]
    fn test_malformed_markup() {
        let xml = "<pattern><bead><color>red</colour></bead></pattern>";
        assert!(matches!(
            parse_pattern(xml.as_bytes()),
            Err(PatternError::Markup(_))
        ));
        assert!(matches!(parse_pattern(b"not markup"), Err(PatternError::Markup(_))));
    }

    #[test]
    fn test_missing_pattern_element() {
        let xml = "<colors><color><name>red</name></color></colors>";
        assert_eq!(
            parse_pattern(xml.as_bytes()),
            Err(PatternError::MissingPattern)
        );
    }

    #[test]
    fn test_nested_pattern_element_does_not_finish() {
        let xml = "<library><pattern><bead><color>red</color><count>1</count></bead></pattern></library>";
        assert_eq!(
            parse_pattern(xml.as_bytes()),
            Err(PatternError::MissingPattern)
        );
    }

    #[test]
    fn test_trailing_content_not_read() {
        let xml = "<pattern><bead><color>red</color><count>1</count></bead></pattern><oops";
        let pattern = parse_pattern(xml.as_bytes()).unwrap();
        assert_eq!(pattern.len(), 1);
    }

    #[test]
    fn test_builder_resets_bead_state() {
        let mut builder = PatternBuilder::default();
        builder.start_element("pattern");
        builder.start_element("bead");
        builder.start_element("color");
        builder.characters(" Red ");
        builder.end_element("color");
        builder.start_element("count");
        builder.characters("4");
        builder.end_element("count");
        assert!(builder.end_element("bead").is_none());
        builder.start_element("bead");
        builder.start_element("color");
        builder.characters("Blue");
        builder.end_element("color");
        builder.end_element("bead");

        let pattern = builder.end_element("pattern").unwrap();
        assert_eq!(pattern.beads()[0].color, "red");
        assert_eq!(pattern.beads()[0].count, 4);
        assert_eq!(pattern.beads()[1].color, "blue");
        assert_eq!(pattern.beads()[1].count, 0);
    }
}
