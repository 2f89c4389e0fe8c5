//! Source Map v3 documents with base64 VLQ line mappings.

use serde::{Deserialize, Serialize};

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Appends the base64 VLQ encoding of `value` to `out`.
pub fn encode_vlq(value: i64, out: &mut String) {
    let mut vlq = if value < 0 {
        ((-value) << 1) | 1
    } else {
        value << 1
    };
    loop {
        let mut digit = (vlq & 0b1_1111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b10_0000;
        }
        out.push(BASE64[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// A Source Map revision 3 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    pub file: String,
    pub source_root: String,
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_content: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Maps a generated file whose lines are `source` shifted down by
    /// `leading_lines`, line for line, column zero to column zero.
    ///
    /// The leading generated lines carry no mapping.
    pub fn line_for_line(source_name: &str, source: &str, leading_lines: usize) -> Self {
        let mut mappings = ";".repeat(leading_lines);
        for line in 0..source.lines().count() {
            if line > 0 {
                mappings.push(';');
            }
            // generated column, source index, source line delta, source column
            encode_vlq(0, &mut mappings);
            encode_vlq(0, &mut mappings);
            encode_vlq(if line == 0 { 0 } else { 1 }, &mut mappings);
            encode_vlq(0, &mut mappings);
        }
        Self {
            version: 3,
            file: format!("{}.js", source_name),
            source_root: String::new(),
            sources: vec![source_name.to_string()],
            sources_content: vec![source.to_string()],
            names: Vec::new(),
            mappings,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(value, &mut out);
        out
    }

    #[test]
    fn test_vlq_known_values() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(15), "e");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(123), "2H");
    }

    #[test]
    fn test_line_for_line_with_header() {
        let map = SourceMap::line_for_line("twitter_cldr_en", "a;\nb;\nc;\n", 1);
        assert_eq!(map.mappings, ";AAAA;AACA;AACA");
        assert_eq!(map.file, "twitter_cldr_en.js");
        assert_eq!(map.sources, vec!["twitter_cldr_en"]);
    }

    #[test]
    fn test_line_for_line_bare() {
        let map = SourceMap::line_for_line("x", "a;\nb;", 0);
        assert_eq!(map.mappings, "AAAA;AACA");
    }

    #[test]
    fn test_json_field_names() {
        let json = SourceMap::line_for_line("x", "a;", 0).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 3);
        assert_eq!(value["sourceRoot"], "");
        assert_eq!(value["sourcesContent"][0], "a;");
        assert_eq!(SourceMap::from_json(&json).unwrap().mappings, "AAAA");
    }
}
