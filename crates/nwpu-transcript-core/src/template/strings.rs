use crate::error::TranscriptError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;

use super::{NS_MAIN, XML_DECL};

/// The workbook's shared-strings table.
///
/// Template entries keep the indices they had, so the untouched header row
/// of the worksheet keeps resolving; new values are appended and
/// deduplicated. `total_count` tracks the `count` attribute (total cell
/// references), `entries.len()` is `uniqueCount`.
pub struct SharedStrings {
    entries: Vec<String>,
    index: HashMap<String, usize>,
    total_count: usize,
}

impl SharedStrings {
    /// Parse the template's `xl/sharedStrings.xml` part.
    pub fn from_xml(xml: &[u8]) -> Result<Self, TranscriptError> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();

        let mut entries: Vec<String> = Vec::new();
        let mut declared_count: Option<usize> = None;
        let mut in_si = false;
        let mut in_rph = false;
        let mut in_t = false;
        let mut current = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"sst" => {
                        for attr in e.attributes() {
                            let attr = attr?;
                            if attr.key.as_ref() == b"count" {
                                declared_count = attr.unescape_value()?.parse().ok();
                            }
                        }
                    }
                    b"si" => {
                        in_si = true;
                        in_rph = false;
                        current.clear();
                    }
                    // Phonetic guide runs carry their own <t> that is not
                    // part of the cell text.
                    b"rPh" if in_si => in_rph = true,
                    // Rich-text runs contribute their <t> pieces in order.
                    b"t" if in_si && !in_rph => in_t = true,
                    _ => {}
                },
                Event::Text(e) if in_t => current.push_str(&e.unescape()?),
                Event::End(e) => match e.local_name().as_ref() {
                    b"t" => in_t = false,
                    b"rPh" => in_rph = false,
                    b"si" => {
                        in_si = false;
                        entries.push(std::mem::take(&mut current));
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let total_count = declared_count.unwrap_or(entries.len());
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        Ok(SharedStrings {
            entries,
            index,
            total_count,
        })
    }

    /// Return the index for `value`, appending it if unseen. Each call
    /// counts one cell reference.
    pub fn intern(&mut self, value: &str) -> usize {
        self.total_count += 1;
        if let Some(&idx) = self.index.get(value) {
            return idx;
        }
        let idx = self.entries.len();
        self.entries.push(value.to_string());
        self.index.insert(value.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    /// Serialize back to a complete `sst` part.
    pub fn to_xml(&self) -> Result<Vec<u8>, TranscriptError> {
        let mut out = Vec::from(XML_DECL.as_bytes());
        let mut writer = Writer::new(&mut out);

        let mut root = BytesStart::new("sst");
        root.push_attribute(("xmlns", NS_MAIN));
        root.push_attribute(("count", self.total_count.to_string().as_str()));
        root.push_attribute(("uniqueCount", self.entries.len().to_string().as_str()));
        writer.write_event(Event::Start(root))?;

        for value in &self.entries {
            writer.write_event(Event::Start(BytesStart::new("si")))?;
            let mut t = BytesStart::new("t");
            if value.trim() != value {
                t.push_attribute(("xml:space", "preserve"));
            }
            writer.write_event(Event::Start(t))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new("t")))?;
            writer.write_event(Event::End(BytesEnd::new("si")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("sst")))?;
        Ok(out)
    }
}
