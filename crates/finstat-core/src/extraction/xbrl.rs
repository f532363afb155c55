use std::collections::BTreeSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::FinstatError;
use crate::extraction::{wrong_body, DocumentBody, FieldExtractor, RequiredKeys, SourceDocument};
use crate::mapping::schema::SourceMapping;
use crate::model::RawFactSet;

/// Extracts `key`/`value` attribute pairs from XBRL-style tag soups.
///
/// KVK open-data documents carry facts as
/// `<opendataField xb:key="NetTurnover" xb:value="12345"/>`; the attribute
/// prefix is ignored so both namespaced and bare attributes are accepted.
pub struct XbrlExtractor {
    keys: BTreeSet<String>,
    required: RequiredKeys,
}

impl XbrlExtractor {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        XbrlExtractor {
            keys: keys.into_iter().map(Into::into).collect(),
            required: RequiredKeys::default(),
        }
    }

    pub fn from_mapping(mapping: &SourceMapping) -> Self {
        XbrlExtractor {
            keys: mapping
                .recognized_keys()
                .into_iter()
                .map(str::to_string)
                .collect(),
            required: RequiredKeys::from_mapping(mapping),
        }
    }

    /// Parse XML bytes and collect the recognized facts.
    ///
    /// The document must be well-formed: exactly one root element and no
    /// character data outside it. The declared encoding is honored.
    pub fn extract_bytes(&self, doc_id: &str, bytes: &[u8]) -> Result<RawFactSet, FinstatError> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut facts = RawFactSet::new();
        let mut depth: usize = 0;
        let mut saw_root = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    if depth == 0 {
                        self.enter_root(doc_id, &mut saw_root)?;
                    }
                    depth += 1;
                    self.collect(doc_id, &reader, &e, &mut facts)?;
                }
                Ok(Event::Empty(e)) => {
                    if depth == 0 {
                        self.enter_root(doc_id, &mut saw_root)?;
                    }
                    self.collect(doc_id, &reader, &e, &mut facts)?;
                }
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                }
                Ok(Event::Text(t)) if depth == 0 => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(FinstatError::unreadable(
                            doc_id,
                            format!(
                                "text outside the root element at position {}",
                                reader.buffer_position()
                            ),
                        ));
                    }
                }
                Ok(Event::CData(_)) if depth == 0 => {
                    return Err(FinstatError::unreadable(
                        doc_id,
                        "CDATA outside the root element",
                    ));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(FinstatError::unreadable(
                        doc_id,
                        format!(
                            "XML error at position {}: {e}",
                            reader.error_position()
                        ),
                    ))
                }
            }
            buf.clear();
        }

        if !saw_root {
            return Err(FinstatError::unreadable(doc_id, "no XML element found"));
        }
        if depth != 0 {
            return Err(FinstatError::unreadable(
                doc_id,
                "unexpected end of document (unclosed element)",
            ));
        }

        Ok(facts)
    }

    fn enter_root(&self, doc_id: &str, saw_root: &mut bool) -> Result<(), FinstatError> {
        if *saw_root {
            return Err(FinstatError::unreadable(
                doc_id,
                "more than one root element",
            ));
        }
        *saw_root = true;
        Ok(())
    }

    fn collect(
        &self,
        doc_id: &str,
        reader: &Reader<&[u8]>,
        element: &BytesStart<'_>,
        facts: &mut RawFactSet,
    ) -> Result<(), FinstatError> {
        let decoder = reader.decoder();
        let mut key = None;
        let mut value = None;

        for attr in element.attributes() {
            let attr = attr.map_err(|e| FinstatError::unreadable(doc_id, e))?;
            match attr.key.local_name().as_ref() {
                b"key" => {
                    key = Some(
                        attr.decode_and_unescape_value(decoder)
                            .map_err(|e| FinstatError::unreadable(doc_id, e))?
                            .into_owned(),
                    )
                }
                b"value" => {
                    value = Some(
                        attr.decode_and_unescape_value(decoder)
                            .map_err(|e| FinstatError::unreadable(doc_id, e))?
                            .into_owned(),
                    )
                }
                _ => {}
            }
        }

        if let (Some(key), Some(value)) = (key, value) {
            if self.keys.contains(&key) {
                facts.insert(key, value);
            }
        }

        Ok(())
    }
}

impl FieldExtractor for XbrlExtractor {
    fn extract(&self, document: &SourceDocument) -> Result<RawFactSet, FinstatError> {
        match &document.body {
            DocumentBody::Bytes(bytes) => {
                let facts = self.extract_bytes(&document.id, bytes)?;
                self.required.check(&facts)?;
                Ok(facts)
            }
            _ => Err(wrong_body(document, "XML bytes")),
        }
    }

    fn format_name(&self) -> &str {
        "xbrl"
    }
}
