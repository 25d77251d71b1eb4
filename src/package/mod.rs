//! ZIP/XML package branch.
//!
//! When the sniffer classifies an input as a package, this core does not
//! parse document parts itself: it reads the manifest relationship listing
//! and hands both to an external collaborator implementing
//! [`PackageReader`]. The collaborator owns all part-by-part XML parsing.

use std::io::{Cursor, Read};

use quick_xml::events::Event;

use crate::common::error::{Error, Result};
use crate::document::Document;

/// Path of the manifest listing inside the package.
pub const MANIFEST_PATH: &str = "META-INF/manifest.xml";

/// One `{type, target}` entry from the manifest listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Media type of the part
    pub rel_type: String,
    /// Full path of the part inside the package
    pub target: String,
}

/// Collaborator that reads a ZIP/XML package into a document model.
///
/// Receives the same byte source the dispatcher classified plus the parsed
/// relationship list.
pub trait PackageReader {
    /// Read the package into a document model.
    fn read(&self, bytes: &[u8], relationships: &[Relationship]) -> Result<Document>;
}

/// Read the manifest relationship listing from a ZIP-based package.
///
/// A package without a manifest yields an empty list; a package that cannot
/// be opened as a ZIP archive at all is fatal.
pub fn read_relationships(bytes: &[u8]) -> Result<Vec<Relationship>> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| Error::Zip(e.to_string()))?;

    let mut file = match archive.by_name(MANIFEST_PATH) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(Vec::new()),
        Err(e) => return Err(Error::Zip(e.to_string())),
    };

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| Error::Zip(e.to_string()))?;

    parse_manifest(&xml)
}

/// Parse `manifest:file-entry` elements out of a manifest listing.
fn parse_manifest(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut relationships = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"manifest:file-entry" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map_err(|e| Error::Xml(e.to_string()))?;
                    match attr.key.as_ref() {
                        b"manifest:media-type" => rel_type = value.into_owned(),
                        b"manifest:full-path" => target = value.into_owned(),
                        _ => {}
                    }
                }
                relationships.push(Relationship { rel_type, target });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0">
  <manifest:file-entry manifest:media-type="application/vnd" manifest:full-path="/"/>
  <manifest:file-entry manifest:media-type="text/xml" manifest:full-path="content.xml"/>
  <manifest:file-entry manifest:media-type="text/xml" manifest:full-path="meta.xml"/>
</manifest:manifest>"#;

    #[test]
    fn test_parse_manifest() {
        let rels = parse_manifest(MANIFEST).unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels[1].rel_type, "text/xml");
        assert_eq!(rels[1].target, "content.xml");
    }

    #[test]
    fn test_parse_manifest_empty() {
        let rels = parse_manifest("<manifest:manifest/>").unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn test_parse_manifest_malformed() {
        assert!(parse_manifest("<manifest:file-entry").is_err());
    }

    #[test]
    fn test_read_relationships_not_a_zip() {
        let err = read_relationships(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, Error::Zip(_)));
    }
}
