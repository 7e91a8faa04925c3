//! Loading and persisting post collections

use crate::batch::kind;
use crate::config::OutputEncoding;
use crate::error::ExtractorError;
use crate::sanitize::{sanitize_bytes, sanitize_json_text, sanitize_map};
use crate::types::EnrichedPost;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Read a JSON array of posts.
///
/// Invalid UTF-8 and unpaired surrogate escapes are replaced with U+FFFD
/// before decoding, so scraped data with broken emoji still loads.
pub fn load_posts(path: impl AsRef<Path>) -> Result<Vec<Value>, ExtractorError> {
    let bytes = fs::read(path.as_ref())?;
    let text = sanitize_bytes(&bytes);
    let text = sanitize_json_text(&text);

    match serde_json::from_str(&text)? {
        Value::Array(posts) => Ok(posts),
        other => Err(ExtractorError::InvalidDataset(format!(
            "expected an array of posts, got {}",
            kind(&other)
        ))),
    }
}

/// Write posts as indented JSON, creating parent directories.
///
/// If rendering with `encoding` fails, the collection is rendered once more
/// with every non-ASCII character escaped. Returns the encoding actually
/// written.
pub fn write_posts(
    path: impl AsRef<Path>,
    posts: &[EnrichedPost],
    encoding: OutputEncoding,
) -> Result<OutputEncoding, ExtractorError> {
    write_rendered(path.as_ref(), posts, encoding, render)
}

fn write_rendered<R>(
    path: &Path,
    posts: &[EnrichedPost],
    encoding: OutputEncoding,
    render: R,
) -> Result<OutputEncoding, ExtractorError>
where
    R: Fn(&[EnrichedPost], OutputEncoding) -> Result<Vec<u8>, serde_json::Error>,
{
    let posts: Vec<EnrichedPost> = posts.iter().cloned().map(sanitize_map).collect();

    let (bytes, used) = match render(&posts, encoding) {
        Ok(bytes) => (bytes, encoding),
        Err(e) if encoding != OutputEncoding::Ascii => {
            warn!("Encoding error during writing: {}. Retrying with ASCII escapes", e);
            (render(&posts, OutputEncoding::Ascii)?, OutputEncoding::Ascii)
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    debug!("Wrote {} posts to {}", posts.len(), path.display());

    Ok(used)
}

/// Serialize posts with two-space indentation
pub fn render(posts: &[EnrichedPost], encoding: OutputEncoding) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    match encoding {
        OutputEncoding::Utf8 => {
            serde_json::to_writer_pretty(&mut buf, posts)?;
        }
        OutputEncoding::Ascii => {
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter::default());
            posts.serialize(&mut ser)?;
        }
    }
    Ok(buf)
}

/// Pretty formatter that escapes every non-ASCII character as `\uXXXX`,
/// using surrogate pairs above the BMP
#[derive(Default)]
struct AsciiFormatter {
    pretty: PrettyFormatter<'static>,
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut units = [0u16; 2];
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
