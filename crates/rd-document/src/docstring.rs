//! Streaming ingestion of restricted-HTML doc-strings.
//!
//! API metadata carries documentation as a small HTML subset
//! (`p, b, i, code, a, ul, ol, li, examples, fullname, note, important`).
//! The feed walks the markup with a tolerant [`quick_xml::Reader`] and maps
//! each tag to the corresponding [`RstWriter`] operation; anything outside
//! the subset degrades gracefully instead of failing the build.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::buffer::SectionBuffer;
use crate::error::DocStringError;
use crate::style::RstStyle;
use crate::writer::RstWriter;

/// Feed one doc-string through the markup writer.
pub(crate) fn parse(
    style: &mut RstStyle,
    buffer: &mut SectionBuffer,
    doc_string: &str,
) -> Result<(), DocStringError> {
    let mut reader = Reader::from_str(doc_string);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;

    let mut writer = RstWriter::new(style, buffer);
    let mut unhandled: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let tag = decode_tag(&reader, start.name().as_ref());
                handle_start(&mut writer, &start, &tag, &mut unhandled);
            }
            Event::Empty(start) => {
                // Self-closing tag: open and immediately close.
                let tag = decode_tag(&reader, start.name().as_ref());
                handle_start(&mut writer, &start, &tag, &mut unhandled);
                handle_end(&mut writer, &tag);
            }
            Event::End(end) => {
                let tag = decode_tag(&reader, end.name().as_ref());
                handle_end(&mut writer, &tag);
            }
            Event::Text(text) => {
                let data = reader
                    .decoder()
                    .decode(&text)
                    .map_or_else(|_| String::from_utf8_lossy(&text).into_owned(), Cow::into_owned);
                handle_data(&mut writer, &data);
            }
            Event::CData(cdata) => {
                let data = String::from_utf8_lossy(&cdata).into_owned();
                handle_data(&mut writer, &data);
            }
            Event::GeneralRef(entity) => {
                let entity = reader
                    .decoder()
                    .decode(&entity)
                    .map_or_else(|_| String::from_utf8_lossy(&entity).into_owned(), Cow::into_owned);
                handle_data(&mut writer, &decode_entity(&entity));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if !unhandled.is_empty() {
        tracing::debug!(tags = ?unhandled, "unhandled doc-string tags");
    }
    Ok(())
}

fn handle_start(
    writer: &mut RstWriter<'_>,
    start: &BytesStart<'_>,
    tag: &str,
    unhandled: &mut Vec<String>,
) {
    match tag {
        "p" => writer.start_p(),
        "b" => writer.start_b(),
        "i" => writer.start_i(),
        "code" => writer.start_code(),
        "a" => {
            let href = attr_value(start, b"href");
            writer.start_a(href.as_deref());
        }
        "ul" => writer.start_ul(),
        "ol" => writer.start_ol(),
        "li" => writer.start_li(),
        "examples" => writer.start_examples(),
        "fullname" => writer.start_fullname(),
        "note" => writer.start_note(),
        "important" => writer.start_important(),
        other => unhandled.push(other.to_owned()),
    }
}

fn handle_end(writer: &mut RstWriter<'_>, tag: &str) {
    match tag {
        "p" => writer.end_p(),
        "b" => writer.end_b(),
        "i" => writer.end_i(),
        "code" => writer.end_code(),
        "a" => writer.end_a(),
        "ul" => writer.end_ul(),
        "ol" => writer.end_ol(),
        "li" => writer.end_li(),
        "examples" => writer.end_examples(),
        "fullname" => writer.end_fullname(),
        "note" => writer.end_note(),
        "important" => writer.end_important(),
        // Unknown close tags contribute a plain separator.
        _ => writer.write(" "),
    }
}

/// Collapse whitespace, translate words when translation mode is on, and
/// preserve boundary spaces as single spaces.
fn handle_data(writer: &mut RstWriter<'_>, data: &str) {
    if data.is_empty() {
        return;
    }
    if data.chars().all(char::is_whitespace) {
        writer.write(" ");
        return;
    }

    let leading = data.chars().next().is_some_and(char::is_whitespace);
    let trailing = data.chars().next_back().is_some_and(char::is_whitespace);

    let words: Vec<String> = if writer.translation_on() {
        let map = writer.translation_map().clone();
        data.split_whitespace()
            .map(|word| map.translate(word))
            .collect()
    } else {
        data.split_whitespace().map(str::to_owned).collect()
    };

    let mut content = words.join(" ");
    if leading {
        content.insert(0, ' ');
    }
    if trailing {
        content.push(' ');
    }
    writer.write(content);
}

fn decode_tag(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader
        .decoder()
        .decode(name)
        .map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            Cow::into_owned,
        )
        .to_ascii_lowercase()
}

fn attr_value(start: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    for attr in start.attributes().flatten() {
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                Cow::into_owned,
            );
            return Some(value);
        }
    }
    None
}

/// Decode an entity reference to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        // Numeric character references
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}
