//! XML codec for the element tree, built on `quick-xml`.
//!
//! Only elements and text are modelled; attributes, comments and processing
//! instructions in responses are ignored.

use crate::domain::element::{Element, ElementTree};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XmlError {
    #[error("failed to write xml: {0}")]
    Write(String),
    #[error("failed to read xml: {0}")]
    Read(String),
    #[error("unbalanced document: {0}")]
    Structure(String),
}

/// Serializes `element` preserving child order and text exactly.
pub fn to_xml(element: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let tag = element.tag();
    if element.children().is_empty() && element.text_value().is_none() {
        return writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(|e| XmlError::Write(e.to_string()));
    }

    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(|e| XmlError::Write(e.to_string()))?;
    if let Some(text) = element.text_value() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| XmlError::Write(e.to_string()))?;
    }
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(|e| XmlError::Write(e.to_string()))
}

/// Parses a response document into an [`ElementTree`].
pub fn parse(xml: &str) -> Result<ElementTree, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(Element::new(tag_name(&e)?));
            }
            Ok(Event::Empty(e)) => {
                let node = Element::new(tag_name(&e)?);
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| XmlError::Read(e.to_string()))?;
                push_text(&mut stack, &text);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                push_text(&mut stack, &text);
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| XmlError::Structure("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XmlError::Read(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Structure("unclosed element".into()));
    }
    root.map(ElementTree::new)
        .ok_or_else(|| XmlError::Structure("empty document".into()))
}

fn tag_name(start: &BytesStart<'_>) -> Result<String, XmlError> {
    String::from_utf8(start.name().as_ref().to_vec()).map_err(|e| XmlError::Read(e.to_string()))
}

fn push_text(stack: &mut [Element], text: &str) {
    if let Some(current) = stack.last_mut() {
        let merged = match current.text_value() {
            Some(existing) => format!("{existing}{text}"),
            None => text.to_string(),
        };
        current.text(merged);
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    node: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.append(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(XmlError::Structure("multiple root elements".into())),
    }
}
