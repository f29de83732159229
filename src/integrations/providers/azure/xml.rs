use crate::constants::{AZURE_XML_NAMESPACE, XML_SCHEMA_INSTANCE};
use crate::error::CloudError;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

/// Text children of a single repeated element, e.g. one `OSImage`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct XmlEntry {
    fields: Vec<(String, String)>,
}

impl XmlEntry {
    /// First value of the child element `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[cfg(test)]
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn local_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

/// Collects every `element` in the document, wherever it is nested, together
/// with the trimmed text of its direct children. Children without text are
/// left out.
pub fn collect_entries(xml: &str, element: &str) -> Result<Vec<XmlEntry>, CloudError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = vec![];
    let mut current: Option<XmlEntry> = None;
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;
    let mut seen_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                seen_element = true;
                let name = local_name(&start);
                if current.is_some() {
                    depth += 1;
                    if depth == 1 {
                        field = Some((name, String::new()));
                    }
                } else if name == element {
                    current = Some(XmlEntry::default());
                    depth = 0;
                }
            }
            Ok(Event::Empty(start)) => {
                seen_element = true;
                if current.is_none() && local_name(&start) == element {
                    entries.push(XmlEntry::default());
                }
            }
            Ok(Event::End(_)) => match current.take() {
                Some(entry) if depth == 0 => entries.push(entry),
                Some(mut entry) => {
                    if depth == 1 {
                        if let Some((name, text)) = field.take() {
                            let text = text.trim();
                            if !text.is_empty() {
                                entry.fields.push((name, text.to_string()));
                            }
                        }
                    }
                    depth -= 1;
                    current = Some(entry);
                }
                None => {}
            },
            Ok(Event::Text(text)) => {
                if depth == 1 {
                    if let Some((_, buffer)) = field.as_mut() {
                        match text.unescape() {
                            Ok(value) => buffer.push_str(&value),
                            Err(e) => {
                                return Err(CloudError::Internal(format!(
                                    "Malformed XML text at position {}: {}",
                                    reader.buffer_position(),
                                    e
                                )));
                            }
                        }
                    }
                }
            }
            Ok(Event::CData(data)) => {
                if depth == 1 {
                    if let Some((_, buffer)) = field.as_mut() {
                        buffer.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(CloudError::Internal(format!(
                    "Malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if !seen_element {
        return Err(CloudError::Internal("Response is not an XML document".to_string()));
    }

    Ok(entries)
}

/// Code and message of an Azure `<Error>` body, if the body is one.
pub fn parse_error_body(xml: &str) -> Option<(String, String)> {
    let entries = collect_entries(xml, "Error").ok()?;
    let entry = entries.into_iter().next()?;
    let code = entry.get("Code").unwrap_or_default().to_string();
    let message = entry.get("Message").unwrap_or_default().to_string();
    Some((code, message))
}

pub fn capture_role_operation(label: &str, name: &str) -> String {
    let mut xml = String::new();

    xml.push_str(&format!(
        "<CaptureRoleOperation xmlns=\"{}\" xmlns:i=\"{}\">",
        AZURE_XML_NAMESPACE, XML_SCHEMA_INSTANCE
    ));
    xml.push_str("<OperationType>CaptureRoleOperation</OperationType>\n");
    xml.push_str("<PostCaptureAction>Delete</PostCaptureAction>\n");
    xml.push_str(&format!("<TargetImageLabel>{}</TargetImageLabel>\n", escape(label)));
    xml.push_str(&format!("<TargetImageName>{}</TargetImageName>\n", escape(name)));
    xml.push_str("</CaptureRoleOperation>\n");
    xml
}

pub fn delete_os_image(label: &str) -> String {
    format!(
        "<OSImage xmlns=\"{}\" xmlns:i=\"{}\"><Label>{}</Label></OSImage>",
        AZURE_XML_NAMESPACE,
        XML_SCHEMA_INSTANCE,
        escape(label)
    )
}
