//! Shared quick-xml helpers for the SVG readers.

use std::borrow::Cow;

use quick_xml::{
    Reader,
    escape::unescape,
    events::{BytesStart, Event, attributes::AttrError},
};
use thiserror::Error;

use super::decode_entity_id;

/// Extraction failures.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("XML parse error at position {position}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute")]
    Attr(#[from] AttrError),

    #[error("<{element} id=\"{id}\"> has invalid `{attr}`: `{value}`")]
    Attribute {
        element: &'static str,
        id: String,
        attr: &'static str,
        value: String,
    },

    #[error("<{element} id=\"{id}\"> has an invalid transform")]
    Transform {
        element: &'static str,
        id: String,
        #[source]
        source: svgtypes::Error,
    },
}

/// Next event, with the reader position attached to parse errors.
pub fn next_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, ExtractError> {
    reader.read_event().map_err(|source| ExtractError::Xml {
        position: reader.error_position(),
        source,
    })
}

/// `id` attribute, with byte-entity encoded ids decoded.
pub fn element_id(elem: &BytesStart) -> Result<String, ExtractError> {
    let Some(raw) = raw_attribute(elem, b"id")? else {
        return Ok(String::new());
    };
    Ok(if raw.contains("&#") {
        decode_entity_id(&raw)
    } else {
        unescape_lossy(&raw)
    })
}

/// Unescaped value of the attribute with local name `name`.
pub fn attribute(elem: &BytesStart, name: &[u8]) -> Result<Option<String>, ExtractError> {
    Ok(raw_attribute(elem, name)?.map(|raw| unescape_lossy(&raw)))
}

/// Numeric attribute; a missing attribute takes `default`, or is an error
/// when there is none.
pub fn number_attribute(
    elem: &BytesStart,
    element: &'static str,
    id: &str,
    attr: &'static str,
    default: Option<f64>,
) -> Result<f64, ExtractError> {
    let raw = attribute(elem, attr.as_bytes())?;
    if let (None, Some(default)) = (&raw, default) {
        return Ok(default);
    }
    let value = raw.unwrap_or_default();
    value.trim().parse().map_err(|_| ExtractError::Attribute {
        element,
        id: id.to_string(),
        attr,
        value,
    })
}

fn raw_attribute(elem: &BytesStart, name: &[u8]) -> Result<Option<String>, ExtractError> {
    for attr in elem.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

pub fn unescape_lossy(raw: &str) -> String {
    unescape(raw)
        .unwrap_or(Cow::Borrowed(raw))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(tag: &str) -> BytesStart<'_> {
        let mut reader = Reader::from_str(tag);
        match reader.read_event().unwrap() {
            Event::Empty(elem) => elem.into_owned(),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_number_attribute_defaults() {
        let elem = start(r#"<rect id="r" y=" 4.5 " width="x"/>"#);
        assert_eq!(number_attribute(&elem, "rect", "r", "x", Some(0.0)).unwrap(), 0.0);
        assert_eq!(number_attribute(&elem, "rect", "r", "y", Some(0.0)).unwrap(), 4.5);
        assert!(matches!(
            number_attribute(&elem, "rect", "r", "height", None),
            Err(ExtractError::Attribute { attr: "height", .. })
        ));
        assert!(matches!(
            number_attribute(&elem, "rect", "r", "width", Some(1.0)),
            Err(ExtractError::Attribute { attr: "width", .. })
        ));
    }

    #[test]
    fn test_element_id_decoding() {
        let elem = start(r#"<path id="&#233;&#149;&#191;"/>"#);
        assert_eq!(element_id(&elem).unwrap(), "长");
        let elem = start(r#"<path id="a&amp;b"/>"#);
        assert_eq!(element_id(&elem).unwrap(), "a&b");
        assert_eq!(element_id(&start("<path/>")).unwrap(), "");
    }
}
