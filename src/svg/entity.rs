//! Decoding of element ids whose UTF-8 bytes were written as numeric entities.
//!
//! Some map exports encode a non-ASCII id such as `长江` byte by byte:
//! `&#233;&#149;&#191;&#230;&#177;&#159;`. Each entity is one UTF-8 byte, not
//! a code point, so a regular XML unescape yields mojibake.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#([0-9]+);").unwrap());
static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"id="(.*?)""#).unwrap());

/// Decode an entity-encoded id.
///
/// Entities are gathered into a byte string and decoded as UTF-8 (lossy).
/// Entities above 255 cannot be bytes and are taken as code points instead.
/// The leftover text contributes a numeric suffix when its prefix before `-`
/// equals its prefix before `_` and is non-empty, which keeps ids like
/// `&#...;2` distinct from `&#...;3`.
pub fn decode_entity_id(id: &str) -> String {
    if !id.contains('&') {
        return id.to_string();
    }

    let mut bytes = Vec::new();
    for caps in ENTITY.captures_iter(id) {
        let Ok(value) = caps[1].parse::<u32>() else {
            continue;
        };
        match u8::try_from(value) {
            Ok(byte) => bytes.push(byte),
            Err(_) => {
                if let Some(c) = char::from_u32(value) {
                    let mut buf = [0; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    let mut decoded = String::from_utf8_lossy(&bytes).into_owned();
    let rest = ENTITY.replace_all(id, "");
    let by_dash = rest.split('-').next().unwrap_or_default();
    let by_underscore = rest.split('_').next().unwrap_or_default();
    if !by_dash.is_empty() && by_dash == by_underscore {
        decoded.push_str(by_dash);
    }
    decoded
}

/// Rewrite every `id="..."` holding entities with its decoded form.
///
/// Returns `None` when no id needed decoding.
pub fn decode_svg_ids(svg: &str) -> Option<String> {
    let needs_decoding = ID_ATTR
        .captures_iter(svg)
        .any(|caps| caps[1].contains('&'));
    if !needs_decoding {
        return None;
    }

    let updated = ID_ATTR.replace_all(svg, |caps: &Captures| {
        let id = &caps[1];
        let id: Cow<'_, str> = if id.contains('&') {
            Cow::Owned(decode_entity_id(id))
        } else {
            Cow::Borrowed(id)
        };
        format!(r#"id="{id}""#)
    });
    Some(updated.into_owned())
}
