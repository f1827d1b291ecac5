//! Per-layer shape extraction.
//!
//! A map keeps its layers as the `<g>` children of its first top-level `<g>`.
//! Every child of a layer yields a shape record: its rect (converted to path
//! data with any transform applied), or else its path and/or circle. Text
//! labels found inside the child travel with the record, and a path whose id
//! is a generic `Vector...` name takes its first label as id.

use std::str::FromStr;

use kurbo::{Affine, Rect, Shape};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::xml::{ExtractError, attribute, element_id, next_event, number_attribute, unescape_lossy};

/// Id prefix of paths that carry no meaningful name.
const GENERIC_ID_PREFIX: &str = "Vector";

/// Layers whose id ends with this append it to their element ids, keeping
/// boundary shapes distinct from the same-named places in other layers.
const BOUNDARY_LAYER_SUFFIX: &str = "CHGIS";

/// Rect attributes replaced by `d`.
const BOX_ATTRIBUTES: [&str; 5] = ["x", "y", "width", "height", "transform"];

/// Tolerance for converting rects to paths.
const RECT_TOLERANCE: f64 = 0.1;

/// One `<tspan>` of a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpan {
    /// Raw `x` / `y` attributes.
    pub pos: [String; 2],
    pub text: Option<String>,
    /// `font-size` of the enclosing `<text>`.
    #[serde(rename = "font-size")]
    pub font_size: String,
    /// `transform` of the enclosing `<text>`.
    pub transform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeTag {
    Path,
    Circle,
}

/// A shape with its SVG attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerElement {
    /// Attributes in document order; rects carry `d` instead of their box.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    pub tag: ShapeTag,
    pub text: Vec<TextSpan>,
}

impl LayerElement {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub elements: Vec<LayerElement>,
}

/// All layers in document order; serializes as `{layer id: [elements]}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layers(pub Vec<Layer>);

impl Serialize for Layers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|layer| (&layer.id, &layer.elements)))
    }
}

/// Parse `svg` and collect the shapes of every layer.
///
/// A document without a top-level `<g>` has no layers.
pub fn extract_layers(svg: &str) -> Result<Layers, ExtractError> {
    let Some(root) = parse_tree(svg)? else {
        return Ok(Layers::default());
    };
    let Some(container) = root.children.iter().find(|c| c.name == "g") else {
        return Ok(Layers::default());
    };

    let mut layers = Vec::new();
    for group in container.children.iter().filter(|c| c.name == "g") {
        let id = element_id(&group.start)?;
        let mut elements = Vec::new();
        for child in &group.children {
            let mut shapes = child_shapes(child)?;
            if id.ends_with(BOUNDARY_LAYER_SUFFIX) {
                for shape in &mut shapes {
                    let base = shape.id().unwrap_or_default();
                    let suffixed = format!("{base}{BOUNDARY_LAYER_SUFFIX}");
                    shape.attributes.insert("id".to_string(), Value::String(suffixed));
                }
            }
            elements.extend(shapes);
        }
        layers.push(Layer { id, elements });
    }
    Ok(Layers(layers))
}

fn child_shapes(child: &XmlElement) -> Result<Vec<LayerElement>, ExtractError> {
    let text = match child.find("text") {
        Some(label) => text_spans(label)?,
        None => Vec::new(),
    };

    if let Some(rect) = child.find("rect") {
        return Ok(vec![rect_shape(rect, text)?]);
    }

    let mut shapes = Vec::new();
    if let Some(path) = child.find("path") {
        let mut shape = LayerElement {
            attributes: attributes(&path.start)?,
            tag: ShapeTag::Path,
            text: text.clone(),
        };
        let label = text.first().and_then(|span| span.text.clone());
        if let Some(label) = label
            && shape.id().is_some_and(|id| id.starts_with(GENERIC_ID_PREFIX))
        {
            shape.attributes.insert("id".to_string(), Value::String(label));
        }
        shapes.push(shape);
    }
    if let Some(circle) = child.find("circle") {
        shapes.push(LayerElement {
            attributes: attributes(&circle.start)?,
            tag: ShapeTag::Circle,
            text,
        });
    }
    Ok(shapes)
}

fn text_spans(label: &XmlElement) -> Result<Vec<TextSpan>, ExtractError> {
    let font_size = attribute(&label.start, b"font-size")?.unwrap_or_default();
    let transform = attribute(&label.start, b"transform")?.unwrap_or_default();

    label
        .children
        .iter()
        .filter(|c| c.name == "tspan")
        .map(|span| -> Result<TextSpan, ExtractError> {
            let coord = |name: &[u8]| -> Result<String, ExtractError> {
                Ok(attribute(&span.start, name)?.unwrap_or_else(|| "0".to_string()))
            };
            Ok(TextSpan {
                pos: [coord(b"x")?, coord(b"y")?],
                text: span.text.clone(),
                font_size: font_size.clone(),
                transform: transform.clone(),
            })
        })
        .collect()
}

/// A rect as a path shape: the box becomes `d`, with `transform` baked in.
fn rect_shape(rect: &XmlElement, text: Vec<TextSpan>) -> Result<LayerElement, ExtractError> {
    let id = element_id(&rect.start)?;
    let number = |attr, default| number_attribute(&rect.start, "rect", &id, attr, default);
    let x = number("x", Some(0.0))?;
    let y = number("y", Some(0.0))?;
    let width = number("width", None)?;
    let height = number("height", None)?;

    let affine = match attribute(&rect.start, b"transform")? {
        Some(transform) => {
            let ts = svgtypes::Transform::from_str(&transform).map_err(|source| {
                ExtractError::Transform {
                    element: "rect",
                    id: id.clone(),
                    source,
                }
            })?;
            Affine::new([ts.a, ts.b, ts.c, ts.d, ts.e, ts.f])
        }
        None => Affine::IDENTITY,
    };
    let outline = affine * Rect::new(x, y, x + width, y + height).to_path(RECT_TOLERANCE);

    let mut attributes = attributes(&rect.start)?;
    attributes.retain(|key, _| !BOX_ATTRIBUTES.contains(&key.as_str()));
    attributes.insert("d".to_string(), Value::String(outline.to_svg()));

    Ok(LayerElement {
        attributes,
        tag: ShapeTag::Path,
        text,
    })
}

/// Every attribute by qualified name; `id` is decoded like node ids.
fn attributes(elem: &BytesStart) -> Result<Map<String, Value>, ExtractError> {
    let mut map = Map::new();
    for attr in elem.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = if key == "id" {
            element_id(elem)?
        } else {
            unescape_lossy(&String::from_utf8_lossy(&attr.value))
        };
        map.insert(key, Value::String(value));
    }
    Ok(map)
}

// ============================================================================
// element tree
// ============================================================================

/// Minimal owned element tree; layer records need lookups across siblings
/// and descendants that a single streaming pass cannot answer.
#[derive(Debug)]
struct XmlElement {
    /// Local name.
    name: String,
    start: BytesStart<'static>,
    children: Vec<XmlElement>,
    /// Character data before the first child element.
    text: Option<String>,
}

impl XmlElement {
    fn new(start: BytesStart<'static>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            start,
            children: Vec::new(),
            text: None,
        }
    }

    /// This element or its first descendant named `name`, in document order.
    fn find(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

fn parse_tree(svg: &str) -> Result<Option<XmlElement>, ExtractError> {
    let mut reader = Reader::from_str(svg);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        match next_event(&mut reader)? {
            Event::Start(elem) => stack.push(XmlElement::new(elem.into_owned())),
            Event::Empty(elem) => attach(&mut stack, &mut root, XmlElement::new(elem.into_owned())),
            Event::End(_) => {
                if let Some(done) = stack.pop() {
                    attach(&mut stack, &mut root, done);
                }
            }
            Event::Text(text) => {
                push_text(&mut stack, &unescape_lossy(&String::from_utf8_lossy(&text)));
            }
            Event::CData(data) => push_text(&mut stack, &String::from_utf8_lossy(&data)),
            Event::GeneralRef(entity) => {
                let raw = format!("&{};", String::from_utf8_lossy(&entity));
                push_text(&mut stack, &unescape_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(root)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, elem: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => {
            root.get_or_insert(elem);
        }
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if let Some(current) = stack.last_mut()
        && current.children.is_empty()
    {
        current.text.get_or_insert_with(String::new).push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;

    use super::*;

    const MAP: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g id="map">
    <g id="rivers">
      <g>
        <path id="Vector 12" d="M 0 0 L 10 0"/>
        <text font-size="12" transform="translate(1 2)">
          <tspan x="3" y="4">长江</tspan>
          <tspan x="3" y="16">Yangtze &amp; co</tspan>
        </text>
      </g>
      <g><path id="named" d="M 0 0 L 0 10"/><circle id="dot" cx="1" cy="1" r="2"/></g>
      <path id="bare" d="M 1 1 L 2 2"/>
    </g>
    <g id="cities">
      <g>
        <rect id="box" class="city" x="5" y="10" width="10" height="5"
              transform="translate(5 10)"/>
        <path id="ignored" d="M 0 0 L 1 1"/>
      </g>
      <rect id="plain" width="4" height="2"/>
    </g>
    <g id="城市边界CHGIS">
      <path id="南京" d="M 0 0 L 1 0 L 1 1 Z"/>
    </g>
    <rect id="legend" width="1" height="1"/>
  </g>
  <g id="second-root"><g id="ignored-layer"/></g>
</svg>"#;

    fn layer<'a>(layers: &'a Layers, id: &str) -> &'a Layer {
        layers.0.iter().find(|l| l.id == id).unwrap()
    }

    #[test]
    fn test_layers_in_document_order() {
        let layers = extract_layers(MAP).unwrap();
        let ids: Vec<_> = layers.0.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["rivers", "cities", "城市边界CHGIS"]);
    }

    #[test]
    fn test_generic_path_takes_label() {
        let layers = extract_layers(MAP).unwrap();
        let rivers = layer(&layers, "rivers");
        let first = &rivers.elements[0];
        assert_eq!(first.tag, ShapeTag::Path);
        assert_eq!(first.id(), Some("长江"));
        assert_eq!(first.attributes["d"], "M 0 0 L 10 0");
        assert_eq!(first.text.len(), 2);
        assert_eq!(
            first.text[0],
            TextSpan {
                pos: ["3".to_string(), "4".to_string()],
                text: Some("长江".to_string()),
                font_size: "12".to_string(),
                transform: "translate(1 2)".to_string(),
            }
        );
        assert_eq!(first.text[1].text.as_deref(), Some("Yangtze & co"));
    }

    #[test]
    fn test_path_and_circle_from_one_child() {
        let layers = extract_layers(MAP).unwrap();
        let rivers = layer(&layers, "rivers");
        let tags: Vec<_> = rivers.elements.iter().map(|e| (e.tag, e.id())).collect();
        assert_eq!(
            tags,
            [
                (ShapeTag::Path, Some("长江")),
                (ShapeTag::Path, Some("named")),
                (ShapeTag::Circle, Some("dot")),
                (ShapeTag::Path, Some("bare")),
            ]
        );
        assert!(rivers.elements[1].text.is_empty());
    }

    #[test]
    fn test_rect_becomes_transformed_path() {
        let layers = extract_layers(MAP).unwrap();
        let cities = layer(&layers, "cities");
        assert_eq!(cities.elements.len(), 2);

        let boxed = &cities.elements[0];
        assert_eq!(boxed.tag, ShapeTag::Path);
        assert_eq!(boxed.attributes["class"], "city");
        for key in BOX_ATTRIBUTES {
            assert!(!boxed.attributes.contains_key(key));
        }
        let d = boxed.attributes["d"].as_str().unwrap();
        let bbox = BezPath::from_svg(d).unwrap().bounding_box();
        assert_eq!(bbox, Rect::new(10.0, 20.0, 20.0, 25.0));

        let plain = &cities.elements[1];
        let d = plain.attributes["d"].as_str().unwrap();
        let bbox = BezPath::from_svg(d).unwrap().bounding_box();
        assert_eq!(bbox, Rect::new(0.0, 0.0, 4.0, 2.0));
    }

    #[test]
    fn test_boundary_layer_suffix() {
        let layers = extract_layers(MAP).unwrap();
        let boundary = layer(&layers, "城市边界CHGIS");
        assert_eq!(boundary.elements[0].id(), Some("南京CHGIS"));
    }

    #[test]
    fn test_layers_json_shape() {
        let layers = extract_layers(MAP).unwrap();
        let json = serde_json::to_value(&layers).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["rivers", "cities", "城市边界CHGIS"]);

        let circle = &json["rivers"][2];
        assert_eq!(circle["tag"], "circle");
        assert_eq!(circle["cx"], "1");
        assert_eq!(circle["text"], serde_json::json!([]));
        assert_eq!(json["rivers"][0]["text"][0]["font-size"], "12");
    }

    #[test]
    fn test_invalid_rect_transform() {
        let svg = r#"<svg><g><g id="l">
  <rect id="r" width="1" height="1" transform="spin(3)"/>
</g></g></svg>"#;
        let err = extract_layers(svg).unwrap_err();
        assert!(matches!(err, ExtractError::Transform { ref id, .. } if id == "r"));
    }

    #[test]
    fn test_no_container_group() {
        let layers = extract_layers(r#"<svg><rect width="1" height="1"/></svg>"#).unwrap();
        assert!(layers.0.is_empty());
        assert_eq!(serde_json::to_string(&layers).unwrap(), "{}");
    }
}
