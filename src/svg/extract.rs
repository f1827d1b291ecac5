//! Node and link extraction from map SVGs.
//!
//! Maps are drawn with two layers: `<g id="node">` holding one `<rect>` per
//! station and `<g id="link">` holding one `<path>` per connection. Each link
//! endpoint is attached to the node whose rectangle center is nearest.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use serde::{Deserialize, Serialize};

use super::xml::{ExtractError, attribute, element_id, next_event, number_attribute};
use crate::debug;
use crate::geometry::{Path, Point};

/// A station rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// `[[x, y], [width, height]]`
    pub position: [[f64; 2]; 2],
    pub index: usize,
}

impl Node {
    pub fn center(&self) -> Point {
        let [[x, y], [w, h]] = self.position;
        Point::new(x + w / 2.0, y + h / 2.0)
    }
}

/// A connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub name: String,
    /// Name of the node nearest to the path start.
    pub source: Option<String>,
    /// Name of the node nearest to the path end.
    pub target: Option<String>,
    /// Raw path-command string.
    pub path: String,
    pub source_position: Option<[f64; 2]>,
    pub target_position: Option<[f64; 2]>,
}

/// Nodes and links of one map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Node,
    Link,
    Other,
}

/// Parse `svg` and collect its node rectangles and link paths.
pub fn extract_graph(svg: &str) -> Result<Graph, ExtractError> {
    let mut reader = Reader::from_str(svg);
    reader.config_mut().trim_text(true);

    let mut layers = Vec::new();
    let mut nodes = Vec::new();
    let mut links = Vec::new();

    loop {
        match next_event(&mut reader)? {
            Event::Start(elem) => {
                let layer = enter_layer(&elem, layers.last().copied())?;
                handle_element(&elem, layer, &mut nodes, &mut links)?;
                layers.push(layer);
            }
            Event::Empty(elem) => {
                let layer = layers.last().copied().unwrap_or(Layer::Other);
                handle_element(&elem, layer, &mut nodes, &mut links)?;
            }
            Event::End(_) => {
                layers.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let links = links
        .into_iter()
        .map(|(name, d)| attach_link(name, d, &nodes))
        .collect();

    Ok(Graph { nodes, links })
}

/// Layer of an opened element: a `<g>` with a layer id starts that layer,
/// everything else inherits its parent's.
fn enter_layer(elem: &BytesStart, parent: Option<Layer>) -> Result<Layer, ExtractError> {
    let inherited = parent.unwrap_or(Layer::Other);
    if elem.local_name().as_ref() != b"g" {
        return Ok(inherited);
    }
    Ok(match attribute(elem, b"id")?.as_deref() {
        Some("node") => Layer::Node,
        Some("link") => Layer::Link,
        _ => inherited,
    })
}

fn handle_element(
    elem: &BytesStart,
    layer: Layer,
    nodes: &mut Vec<Node>,
    links: &mut Vec<(String, String)>,
) -> Result<(), ExtractError> {
    match (layer, elem.local_name().as_ref()) {
        (Layer::Node, b"rect") => {
            let node = parse_rect(elem, nodes.len())?;
            nodes.push(node);
        }
        (Layer::Link, b"path") => {
            let name = element_id(elem)?;
            let d = attribute(elem, b"d")?.unwrap_or_default();
            links.push((name, d));
        }
        _ => {}
    }
    Ok(())
}

fn parse_rect(elem: &BytesStart, index: usize) -> Result<Node, ExtractError> {
    let name = element_id(elem)?;
    let number = |attr, default| number_attribute(elem, "rect", &name, attr, default);
    let x = number("x", Some(0.0))?;
    let y = number("y", Some(0.0))?;
    let width = number("width", None)?;
    let height = number("height", None)?;

    Ok(Node {
        name,
        position: [[x, y], [width, height]],
        index,
    })
}

fn attach_link(name: String, d: String, nodes: &[Node]) -> Link {
    let (start, end) = match Path::parse(name.as_str(), &d) {
        Ok(path) => (path.start(), path.end()),
        Err(e) => {
            debug!("extract"; "{}", e);
            (None, None)
        }
    };
    let nearest = |p: Option<Point>| p.and_then(|p| nearest_node(p, nodes)).map(|n| n.name.clone());

    Link {
        source: nearest(start),
        target: nearest(end),
        source_position: start.map(|p| [p.x, p.y]),
        target_position: end.map(|p| [p.x, p.y]),
        name,
        path: d,
    }
}

/// Node whose center is closest to `pos`; the first one wins ties.
pub fn nearest_node(pos: Point, nodes: &[Node]) -> Option<&Node> {
    let mut best: Option<(&Node, f64)> = None;
    for node in nodes {
        let dist = pos.distance(node.center());
        if best.is_none_or(|(_, min)| dist < min) {
            best = Some((node, dist));
        }
    }
    best.map(|(node, _)| node)
}
