//! SVG map processing.
//!
//! - [`extract`]: node rectangles and link paths, with nearest-node matching
//! - [`layers`]: per-layer shape records with their text labels
//! - [`entity`]: decoding of byte-entity encoded element ids
//! - [`xml`]: quick-xml helpers shared by the readers

mod entity;
mod extract;
mod layers;
mod xml;

pub use entity::{decode_entity_id, decode_svg_ids};
pub use extract::extract_graph;
pub use layers::extract_layers;
