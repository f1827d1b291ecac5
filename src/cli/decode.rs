//! Decode-ids command: rewrite entity-encoded ids as readable text.

use anyhow::Result;

use crate::log;
use crate::svg::decode_svg_ids;
use crate::utils::{read_input, write_output};

use super::DecodeArgs;

/// Decode every entity-encoded `id` in the input SVG.
///
/// The output is always written; when nothing needed decoding it is a copy
/// of the input.
pub fn run_decode(args: &DecodeArgs) -> Result<()> {
    let svg = read_input(&args.input)?;
    let decoded = match decode_svg_ids(&svg) {
        Some(decoded) => decoded,
        None => {
            log!("decode"; "no entity-encoded ids in {}", args.input.display());
            svg
        }
    };
    write_output(&args.output, decoded.as_bytes())?;
    log!("done"; "{}", args.output.display());
    Ok(())
}
