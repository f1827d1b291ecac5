//! Pixel ownership with last-write-wins conflict resolution.
//!
//! Paths are claimed in caller order; a pixel claimed by several paths ends
//! up owned by the last one. For dense, overlapping paths this can attribute
//! shared pixels to whichever path happened to come last.

use rustc_hash::FxHashMap;

use super::Pixel;

/// Incrementally records which path index owns each pixel.
#[derive(Debug, Default)]
pub struct OwnershipBuilder {
    owners: FxHashMap<Pixel, u16>,
    contested: usize,
}

impl OwnershipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `pixel` to `index`, returning the previous owner if it differed.
    pub fn claim(&mut self, pixel: Pixel, index: u16) -> Option<u16> {
        match self.owners.insert(pixel, index) {
            Some(previous) if previous != index => {
                self.contested += 1;
                Some(previous)
            }
            _ => None,
        }
    }

    /// Claim every pixel of a path.
    pub fn claim_all(&mut self, pixels: &[Pixel], index: u16) {
        for &pixel in pixels {
            self.claim(pixel, index);
        }
    }

    /// Freeze into an immutable mapping.
    pub fn build(self) -> PixelOwnership {
        PixelOwnership {
            owners: self.owners,
            contested: self.contested,
        }
    }
}

/// Final pixel → path index mapping.
#[derive(Debug, Clone, Default)]
pub struct PixelOwnership {
    owners: FxHashMap<Pixel, u16>,
    contested: usize,
}

impl PixelOwnership {
    /// Number of claims that took a pixel away from another path.
    pub fn contested(&self) -> usize {
        self.contested
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pixel, u16)> + '_ {
        self.owners.iter().map(|(&pixel, &index)| (pixel, index))
    }
}
