use std::collections::HashMap;

use crate::foundation::core::RGBA_BYTES;
use crate::foundation::error::{LoopcutError, LoopcutResult};

/// Pack RGB components into a 24-bit color, red in the most significant of
/// the three channel bytes. This matches the container's color-table layout,
/// so `pack`/`unpack` round-trip losslessly and preserve component order.
pub fn pack(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Split a packed 24-bit color back into `(r, g, b)` components.
pub fn unpack(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

/// An indexed color table: an ordered sequence of packed 24-bit colors, at
/// most 256 entries, where `colors[i]` is the color for indexed value `i`.
///
/// Index positions are significant. Lookup is exact-match only: the table
/// never substitutes a nearest color, and a miss at encode time surfaces as
/// [`LoopcutError::ColorNotInPalette`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteTable {
    colors: Vec<u32>,
}

impl PaletteTable {
    /// Build a table from raw RGB byte triples as stored in the container.
    /// A trailing partial triple is ignored; entries past 256 are dropped.
    pub fn from_raw(raw: &[u8]) -> Self {
        let colors = raw
            .chunks_exact(3)
            .take(256)
            .map(|c| pack(c[0], c[1], c[2]))
            .collect();
        Self { colors }
    }

    /// Build a table directly from packed colors, truncated to 256 entries.
    pub fn from_colors(colors: impl Into<Vec<u32>>) -> Self {
        let mut colors = colors.into();
        colors.truncate(256);
        Self { colors }
    }

    /// Serialize back to raw RGB byte triples for the codec.
    pub fn to_raw(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.colors.len() * 3);
        for &color in &self.colors {
            let (r, g, b) = unpack(color);
            raw.extend_from_slice(&[r, g, b]);
        }
        raw
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color at `index`, if in range.
    pub fn color(&self, index: u8) -> Option<u32> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Exact-match lookup of a packed color. When the same color occupies
    /// several slots the first occurrence wins.
    pub fn index_of(&self, color: u32) -> Option<u8> {
        self.colors.iter().position(|&c| c == color).map(|i| i as u8)
    }

    /// Map a full RGBA bitmap to a stream of palette indices, one byte per
    /// pixel, by exact color match.
    ///
    /// Fails with [`LoopcutError::ColorNotInPalette`] on the first pixel
    /// whose RGB has no entry in this table.
    pub fn to_index_stream(&self, rgba: &[u8]) -> LoopcutResult<Vec<u8>> {
        self.to_index_stream_with_transparency(rgba, None)
    }

    /// Like [`PaletteTable::to_index_stream`], but transparency-aware: a
    /// fully transparent pixel (alpha 0) maps to `transparent`, and opaque
    /// pixels never match the transparent slot, so an opaque pixel cannot
    /// silently become transparent on re-encode.
    ///
    /// A fully transparent pixel with no transparent slot to map to is
    /// unrepresentable in an indexed stream and fails with
    /// [`LoopcutError::ColorNotInPalette`]; it is never downgraded to an
    /// opaque match on its RGB.
    pub fn to_index_stream_with_transparency(
        &self,
        rgba: &[u8],
        transparent: Option<u8>,
    ) -> LoopcutResult<Vec<u8>> {
        // First-occurrence-wins lookup, with the transparent slot excluded
        // from opaque matching.
        let mut lookup = HashMap::with_capacity(self.colors.len());
        for (i, &color) in self.colors.iter().enumerate() {
            if transparent == Some(i as u8) {
                continue;
            }
            lookup.entry(color).or_insert(i as u8);
        }

        let mut indices = Vec::with_capacity(rgba.len() / RGBA_BYTES);
        for px in rgba.chunks_exact(RGBA_BYTES) {
            if px[3] == 0 {
                match transparent {
                    Some(t) => {
                        indices.push(t);
                        continue;
                    }
                    None => {
                        return Err(LoopcutError::ColorNotInPalette {
                            r: px[0],
                            g: px[1],
                            b: px[2],
                        });
                    }
                }
            }
            let packed = pack(px[0], px[1], px[2]);
            match lookup.get(&packed) {
                Some(&i) => indices.push(i),
                None => {
                    return Err(LoopcutError::ColorNotInPalette {
                        r: px[0],
                        g: px[1],
                        b: px[2],
                    });
                }
            }
        }
        Ok(indices)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/table.rs"]
mod tests;
