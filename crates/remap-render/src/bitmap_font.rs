//! Bitmap fonts: glyphs stored as tiles of an [`Atlas`].
//!
//! The character → tile table is usually built from a short declarative
//! [`FontAtlasDescription`] rather than listed glyph by glyph.

use std::collections::HashMap;

use crate::atlas::Atlas;

/// A run of consecutive tiles holding arbitrary characters, e.g. the
/// punctuation row of a font sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialCharacterChain {
    pub start_index: u32,
    /// Characters in tile order; the n-th one lives at `start_index + n`.
    pub characters: String,
}

/// Where the glyphs of a font sheet live.
///
/// Digits have two mutually exclusive layouts:
/// - zero-based (default): '0'..'9' at `index_of_zero..index_of_zero + 10`,
///   where `index_of_zero` defaults to the slot right after 'Z';
/// - one-based: if `index_of_one` is set, '1'..'9' take
///   `index_of_one..index_of_one + 9` and '0' comes last at
///   `index_of_one + 9`. This wins over `index_of_zero`.
///
/// The two are not interchangeable; setting `index_of_one` silently ignores
/// any `index_of_zero`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontAtlasDescription {
    pub index_of_capital_a: u32,
    pub index_of_small_a: Option<u32>,
    pub index_of_zero: Option<u32>,
    pub index_of_one: Option<u32>,
    pub chains: Vec<SpecialCharacterChain>,
}

/// Build the character → tile table for `desc`.
///
/// Assignment order is capitals, digits, lowercase, then each chain in
/// turn; later assignments overwrite earlier ones.
pub fn font_index_from_description(desc: &FontAtlasDescription) -> HashMap<char, u32> {
    let mut index = HashMap::new();
    let capital_a = desc.index_of_capital_a;

    for (i, ch) in ('A'..='Z').enumerate() {
        index.insert(ch, capital_a + i as u32);
    }

    if let Some(one) = desc.index_of_one {
        for (i, ch) in ('1'..='9').enumerate() {
            index.insert(ch, one + i as u32);
        }
        index.insert('0', one + 9);
    } else {
        let zero = desc.index_of_zero.unwrap_or(capital_a + 26);
        for (i, ch) in ('0'..='9').enumerate() {
            index.insert(ch, zero + i as u32);
        }
    }

    if let Some(small_a) = desc.index_of_small_a {
        for (i, ch) in ('a'..='z').enumerate() {
            index.insert(ch, small_a + i as u32);
        }
    }

    for chain in &desc.chains {
        for (i, ch) in chain.characters.chars().enumerate() {
            index.insert(ch, chain.start_index + i as u32);
        }
    }

    index
}

/// A font whose glyphs are atlas tiles.
#[derive(Clone, Debug)]
pub struct BitmapFont {
    atlas: Atlas,
    glyphs: HashMap<char, u32>,
}

impl BitmapFont {
    pub fn new(atlas: Atlas, glyphs: HashMap<char, u32>) -> Self {
        Self { atlas, glyphs }
    }

    pub fn from_description(atlas: Atlas, desc: &FontAtlasDescription) -> Self {
        Self::new(atlas, font_index_from_description(desc))
    }

    /// Whether the font maps at least one character.
    pub fn is_loaded(&self) -> bool {
        !self.glyphs.is_empty()
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// Tile index of `ch`, if the sheet has it.
    #[inline]
    pub fn glyph(&self, ch: char) -> Option<u32> {
        self.glyphs.get(&ch).copied()
    }
}
