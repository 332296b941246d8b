use std::collections::HashMap;

/// Straight (non-premultiplied) sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The 20-entry categorical scheme used for relationship types.
pub const CATEGORY20: [Rgb8; 20] = [
    Rgb8::new(0x1f, 0x77, 0xb4),
    Rgb8::new(0xae, 0xc7, 0xe8),
    Rgb8::new(0xff, 0x7f, 0x0e),
    Rgb8::new(0xff, 0xbb, 0x78),
    Rgb8::new(0x2c, 0xa0, 0x2c),
    Rgb8::new(0x98, 0xdf, 0x8a),
    Rgb8::new(0xd6, 0x27, 0x28),
    Rgb8::new(0xff, 0x98, 0x96),
    Rgb8::new(0x94, 0x67, 0xbd),
    Rgb8::new(0xc5, 0xb0, 0xd5),
    Rgb8::new(0x8c, 0x56, 0x4b),
    Rgb8::new(0xc4, 0x9c, 0x94),
    Rgb8::new(0xe3, 0x77, 0xc2),
    Rgb8::new(0xf7, 0xb6, 0xd2),
    Rgb8::new(0x7f, 0x7f, 0x7f),
    Rgb8::new(0xc7, 0xc7, 0xc7),
    Rgb8::new(0xbc, 0xbd, 0x22),
    Rgb8::new(0xdb, 0xdb, 0x8d),
    Rgb8::new(0x17, 0xbe, 0xcf),
    Rgb8::new(0x9e, 0xda, 0xe5),
];

/// Ordinal category → color mapping.
///
/// The domain keeps first-insertion order and wraps around the scheme once it has more entries
/// than colors. Unknown categories are appended on first use.
#[derive(Clone, Debug, Default)]
pub struct CategoryPalette {
    domain: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryPalette {
    pub fn with_domain<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut palette = Self::default();
        for c in categories {
            palette.insert(c.into());
        }
        palette
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Color for an already-known category.
    pub fn get(&self, category: &str) -> Option<Rgb8> {
        self.index
            .get(category)
            .map(|&i| CATEGORY20[i % CATEGORY20.len()])
    }

    /// Color for `category`, extending the domain when it is new.
    pub fn color(&mut self, category: &str) -> Rgb8 {
        let i = self.insert(category.to_string());
        CATEGORY20[i % CATEGORY20.len()]
    }

    fn insert(&mut self, category: String) -> usize {
        if let Some(&i) = self.index.get(&category) {
            return i;
        }
        let i = self.domain.len();
        self.index.insert(category.clone(), i);
        self.domain.push(category);
        i
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
