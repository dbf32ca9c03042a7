/// Palettes: the set of colors a recolor is allowed to produce.
///
/// Order is kept as given. It never changes which colors are chosen, only
/// how exact distance ties are broken.
use log::warn;
use serde::Deserialize;

use crate::color::Color;
use crate::error::{RecolorError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    /// Parse every entry, failing on the first malformed one.
    pub fn parse_hex_list<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .map(|s| Color::parse_hex(s.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Parse what can be parsed and hand back the rejects.
    ///
    /// Whether a partially valid palette is acceptable is the caller's call;
    /// nothing is dropped without being reported.
    pub fn parse_hex_list_lenient<I, S>(items: I) -> (Self, Vec<RecolorError>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut colors = Vec::new();
        let mut rejected = Vec::new();
        for item in items {
            match Color::parse_hex(item.as_ref()) {
                Ok(c) => colors.push(c),
                Err(e) => {
                    warn!("skipping palette entry: {}", e);
                    rejected.push(e);
                }
            }
        }
        (Self::new(colors), rejected)
    }

    /// Lenient parse that still refuses a palette with nothing left in it.
    ///
    /// The rejects come back alongside the palette so front ends can report
    /// them in their own way.
    pub fn parse_hex_list_nonempty<I, S>(items: I) -> Result<(Self, Vec<RecolorError>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (palette, rejected) = Self::parse_hex_list_lenient(items);
        if palette.is_empty() {
            return Err(RecolorError::EmptyPalette);
        }
        Ok((palette, rejected))
    }

    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(Color::to_hex).collect()
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

#[derive(Deserialize)]
struct HexEntry {
    hex: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaletteJson {
    Strings(Vec<String>),
    Objects(Vec<HexEntry>),
}

/// Read palette JSON in either accepted shape and return the raw hex strings.
///
/// Accepts `["#RRGGBB", ...]` or `[{"hex": "#RRGGBB"}, ...]`. The strings are
/// not validated here; feed them to one of the `Palette::parse_hex_list*`
/// constructors.
pub fn parse_palette_json(text: &str) -> Result<Vec<String>> {
    let parsed: PaletteJson = serde_json::from_str(text).map_err(|_| {
        RecolorError::InvalidPalette(
            "expected a JSON array of hex strings or [{\"hex\":\"#RRGGBB\"}]".to_string(),
        )
    })?;
    Ok(match parsed {
        PaletteJson::Strings(v) => v,
        PaletteJson::Objects(v) => v.into_iter().map(|e| e.hex).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse() {
        let p = Palette::parse_hex_list(["#FF0000", "00ff00", " #0000FF "]).unwrap();
        assert_eq!(
            p.colors(),
            &[Color::rgb(255, 0, 0), Color::rgb(0, 255, 0), Color::rgb(0, 0, 255)]
        );
        assert!(Palette::parse_hex_list(["#FF0000", "#FFF"]).is_err());
    }

    #[test]
    fn test_strict_parse_empty_is_ok() {
        let p = Palette::parse_hex_list(Vec::<String>::new()).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn test_lenient_parse_reports_rejects() {
        let (p, rejected) = Palette::parse_hex_list_lenient(["#FF0000", "nope", "", "#00FF00"]);
        assert_eq!(p.len(), 2);
        assert_eq!(rejected.len(), 2);
        assert!(rejected
            .iter()
            .all(|e| matches!(e, RecolorError::InvalidColor { .. })));
    }

    #[test]
    fn test_nonempty_parse() {
        assert!(matches!(
            Palette::parse_hex_list_nonempty(["bad", "#12"]),
            Err(RecolorError::EmptyPalette)
        ));
        let (p, rejected) = Palette::parse_hex_list_nonempty(["bad", "#123456"]).unwrap();
        assert_eq!(p.colors(), &[Color::rgb(0x12, 0x34, 0x56)]);
        assert_eq!(rejected.len(), 1);
        assert!(matches!(
            Palette::parse_hex_list_nonempty(Vec::<String>::new()),
            Err(RecolorError::EmptyPalette)
        ));
    }

    #[test]
    fn test_palette_json_shapes() {
        assert_eq!(
            parse_palette_json(r##"["#FF0000", "00FF00"]"##).unwrap(),
            vec!["#FF0000", "00FF00"]
        );
        assert_eq!(
            parse_palette_json(r##"[{"hex": "#FF0000"}, {"hex": "#0000FF"}]"##).unwrap(),
            vec!["#FF0000", "#0000FF"]
        );
        assert!(parse_palette_json("[]").unwrap().is_empty());
        assert!(matches!(
            parse_palette_json(r##"{"hex": "#FF0000"}"##),
            Err(RecolorError::InvalidPalette(_))
        ));
        assert!(parse_palette_json("not json").is_err());
    }

    #[test]
    fn test_to_hex_strings() {
        let p: Palette = [Color::rgb(255, 107, 53), Color::rgb(0, 0, 0)].into_iter().collect();
        assert_eq!(p.to_hex_strings(), vec!["#FF6B35", "#000000"]);
    }
}
