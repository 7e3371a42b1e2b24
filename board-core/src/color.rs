//! Farbtabelle für das Board
//!
//! Der Server liefert pro LED nur einen Farbnamen. Die Zuordnung
//! Name → RGB ist fest und geschlossen (WHITE, GREEN, COLOR1..COLOR6).

use rgb::RGB8;

/// Bekannte Farbnamen aus der Board-Beschreibung
///
/// Die RGB-Werte sind so hinterlegt, wie sie an den Strip gehen. Der
/// Demo-Aufbau ist als GRB verdrahtet, das ist in den Werten bereits
/// berücksichtigt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorName {
    White,
    Green,
    Color1,
    Color2,
    Color3,
    Color4,
    Color5,
    Color6,
}

impl ColorName {
    /// Alle Farben in Tabellen-Reihenfolge
    pub const ALL: [ColorName; 8] = [
        ColorName::White,
        ColorName::Green,
        ColorName::Color1,
        ColorName::Color2,
        ColorName::Color3,
        ColorName::Color4,
        ColorName::Color5,
        ColorName::Color6,
    ];

    /// Sucht einen Farbnamen (exakt, Groß-/Kleinschreibung zählt)
    ///
    /// ```
    /// # use board_core::ColorName;
    /// assert_eq!(ColorName::from_name("COLOR3"), Some(ColorName::Color3));
    /// assert_eq!(ColorName::from_name("white"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_str() == name)
    }

    /// Name wie er im JSON steht
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorName::White => "WHITE",
            ColorName::Green => "GREEN",
            ColorName::Color1 => "COLOR1",
            ColorName::Color2 => "COLOR2",
            ColorName::Color3 => "COLOR3",
            ColorName::Color4 => "COLOR4",
            ColorName::Color5 => "COLOR5",
            ColorName::Color6 => "COLOR6",
        }
    }

    /// Fester RGB-Wert dieser Farbe
    pub const fn rgb(self) -> RGB8 {
        let (r, g, b) = match self {
            ColorName::White => (255, 255, 255),
            ColorName::Green => (186, 128, 36),
            ColorName::Color1 => (107, 24, 162),
            ColorName::Color2 => (17, 192, 17),
            ColorName::Color3 => (178, 223, 52),
            ColorName::Color4 => (49, 216, 127),
            ColorName::Color5 => (102, 230, 47),
            ColorName::Color6 => (184, 0, 172),
        };
        RGB8 { r, g, b }
    }
}

/// Name → RGB, `None` für unbekannte Namen (Pixel bleibt aus)
pub fn lookup(name: &str) -> Option<RGB8> {
    ColorName::from_name(name).map(ColorName::rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_names() {
        assert_eq!(lookup("WHITE"), Some(RGB8::new(255, 255, 255)));
        assert_eq!(lookup("GREEN"), Some(RGB8::new(186, 128, 36)));
        assert_eq!(lookup("COLOR1"), Some(RGB8::new(107, 24, 162)));
        assert_eq!(lookup("COLOR2"), Some(RGB8::new(17, 192, 17)));
        assert_eq!(lookup("COLOR3"), Some(RGB8::new(178, 223, 52)));
        assert_eq!(lookup("COLOR4"), Some(RGB8::new(49, 216, 127)));
        assert_eq!(lookup("COLOR5"), Some(RGB8::new(102, 230, 47)));
        assert_eq!(lookup("COLOR6"), Some(RGB8::new(184, 0, 172)));
    }

    #[test]
    fn test_lookup_unknown_names() {
        assert_eq!(lookup(""), None);
        assert_eq!(lookup("RED"), None);
        assert_eq!(lookup("green"), None);
        assert_eq!(lookup("COLOR7"), None);
        assert_eq!(lookup(" WHITE"), None);
    }

    #[test]
    fn test_names_round_trip_through_table() {
        for color in ColorName::ALL {
            assert_eq!(ColorName::from_name(color.as_str()), Some(color));
        }
    }
}
