//! JSON-Protokoll der Server-Endpunkte
//!
//! - `getCurrentBoard`: `{"boardInfo":{"board":[{"color":"WHITE"}, ...]}}`
//! - `getBrightness`:   `{"brightness": 128}`
//!
//! Geparst wird mit serde-json-core direkt aus dem Empfangs-Buffer.
//! Unbekannte Felder werden übersprungen, Einträge jenseits von
//! `LED_COUNT` ignoriert.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::LED_COUNT;
use crate::color::ColorName;
use crate::frame::clamp_brightness;

/// Fehler beim Parsen einer Server-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    InvalidJson,
}

/// Farbzustand aller LEDs aus einer Board-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSnapshot {
    cells: [Option<ColorName>; LED_COUNT],
    len: usize,
    unknown: usize,
}

impl BoardSnapshot {
    pub const fn empty() -> Self {
        Self {
            cells: [None; LED_COUNT],
            len: 0,
            unknown: 0,
        }
    }

    /// Baut einen Snapshot aus Farbnamen (überzählige Namen werden ignoriert)
    pub fn from_names<'n>(names: impl IntoIterator<Item = &'n str>) -> Self {
        let mut snapshot = Self::empty();
        for name in names.into_iter().take(LED_COUNT) {
            snapshot.push(Some(name));
        }
        snapshot
    }

    /// Empfangene Einträge, höchstens `LED_COUNT`
    pub fn cells(&self) -> &[Option<ColorName>] {
        &self.cells[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Anzahl Einträge mit fehlendem oder unbekanntem Farbnamen
    pub fn unknown(&self) -> usize {
        self.unknown
    }

    fn push(&mut self, name: Option<&str>) {
        let color = name.and_then(ColorName::from_name);
        if color.is_none() {
            self.unknown += 1;
        }
        self.cells[self.len] = color;
        self.len += 1;
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Deserialize)]
struct BoardEnvelope {
    #[serde(rename = "boardInfo")]
    board_info: BoardInfo,
}

#[derive(Deserialize)]
struct BoardInfo {
    board: BoardSnapshot,
}

#[derive(Deserialize)]
struct BoardCell<'a> {
    #[serde(default, borrow)]
    color: CellColor<'a>,
}

/// Farbname einer Zelle, jeder andere JSON-Typ wird zu `None`
#[derive(Default)]
struct CellColor<'a>(Option<&'a str>);

#[derive(Deserialize)]
struct BrightnessEnvelope {
    brightness: Brightness,
}

/// Helligkeit, beliebige JSON-Zahl auf 0-255 gesättigt
struct Brightness(u8);

impl<'de> Deserialize<'de> for BoardSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(BoardVisitor)
    }
}

struct BoardVisitor;

impl<'de> Visitor<'de> for BoardVisitor {
    type Value = BoardSnapshot;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of board cells")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut snapshot = BoardSnapshot::empty();

        while snapshot.len < LED_COUNT {
            match seq.next_element::<BoardCell<'de>>()? {
                Some(cell) => snapshot.push(cell.color.0),
                None => return Ok(snapshot),
            }
        }

        // Rest der Liste konsumieren, der Strip hat nicht mehr Pixel
        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(snapshot)
    }
}

impl<'de: 'a, 'a> Deserialize<'de> for CellColor<'a> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // serde-json-core kennt kein deserialize_any: ignored_any verzweigt
        // auf das nächste Token, Strings kommen als str an, Skalare als unit
        deserializer.deserialize_ignored_any(CellColorVisitor(PhantomData))
    }
}

struct CellColorVisitor<'a>(PhantomData<&'a str>);

impl<'de: 'a, 'a> Visitor<'de> for CellColorVisitor<'a> {
    type Value = CellColor<'a>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a color name")
    }

    fn visit_borrowed_str<E>(self, name: &'de str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(Some(name)))
    }

    // Nicht geliehene Strings (Escapes) sind nie gültige Farbnamen
    fn visit_str<E>(self, _name: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(None))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(None))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(None))
    }

    fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(None))
    }

    fn visit_i64<E>(self, _value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(None))
    }

    fn visit_u64<E>(self, _value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(None))
    }

    fn visit_f64<E>(self, _value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CellColor(None))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(CellColor(None))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(CellColor(None))
    }
}

impl<'de> Deserialize<'de> for Brightness {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // f64 deckt ganze Zahlen jeder Größe und Dezimalzahlen ab
        deserializer.deserialize_f64(BrightnessVisitor)
    }
}

struct BrightnessVisitor;

impl Visitor<'_> for BrightnessVisitor {
    type Value = Brightness;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Brightness(clamp_brightness(value)))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Brightness(clamp_brightness(
            i64::try_from(value).unwrap_or(i64::MAX),
        )))
    }

    // `as` sättigt und schneidet Nachkommastellen ab
    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Brightness(value as u8))
    }
}

/// Parst die Antwort von `getCurrentBoard`
pub fn parse_board(body: &[u8]) -> Result<BoardSnapshot, ProtocolError> {
    let (envelope, _) = serde_json_core::from_slice::<BoardEnvelope>(body)
        .map_err(|_| ProtocolError::InvalidJson)?;
    Ok(envelope.board_info.board)
}

/// Parst die Antwort von `getBrightness`, Wert wird auf 0-255 begrenzt
pub fn parse_brightness(body: &[u8]) -> Result<u8, ProtocolError> {
    let (envelope, _) = serde_json_core::from_slice::<BrightnessEnvelope>(body)
        .map_err(|_| ProtocolError::InvalidJson)?;
    Ok(envelope.brightness.0)
}
