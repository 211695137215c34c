use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WindowType {
    #[default]
    Reader,
    Help,
    Books,
    Favorites,
    Search,
    History,
}

/// One verse record of the corpus, as shipped in `bible-array.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub id: u32,
    pub book: String,
    #[serde(default)]
    pub book_eng: String,
    /// Label such as "第 3 章".
    pub chapter: String,
    /// Label such as "第 5 節".
    pub section: String,
    pub content: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_bookmark: bool,
}

impl Verse {
    pub fn chapter_number(&self) -> Option<u32> {
        label_number(&self.chapter)
    }

    pub fn verse_number(&self) -> Option<u32> {
        label_number(&self.section)
    }

    /// "創世記 1:1"
    pub fn reference(&self) -> String {
        match (self.chapter_number(), self.verse_number()) {
            (Some(chapter), Some(verse)) => format!("{} {}:{}", self.book, chapter, verse),
            _ => format!("{} {}:{}", self.book, self.chapter, self.section),
        }
    }

    /// Text placed on the clipboard by "copy verse".
    pub fn copy_text(&self) -> String {
        format!("{} {}:{} {}", self.book, self.chapter, self.section, self.content)
    }

    pub fn composite_id(&self) -> Option<String> {
        let chapter = self.chapter_number()?;
        let verse = self.verse_number()?;
        Some(FavoriteEntry::composite_id(
            &self.book,
            &chapter.to_string(),
            verse,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInfo {
    pub name: String,
    pub chapter_num: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: String,
    pub book_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub chapter: String,
    #[serde(deserialize_with = "number_or_string")]
    pub verse_number: u32,
    pub content: String,
}

impl FavoriteEntry {
    pub fn new(book_name: &str, chapter: &str, content: &str, verse_number: u32) -> Self {
        Self {
            id: Self::composite_id(book_name, chapter, verse_number),
            book_name: book_name.to_string(),
            chapter: chapter.to_string(),
            verse_number,
            content: content.to_string(),
        }
    }

    pub fn composite_id(book_name: &str, chapter: &str, verse_number: u32) -> String {
        format!("{}-{}-{}", book_name, chapter, verse_number)
    }

    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book_name, self.chapter, self.verse_number)
    }
}

// Older favorites lists were written with numeric chapters and string verse
// numbers depending on the page that created them; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Str(s) => s,
        StringOrNumber::Num(n) => n.to_string(),
    })
}

fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid verse number: {}", s))),
        StringOrNumber::Num(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid verse number: {}", n))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    #[default]
    Default,
    Large,
    XLarge,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Default => "default",
            FontSize::Large => "large",
            FontSize::XLarge => "xlarge",
        }
    }

    pub fn enlarged(self) -> Self {
        match self {
            FontSize::Default => FontSize::Large,
            FontSize::Large | FontSize::XLarge => FontSize::XLarge,
        }
    }

    pub fn shrunk(self) -> Self {
        match self {
            FontSize::XLarge => FontSize::Large,
            FontSize::Large | FontSize::Default => FontSize::Default,
        }
    }

    /// A terminal cannot scale glyphs, so larger sizes narrow the text column
    /// and add spacing between verses instead.
    pub fn width_percent(&self) -> u16 {
        match self {
            FontSize::Default => 100,
            FontSize::Large => 80,
            FontSize::XLarge => 64,
        }
    }

    pub fn verse_spacing(&self) -> usize {
        match self {
            FontSize::Default => 0,
            FontSize::Large | FontSize::XLarge => 1,
        }
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(FontSize::Default),
            "large" => Ok(FontSize::Large),
            "xlarge" => Ok(FontSize::XLarge),
            other => Err(format!("unknown font size: {}", other)),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn chapter_label(chapter: u32) -> String {
    format!("第 {} 章", chapter)
}

pub fn section_label(verse: u32) -> String {
    format!("第 {} 節", verse)
}

/// Numeric part of a "第 N 章" / "第 N 節" label.
pub fn label_number(label: &str) -> Option<u32> {
    label.split_whitespace().nth(1)?.parse().ok()
}
