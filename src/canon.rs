use crate::models::BookInfo;

/// The 66 books in canonical order: (name, English name, chapter count).
pub const CANON: &[(&str, &str, u32)] = &[
    ("創世記", "Genesis", 50),
    ("出埃及記", "Exodus", 40),
    ("利未記", "Leviticus", 27),
    ("民數記", "Numbers", 36),
    ("申命記", "Deuteronomy", 34),
    ("約書亞記", "Joshua", 24),
    ("士師記", "Judges", 21),
    ("路得記", "Ruth", 4),
    ("撒母耳記上", "1 Samuel", 31),
    ("撒母耳記下", "2 Samuel", 24),
    ("列王紀上", "1 Kings", 22),
    ("列王紀下", "2 Kings", 25),
    ("歷代志上", "1 Chronicles", 29),
    ("歷代志下", "2 Chronicles", 36),
    ("以斯拉記", "Ezra", 10),
    ("尼希米記", "Nehemiah", 13),
    ("以斯帖記", "Esther", 10),
    ("約伯記", "Job", 42),
    ("詩篇", "Psalms", 150),
    ("箴言", "Proverbs", 31),
    ("傳道書", "Ecclesiastes", 12),
    ("雅歌", "Song of Songs", 8),
    ("以賽亞書", "Isaiah", 66),
    ("耶利米書", "Jeremiah", 52),
    ("耶利米哀歌", "Lamentations", 5),
    ("以西結書", "Ezekiel", 48),
    ("但以理書", "Daniel", 12),
    ("何西阿書", "Hosea", 14),
    ("約珥書", "Joel", 3),
    ("阿摩司書", "Amos", 9),
    ("俄巴底亞書", "Obadiah", 1),
    ("約拿書", "Jonah", 4),
    ("彌迦書", "Micah", 7),
    ("那鴻書", "Nahum", 3),
    ("哈巴谷書", "Habakkuk", 3),
    ("西番雅書", "Zephaniah", 3),
    ("哈該書", "Haggai", 2),
    ("撒迦利亞書", "Zechariah", 14),
    ("瑪拉基書", "Malachi", 4),
    ("馬太福音", "Matthew", 28),
    ("馬可福音", "Mark", 16),
    ("路加福音", "Luke", 24),
    ("約翰福音", "John", 21),
    ("使徒行傳", "Acts", 28),
    ("羅馬書", "Romans", 16),
    ("哥林多前書", "1 Corinthians", 16),
    ("哥林多後書", "2 Corinthians", 13),
    ("加拉太書", "Galatians", 6),
    ("以弗所書", "Ephesians", 6),
    ("腓立比書", "Philippians", 4),
    ("歌羅西書", "Colossians", 4),
    ("帖撒羅尼迦前書", "1 Thessalonians", 5),
    ("帖撒羅尼迦後書", "2 Thessalonians", 3),
    ("提摩太前書", "1 Timothy", 6),
    ("提摩太後書", "2 Timothy", 4),
    ("提多書", "Titus", 3),
    ("腓利門書", "Philemon", 1),
    ("希伯來書", "Hebrews", 13),
    ("雅各書", "James", 5),
    ("彼得前書", "1 Peter", 5),
    ("彼得後書", "2 Peter", 3),
    ("約翰一書", "1 John", 5),
    ("約翰二書", "2 John", 1),
    ("約翰三書", "3 John", 1),
    ("猶大書", "Jude", 1),
    ("啟示錄", "Revelation", 22),
];

/// Number of books in the Old Testament part of `CANON`.
pub const OLD_TESTAMENT_LEN: usize = 39;

pub fn canonical_books() -> Vec<BookInfo> {
    CANON
        .iter()
        .map(|(name, _, chapters)| BookInfo {
            name: name.to_string(),
            chapter_num: *chapters,
        })
        .collect()
}

pub fn english_name(book: &str) -> Option<&'static str> {
    CANON
        .iter()
        .find(|(name, _, _)| *name == book)
        .map(|(_, eng, _)| *eng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canon_shape() {
        assert_eq!(CANON.len(), 66);
        assert_eq!(CANON[0].0, "創世記");
        assert_eq!(CANON[OLD_TESTAMENT_LEN - 1].0, "瑪拉基書");
        assert_eq!(CANON[OLD_TESTAMENT_LEN].0, "馬太福音");
        assert_eq!(CANON[65].0, "啟示錄");

        let total: u32 = CANON.iter().map(|(_, _, c)| c).sum();
        assert_eq!(total, 1189);
    }

    #[test]
    fn test_english_name() {
        assert_eq!(english_name("約翰福音"), Some("John"));
        assert_eq!(english_name("Unknown"), None);
    }

    #[test]
    fn test_canonical_books() {
        let books = canonical_books();
        assert_eq!(books.len(), 66);
        assert_eq!(books[18].name, "詩篇");
        assert_eq!(books[18].chapter_num, 150);
    }
}
