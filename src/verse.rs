//! Verse ranges: the compact filename token, the sortable integer location,
//! and the two rendered reference forms.
//!
//! A token joins chapter and verse with `_` and a range with `-`:
//!
//! | Token        | Meaning                     |
//! |--------------|-----------------------------|
//! | `1_57`       | chapter 1, verse 57         |
//! | `1_57-58`    | chapter 1, verses 57 to 58  |
//! | `1_57-2_32`  | 1:57 through 2:32           |

use std::fmt;
use std::str::FromStr;

use crate::books::osis_abbreviation;
use crate::error::CompileError;

/// Multiplier that packs a chapter and a verse into one sortable integer.
pub const CHAPTER_FACTOR: i64 = 1_000_000;

/// An inclusive span of verses.
///
/// Start is expected to precede end, but nothing enforces it: the parser
/// takes the token at its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseRange {
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
}

impl VerseRange {
    pub fn single(chapter: u32, verse: u32) -> Self {
        Self {
            start_chapter: chapter,
            start_verse: verse,
            end_chapter: chapter,
            end_verse: verse,
        }
    }

    pub fn is_single_verse(&self) -> bool {
        self.start_chapter == self.end_chapter && self.start_verse == self.end_verse
    }

    pub fn location_start(&self) -> i64 {
        encode(self.start_chapter, self.start_verse)
    }

    pub fn location_end(&self) -> i64 {
        encode(self.end_chapter, self.end_verse)
    }
}

impl FromStr for VerseRange {
    type Err = CompileError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || CompileError::MalformedVerseRange(token.to_string());

        let pieces = token
            .split(['_', '-'])
            .map(|p| p.parse::<u32>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;

        match pieces.as_slice() {
            &[chapter, verse] => Ok(VerseRange::single(chapter, verse)),
            &[chapter, start_verse, end_verse] => Ok(VerseRange {
                start_chapter: chapter,
                start_verse,
                end_chapter: chapter,
                end_verse,
            }),
            &[start_chapter, start_verse, end_chapter, end_verse] => Ok(VerseRange {
                start_chapter,
                start_verse,
                end_chapter,
                end_verse,
            }),
            _ => Err(malformed()),
        }
    }
}

/// Renders the filename token form, the inverse of [`FromStr`].
impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.start_chapter, self.start_verse)?;
        if self.is_single_verse() {
            Ok(())
        } else if self.start_chapter == self.end_chapter {
            write!(f, "-{}", self.end_verse)
        } else {
            write!(f, "-{}_{}", self.end_chapter, self.end_verse)
        }
    }
}

/// Packs a chapter/verse pair into one integer that sorts in reading order
/// (valid while verses stay below [`CHAPTER_FACTOR`]).
pub fn encode(chapter: u32, verse: u32) -> i64 {
    i64::from(chapter) * CHAPTER_FACTOR + i64::from(verse)
}

/// Human reference such as `John 3:16`, `John 3:16-18` or `John 3:16-4:2`.
///
/// The book name is used verbatim (trimmed), so this never fails.
pub fn reference(book: &str, range: &VerseRange) -> String {
    let book = book.trim();
    if range.start_chapter == range.end_chapter {
        if range.start_verse == range.end_verse {
            return format!("{} {}:{}", book, range.start_chapter, range.start_verse);
        }
        return format!(
            "{} {}:{}-{}",
            book, range.start_chapter, range.start_verse, range.end_verse
        );
    }
    format!(
        "{} {}:{}-{}:{}",
        book, range.start_chapter, range.start_verse, range.end_chapter, range.end_verse
    )
}

/// OSIS reference such as `John.3.16` or `John.3.16-John.3.18`.
pub fn canonical_ref(book: &str, range: &VerseRange) -> Result<String, CompileError> {
    let book = book.trim();
    let abbr = osis_abbreviation(book)
        .ok_or_else(|| CompileError::UnknownBookAbbreviation(book.to_string()))?;

    if range.is_single_verse() {
        return Ok(format!(
            "{}.{}.{}",
            abbr, range.start_chapter, range.start_verse
        ));
    }
    Ok(format!(
        "{abbr}.{}.{}-{abbr}.{}.{}",
        range.start_chapter, range.start_verse, range.end_chapter, range.end_verse
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sc: u32, sv: u32, ec: u32, ev: u32) -> VerseRange {
        VerseRange {
            start_chapter: sc,
            start_verse: sv,
            end_chapter: ec,
            end_verse: ev,
        }
    }

    #[test]
    fn parses_single_verse() {
        let vr: VerseRange = "1_57".parse().unwrap();
        assert_eq!(vr, range(1, 57, 1, 57));
    }

    #[test]
    fn parses_same_chapter_range() {
        let vr: VerseRange = "1_57-58".parse().unwrap();
        assert_eq!(vr, range(1, 57, 1, 58));
    }

    #[test]
    fn parses_cross_chapter_range() {
        let vr: VerseRange = "1_57-2_32".parse().unwrap();
        assert_eq!(vr, range(1, 57, 2, 32));
    }

    #[test]
    fn rejects_wrong_piece_counts() {
        for token in ["3", "1_2-3_4-5", "", "1_2_3_4_5"] {
            match token.parse::<VerseRange>() {
                Err(CompileError::MalformedVerseRange(t)) => assert_eq!(t, token),
                other => panic!("expected MalformedVerseRange for {:?}, got {:?}", token, other),
            }
        }
    }

    #[test]
    fn rejects_non_numeric_pieces() {
        for token in ["a_1", "1_b", "1_2-x", "1_2-3_", "1.5_2"] {
            assert!(
                matches!(
                    token.parse::<VerseRange>(),
                    Err(CompileError::MalformedVerseRange(_))
                ),
                "{} should be rejected",
                token
            );
        }
    }

    #[test]
    fn token_round_trips() {
        for token in ["3_16", "7_1-9", "1_57-2_32", "150_1", "12_1-12_1"] {
            let vr: VerseRange = token.parse().unwrap();
            let rendered = vr.to_string();
            let reparsed: VerseRange = rendered.parse().unwrap();
            assert_eq!(vr, reparsed, "token {} rendered as {}", token, rendered);
        }
        assert_eq!("7_1-9".parse::<VerseRange>().unwrap().to_string(), "7_1-9");
        assert_eq!(
            "1_57-2_32".parse::<VerseRange>().unwrap().to_string(),
            "1_57-2_32"
        );
    }

    #[test]
    fn encode_examples() {
        assert_eq!(encode(3, 16), 3_000_016);
        assert_eq!(encode(1, 1), 1_000_001);
        assert_eq!(encode(0, 0), 0);
    }

    #[test]
    fn encode_is_strictly_increasing() {
        let samples = [
            (1, 1),
            (1, 2),
            (1, 999),
            (1, 999_999),
            (2, 0),
            (2, 1),
            (10, 5),
            (150, 6),
            (999, 999_999),
        ];
        for pair in samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(encode(a.0, a.1) < encode(b.0, b.1), "{:?} !< {:?}", a, b);
        }
    }

    #[test]
    fn location_bounds() {
        let vr = range(1, 57, 2, 32);
        assert_eq!(vr.location_start(), 1_000_057);
        assert_eq!(vr.location_end(), 2_000_032);
    }

    #[test]
    fn reference_forms() {
        assert_eq!(reference("John", &range(3, 16, 3, 16)), "John 3:16");
        assert_eq!(reference("John", &range(3, 16, 3, 18)), "John 3:16-18");
        assert_eq!(reference("John", &range(3, 16, 4, 2)), "John 3:16-4:2");
        assert_eq!(reference(" 1 Corinthians ", &range(7, 1, 7, 9)), "1 Corinthians 7:1-9");
    }

    #[test]
    fn reference_accepts_unknown_books() {
        assert_eq!(reference("Didache", &range(1, 1, 1, 1)), "Didache 1:1");
    }

    #[test]
    fn canonical_ref_forms() {
        assert_eq!(canonical_ref("John", &range(3, 16, 3, 16)).unwrap(), "John.3.16");
        assert_eq!(
            canonical_ref("John", &range(3, 16, 3, 18)).unwrap(),
            "John.3.16-John.3.18"
        );
        assert_eq!(
            canonical_ref("1 Corinthians", &range(7, 1, 8, 2)).unwrap(),
            "1Cor.7.1-1Cor.8.2"
        );
        assert_eq!(canonical_ref(" Psalm ", &range(23, 1, 23, 1)).unwrap(), "Ps.23.1");
    }

    #[test]
    fn canonical_ref_rejects_unknown_books() {
        match canonical_ref("Didache", &range(1, 1, 1, 1)) {
            Err(CompileError::UnknownBookAbbreviation(book)) => assert_eq!(book, "Didache"),
            other => panic!("expected UnknownBookAbbreviation, got {:?}", other),
        }
    }
}
