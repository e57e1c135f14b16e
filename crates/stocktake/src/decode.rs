//! Scan payload decoding
//!
//! Turns whatever the capture surface received (keyboard entry, a hardware
//! scanner, a camera QR reader) into a product code and an optional batch.
//!
//! Rules, first match wins:
//! 1. blank input decodes to nothing
//! 2. a trailing `.0` left by spreadsheet number coercion is dropped
//! 3. an all-digit payload is the product code as-is
//! 4. anything else is read as a GS1 composite: AI `01` + 14 digits is the
//!    GTIN (searched with whitespace removed), AI `10` + a run of
//!    non-whitespace is the batch (searched with whitespace kept, so a space
//!    ends the batch)
//! 5. with no GTIN found the trimmed payload itself is the product code
//!
//! Decoding never fails. An unreadable scan still yields a product code so a
//! line is never dropped; a human reconciles it later.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static GTIN_AI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"01([0-9]{14})").unwrap());
static BATCH_AI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"10(\S+)").unwrap());

const SPREADSHEET_SUFFIX: &str = ".0";

/// Product code and batch extracted from one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedScan {
    pub barcode: String,
    pub batch: String,
}

impl DecodedScan {
    pub fn is_empty(&self) -> bool {
        self.barcode.is_empty()
    }

    pub fn has_batch(&self) -> bool {
        !self.batch.is_empty()
    }
}

/// Which rule produced a [`DecodedScan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// Nothing was scanned.
    Empty,
    /// Plain numeric barcode.
    Numeric,
    /// Composite payload carrying a GTIN.
    Gs1,
    /// Composite payload without a GTIN; the raw text is the product code.
    Raw,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Empty => "empty",
            ScanKind::Numeric => "numeric",
            ScanKind::Gs1 => "gs1",
            ScanKind::Raw => "raw",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeDetail {
    #[serde(flatten)]
    pub scan: DecodedScan,
    pub kind: ScanKind,
}

/// Decode a raw scanner payload.
pub fn decode(raw: &str) -> DecodedScan {
    decode_detailed(raw).scan
}

/// Decode a raw scanner payload and report which rule applied.
pub fn decode_detailed(raw: &str) -> DecodeDetail {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DecodeDetail {
            scan: DecodedScan::default(),
            kind: ScanKind::Empty,
        };
    }

    // A bare ".0" keeps its text; stripping it would leave no product code.
    let value = match trimmed.strip_suffix(SPREADSHEET_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => trimmed,
    };

    if value.bytes().all(|b| b.is_ascii_digit()) {
        return DecodeDetail {
            scan: DecodedScan {
                barcode: value.to_string(),
                batch: String::new(),
            },
            kind: ScanKind::Numeric,
        };
    }

    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let gtin = GTIN_AI.captures(&compact).and_then(|caps| {
        let element = caps.get(0)?;
        let digits = caps.get(1)?.as_str();
        Some((element.start(), element.end(), normalize_gtin(digits)))
    });

    match gtin {
        Some((start, end, barcode)) => {
            let (before, after) = split_around(value, &compact, start, end);
            let batch = find_batch(before).or_else(|| find_batch(after));
            DecodeDetail {
                scan: DecodedScan {
                    barcode,
                    batch: batch.unwrap_or_default(),
                },
                kind: ScanKind::Gs1,
            }
        }
        None => DecodeDetail {
            scan: DecodedScan {
                barcode: value.to_string(),
                batch: find_batch(value).unwrap_or_default(),
            },
            kind: ScanKind::Raw,
        },
    }
}

/// GTIN-14 with a leading zero is the GTIN-13 printed on the pack.
fn normalize_gtin(digits: &str) -> String {
    match digits.strip_prefix('0') {
        Some(gtin13) if digits.len() == 14 => gtin13.to_string(),
        _ => digits.to_string(),
    }
}

fn find_batch(haystack: &str) -> Option<String> {
    BATCH_AI
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split `value` into the text before and after the GTIN element.
///
/// `start..end` are byte offsets into `compact`, the whitespace-free copy of
/// `value`. The batch search runs on the whitespace-preserving text, so the
/// element is located there by counting non-whitespace characters.
fn split_around<'a>(value: &'a str, compact: &str, start: usize, end: usize) -> (&'a str, &'a str) {
    let skip = compact[..start].chars().count();
    let take = compact[start..end].chars().count();

    let mut visible = value
        .char_indices()
        .filter(|(_, c)| !c.is_whitespace());

    let Some((element_start, _)) = visible.nth(skip) else {
        return (value, "");
    };
    let element_end = match visible.nth(take.saturating_sub(2)) {
        Some((idx, c)) => idx + c.len_utf8(),
        None => value.len(),
    };

    (&value[..element_start], &value[element_end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(barcode: &str, batch: &str) -> DecodedScan {
        DecodedScan {
            barcode: barcode.to_string(),
            batch: batch.to_string(),
        }
    }

    #[test]
    fn test_blank_input_decodes_to_nothing() {
        assert_eq!(decode(""), DecodedScan::default());
        assert_eq!(decode("   \t\n"), DecodedScan::default());
        assert_eq!(decode_detailed(" ").kind, ScanKind::Empty);
    }

    #[test]
    fn test_numeric_barcode_passes_through() {
        assert_eq!(decode("6297000859002"), decoded("6297000859002", ""));
        assert_eq!(decode("  6297000859002 "), decoded("6297000859002", ""));
        assert_eq!(decode_detailed("6297000859002").kind, ScanKind::Numeric);
    }

    #[test]
    fn test_spreadsheet_suffix_is_stripped() {
        assert_eq!(decode("6297000859002.0"), decoded("6297000859002", ""));
        assert_eq!(decode_detailed("6297000859002.0").kind, ScanKind::Numeric);
    }

    #[test]
    fn test_bare_spreadsheet_suffix_keeps_text() {
        assert_eq!(decode(".0"), decoded(".0", ""));
    }

    #[test]
    fn test_digit_only_payload_never_parsed_as_composite() {
        // Contains "01" + 14 digits, but digit-only scans short-circuit.
        let raw = "990106297000859002";
        assert_eq!(decode(raw), decoded(raw, ""));
    }

    #[test]
    fn test_gs1_composite_with_gtin_and_batch() {
        let detail = decode_detailed("0106297000859002211ACH0W6N3C 1015DX1A 17270228");
        assert_eq!(detail.kind, ScanKind::Gs1);
        assert_eq!(detail.scan.barcode, "6297000859002");
        // AI 10 value runs to the next space and excludes the GTIN element.
        assert_eq!(detail.scan.batch, "15DX1A");
    }

    #[test]
    fn test_batch_search_skips_gtin_element() {
        // "0106..." contains "10" inside the GTIN element; it is not a batch.
        let detail = decode_detailed("0106297000859002 10LOT");
        assert_eq!(detail.kind, ScanKind::Gs1);
        assert_eq!(detail.scan, decoded("6297000859002", "LOT"));
        assert_eq!(decode("0106297000859002 17270228").batch, "");
    }

    #[test]
    fn test_gtin_without_leading_zero_keeps_fourteen_digits() {
        let scan = decode("0112345678901231 10LOT7");
        assert_eq!(scan, decoded("12345678901231", "LOT7"));
    }

    #[test]
    fn test_gtin_found_across_embedded_whitespace() {
        let scan = decode("01 0629700 0859002 10B77");
        assert_eq!(scan, decoded("6297000859002", "B77"));
    }

    #[test]
    fn test_gtin_without_batch() {
        let scan = decode("0106297000859002 17270228");
        assert_eq!(scan, decoded("6297000859002", ""));
    }

    #[test]
    fn test_batch_before_gtin_element() {
        let scan = decode("10ABC 0106297000859002");
        assert_eq!(scan, decoded("6297000859002", "ABC"));
    }

    #[test]
    fn test_batch_without_gtin_keeps_raw_text() {
        let detail = decode_detailed("LOT 10XY9 Z");
        assert_eq!(detail.kind, ScanKind::Raw);
        assert_eq!(detail.scan, decoded("LOT 10XY9 Z", "XY9"));
    }

    #[test]
    fn test_unreadable_payload_fails_open() {
        let scan = decode("garbage-no-ai-markers");
        assert_eq!(scan, decoded("garbage-no-ai-markers", ""));
        assert_eq!(decode_detailed("garbage-no-ai-markers").kind, ScanKind::Raw);
    }

    #[test]
    fn test_non_blank_input_always_yields_barcode() {
        for raw in [
            "x",
            ".0",
            "0",
            "01",
            "10",
            "1.0",
            "  a b  ",
            "0106297000859002",
            "\u{00e9}t\u{00e9} 10lot",
        ] {
            assert!(!decode(raw).barcode.is_empty(), "empty barcode for {:?}", raw);
        }
    }

    #[test]
    fn test_unicode_digits_are_not_numeric() {
        // Arabic-Indic digits are not a numeric barcode.
        let raw = "\u{0666}\u{0662}\u{0669}";
        assert_eq!(decode_detailed(raw).kind, ScanKind::Raw);
        assert_eq!(decode(raw).barcode, raw);
    }

    #[test]
    fn test_split_around_maps_compact_offsets() {
        let value = "AB 01 06297000859002 tail";
        let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        let m = GTIN_AI.find(&compact).unwrap();
        let (before, after) = split_around(value, &compact, m.start(), m.end());
        assert_eq!(before, "AB ");
        assert_eq!(after, " tail");
    }

    #[test]
    fn test_decode_is_deterministic() {
        let raw = "0106297000859002211ACH0W6N3C 1015DX1A 17270228";
        assert_eq!(decode(raw), decode(raw));
    }
}
