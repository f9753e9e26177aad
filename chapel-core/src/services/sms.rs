//! SMS segment counting for broadcasts
//!
//! A message that fits the GSM 03.38 alphabet is sent as 7-bit septets,
//! anything else as UCS-2. Multipart messages lose room to the
//! concatenation header, and a two-unit character (GSM escape sequence or
//! UTF-16 surrogate pair) is never split across parts.

use serde::Serialize;

const GSM7_SINGLE: usize = 160;
const GSM7_PART: usize = 153;
const UCS2_SINGLE: usize = 70;
const UCS2_PART: usize = 67;

/// GSM 03.38 basic character set (escape excluded)
const GSM7_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// Extension table, each costs an escape plus the character
const GSM7_EXTENDED: &str = "\u{000C}^{}\\[~]|€";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsEncoding {
    Gsm7,
    Ucs2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsSegments {
    pub encoding: SmsEncoding,
    /// Characters as the user typed them
    pub characters: usize,
    /// Septets (GSM-7) or UTF-16 code units (UCS-2)
    pub units: usize,
    pub segments: usize,
    /// Capacity of each segment for this message
    pub per_segment: usize,
    /// Units still free in the last segment
    pub remaining: usize,
}

impl SmsSegments {
    /// Billable messages when sent to `recipients` people, capped at `u64::MAX`
    pub fn messages_for(&self, recipients: u64) -> u64 {
        (self.segments as u64).saturating_mul(recipients)
    }

    pub fn exceeds(&self, max_segments: u32) -> bool {
        self.segments > max_segments as usize
    }
}

fn gsm7_cost(c: char) -> Option<usize> {
    if GSM7_BASIC.contains(c) {
        Some(1)
    } else if GSM7_EXTENDED.contains(c) {
        Some(2)
    } else {
        None
    }
}

/// Work out encoding and segment count for a message
pub fn count_segments(message: &str) -> SmsSegments {
    let gsm_costs: Option<Vec<usize>> = message.chars().map(gsm7_cost).collect();
    let (encoding, costs, single, part) = match gsm_costs {
        Some(costs) => (SmsEncoding::Gsm7, costs, GSM7_SINGLE, GSM7_PART),
        None => (
            SmsEncoding::Ucs2,
            message.chars().map(char::len_utf16).collect(),
            UCS2_SINGLE,
            UCS2_PART,
        ),
    };

    let units: usize = costs.iter().sum();
    let characters = costs.len();

    if units == 0 {
        return SmsSegments {
            encoding,
            characters,
            units,
            segments: 0,
            per_segment: single,
            remaining: single,
        };
    }

    if units <= single {
        return SmsSegments {
            encoding,
            characters,
            units,
            segments: 1,
            per_segment: single,
            remaining: single - units,
        };
    }

    let mut segments = 1;
    let mut filled = 0;
    for cost in costs {
        if filled + cost > part {
            segments += 1;
            filled = 0;
        }
        filled += cost;
    }

    SmsSegments {
        encoding,
        characters,
        units,
        segments,
        per_segment: part,
        remaining: part - filled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message() {
        let s = count_segments("");
        assert_eq!(s.segments, 0);
        assert_eq!(s.encoding, SmsEncoding::Gsm7);
    }

    #[test]
    fn test_single_gsm_segment_boundary() {
        let s = count_segments(&"a".repeat(160));
        assert_eq!(s.encoding, SmsEncoding::Gsm7);
        assert_eq!(s.segments, 1);
        assert_eq!(s.remaining, 0);

        let s = count_segments(&"a".repeat(161));
        assert_eq!(s.segments, 2);
        assert_eq!(s.per_segment, 153);
        assert_eq!(s.remaining, 153 * 2 - 161);
    }

    #[test]
    fn test_extended_characters_cost_two() {
        let s = count_segments("Offering: €50 [thanks]");
        assert_eq!(s.encoding, SmsEncoding::Gsm7);
        assert_eq!(s.characters, 22);
        assert_eq!(s.units, 25);
    }

    #[test]
    fn test_escape_sequence_not_split() {
        // 152 plain septets then a euro sign: it cannot straddle the boundary
        let message = format!("{}€{}", "a".repeat(152), "b".repeat(10));
        let s = count_segments(&message);
        assert_eq!(s.units, 164);
        assert_eq!(s.segments, 2);
        assert_eq!(s.remaining, 153 - 12);
    }

    #[test]
    fn test_unicode_switches_to_ucs2() {
        let s = count_segments("God bless you 🙏");
        assert_eq!(s.encoding, SmsEncoding::Ucs2);
        assert_eq!(s.units, 16);
        assert_eq!(s.segments, 1);
        assert_eq!(s.per_segment, 70);

        let s = count_segments(&"ẹ".repeat(71));
        assert_eq!(s.segments, 2);
        assert_eq!(s.per_segment, 67);
    }

    #[test]
    fn test_broadcast_billing() {
        let s = count_segments(&"a".repeat(200));
        assert_eq!(s.messages_for(250), 500);
        assert!(s.exceeds(1));
        assert!(!s.exceeds(2));
    }

    #[test]
    fn test_broadcast_billing_saturates() {
        let s = count_segments(&"a".repeat(200));
        assert_eq!(s.messages_for(u64::MAX), u64::MAX);
        assert_eq!(count_segments("").messages_for(u64::MAX), 0);
    }
}
