use crate::numerals::{is_numeral_char, parse_numeral};
use crate::{CardSymbol, ParsedCardToken};

pub const QUANTITY_MARKER: char = '张';

/// Finds every `<count>张<card>` phrase in a cleaned query, left to right.
///
/// The count is the whole numeral run in front of the marker. A run that does
/// not normalise (`十一张6`) or counts zero (`0张6`) drops that phrase only;
/// later phrases are still collected.
pub fn extract_quantity_phrases(cleaned: &str) -> Vec<ParsedCardToken> {
    let chars: Vec<char> = cleaned.chars().collect();
    let mut tokens = Vec::new();
    let mut idx = 0usize;
    while idx < chars.len() {
        if !is_numeral_char(chars[idx]) {
            idx += 1;
            continue;
        }
        let run_start = idx;
        while idx < chars.len() && is_numeral_char(chars[idx]) {
            idx += 1;
        }
        if chars.get(idx) != Some(&QUANTITY_MARKER) {
            continue;
        }
        let Some((card, width)) = card_at(&chars, idx + 1) else {
            idx += 1;
            continue;
        };
        let numeral: String = chars[run_start..idx].iter().collect();
        if let Some(count) = parse_numeral(&numeral).filter(|count| *count > 0) {
            tokens.push(ParsedCardToken::new(card, count));
        }
        idx += 1 + width;
    }
    tokens
}

fn card_at(chars: &[char], idx: usize) -> Option<(CardSymbol, usize)> {
    match *chars.get(idx)? {
        '1' if chars.get(idx + 1) == Some(&'0') => Some((CardSymbol::Ten, 2)),
        '1' => None,
        ch => {
            let mut buf = [0u8; 4];
            CardSymbol::from_code(ch.encode_utf8(&mut buf)).map(|card| (card, 1))
        }
    }
}
