/// Single-character Chinese numerals accepted as card counts.
const CHINESE_NUMERALS: [(char, u32); 11] = [
    ('一', 1),
    ('二', 2),
    ('两', 2),
    ('三', 3),
    ('四', 4),
    ('五', 5),
    ('六', 6),
    ('七', 7),
    ('八', 8),
    ('九', 9),
    ('十', 10),
];

pub fn is_numeral_char(ch: char) -> bool {
    ch.is_ascii_digit() || chinese_numeral(ch).is_some()
}

fn chinese_numeral(ch: char) -> Option<u32> {
    CHINESE_NUMERALS
        .iter()
        .find(|(numeral, _)| *numeral == ch)
        .map(|(_, value)| *value)
}

/// Reads a count token: a run of ASCII digits, or exactly one Chinese
/// numeral character. Compounds such as `十一` and mixed runs are not numbers.
pub fn parse_numeral(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().ok();
    }
    let mut chars = token.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    chinese_numeral(first)
}
