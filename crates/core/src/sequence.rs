use crate::{CardSymbol, ParsedCardToken};

const STRIPPED_PUNCTUATION: &[char] = &['?', '？', '，', '。', ',', '.', '、', '!', '！'];

/// Normalises a free-text query before card parsing: drops punctuation,
/// collapses whitespace runs to one space, trims and uppercases.
pub fn clean_query(query: &str) -> String {
    let stripped: String = query
        .chars()
        .filter(|ch| !STRIPPED_PUNCTUATION.contains(ch))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Run-length decodes a literal card sequence such as `"66677"` or
/// `"1010A"`. Characters outside `0-9JQKA` are dropped before scanning, and
/// digits that do not form a card (`1`, `0`, `2`-`5` on their own) are
/// skipped without closing the current run.
///
/// A symbol that reappears after a different one starts a new entry, so
/// `"676"` yields three tokens. Empty when no card was seen.
pub fn tokenize_sequence(cleaned: &str) -> Vec<ParsedCardToken> {
    let chars: Vec<char> = cleaned
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, 'J' | 'Q' | 'K' | 'A'))
        .collect();
    let mut tokens = Vec::new();
    let mut current: Option<ParsedCardToken> = None;
    let mut idx = 0usize;
    while idx < chars.len() {
        let symbol = if chars[idx] == '1' && chars.get(idx + 1) == Some(&'0') {
            idx += 2;
            Some(CardSymbol::Ten)
        } else {
            let mut buf = [0u8; 4];
            let code = chars[idx].encode_utf8(&mut buf);
            idx += 1;
            CardSymbol::from_code(code)
        };
        let Some(symbol) = symbol else {
            continue;
        };
        match current.as_mut() {
            Some(run) if run.card == symbol => run.count += 1,
            _ => {
                if let Some(run) = current.take() {
                    tokens.push(run);
                }
                current = Some(ParsedCardToken::new(symbol, 1));
            }
        }
    }
    if let Some(run) = current {
        tokens.push(run);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CardSymbol::*;

    fn tokens(input: &str) -> Vec<(CardSymbol, u32)> {
        tokenize_sequence(&clean_query(input))
            .into_iter()
            .map(|t| (t.card, t.count))
            .collect()
    }

    #[test]
    fn cleans_punctuation_and_whitespace() {
        assert_eq!(clean_query("  6 6,  6？ "), "6 6 6");
        assert_eq!(clean_query("一张q和两张a!"), "一张Q和两张A");
    }

    #[test]
    fn groups_contiguous_runs() {
        assert_eq!(tokens("666"), vec![(Six, 3)]);
        assert_eq!(tokens("66677"), vec![(Six, 3), (Seven, 2)]);
    }

    #[test]
    fn reads_ten_as_one_token() {
        assert_eq!(tokens("101010"), vec![(Ten, 3)]);
        assert_eq!(tokens("910J"), vec![(Nine, 1), (Ten, 1), (Jack, 1)]);
    }

    #[test]
    fn non_contiguous_repeats_are_separate_runs() {
        assert_eq!(tokens("676"), vec![(Six, 1), (Seven, 1), (Six, 1)]);
    }

    #[test]
    fn skipped_characters_do_not_break_runs() {
        assert_eq!(tokens("6 6 6"), vec![(Six, 3)]);
        assert_eq!(tokens("6x6"), vec![(Six, 2)]);
        assert_eq!(tokens("626"), vec![(Six, 2)]);
        assert_eq!(tokens("kkaa"), vec![(King, 2), (Ace, 2)]);
    }

    #[test]
    fn empty_when_no_card_is_present() {
        assert!(tokens("").is_empty());
        assert!(tokens("hello").is_empty());
        assert!(tokens("12345").is_empty());
    }
}
