use serde::{Deserialize, Serialize};

pub const MULTIPLIER_MARKER: &str = "倍数x";

/// Multipliers that can be queried in bulk with `<N>倍` or `<N>b`.
pub const MULTIPLIER_VALUES: [u32; 8] = [100, 50, 32, 16, 8, 4, 2, 1];

const BUILTIN_RULES: &[(&str, &str)] = &[
    ("独一无二", "由八张A组成，倍数x100"),
    ("君临天下", "由八张K组成，倍数x100"),
    ("十全十美", "由八张10组成，倍数x100"),
    ("八方来财", "由八张8组成，倍数x100"),
    ("顶峰相见", "由K和A构成6+2组合的部分，倍数x32"),
    ("心心相连", "由J和Q构成6+2组合的部分，倍数x32"),
    ("十拿九稳", "由10和9构成6+2组合的部分，倍数x32"),
    ("六事兴旺", "由6和7构成6+2组合的部分，倍数x32"),
    ("八方来贺", "凑成完整的8张牌，可以是同花顺或8炸，倍数x50"),
    ("比翼为邻", "凑成6+2的组合，两组是相邻的同点数，倍数x16"),
    ("六朝金粉", "凑成6+2的组合，八张牌都是同颜色，倍数x16"),
    ("六六大顺", "凑成6+2的组合，可以是同花顺或同数组，倍数x8"),
    ("永恒相随", "凑成5+3的组合，两组是相邻的同点数，倍数x8"),
    ("五谷丰登", "凑成5+3的组合，八张牌都是同颜色，倍数x8"),
    ("五福临门", "凑成5+3的组合，可以是同花顺或同数组，倍数x4"),
    ("二龙腾飞", "凑成4+4的组合，两组是相邻的同点数，倍数x4"),
    ("四季发财", "凑成4+4的组合，八张牌都是同颜色，倍数x4"),
    ("四季如春", "凑成4+4的组合，可以是同花顺或同数组，倍数x2"),
    ("平胡", "凑成3+3+2的组合，其中2要求为一对，倍数x1"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleEntry {
    pub name: String,
    pub description: String,
}

impl RuleEntry {
    /// The integer written after `倍数x` in the description, if any.
    pub fn multiplier(&self) -> Option<u32> {
        multiplier_in(&self.description)
    }
}

/// Pattern name to description, in table order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleTable {
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_RULES.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, description)| RuleEntry {
                    name: name.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Exact, case-sensitive lookup by pattern name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.description.as_str())
    }

    pub fn with_multiplier(&self, value: u32) -> impl Iterator<Item = &RuleEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.multiplier() == Some(value))
    }
}

fn multiplier_in(description: &str) -> Option<u32> {
    let (_, rest) = description.split_once(MULTIPLIER_MARKER)?;
    let digits: String = rest.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Reads `100倍`, `16b`, `2B` ... into the multiplier value. Anything outside
/// the closed token set is `None`.
pub fn parse_multiplier_token(query: &str) -> Option<u32> {
    let lowered = query.trim().to_lowercase();
    let number = lowered
        .strip_suffix('倍')
        .or_else(|| lowered.strip_suffix('b'))?;
    MULTIPLIER_VALUES
        .into_iter()
        .find(|value| value.to_string() == number)
}
