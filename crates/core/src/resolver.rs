//! Free-text strategy lookup.
//!
//! A query is offered to each [`Stage`] in [`Stage::ORDER`]; the first stage
//! that answers wins. The order decides ambiguous inputs (a query that is both
//! a stored question and a literal card sequence answers from the store), so
//! it is part of the contract.

use crate::knowledge::{lookup, KnowledgeRecord};
use crate::phrase::{extract_quantity_phrases, QUANTITY_MARKER};
use crate::rules::{parse_multiplier_token, RuleTable};
use crate::sequence::{clean_query, tokenize_sequence};
use crate::ParsedCardToken;
use serde::{Deserialize, Serialize};

pub const STRUCTURED_CODE_HINT: &str = "未找到匹配的八雀牌组合。\n\n查询格式说明：\n1. 第一位：表示胡的牌\n2. 中间：倍数+b\n3. 最后：分数\n例如：K32b220";

pub const UNPARSED_MESSAGE: &str = "无法解析问题。请尝试输入如 '666' 或 '一张6和两张A'";

const HELP_TOPICS: &[(&str, &str)] = &[
    ("问题1", "判断牌局优势技巧...\n(请参考帮助文档)"),
    ("问题2", "计算出牌概率的方法...\n(请参考帮助文档)"),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Stage {
    KnowledgeBase,
    Multiplier,
    RuleName,
    StructuredCode,
    CardCount,
    Help,
}

impl Stage {
    pub const ORDER: [Stage; 6] = [
        Stage::KnowledgeBase,
        Stage::Multiplier,
        Stage::RuleName,
        Stage::StructuredCode,
        Stage::CardCount,
        Stage::Help,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Stage::KnowledgeBase => "knowledge_base",
            Stage::Multiplier => "multiplier",
            Stage::RuleName => "rule_name",
            Stage::StructuredCode => "structured_code",
            Stage::CardCount => "card_count",
            Stage::Help => "help",
        }
    }

    fn strategy(self) -> StageFn {
        match self {
            Stage::KnowledgeBase => knowledge_stage,
            Stage::Multiplier => multiplier_stage,
            Stage::RuleName => rule_name_stage,
            Stage::StructuredCode => structured_code_stage,
            Stage::CardCount => card_count_stage,
            Stage::Help => help_stage,
        }
    }
}

type StageFn = fn(&Resolver, &str, &[KnowledgeRecord]) -> Option<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub stage: Stage,
    pub answer: String,
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    rules: RuleTable,
}

impl Resolver {
    pub fn with_rules(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn resolve(&self, query: &str, knowledge: &[KnowledgeRecord]) -> String {
        self.resolve_with_stage(query, knowledge).answer
    }

    pub fn resolve_with_stage(&self, query: &str, knowledge: &[KnowledgeRecord]) -> Resolution {
        Stage::ORDER
            .into_iter()
            .find_map(|stage| {
                (stage.strategy())(self, query, knowledge).map(|answer| Resolution { stage, answer })
            })
            .unwrap_or_else(|| Resolution {
                stage: Stage::Help,
                answer: UNPARSED_MESSAGE.to_string(),
            })
    }

    /// Runs a single stage in isolation.
    pub fn try_stage(
        &self,
        stage: Stage,
        query: &str,
        knowledge: &[KnowledgeRecord],
    ) -> Option<String> {
        (stage.strategy())(self, query, knowledge)
    }
}

/// Resolves against the built-in rule table.
pub fn resolve(query: &str, knowledge: &[KnowledgeRecord]) -> String {
    Resolver::default().resolve(query, knowledge)
}

fn knowledge_stage(_: &Resolver, query: &str, knowledge: &[KnowledgeRecord]) -> Option<String> {
    lookup(knowledge, query).map(|record| record.answer.clone())
}

fn multiplier_stage(resolver: &Resolver, query: &str, _: &[KnowledgeRecord]) -> Option<String> {
    let target = parse_multiplier_token(query)?;
    let mut answer = format!("八雀牌{target}倍牌型：\n");
    for entry in resolver.rules.with_multiplier(target) {
        answer.push_str(&format!("• {}：{}\n", entry.name, entry.description));
    }
    Some(answer)
}

fn rule_name_stage(resolver: &Resolver, query: &str, _: &[KnowledgeRecord]) -> Option<String> {
    resolver
        .rules
        .get(query)
        .map(|description| format!("规则说明：{description}"))
}

fn structured_code_stage(_: &Resolver, query: &str, _: &[KnowledgeRecord]) -> Option<String> {
    parse_structured_code(query).map(|_| STRUCTURED_CODE_HINT.to_string())
}

fn card_count_stage(_: &Resolver, query: &str, _: &[KnowledgeRecord]) -> Option<String> {
    let cleaned = clean_query(query);
    let tokens = card_tokens(&cleaned);
    if tokens.is_empty() {
        return None;
    }
    Some(render_card_count(&tokens))
}

fn help_stage(_: &Resolver, query: &str, _: &[KnowledgeRecord]) -> Option<String> {
    let text = HELP_TOPICS
        .iter()
        .find(|(marker, _)| query.contains(marker))
        .map_or(UNPARSED_MESSAGE, |(_, text)| *text);
    Some(text.to_string())
}

/// Literal sequence first. A phrase query (one containing `张`) tries the
/// quantity extractor first since its digits are counts, and falls back to
/// the sequence when no phrase matches (`666张`).
pub fn card_tokens(cleaned: &str) -> Vec<ParsedCardToken> {
    if cleaned.contains(QUANTITY_MARKER) {
        let phrases = extract_quantity_phrases(cleaned);
        if !phrases.is_empty() {
            return phrases;
        }
    }
    tokenize_sequence(cleaned)
}

pub fn render_card_count(tokens: &[ParsedCardToken]) -> String {
    let total: u64 = tokens.iter().map(ParsedCardToken::subtotal).sum();
    let mut answer = format!("答案: {total}分\n\n计算过程:\n");
    for token in tokens {
        answer.push_str(&format!(
            "{count}张{card}: {count} × {point}分 = {subtotal}分\n",
            count = token.count,
            card = token.card,
            point = token.card.point_value(),
            subtotal = token.subtotal(),
        ));
    }
    answer
}

/// Shorthand strategy code such as `K32b220`: winning card, multiplier run,
/// `b`, score run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredCode<'a> {
    pub winning: char,
    pub multiplier: &'a str,
    pub score: &'a str,
}

pub fn parse_structured_code(query: &str) -> Option<StructuredCode<'_>> {
    let winning = query.chars().next()?;
    if !(winning.is_ascii_digit() || matches!(winning, 'J' | 'Q' | 'K' | 'A')) {
        return None;
    }
    let body = &query[winning.len_utf8()..];
    let split = body.find(|ch: char| !ch.is_ascii_digit())?;
    let (multiplier, rest) = body.split_at(split);
    let score = rest.strip_prefix(|ch: char| ch == 'b' || ch == 'B')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(multiplier) || !all_digits(score) {
        return None;
    }
    Some(StructuredCode {
        winning,
        multiplier,
        score,
    })
}
