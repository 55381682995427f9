use baque_core::{
    resolve, KnowledgeBase, KnowledgeHandle, KnowledgeRecord, Resolver, Stage,
    STRUCTURED_CODE_HINT, UNPARSED_MESSAGE,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

fn record(question: &str, answer: &str) -> KnowledgeRecord {
    KnowledgeRecord::new(question, answer, "2025-03-26 19:10:34")
}

fn stage_of(query: &str, kb: &[KnowledgeRecord]) -> Stage {
    Resolver::default().resolve_with_stage(query, kb).stage
}

fn listed_lines(answer: &str) -> BTreeSet<String> {
    answer
        .lines()
        .filter(|line| line.starts_with('•'))
        .map(str::to_string)
        .collect()
}

macro_rules! multiplier_case {
    ($name:ident, $value:expr, $expected_rules:expr) => {
        #[test]
        fn $name() {
            let cjk = resolve(&format!("{}倍", $value), &[]);
            let latin = resolve(&format!("{}b", $value), &[]);
            let upper = resolve(&format!("{}B", $value), &[]);
            assert!(cjk.starts_with(&format!("八雀牌{}倍牌型：\n", $value)));
            assert_eq!(listed_lines(&cjk), listed_lines(&latin));
            assert_eq!(latin, upper);
            let lines = listed_lines(&cjk);
            assert_eq!(lines.len(), $expected_rules);
            let marker = format!("倍数x{}", $value);
            for line in &lines {
                let description = line.split('：').nth(1).expect("description");
                assert!(description.ends_with(&marker), "{line}");
            }
        }
    };
}

multiplier_case!(multiplier_100, 100, 4);
multiplier_case!(multiplier_50, 50, 1);
multiplier_case!(multiplier_32, 32, 4);
multiplier_case!(multiplier_16, 16, 2);
multiplier_case!(multiplier_8, 8, 3);
multiplier_case!(multiplier_4, 4, 3);
multiplier_case!(multiplier_2, 2, 1);
multiplier_case!(multiplier_1, 1, 1);

#[test]
fn exact_question_wins_case_insensitively() {
    let kb = vec![record("88B200", "AAAAAA8胡8")];
    assert_eq!(resolve("88b200", &kb), "AAAAAA8胡8");
    assert_eq!(resolve("  88B200 ", &kb), "AAAAAA8胡8");
    assert_eq!(stage_of("88b200", &kb), Stage::KnowledgeBase);
}

#[test]
fn most_recent_upsert_answers() {
    let mut kb = KnowledgeBase::from_records(vec![record("Q4B220", "old")]);
    kb.upsert("Q4B220", "new");
    assert_eq!(resolve("q4b220", kb.records()), "new");
    kb.upsert("q4b220", "newer");
    assert_eq!(resolve("Q4B220", kb.records()), "newer");
}

#[test]
fn structured_code_without_entry_gets_format_hint() {
    assert_eq!(resolve("K32b220", &[]), STRUCTURED_CODE_HINT);
    assert_eq!(stage_of("K32b220", &[]), Stage::StructuredCode);
    assert_ne!(resolve("K32b220", &[]), UNPARSED_MESSAGE);
}

#[test]
fn literal_sequence_totals() {
    let answer = resolve("666", &[]);
    assert!(answer.starts_with("答案: 30分\n"));
    assert!(answer.contains("3张6: 3 × 10分 = 30分"));

    let answer = resolve("66677", &[]);
    let lines: Vec<&str> = answer.lines().collect();
    assert_eq!(lines[0], "答案: 50分");
    assert_eq!(lines[3], "3张6: 3 × 10分 = 30分");
    assert_eq!(lines[4], "2张7: 2 × 10分 = 20分");
}

#[test]
fn ten_and_face_cards_score_by_band() {
    let answer = resolve("1010JJA", &[]);
    assert!(answer.starts_with("答案: 90分\n"));
    assert!(answer.contains("2张10: 2 × 10分 = 20分"));
    assert!(answer.contains("2张J: 2 × 20分 = 40分"));
    assert!(answer.contains("1张A: 1 × 30分 = 30分"));
}

#[test]
fn quantity_phrases_total() {
    let answer = resolve("一张6和两张A", &[]);
    assert_eq!(
        answer,
        "答案: 70分\n\n计算过程:\n1张6: 1 × 10分 = 10分\n2张A: 2 × 30分 = 60分\n"
    );
    assert_eq!(stage_of("一张6和两张A", &[]), Stage::CardCount);
}

#[test]
fn quantity_phrase_with_compound_numeral_is_dropped() {
    let answer = resolve("十一张6，三张k？", &[]);
    assert_eq!(answer, "答案: 60分\n\n计算过程:\n3张K: 3 × 20分 = 60分\n");
}

#[test]
fn marker_without_phrase_falls_back_to_sequence() {
    assert_eq!(
        resolve("666张", &[]),
        "答案: 30分\n\n计算过程:\n3张6: 3 × 10分 = 30分\n"
    );
    assert_eq!(stage_of("6张", &[]), Stage::CardCount);
    assert!(resolve("6张", &[]).starts_with("答案: 10分\n"));
}

#[test]
fn zero_count_phrase_is_dropped() {
    assert_eq!(
        resolve("0张6和两张A", &[]),
        "答案: 60分\n\n计算过程:\n2张A: 2 × 30分 = 60分\n"
    );
}

#[test]
fn shared_handle_answers_from_snapshots_across_threads() {
    let handle = Arc::new(KnowledgeHandle::new(KnowledgeBase::new()));
    let writer = {
        let handle = Arc::clone(&handle);
        thread::spawn(move || handle.update(|base| base.upsert("666", "三张6")))
    };
    writer.join().expect("writer thread");
    let snapshot = handle.snapshot();
    assert_eq!(resolve("666", snapshot.records()), "三张6");
    assert_eq!(stage_of("666", snapshot.records()), Stage::KnowledgeBase);
}

#[test]
fn multiplier_token_beats_card_count() {
    assert_eq!(stage_of("8b", &[]), Stage::Multiplier);
    assert_eq!(stage_of("8倍", &[]), Stage::Multiplier);
}

#[test]
fn rule_name_requires_exact_key() {
    assert_eq!(stage_of("平胡", &[]), Stage::RuleName);
    assert_ne!(stage_of("平胡 ", &[]), Stage::RuleName);
}

#[test]
fn stored_rule_name_answers_from_knowledge_base() {
    let kb = vec![record("平胡", "custom")];
    assert_eq!(resolve("平胡", &kb), "custom");
}

#[test]
fn unparseable_text_falls_back() {
    assert_eq!(resolve("how do I win", &[]), UNPARSED_MESSAGE);
    assert_eq!(resolve("", &[]), UNPARSED_MESSAGE);
}
