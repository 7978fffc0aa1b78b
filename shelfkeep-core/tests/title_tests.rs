//! Title sanitization tests for shelfkeep-core
//!
//! Scenario tests use real titles from a Chinese e-book library; property
//! tests cover the invariants of the structural cleaner and tokenizer.

use proptest::prelude::*;
use shelfkeep_core::title::{
    classify, clean_title_strict, clean_title_structural, tokenize, BracketPair, Segment,
};

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_boxed_set_survives_blurbs_dropped() {
    let title = "民国印记（套装3本） 民国风度（回顾一个绝代芳华的时代，怀念一种活色生香的生活。曾经有那样一个时代，曾经有那样一批人物，他们那样地想着，那样地活着，有些清贫，有些窘迫，却又别样鲜活。） 民国印象：唯有时间，懂得爱（一切都会过去，时光会流逝，人会老去，唯有爱，不惧时光。时光沉淀了爱情的深，于是执手成说，于是那些人鲜活了，那些写满爱的旧纸张温软了。） 再见时光里的一瞥惊鸿（风物闲美、旧时掠影、遣怀故友等等，这里有你想看的每个类型的美文，它们承载着民国大家生活的点滴记忆。） ...";
    insta::assert_snapshot!(clean_title_structural(title), @"民国印记（套装3本）");
}

#[test]
fn test_short_qualifiers_unchanged() {
    let title = "课外英语-美国总统演讲选萃(上)（双语版）";
    assert_eq!(clean_title_structural(title), title);
}

#[test]
fn test_edition_kept() {
    let title = "深入理解Java虚拟机：JVM高级特性与最佳实践（第3版）";
    assert_eq!(clean_title_structural(title), title);
}

#[test]
fn test_long_promotional_span_removed() {
    let title = "第二座山（第一座山是构建自我、定义自我，其意义在于获取；第二座山是摆脱自我、舍弃自我，其意义在于奉献。）";
    insta::assert_snapshot!(clean_title_structural(title), @"第二座山");
}

#[test]
fn test_collection_with_nested_blurb() {
    let title = "《大江大河》作者阿耐合集（共12册）（含《大江大河》(全4册)《欢乐颂》（全3册）《都挺好》(全2册)《不得往生》《食荤者》《余生》，阿耐出品，必是精品！作品改编影视剧均引起热议！）";
    insta::assert_snapshot!(clean_title_structural(title), @"《大江大河》作者阿耐合集（共12册）");
}

#[test]
fn test_volume_range_kept_lenticular_blurb_dropped() {
    let title = "武英殿本四库全书总目·上（1-30册）【电子版独家上线！国家图书馆倾情贡献！豆瓣9.6！】";
    insta::assert_snapshot!(clean_title_structural(title), @"武英殿本四库全书总目·上（1-30册）");
}

#[test]
fn test_strict_mode_scenarios() {
    insta::assert_snapshot!(
        clean_title_strict("历史的裂变：中国历史上的十三场政变（畅销书作者王觉仁力作，用小说笔法讲述十三场政变）"),
        @"历史的裂变：中国历史上的十三场政变"
    );
    assert_eq!(
        clean_title_strict("成功企业这样管理（套装12册）"),
        "成功企业这样管理（套装12册）"
    );
    assert_eq!(clean_title_strict("版式设计法则"), "版式设计法则");
}

#[test]
fn test_ascii_paren_after_space() {
    let tokens = tokenize("幸运儿 (他们是大文豪的朋友)");
    assert_eq!(tokens.segments.len(), 2);
    assert_eq!(
        tokens.segments[1],
        Segment::Bracketed {
            pair: BracketPair::Paren,
            text: "(他们是大文豪的朋友)"
        }
    );
}

#[test]
fn test_quotes_and_padding_normalized_without_brackets() {
    assert_eq!(clean_title_structural("a\"b"), "a b");
    assert_eq!(clean_title_structural(" 书名"), "书名");
}

// =============================================================================
// Properties
// =============================================================================

/// Titles drawn from a small alphabet heavy in delimiters and marker characters
fn title_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "书", "名", "套装", "3", "本", "版", "第", "上", "册", "（", "）", "【", "】", "(",
            ")", "[", "]", " ", "\"", "营销文案很长", "-", "1949",
        ]),
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

/// Identity only holds for trimmed, quote-free input: both cleaners turn `"`
/// into a space and trim the result, so `a"b` becomes `a b` and ` 书名` becomes
/// `书名`. The character class leaves out `"` and the filter drops padded input.
fn bracket_free_strategy() -> impl Strategy<Value = String> {
    "[a-z书名版上 \\-:：0-9]{0,30}"
        .prop_filter("no leading/trailing whitespace", |s| s.trim() == s && !s.is_empty())
}

proptest! {
    #[test]
    fn prop_structural_is_idempotent(title in title_strategy()) {
        let once = clean_title_structural(&title);
        prop_assert_eq!(clean_title_structural(&once), once);
    }

    #[test]
    fn prop_structural_never_empty(title in title_strategy()) {
        prop_assume!(!title.is_empty());
        let cleaned = clean_title_structural(&title);
        prop_assert!(!cleaned.is_empty());
        if cleaned.trim().is_empty() {
            prop_assert_eq!(cleaned, title);
        }
    }

    #[test]
    fn prop_identity_on_bracket_free(title in bracket_free_strategy()) {
        prop_assert_eq!(clean_title_structural(&title), title);
    }

    #[test]
    fn prop_tokenize_reassembles(title in title_strategy()) {
        let tokens = tokenize(&title);
        prop_assert_eq!(tokens.reassemble(), title);
    }

    #[test]
    fn prop_balanced_pairs_counted(
        words in prop::collection::vec("[a-z书名]{1,4}", 1..6),
        inners in prop::collection::vec("[a-z上版]{0,5}", 1..6),
    ) {
        let pairs = BracketPair::ALL;
        let mut title = String::new();
        let n = words.len().min(inners.len());
        for i in 0..n {
            let pair = pairs[i % pairs.len()];
            title.push_str(&words[i]);
            title.push(pair.open());
            title.push_str(&inners[i]);
            title.push(pair.close());
        }

        let tokens = tokenize(&title);
        prop_assert!(tokens.balanced);
        prop_assert_eq!(tokens.bracketed_count(), n);
        prop_assert_eq!(tokens.segments.len(), 2 * n);
        prop_assert_eq!(tokens.reassemble(), title);
    }

    #[test]
    fn prop_short_content_always_kept(inner in "[^\\s\"（）【】()\\[\\]]{0,3}") {
        prop_assert!(classify(&inner).is_keep());
        let title = format!("书名（{}）", inner);
        prop_assert_eq!(clean_title_structural(&title), title);
    }
}
