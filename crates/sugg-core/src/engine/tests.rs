use std::sync::Arc;

use proptest::prelude::*;

use super::*;
use crate::matcher::fuzzy_score;

const FRUITS: [&str; 5] = ["apple", "banana", "grape", "orange", "watermelon"];

fn engine(items: &[&str]) -> SuggestionEngine {
    SuggestionEngine::new(items.iter().copied(), SuggestConfig::default()).unwrap()
}

// --- construction & config ---

#[test]
fn test_construct_with_max_suggestions() {
    let e = SuggestionEngine::with_max_suggestions(FRUITS, 3).unwrap();
    assert_eq!(e.config().max_suggestions, 3);
    assert_eq!(e.len(), 5);
}

#[test]
fn test_construct_with_config() {
    let config = SuggestConfig {
        max_suggestions: 10,
        case_sensitive: true,
        ..SuggestConfig::default()
    };
    let e = SuggestionEngine::new(FRUITS, config.clone()).unwrap();
    assert_eq!(e.config(), config);
}

#[test]
fn test_construct_rejects_invalid_config() {
    let config = SuggestConfig {
        max_suggestions: 0,
        ..SuggestConfig::default()
    };
    let err = SuggestionEngine::new(FRUITS, config).err().unwrap();
    assert!(matches!(err, SuggestError::InvalidArgument { ref field, .. } if field == "max_suggestions"));
}

#[test]
fn test_fuzzy_threshold_validation() {
    let e = engine(&FRUITS);
    for bad in [1.5, -0.1, f64::NAN] {
        let err = e.set_fuzzy_match_threshold(bad).unwrap_err();
        assert!(matches!(err, SuggestError::InvalidArgument { .. }));
        assert!((e.config().fuzzy_match_threshold - 0.5).abs() < f64::EPSILON);
    }
    e.set_fuzzy_match_threshold(0.8).unwrap();
    assert!((e.config().fuzzy_match_threshold - 0.8).abs() < f64::EPSILON);
    e.set_fuzzy_match_threshold(0.0).unwrap();
    e.set_fuzzy_match_threshold(1.0).unwrap();
}

#[test]
fn test_max_suggestions_validation() {
    let e = engine(&FRUITS);
    assert!(matches!(
        e.set_max_suggestions(0),
        Err(SuggestError::InvalidArgument { .. })
    ));
    assert_eq!(e.config().max_suggestions, 5);
    e.set_max_suggestions(10).unwrap();
    assert_eq!(e.config().max_suggestions, 10);
}

#[test]
fn test_update_config_replaces_and_validates() {
    let e = engine(&["Apple", "banana"]);
    let bad = SuggestConfig {
        fuzzy_match_threshold: 2.0,
        ..SuggestConfig::default()
    };
    assert!(e.update_config(bad).is_err());
    assert_eq!(e.config(), SuggestConfig::default());

    let good = SuggestConfig {
        max_suggestions: 20,
        case_sensitive: true,
        fuzzy_match_threshold: 0.6,
        ..SuggestConfig::default()
    };
    e.update_config(good.clone()).unwrap();
    assert_eq!(e.config(), good);
    // Index was rebuilt for case-sensitive lookups.
    assert!(e.suggest("apple", MatchType::Prefix).unwrap().is_empty());
    assert_eq!(e.suggest("App", MatchType::Prefix).unwrap(), vec!["Apple"]);
}

#[test]
fn test_update_config_clears_cache() {
    let e = engine(&FRUITS);
    e.suggest("ap", MatchType::Prefix).unwrap();
    assert_eq!(e.stats().cache_size, 1);
    e.update_config(SuggestConfig::default()).unwrap();
    assert_eq!(e.stats().cache_size, 0);
}

// --- matching ---

#[test]
fn test_empty_input_rejected_without_side_effects() {
    let e = engine(&FRUITS);
    for mt in MatchType::ALL {
        let err = e.suggest("", mt).unwrap_err();
        assert!(matches!(err, SuggestError::InvalidInput(_)));
        assert!(matches!(
            e.suggestion_details("", mt),
            Err(SuggestError::InvalidInput(_))
        ));
    }
    let stats = e.stats();
    assert_eq!(stats.total_suggestion_calls, 0);
    assert_eq!(stats.cache_misses, 0);
    assert_eq!(stats.cache_size, 0);
}

#[test]
fn test_prefix_single_result() {
    let e = engine(&FRUITS);
    assert_eq!(e.suggest("ap", MatchType::Prefix).unwrap(), vec!["apple"]);
}

#[test]
fn test_prefix_counts() {
    let e = engine(&["apple", "application", "apply", "banana", "band"]);
    assert_eq!(e.suggest("app", MatchType::Prefix).unwrap().len(), 3);
    assert_eq!(e.suggest("ban", MatchType::Prefix).unwrap().len(), 2);
    assert!(e.suggest("xyz", MatchType::Prefix).unwrap().is_empty());
    assert_eq!(e.suggest("apple", MatchType::Prefix).unwrap(), vec!["apple"]);
}

#[test]
fn test_exact_match_ranks_first() {
    let e = engine(&["application", "apply", "apple"]);
    assert_eq!(e.suggest("apple", MatchType::Substring).unwrap()[0], "apple");
}

#[test]
fn test_substring_order() {
    let e = engine(&FRUITS);
    assert_eq!(
        e.suggest("an", MatchType::Substring).unwrap(),
        vec!["banana", "orange"]
    );
}

#[test]
fn test_substring_counts() {
    let e = engine(&["banana", "orange", "mango", "watermelon"]);
    assert_eq!(e.suggest("an", MatchType::Substring).unwrap().len(), 3);
    assert_eq!(
        e.suggest("mel", MatchType::Substring).unwrap(),
        vec!["watermelon"]
    );
    assert!(e.suggest("xyz", MatchType::Substring).unwrap().is_empty());
}

#[test]
fn test_fuzzy_finds_typos() {
    let e = engine(&["help", "hello", "history", "exit", "clear"]);
    let hlep = e.suggest("hlep", MatchType::Fuzzy).unwrap();
    assert_eq!(hlep[0], "help");
    let helo = e.suggest("helo", MatchType::Fuzzy).unwrap();
    assert!(helo.contains(&"hello".to_string()));
}

#[test]
fn test_fuzzy_respects_max_edit_distance() {
    let e = engine(&["help", "hello", "history"]);
    e.update_config(SuggestConfig {
        max_edit_distance: 0.0,
        ..SuggestConfig::default()
    })
    .unwrap();
    assert!(e.suggest("helo", MatchType::Fuzzy).unwrap().is_empty());
    assert_eq!(e.suggest("help", MatchType::Fuzzy).unwrap(), vec!["help"]);
}

#[test]
fn test_transposition_toggle() {
    let e = engine(&["help"]);
    e.update_config(SuggestConfig {
        max_edit_distance: 1.0,
        ..SuggestConfig::default()
    })
    .unwrap();
    assert_eq!(e.suggest("hlep", MatchType::Fuzzy).unwrap(), vec!["help"]);
    e.update_config(SuggestConfig {
        max_edit_distance: 1.0,
        use_transposition: false,
        ..SuggestConfig::default()
    })
    .unwrap();
    assert!(e.suggest("hlep", MatchType::Fuzzy).unwrap().is_empty());
}

#[test]
fn test_regex_patterns() {
    let e = engine(&["file1.txt", "file2.txt", "image.png", "doc.pdf"]);
    assert_eq!(e.suggest(r".*\.txt", MatchType::Regex).unwrap().len(), 2);
    assert_eq!(e.suggest("file.*", MatchType::Regex).unwrap().len(), 2);
    assert_eq!(e.suggest("FILE1", MatchType::Regex).unwrap(), vec!["file1.txt"]);
}

#[test]
fn test_malformed_regex_is_not_an_error() {
    let e = engine(&["[unclosed", "apple"]);
    let result = e.suggest("[unclosed", MatchType::Regex).unwrap();
    assert!(result.is_empty());
    let details = e.suggestion_details("(", MatchType::Regex).unwrap();
    assert!(details.is_empty());
}

#[test]
fn test_cap_respected() {
    let items: Vec<String> = (1..=10).map(|i| format!("a{i}")).collect();
    let e = SuggestionEngine::with_max_suggestions(items, 3).unwrap();
    assert_eq!(e.suggest("a", MatchType::Prefix).unwrap().len(), 3);
    e.set_max_suggestions(5).unwrap();
    assert_eq!(e.suggest("a", MatchType::Prefix).unwrap().len(), 5);
    e.set_max_suggestions(2).unwrap();
    assert_eq!(e.suggest("a", MatchType::Prefix).unwrap().len(), 2);
}

#[test]
fn test_ties_keep_dataset_order() {
    let e = engine(&["cab", "dab", "fab"]);
    assert_eq!(
        e.suggest("ab", MatchType::Substring).unwrap(),
        vec!["cab", "dab", "fab"]
    );
}

// --- case sensitivity ---

#[test]
fn test_case_insensitive_default_returns_original_form() {
    let e = engine(&["Apple", "BANANA", "cherry"]);
    assert_eq!(e.suggest("apple", MatchType::Prefix).unwrap(), vec!["Apple"]);
    assert_eq!(e.suggest("BAN", MatchType::Prefix).unwrap(), vec!["BANANA"]);
}

#[test]
fn test_case_sensitivity_change_invalidates_cache() {
    let e = engine(&["Apple", "BANANA", "cherry"]);
    assert_eq!(e.suggest("apple", MatchType::Prefix).unwrap(), vec!["Apple"]);
    e.set_case_sensitivity(true);
    assert!(e.suggest("apple", MatchType::Prefix).unwrap().is_empty());
    assert_eq!(e.stats().cache_hits, 0);
    e.set_case_sensitivity(false);
    assert_eq!(e.suggest("apple", MatchType::Prefix).unwrap(), vec!["Apple"]);
}

// --- dataset ---

#[test]
fn test_update_dataset_appends() {
    let e = engine(&FRUITS);
    e.update_dataset(["kiwi", "mango"]);
    assert_eq!(e.suggest("ki", MatchType::Prefix).unwrap(), vec!["kiwi"]);
    assert_eq!(e.len(), 7);
    assert_eq!(e.stats().dataset_size, 7);
}

#[test]
fn test_update_dataset_keeps_cached_answers() {
    let e = engine(&["cherry"]);
    assert_eq!(e.suggest("ch", MatchType::Prefix).unwrap(), vec!["cherry"]);
    e.update_dataset(["chestnut"]);
    // Same query is served from the cache until it is cleared.
    assert_eq!(e.suggest("ch", MatchType::Prefix).unwrap(), vec!["cherry"]);
    e.clear_cache();
    assert_eq!(e.suggest("ch", MatchType::Prefix).unwrap().len(), 2);
}

#[test]
fn test_set_dataset_replaces() {
    let e = engine(&["apple", "banana"]);
    assert_eq!(e.suggest("a", MatchType::Prefix).unwrap(), vec!["apple"]);
    e.set_dataset(["x", "y", "z"]);
    assert!(e.suggest("a", MatchType::Prefix).unwrap().is_empty());
    assert_eq!(e.suggest("x", MatchType::Prefix).unwrap(), vec!["x"]);
    assert_eq!(e.dataset(), vec!["x", "y", "z"]);
}

#[test]
fn test_duplicate_items_suggested_once() {
    let e = engine(&["Help", "help", "exit"]);
    assert_eq!(e.suggest("he", MatchType::Prefix).unwrap(), vec!["help"]);
    assert_eq!(e.len(), 2);
    assert_eq!(e.dataset().len(), 3);
}

// --- weights ---

#[test]
fn test_weight_reinforces_order() {
    let e = engine(&FRUITS);
    e.set_weight("banana", 2.0);
    assert_eq!(
        e.suggest("an", MatchType::Substring).unwrap(),
        vec!["banana", "orange"]
    );
}

#[test]
fn test_weight_flips_order() {
    let e = engine(&FRUITS);
    e.set_weight("orange", 2.0);
    assert_eq!(
        e.suggest("an", MatchType::Substring).unwrap(),
        vec!["orange", "banana"]
    );
    assert!((e.weight("orange") - 2.0).abs() < f64::EPSILON);
    assert!((e.weight("banana") - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_multiple_weights() {
    let e = engine(&["apple", "apricot", "avocado"]);
    e.set_weight("apricot", 5.0);
    e.set_weight("avocado", 10.0);
    assert_eq!(
        e.suggest("a", MatchType::Prefix).unwrap(),
        vec!["avocado", "apricot", "apple"]
    );
}

#[test]
fn test_weight_change_needs_cache_clear() {
    let e = engine(&FRUITS);
    let before = e.suggest("an", MatchType::Substring).unwrap();
    e.set_weight("orange", 2.0);
    assert_eq!(e.suggest("an", MatchType::Substring).unwrap(), before);
    e.clear_cache();
    assert_eq!(e.suggest("an", MatchType::Substring).unwrap()[0], "orange");
}

// --- filters ---

#[test]
fn test_filter_excludes() {
    let e = engine(&FRUITS);
    e.add_filter(|item| item != "banana");
    assert_eq!(e.suggest("an", MatchType::Substring).unwrap(), vec!["orange"]);
    assert_eq!(e.stats().items_filtered, 1);
}

#[test]
fn test_multiple_filters_all_must_pass() {
    let e = engine(&["apple", "banana", "cherry", "date"]);
    e.add_filter(|item| item.len() > 4);
    e.add_filter(|item| !item.starts_with('c'));
    let result = e.suggest("e", MatchType::Substring).unwrap();
    assert_eq!(result, vec!["apple"]);
}

#[test]
fn test_clear_filters() {
    let e = engine(&["apple", "banana", "cherry", "date"]);
    e.add_filter(|_| false);
    assert!(e.suggest("a", MatchType::Prefix).unwrap().is_empty());
    e.clear_filters();
    e.clear_cache();
    assert_eq!(e.suggest("a", MatchType::Prefix).unwrap(), vec!["apple"]);
}

// --- history ---

#[test]
fn test_history_promotes_frequent_items() {
    let e = engine(&["help", "hello"]);
    assert_eq!(e.suggest("hel", MatchType::Prefix).unwrap()[0], "help");
    e.update_from_history(["hello", "hello", "hello", "help"]);
    assert_eq!(
        e.suggest("hel", MatchType::Prefix).unwrap(),
        vec!["hello", "help"]
    );
    assert_eq!(e.stats().cache_hits, 0);
}

#[test]
fn test_history_is_replaced_not_merged() {
    let e = engine(&["help", "hello"]);
    e.update_from_history(["hello", "hello", "hello", "help"]);
    e.update_from_history(["help"]);
    assert_eq!(e.suggest("hel", MatchType::Prefix).unwrap()[0], "help");
}

// --- cache & stats ---

#[test]
fn test_cache_hit_and_miss_counters() {
    let e = engine(&["apple", "banana", "cherry"]);
    let first = e.suggest("app", MatchType::Prefix).unwrap();
    let stats = e.stats();
    assert_eq!((stats.cache_hits, stats.cache_misses), (0, 1));
    let second = e.suggest("app", MatchType::Prefix).unwrap();
    assert_eq!(first, second);
    let stats = e.stats();
    assert_eq!((stats.cache_hits, stats.cache_misses), (1, 1));
    assert_eq!(stats.cache_size, 1);
}

#[test]
fn test_cache_key_normalizes_case() {
    let e = engine(&["apple"]);
    e.suggest("APP", MatchType::Prefix).unwrap();
    e.suggest("app", MatchType::Prefix).unwrap();
    assert_eq!(e.stats().cache_hits, 1);
    // Different match type is a different key.
    e.suggest("app", MatchType::Substring).unwrap();
    assert_eq!(e.stats().cache_misses, 2);
}

#[test]
fn test_clear_cache() {
    let e = engine(&["apple", "banana", "cherry"]);
    e.suggest("app", MatchType::Prefix).unwrap();
    e.clear_cache();
    assert_eq!(e.stats().cache_size, 0);
}

#[test]
fn test_cache_bounded() {
    let config = SuggestConfig {
        max_cache_size: 4,
        ..SuggestConfig::default()
    };
    let e = SuggestionEngine::new(FRUITS, config).unwrap();
    for q in ["a", "b", "c", "d", "e", "g", "o", "w"] {
        e.suggest(q, MatchType::Substring).unwrap();
        assert!(e.stats().cache_size <= 4);
    }
}

#[test]
fn test_stats_and_reset() {
    let e = engine(&["apple", "banana", "cherry"]);
    e.suggest("app", MatchType::Prefix).unwrap();
    e.suggest("ban", MatchType::Prefix).unwrap();
    let stats = e.stats();
    assert_eq!(stats.total_suggestion_calls, 2);
    assert_eq!(stats.dataset_size, 3);

    e.reset_stats();
    let stats = e.stats();
    assert_eq!(stats.total_suggestion_calls, 0);
    assert_eq!(stats.cache_misses, 0);
    assert_eq!(stats.dataset_size, 3);
    assert_eq!(stats.cache_size, 2);
}

#[test]
fn test_statistics_text() {
    let e = engine(&["apple", "banana", "cherry"]);
    e.suggest("app", MatchType::Prefix).unwrap();
    let text = e.statistics_text();
    assert!(text.contains("suggestion calls:   1"));
    assert!(text.contains("dataset size:       3"));
}

// --- details ---

#[test]
fn test_details() {
    let e = engine(&["help", "hello", "history"]);
    let details = e.suggestion_details("hel", MatchType::Prefix).unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].suggestion, "help");
    assert_eq!(details[0].edit_distance, 1.0);
    assert_eq!(details[1].suggestion, "hello");
    assert_eq!(details[1].edit_distance, 2.0);
    for d in &details {
        assert_eq!(d.match_type, "prefix");
        assert!((0.0..=1.0).contains(&d.confidence));
    }
    assert!(details[0].confidence >= details[1].confidence);
    // Details are neither cached nor counted.
    let stats = e.stats();
    assert_eq!(stats.total_suggestion_calls, 0);
    assert_eq!(stats.cache_size, 0);
}

#[test]
fn test_details_match_suggest_order() {
    let e = engine(&FRUITS);
    let plain = e.suggest("an", MatchType::Substring).unwrap();
    let details: Vec<String> = e
        .suggestion_details("an", MatchType::Substring)
        .unwrap()
        .into_iter()
        .map(|d| d.suggestion)
        .collect();
    assert_eq!(plain, details);
}

// --- concurrency ---

#[test]
fn test_shared_across_threads() {
    let e = Arc::new(engine(&FRUITS));
    std::thread::scope(|scope| {
        for t in 0..4 {
            let e = Arc::clone(&e);
            scope.spawn(move || {
                for i in 0..25 {
                    if i % 10 == 0 {
                        e.set_weight("grape", t as f64 + 1.0);
                    }
                    let result = e.suggest("a", MatchType::Substring).unwrap();
                    assert!(result.len() <= 5);
                }
            });
        }
    });
    let stats = e.stats();
    assert_eq!(stats.total_suggestion_calls, 100);
    assert_eq!(stats.cache_hits + stats.cache_misses, 100);
}

#[test]
fn test_panicking_filter_does_not_wedge_engine() {
    let e = Arc::new(engine(&FRUITS));
    e.add_filter(|item| {
        if item == "apple" {
            panic!("filter failure");
        }
        true
    });
    let worker = Arc::clone(&e);
    let outcome = std::thread::spawn(move || worker.suggest("ap", MatchType::Prefix)).join();
    assert!(outcome.is_err());
    e.clear_filters();
    assert_eq!(e.suggest("ap", MatchType::Prefix).unwrap(), vec!["apple"]);
}

// --- properties ---

fn arb_item() -> impl Strategy<Value = String> {
    "[a-eA-E]{1,8}"
}

fn arb_match_type() -> impl Strategy<Value = MatchType> {
    prop::sample::select(MatchType::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_result_len_within_cap(
        items in prop::collection::vec(arb_item(), 0..40),
        input in "[a-e.*]{1,4}",
        cap in 1usize..8,
        mt in arb_match_type(),
    ) {
        let e = SuggestionEngine::with_max_suggestions(items, cap).unwrap();
        let result = e.suggest(&input, mt).unwrap();
        prop_assert!(result.len() <= cap);
        let again = e.suggest(&input, mt).unwrap();
        prop_assert_eq!(result, again);
    }

    #[test]
    fn prop_fuzzy_score_monotone(d in 0usize..10, max in 0u32..10) {
        let max = max as f64;
        match (fuzzy_score(d, max), fuzzy_score(d + 1, max)) {
            (Some(close), Some(far)) => prop_assert!(close > far),
            (Some(close), None) => prop_assert!(close >= 0.0),
            (None, far) => prop_assert!(far.is_none()),
        }
    }

    #[test]
    fn prop_results_are_dataset_members(
        items in prop::collection::vec(arb_item(), 1..20),
        input in "[a-e]{1,3}",
        mt in arb_match_type(),
    ) {
        let e = SuggestionEngine::new(items.clone(), SuggestConfig::default()).unwrap();
        for s in e.suggest(&input, mt).unwrap() {
            prop_assert!(items.contains(&s));
        }
    }
}
