use crate::engine::ping::SearchCountExtractor;
use crate::engine::schema::ping_schema::SEARCH_COUNT_ALL;
use crate::engine::types::ScalarValue;
use crate::test_helpers::factory::Factory;

#[test]
fn sums_counts_across_engines_and_sources() {
    let ping = Factory::ping()
        .with_search("google", "urlbar", Some(3))
        .with_search("google", "searchbar", Some(1))
        .with_search("bing", "contextmenu", Some(2))
        .create();

    let ping = SearchCountExtractor::default().apply(ping);
    assert_eq!(ping.get(SEARCH_COUNT_ALL), &ScalarValue::Int64(6));
}

#[test]
fn missing_collection_counts_zero() {
    let ping = SearchCountExtractor::default().apply(Factory::ping().create());
    assert_eq!(ping.get(SEARCH_COUNT_ALL), &ScalarValue::Int64(0));
}

#[test]
fn null_and_negative_counts_contribute_nothing() {
    let ping = Factory::ping()
        .with_search("google", "urlbar", None)
        .with_search("google", "urlbar", Some(-4))
        .with_search("yahoo", "urlbar", Some(5))
        .create();

    let ping = SearchCountExtractor::default().apply(ping);
    assert_eq!(ping.get(SEARCH_COUNT_ALL), &ScalarValue::Int64(5));
}

#[test]
fn ad_sources_are_not_searches() {
    let ping = Factory::ping()
        .with_search("google", "urlbar", Some(2))
        .with_search("google", "ad-click:urlbar", Some(7))
        .with_search("google", "search-with-ads:urlbar", Some(9))
        .create();

    assert_eq!(
        SearchCountExtractor::default().search_count_all(ping.search_counts.as_deref()),
        2
    );
    assert_eq!(
        SearchCountExtractor::new(Vec::new()).search_count_all(ping.search_counts.as_deref()),
        18
    );
}

#[test]
fn original_fields_are_preserved() {
    let ping = Factory::ping()
        .with_int("active_addons_count", 4)
        .with_search("google", "urlbar", Some(1))
        .create();
    let before = ping.clone();

    let after = SearchCountExtractor::default().apply(ping);
    assert_eq!(after.search_counts, before.search_counts);
    for (column, value) in &before.fields {
        assert_eq!(after.get(column), value);
    }
    assert_eq!(after.fields.len(), before.fields.len() + 1);
}
