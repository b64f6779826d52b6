use crate::engine::types::ScalarValue;
use crate::test_helpers::factory::Factory;

#[test]
fn test_ping_factory() {
    let ping = Factory::ping()
        .client("abc")
        .starting_at("1970-01-02T00:00:00Z")
        .with_bool("sync_configured", true)
        .with_search("google", "urlbar", Some(2))
        .create();

    assert_eq!(ping.client_id, "abc");
    assert_eq!(ping.subsession_start, 86_400);
    assert_eq!(ping.get("client_id"), &ScalarValue::Utf8("abc".into()));
    assert_eq!(ping.get("sync_configured"), &ScalarValue::Boolean(true));
    assert_eq!(ping.get("missing"), &ScalarValue::Null);
    assert_eq!(ping.search_counts.map(|c| c.len()), Some(1));
}
