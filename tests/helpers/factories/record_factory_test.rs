use crate::test_helpers::factory::Factory;
use serde_json::json;

#[test]
fn test_record_factory() {
    let record = Factory::record()
        .with("client_id", "c-9")
        .with_search("google", "urlbar", 3)
        .with_search("bing", "searchbar", 1)
        .without("subsession_start_date")
        .create();

    assert_eq!(record["client_id"], json!("c-9"));
    assert_eq!(record["search_counts"][1]["engine"], json!("bing"));
    assert!(record.get("subsession_start_date").is_none());
}
