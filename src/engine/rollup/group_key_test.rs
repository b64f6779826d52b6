use std::str::FromStr;

use chrono::NaiveDate;

use crate::engine::rollup::dedup::{UniquePing, dedup};
use crate::engine::rollup::group_key::{ClientDayKey, partition};
use crate::shared::datetime::TimezoneContract;
use crate::test_helpers::factory::Factory;

fn unique(pings: Vec<crate::engine::ping::Ping>) -> Vec<UniquePing> {
    dedup(pings).unwrap().pings
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn groups_by_client_and_activity_date() {
    let pings = unique(vec![
        Factory::ping().client("a").starting_at("2017-05-25T01:00:00Z").create(),
        Factory::ping().client("a").starting_at("2017-05-25T23:00:00Z").create(),
        Factory::ping().client("a").starting_at("2017-05-26T01:00:00Z").create(),
        Factory::ping().client("b").starting_at("2017-05-25T12:00:00Z").create(),
    ]);

    let out = partition(pings, &TimezoneContract::Utc);
    let keys: Vec<(&str, NaiveDate, usize)> = out
        .groups
        .iter()
        .map(|g| (g.key.client_id.as_str(), g.key.activity_date, g.pings.len()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("a", date(2017, 5, 25), 2),
            ("a", date(2017, 5, 26), 1),
            ("b", date(2017, 5, 25), 1),
        ]
    );
    assert_eq!(out.undated, 0);
}

#[test]
fn activity_date_follows_the_timezone_contract() {
    let pings = unique(vec![
        Factory::ping().starting_at("2017-05-25T02:00:00Z").create(),
    ]);
    let contract = TimezoneContract::from_str("-05:00").unwrap();

    let key = ClientDayKey::of(&pings[0], &contract).unwrap();
    assert_eq!(key.activity_date, date(2017, 5, 24));

    let key = ClientDayKey::of(&pings[0], &TimezoneContract::Utc).unwrap();
    assert_eq!(key.activity_date, date(2017, 5, 25));
}

#[test]
fn pings_inside_a_group_are_sorted_by_start() {
    let pings = unique(vec![
        Factory::ping().starting_at("2017-05-25T09:00:00Z").with_int("x", 2).create(),
        Factory::ping().starting_at("2017-05-25T07:00:00Z").with_int("x", 1).create(),
        Factory::ping().starting_at("2017-05-25T08:00:00Z").with_int("x", 3).create(),
    ]);

    let out = partition(pings, &TimezoneContract::Utc);
    let starts: Vec<i64> = out.groups[0]
        .pings
        .iter()
        .map(|p| p.ping.subsession_start)
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn partition_is_independent_of_input_order() {
    let pings = vec![
        Factory::ping().client("b").with_int("x", 1).create(),
        Factory::ping().client("a").with_int("x", 2).create(),
        Factory::ping().client("a").with_int("x", 3).create(),
    ];
    let mut reversed = pings.clone();
    reversed.reverse();

    let forward = partition(unique(pings), &TimezoneContract::Utc);
    let backward = partition(unique(reversed), &TimezoneContract::Utc);

    let flatten = |p: &crate::engine::rollup::group_key::Partitioned| {
        p.groups
            .iter()
            .flat_map(|g| g.pings.iter().map(|u| u.fingerprint.to_string()))
            .collect::<Vec<_>>()
    };
    assert_eq!(flatten(&forward), flatten(&backward));
}

#[test]
fn recorded_contract_groups_by_written_wall_date() {
    let pings = unique(vec![
        Factory::ping()
            .client("a")
            .starting_at("2017-05-25T23:30:00-05:00")
            .create(),
        Factory::ping()
            .client("a")
            .starting_at("2017-05-25T01:00:00+09:00")
            .create(),
    ]);

    let recorded = partition(pings.clone(), &TimezoneContract::Recorded);
    assert_eq!(recorded.groups.len(), 1);
    assert_eq!(recorded.groups[0].key.activity_date, date(2017, 5, 25));
    assert_eq!(recorded.groups[0].pings.len(), 2);

    let utc = partition(pings, &TimezoneContract::Utc);
    let dates: Vec<NaiveDate> = utc.groups.iter().map(|g| g.key.activity_date).collect();
    assert_eq!(dates, vec![date(2017, 5, 24), date(2017, 5, 26)]);
}
