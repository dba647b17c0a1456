// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

use super::*;

crate::define_id! {
    pub struct TestId("tst-");
}

#[test]
fn new_id_has_prefix_and_length() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
    assert_eq!(id.as_str().len(), 23);
}

#[test]
fn from_string_round_trips() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.as_str(), "tst-abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn short_truncates_suffix() {
    let id = TestId::from_string("tst-abcdefgh");
    assert_eq!(id.short(4), "abcd");
}

#[test]
fn display_matches_as_str() {
    let id = TestId::from_string("tst-xyz");
    assert_eq!(format!("{id}"), "tst-xyz");
}

#[test]
fn idbuf_short_helper() {
    assert_eq!(short("hello world", 5), "hello");
    assert_eq!(short("hi", 5), "hi");
}
