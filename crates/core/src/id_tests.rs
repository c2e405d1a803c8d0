// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

crate::define_id! {
    /// Test id type.
    pub struct TestId;
}

#[test]
fn new_ids_carry_the_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("TestId-"));
}

#[test]
fn from_string_wraps_arbitrary_external_ids() {
    let id = TestId::from_string("550e8400-e29b-41d4-a716-446655440000");
    assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
}

#[test]
fn equal_ids_hash_equal() {
    use std::collections::HashSet;
    let mut set = HashSet::new();
    set.insert(TestId::from_string("m-1"));
    assert!(set.contains("m-1"));
}
