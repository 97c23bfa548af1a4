// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    simple = { "u1", "widgets", "user_u1_widgets" },
    org_scoped = { "org-acme", "widgets", "user_org-acme_widgets" },
    underscored_tenant = { "my_team", "widgets", "user_my-team_widgets" },
)]
fn wrap_table_name_namespaces_per_tenant(tenant: &str, name: &str, expected: &str) {
    assert_eq!(wrap_table_name(tenant, name), expected);
}

#[test]
fn tenant_prefix_matches_wrapped_name_prefix() {
    let wrapped = wrap_table_name("u1", "widgets");
    assert!(wrapped.starts_with(&tenant_prefix("u1")));
}

#[test]
fn unwrap_strips_the_tenant_prefix() {
    let wrapped = wrap_table_name("u1", "widgets");
    assert_eq!(unwrap_table_name("u1", &wrapped), "widgets");
}

#[test]
fn unwrap_leaves_unprefixed_names_untouched() {
    assert_eq!(unwrap_table_name("u1", "widgets"), "widgets");
}

#[test]
fn create_and_list_agree_on_the_same_prefix() {
    // §9 redesign note: mutation-side wrapping and lookup-side filtering
    // must derive from the same prefix or CreateTable/ListTables disagree.
    let created = wrap_table_name("u1", "t");
    let prefix = tenant_prefix("u1");
    assert!(created.starts_with(&prefix));
}

#[parameterized(
    plain_container_user_tenant = { "u1", "raw-data", "user-u1-raw-data" },
    already_user_prefixed = { "u1", "user-u1-raw-data", "user-u1-raw-data" },
    org_tenant_untouched = { "org-acme", "raw-data", "raw-data" },
)]
fn effective_container_applies_the_rewrite_rule(tenant: &str, container: &str, expected: &str) {
    assert_eq!(effective_container(tenant, container), expected);
}
