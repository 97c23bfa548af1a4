// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn create_then_list_tables_filters_by_prefix() {
    let engine = FakeEngine::new();
    engine.create_table("user_t1_widgets", &[Column::new("id")]).unwrap();
    engine.create_table("user_t2_gadgets", &[Column::new("id")]).unwrap();

    let tables = engine.list_tables(Some("user_t1_")).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].name, "user_t1_widgets");
}

#[test]
fn drop_missing_table_without_if_exists_errors() {
    let engine = FakeEngine::new();
    assert!(engine.drop_table("missing", false).is_err());
    assert!(engine.drop_table("missing", true).is_ok());
}

#[test]
fn operations_after_close_fail() {
    let engine = FakeEngine::new();
    engine.close().unwrap();
    assert!(engine.ping().is_err());
    assert!(engine.create_table("t", &[]).is_err());
}

#[test]
fn create_then_list_views_filters_by_prefix() {
    let engine = FakeEngine::new();
    engine.create_view("user_t1_widget_view", "SELECT 1").unwrap();
    engine.create_view("user_t2_other_view", "SELECT 1").unwrap();

    let views = engine.list_views(Some("user_t1_")).unwrap();
    assert_eq!(views, vec!["user_t1_widget_view".to_string()]);
}

#[test]
fn drop_missing_view_without_if_exists_errors() {
    let engine = FakeEngine::new();
    assert!(engine.drop_view("missing", false).is_err());
    assert!(engine.drop_view("missing", true).is_ok());
}

#[test]
fn install_extension_is_tracked_in_list_extensions() {
    let engine = FakeEngine::new();
    engine.install_extension("httpfs").unwrap();
    assert_eq!(engine.list_extensions().unwrap(), vec!["httpfs".to_string()]);
}
