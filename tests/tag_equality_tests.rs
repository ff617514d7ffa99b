use sdlang::{from_str, Tag};
use std::collections::HashSet;

#[test]
fn test_attribute_order_does_not_affect_equality() {
    let mut t1 = Tag::new("test").unwrap();
    t1.set_attribute("foo", "bar").unwrap();
    t1.set_attribute("john", "doe").unwrap();

    let mut t2 = Tag::new("test").unwrap();
    t2.set_attribute("john", "doe").unwrap();
    t2.set_attribute("foo", "bar").unwrap();

    assert_eq!(t1, t2);
    assert_eq!(t1.to_string(), "test foo=\"bar\" john=\"doe\"");
}

#[test]
fn test_value_order_affects_equality() {
    let mut t1 = Tag::new("test").unwrap();
    t1.set_values([1, 2]).unwrap();
    let mut t2 = Tag::new("test").unwrap();
    t2.set_values([2, 1]).unwrap();
    assert_ne!(t1, t2);
}

#[test]
fn test_added_then_removed_child_restores_equality() {
    let fresh = Tag::new("test").unwrap();
    let mut tag = Tag::new("test").unwrap();

    let item = Tag::new("item").unwrap();
    tag.add_child(item.clone());
    assert_ne!(tag, fresh);

    assert_eq!(tag.remove_child(&item), Some(item));
    assert_eq!(tag, fresh);
}

#[test]
fn test_namespace_and_literal_type_matter() {
    let plain = Tag::new("a").unwrap();
    let namespaced = Tag::with_namespace("ns", "a").unwrap();
    assert_ne!(plain, namespaced);

    let int = from_str("a 1").unwrap();
    let long = from_str("a 1L").unwrap();
    assert_ne!(int, long);
}

#[test]
fn test_equal_tags_hash_alike() {
    let parsed = from_str("person age=50 name=\"odv\"").unwrap();
    let reordered = from_str("person name=\"odv\" age=50").unwrap();

    let mut set = HashSet::new();
    set.insert(parsed);
    assert!(!set.insert(reordered));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_equality_compares_whole_subtree() {
    let a = from_str("p {\n    c 1\n}").unwrap();
    let b = from_str("p {\n    c 2\n}").unwrap();
    let c = from_str("p {\n    c 1\n}").unwrap();
    assert_ne!(a, b);
    assert_eq!(a, c);
}

#[test]
fn test_added_then_removed_value_restores_equality() {
    let fresh = Tag::new("test").unwrap();
    let mut tag = Tag::new("test").unwrap();

    tag.set_value("item").unwrap();
    assert_ne!(tag, fresh);

    assert!(tag.remove_value("item"));
    assert_eq!(tag, fresh);

    tag.set_attribute("another", "attribute").unwrap();
    assert_ne!(tag, fresh);
}
