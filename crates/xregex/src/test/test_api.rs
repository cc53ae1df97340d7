// Tests for the public surface: cache, equality, match accessors
use std::sync::Arc;
use std::thread;

use crate::{Match, Regex, cached};

// One test for the whole cache lifecycle: the cache is process-global,
// so splitting these across parallel test threads would race.
#[test]
fn test_cached_lifecycle() {
    let first = cached("cache-probe-a+", "i").unwrap();
    let second = cached("cache-probe-a+", "i").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.matches("xxCACHE-PROBE-Axx"));

    // Different options are a different cache entry.
    let other = cached("cache-probe-a+", "").unwrap();
    assert!(!Arc::ptr_eq(&first, &other));

    // Filling well past capacity evicts the least recently used entry.
    let victim = cached("evict-victim-x", "").unwrap();
    for i in 0..30 {
        cached(&format!("evict-filler-{i}"), "").unwrap();
    }
    let reloaded = cached("evict-victim-x", "").unwrap();
    assert!(!Arc::ptr_eq(&victim, &reloaded));

    assert!(cached("(unclosed", "").is_err());
    assert!(cached("a", "Q").is_err());
}

#[test]
fn test_regex_equality_and_display() {
    let a = Regex::with_options("a+b", "i").unwrap();
    let b = Regex::with_options("a+b", "i").unwrap();
    let c = Regex::with_options("a+b", "").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.pattern(), "a+b");
    assert_eq!(a.to_string(), "a+b");
}

#[test]
fn test_match_accessor_panics() {
    let m = Match::new();
    let result = std::panic::catch_unwind(|| m.start(0));
    assert!(result.is_err(), "start() before any match must panic");

    let mut m = Match::new();
    assert!(Regex::new("(a)").unwrap().matches_with("a", &mut m));
    let result = std::panic::catch_unwind(|| m.start(5));
    assert!(result.is_err(), "out-of-range group must panic");
    assert_eq!(m.start(1), Some(0));
}

#[test]
fn test_match_reuse_shrinks_and_grows() {
    let mut m = Match::new();
    assert!(Regex::new("(a)(b)(c)").unwrap().matches_with("abc", &mut m));
    assert_eq!(m.group_count(), 4);
    assert!(Regex::new("x").unwrap().matches_with("x", &mut m));
    assert_eq!(m.group_count(), 1);
}

#[test]
fn test_concurrent_matching_on_shared_regex() {
    // One compiled pattern, many simultaneous matches: the lazy
    // preparation and the context pool must hold up.
    let regex = Arc::new(Regex::new(r"(\w+)@(\w+)").unwrap());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let regex = regex.clone();
            thread::spawn(move || {
                let text = format!("user{i}@host{i}");
                for _ in 0..50 {
                    let mut m = Match::new();
                    assert!(regex.matches_with(&text, &mut m));
                    assert_eq!(m.group(1).as_deref(), Some(format!("user{i}").as_str()));
                    assert_eq!(m.group(2).as_deref(), Some(format!("host{i}").as_str()));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_module_level_matches() {
    assert!(crate::matches("b+", "abbc").unwrap());
    assert!(!crate::matches("z", "abbc").unwrap());
    assert!(crate::matches("(", "x").is_err());
}

#[test]
fn test_group_count_without_parens_is_one() {
    assert_eq!(Regex::new("abc").unwrap().group_count(), 1);
}
