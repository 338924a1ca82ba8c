//! Integration-level coverage for `vesper_parser::resolver`, complementing
//! the unit tests that live alongside the implementation. These exercise
//! scenarios that only make sense once a full module graph is wired
//! together, which is awkward to set up from inside a single-file test.

use std::fs;

use tempfile::tempdir;
use vesper_parser::resolver::ModuleCache;
use vesper_source::types::Span;

#[test]
fn diamond_dependency_is_parsed_once_and_shared() {
    // main imports both left and right, which both import shared; shared
    // must end up parsed exactly once and the two importers must see the
    // same cached module.
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("shared.vsp"), "fun helper() {\n}\n").unwrap();
    fs::write(dir.path().join("left.vsp"), "use helper from \"shared\"\n").unwrap();
    fs::write(dir.path().join("right.vsp"), "use helper from \"shared\"\n").unwrap();
    let entry = dir.path().join("main.vsp");
    fs::write(&entry, "use left from \"left\"\nuse right from \"right\"\n").unwrap();

    let mut cache = ModuleCache::new(None);
    cache.resolve_root(&entry).unwrap();

    let from_left = cache.resolve("shared", &dir.path().join("left.vsp"), Span::new(0, 0)).unwrap();
    let from_right = cache.resolve("shared", &dir.path().join("right.vsp"), Span::new(0, 0)).unwrap();
    assert!(std::rc::Rc::ptr_eq(&from_left, &from_right));
}

#[test]
fn indirect_cycle_through_a_third_module_is_detected() {
    // a -> b -> c -> a is a cycle even though no two files import each
    // other directly.
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.vsp");
    fs::write(&a, "use b from \"b\"\n").unwrap();
    fs::write(dir.path().join("b.vsp"), "use c from \"c\"\n").unwrap();
    fs::write(dir.path().join("c.vsp"), "use a from \"a\"\n").unwrap();

    let mut cache = ModuleCache::new(None);
    let err = cache.resolve_root(&a).unwrap_err();
    assert!(matches!(err, vesper_parser::error::ResolveError::CyclicImport { .. }));
}

#[test]
fn a_module_that_imports_itself_is_a_cycle_of_one() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.vsp");
    fs::write(&a, "use a from \"a\"\n").unwrap();

    let mut cache = ModuleCache::new(None);
    let err = cache.resolve_root(&a).unwrap_err();
    assert!(matches!(err, vesper_parser::error::ResolveError::CyclicImport { .. }));
}

#[test]
fn an_empty_module_is_rejected() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("main.vsp");
    fs::write(&entry, "").unwrap();

    let mut cache = ModuleCache::new(None);
    let err = cache.resolve_root(&entry).unwrap_err();
    assert!(matches!(err, vesper_parser::error::ResolveError::EmptyModule { .. }));
}
