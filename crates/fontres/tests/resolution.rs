// this_file: crates/fontres/tests/resolution.rs

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{frame, MockDriver};
use fontres::core::{ConfigError, DisplayId, FontDriver, GenericFamily};
use fontres::{
    font_match_p, Config, FontContext, FontSpec, GenericFamilyCache, GenericSlot, Registry,
    Spacing, Weight,
};

fn context_with(drivers: Vec<Arc<MockDriver>>) -> FontContext {
    let ctx = FontContext::new(Config::default());
    for driver in drivers {
        ctx.register_driver(driver);
    }
    ctx
}

fn families(entities: &[Arc<fontres::FontEntity>]) -> Vec<String> {
    entities.iter().map(|e| e.family().to_string()).collect()
}

#[test]
fn test_resolve_when_family_missing_then_generic_members_substitute() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);

    let spec = FontSpec::family("Courier")
        .with_registry(Registry::Iso8859_1)
        .with_pixel_size(12);
    let found = ctx.resolve(&spec, &frame());

    assert!(!found.is_empty(), "monospace members should stand in for Courier");
    for entity in &found {
        assert!(
            ["Courier New", "Monaco"].contains(&entity.family()),
            "unexpected substitute {entity}"
        );
        // The substitutes still honor everything but the family
        let mut relaxed = spec.clone();
        relaxed.family = None;
        assert!(font_match_p(&relaxed, entity));
    }
    // Monaco's ASCII-only face cannot serve Latin-1, its bitmap is 10px
    assert_eq!(families(&found), vec!["Courier New", "Courier New"]);
}

#[test]
fn test_resolve_when_name_override_sets_style_then_substitutes_honor_it() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver]);

    let spec = FontSpec::family("Courier").with_name(":bold");
    let found = ctx.resolve(&spec, &frame());

    assert_eq!(families(&found), vec!["Courier New"]);
    assert_eq!(found[0].weight(), Weight::BOLD);
}

#[test]
fn test_resolve_when_family_exists_then_no_generic_build() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);

    let found = ctx.resolve(&FontSpec::family("Helvetica"), &frame());
    assert_eq!(found.len(), 2);
    assert_eq!(MockDriver::count(&driver.member_calls), 0);
}

#[test]
fn test_resolve_when_unknown_family_has_no_generic_then_empty() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);

    assert!(ctx.resolve(&FontSpec::family("Zapfino"), &frame()).is_empty());
    assert_eq!(MockDriver::count(&driver.member_calls), 0);
}

#[test]
fn test_generic_list_when_queried_twice_then_built_once_in_same_order() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);

    let first = ctx.resolve(&FontSpec::family("mono").with_pixel_size(12), &frame());
    let calls_after_first = MockDriver::count(&driver.member_calls);
    // "monospace" itself is skipped; Courier New and Monaco are listed
    assert_eq!(calls_after_first, 2);

    // A different spec misses the entity cache but reuses the generic slot
    let second = ctx.resolve(
        &FontSpec::family("mono")
            .with_pixel_size(12)
            .with_spacing(Spacing::Mono),
        &frame(),
    );
    assert_eq!(MockDriver::count(&driver.member_calls), calls_after_first);
    assert_eq!(families(&first), families(&second));
    assert_eq!(
        first.iter().map(|e| e.id()).collect::<Vec<_>>(),
        second.iter().map(|e| e.id()).collect::<Vec<_>>()
    );
}

#[test]
fn test_generic_build_when_listing_fails_then_retried_next_time() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);
    let spec = FontSpec::family("monospace");

    driver.fail_members.store(true, Ordering::SeqCst);
    assert!(ctx.resolve(&spec, &frame()).is_empty());
    let failed_calls = MockDriver::count(&driver.member_calls);
    assert_eq!(failed_calls, 1);

    driver.fail_members.store(false, Ordering::SeqCst);
    let found = ctx.resolve(&spec, &frame());
    assert!(!found.is_empty());
    assert!(MockDriver::count(&driver.member_calls) > failed_calls);
}

#[test]
fn test_generic_cache_when_build_fails_then_slot_stays_unlisted() {
    let driver = MockDriver::new("mock");
    let cache = GenericFamilyCache::new();
    let display = DisplayId(0);

    driver.fail_members.store(true, Ordering::SeqCst);
    assert!(cache
        .get_or_build(display, &driver, GenericFamily::Monospace)
        .is_err());
    assert!(matches!(
        cache.slot(display, driver.get_cache(), GenericFamily::Monospace),
        GenericSlot::NotYetListed
    ));

    driver.fail_members.store(false, Ordering::SeqCst);
    let list = cache
        .get_or_build(display, &driver, GenericFamily::Monospace)
        .expect("listing succeeds");
    assert_eq!(list.len(), 4);
    assert!(matches!(
        cache.slot(display, driver.get_cache(), GenericFamily::Monospace),
        GenericSlot::Listed(_)
    ));
}

#[test]
fn test_generic_cache_when_nothing_found_then_empty_list_is_kept() {
    let driver = MockDriver::new("mock");
    let cache = GenericFamilyCache::new();
    let display = DisplayId(0);

    let serif = cache
        .get_or_build(display, &driver, GenericFamily::Serif)
        .expect("empty is not an error");
    assert!(serif.is_empty());
    assert!(matches!(
        cache.slot(display, "mock", GenericFamily::Serif),
        GenericSlot::Listed(_)
    ));
}

#[test]
fn test_resolve_when_repeated_then_served_from_cache() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);
    let spec = FontSpec::family("Helvetica");

    let first = ctx.resolve(&spec, &frame());
    let second = ctx.resolve(&spec, &frame());
    assert_eq!(MockDriver::count(&driver.list_calls), 1);
    assert_eq!(families(&first), families(&second));

    let stats = ctx.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_resolve_when_other_display_then_separate_cache() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);
    let spec = FontSpec::family("Helvetica");

    ctx.resolve(&spec, &frame());
    ctx.resolve(&spec, &fontres::Frame::new(1, 1));
    assert_eq!(MockDriver::count(&driver.list_calls), 2);
}

#[test]
fn test_flush_when_cached_then_entities_freed_and_requeried() {
    let driver = Arc::new(MockDriver::new("mock"));
    let ctx = context_with(vec![driver.clone()]);
    let spec = FontSpec::family("Helvetica");

    ctx.resolve(&spec, &frame());
    ctx.flush_caches(frame().display);
    assert_eq!(MockDriver::count(&driver.freed), 2);

    ctx.resolve(&spec, &frame());
    assert_eq!(MockDriver::count(&driver.list_calls), 2);
}

#[test]
fn test_resolve_limited_when_max_given_then_truncated() {
    let a = Arc::new(MockDriver::new("a"));
    let b = Arc::new(MockDriver::new("b"));
    let ctx = context_with(vec![a.clone(), b.clone()]);

    let all = ctx.resolve(&FontSpec::new().with_spacing(Spacing::Mono), &frame());
    assert_eq!(all.len(), 8);

    let one = ctx.resolve_limited(&FontSpec::new().with_spacing(Spacing::Mono), &frame(), 1);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].driver_type(), "a");
    // The first driver filled the quota
    assert_eq!(MockDriver::count(&b.list_calls), 1);
}

#[test]
fn test_sort_order_when_changed_then_preferred_driver_first() {
    let a = Arc::new(MockDriver::new("a"));
    let b = Arc::new(MockDriver::new("b"));
    let ctx = context_with(vec![a, b]);
    let spec = FontSpec::family("Helvetica");

    let found = ctx.resolve(&spec, &frame());
    assert_eq!(found[0].driver_type(), "a");

    ctx.set_sort_order(&["b"]).expect("known driver");
    assert_eq!(ctx.driver_types(), vec!["b", "a"]);
    let found = ctx.resolve(&spec, &frame());
    assert_eq!(found[0].driver_type(), "b");
    assert_eq!(found.last().map(|e| e.driver_type()), Some("a"));

    assert!(matches!(
        ctx.set_sort_order(&["nope"]),
        Err(ConfigError::UnknownDriver(name)) if name == "nope"
    ));
}

#[test]
fn test_resolve_when_driver_type_given_then_only_that_driver() {
    let a = Arc::new(MockDriver::new("a"));
    let b = Arc::new(MockDriver::new("b"));
    let ctx = context_with(vec![a.clone(), b.clone()]);

    let found = ctx.resolve(&FontSpec::family("Helvetica").with_driver_type("b"), &frame());
    assert!(!found.is_empty());
    assert!(found.iter().all(|e| e.driver_type() == "b"));
    assert_eq!(MockDriver::count(&a.list_calls), 0);
}

#[test]
fn test_init_when_driver_fails_then_others_still_serve() {
    let broken = Arc::new(MockDriver::new("broken").failing_init());
    let good = Arc::new(MockDriver::new("good"));
    let ctx = context_with(vec![broken.clone(), good.clone()]);

    let failures = ctx.init_drivers();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].driver, "broken");

    let found = ctx.resolve(&FontSpec::family("Helvetica"), &frame());
    assert!(!found.is_empty());
    assert!(found.iter().all(|e| e.driver_type() == "good"));
    assert_eq!(MockDriver::count(&broken.init_calls), 1);
    assert_eq!(MockDriver::count(&good.init_calls), 1);
    assert_eq!(MockDriver::count(&broken.list_calls), 0);
    assert!(ctx.init_drivers().is_empty());
}

#[test]
fn test_match_font_when_several_drivers_then_first_answers() {
    let a = Arc::new(MockDriver::new("a"));
    let b = Arc::new(MockDriver::new("b"));
    let ctx = context_with(vec![a, b.clone()]);

    let best = ctx
        .match_font(&FontSpec::family("Courier New").with_weight(Weight::BOLD), &frame())
        .expect("match");
    assert_eq!(best.driver_type(), "a");
    assert_eq!(best.weight(), Weight::BOLD);
    assert_eq!(MockDriver::count(&b.list_calls), 0);
}

#[test]
fn test_list_families_when_drivers_overlap_then_deduplicated() {
    let ctx = context_with(vec![
        Arc::new(MockDriver::new("a")),
        Arc::new(MockDriver::new("b")),
    ]);
    assert_eq!(
        ctx.list_families(&frame()),
        vec!["Courier New", "Fixed", "Helvetica", "Monaco"]
    );
}

#[test]
fn test_resolve_when_bitmap_size_differs_then_dropped() {
    let ctx = context_with(vec![Arc::new(MockDriver::new("mock"))]);

    assert!(ctx
        .resolve(&FontSpec::family("Fixed").with_pixel_size(12), &frame())
        .is_empty());
    assert_eq!(
        ctx.resolve(&FontSpec::family("Fixed").with_pixel_size(13), &frame())
            .len(),
        1
    );
    // 10pt at 96dpi is 13px
    assert_eq!(
        ctx.resolve(&FontSpec::family("Fixed").with_point_size(10.0), &frame())
            .len(),
        1
    );
}
