// this_file: crates/fontres/tests/properties.rs

mod common;

use std::sync::Arc;

use common::{frame, MockDriver};
use fontres::core::FontEntity;
use fontres::{
    filter_by_size, font_match_p, Config, FontContext, FontSpec, Slant, Spacing, Weight,
};
use proptest::prelude::*;

fn family() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("Courier New")),
        Just(Some("Helvetica")),
        Just(Some("Monaco")),
        Just(Some("Fixed")),
    ]
}

fn spec() -> impl Strategy<Value = FontSpec> {
    (
        family(),
        prop::option::of(prop_oneof![Just(Weight::REGULAR), Just(Weight::BOLD)]),
        prop::option::of(prop_oneof![Just(Slant::ROMAN), Just(Slant::ITALIC)]),
        prop::option::of(prop_oneof![Just(Spacing::Proportional), Just(Spacing::Mono)]),
    )
        .prop_map(|(family, weight, slant, spacing)| FontSpec {
            family: family.map(str::to_string),
            weight,
            slant,
            spacing,
            ..FontSpec::default()
        })
}

proptest! {
    #[test]
    fn resolved_entities_satisfy_every_given_field(spec in spec()) {
        let ctx = FontContext::new(Config::default());
        ctx.register_driver(Arc::new(MockDriver::new("mock")));

        // Generic substitutes may carry another family, never other styles
        let mut relaxed = spec.clone();
        relaxed.family = None;
        let found = ctx.resolve(&spec, &frame());
        for entity in &found {
            prop_assert!(font_match_p(&relaxed, entity), "{entity} does not match {spec:?}");
        }
        if found.iter().any(|e| font_match_p(&spec, e)) {
            prop_assert!(found.iter().all(|e| font_match_p(&spec, e)));
        }
    }

    #[test]
    fn resolving_twice_gives_the_same_answer(spec in spec()) {
        let ctx = FontContext::new(Config::default());
        ctx.register_driver(Arc::new(MockDriver::new("mock")));

        let first: Vec<_> = ctx.resolve(&spec, &frame()).iter().map(|e| e.id()).collect();
        let second: Vec<_> = ctx.resolve(&spec, &frame()).iter().map(|e| e.id()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn open_close_pairs_leave_nothing_open(opens in 1usize..6, size in 6u32..40) {
        let driver = Arc::new(MockDriver::new("mock"));
        let ctx = FontContext::new(Config::default());
        ctx.register_driver(driver.clone());
        let entity = driver.entities()[0].clone();

        let handles: Vec<_> = (0..opens)
            .map(|_| ctx.open(&entity, size, &frame()))
            .collect::<Result<_, _>>()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(ctx.refcount(&handles[0]), opens);
        for handle in &handles {
            ctx.close(handle, &frame());
        }
        prop_assert_eq!(ctx.open_font_count(), 0);
        prop_assert_eq!(MockDriver::count(&driver.open_calls), 1);
        prop_assert_eq!(MockDriver::count(&driver.close_calls), 1);
    }

    #[test]
    fn size_filter_keeps_only_scalable_or_exact(sizes in prop::collection::vec(0u32..20, 0..12), want in 1u32..20) {
        let entities: Vec<_> = sizes
            .iter()
            .map(|&s| Arc::new(FontEntity::builder("mock", "A").pixel_size(s).build()))
            .collect();
        let kept = filter_by_size(entities.clone(), Some(want));
        prop_assert!(kept.iter().all(|e| e.is_scalable() || e.pixel_size() == want));
        prop_assert_eq!(
            kept.len(),
            sizes.iter().filter(|&&s| s == 0 || s == want).count()
        );
    }
}
