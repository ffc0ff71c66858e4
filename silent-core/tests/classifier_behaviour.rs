//! Behavioural tests for the category classifier.

use std::cell::{Cell, RefCell};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use silent_core::{Category, Classifier, Tags};

#[derive(Debug)]
struct ClassifierWorld {
    tags: RefCell<Tags>,
    category: Cell<Option<Category>>,
}

#[fixture]
fn world() -> ClassifierWorld {
    ClassifierWorld {
        tags: RefCell::new(Tags::new()),
        category: Cell::new(None),
    }
}

fn tag(world: &ClassifierWorld, key: &str, value: &str) {
    world
        .tags
        .borrow_mut()
        .insert(key.to_owned(), value.to_owned());
}

#[given("an element tagged landuse=cemetery and amenity=place_of_worship")]
fn given_cemetery_with_worship(world: &ClassifierWorld) {
    tag(world, "landuse", "cemetery");
    tag(world, "amenity", "place_of_worship");
}

#[given("an element tagged shop=bakery")]
fn given_bakery(world: &ClassifierWorld) {
    tag(world, "shop", "bakery");
}

#[given("an element tagged tourism=museum")]
fn given_museum(world: &ClassifierWorld) {
    tag(world, "tourism", "museum");
}

#[given("an element tagged amenity=theatre")]
fn given_theatre(world: &ClassifierWorld) {
    tag(world, "amenity", "theatre");
}

#[when("I classify the element with the standard taxonomy")]
fn when_classify_standard(world: &ClassifierWorld) {
    let tags = world.tags.borrow();
    world
        .category
        .set(Some(Classifier::standard().classify(&tags)));
}

#[when("I classify the element with the legacy taxonomy")]
fn when_classify_legacy(world: &ClassifierWorld) {
    let tags = world.tags.borrow();
    world.category.set(Some(Classifier::legacy().classify(&tags)));
}

#[then("the category is {name}")]
fn then_category(world: &ClassifierWorld, name: String) {
    let expected: Category = name
        .trim_matches('"')
        .parse()
        .expect("feature names a known category");
    assert_eq!(world.category.get(), Some(expected));
}

#[scenario(path = "tests/features/classifier.feature", index = 0)]
fn cultural_tags_win(world: ClassifierWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/classifier.feature", index = 1)]
fn unmatched_falls_back(world: ClassifierWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/classifier.feature", index = 2)]
fn legacy_has_no_museum(world: ClassifierWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/classifier.feature", index = 3)]
fn legacy_theatre(world: ClassifierWorld) {
    let _ = world;
}
