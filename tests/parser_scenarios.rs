use grocy_import::model::{Product, QuantityUnit};
use grocy_import::{parse_line, Field, ParseMode, Resolution, ResolvedIngredient, Session};

const CUP: u64 = 10;
const TEASPOON: u64 = 11;
const OUNCE: u64 = 13;
const COUNT: u64 = 14;

const FLOUR: u64 = 100;
const SALT: u64 = 101;
const GARLIC: u64 = 102;
const TOMATOES: u64 = 103;
const MILK: u64 = 104;

fn session() -> Session {
    let units = vec![
        unit(CUP, "cup", Some("cups")),
        unit(TEASPOON, "teaspoon", Some("teaspoons")),
        unit(12, "tablespoon", None),
        unit(OUNCE, "ounce", None),
        unit(COUNT, "count", None),
    ];
    let products = vec![
        product(FLOUR, "Flour"),
        product(SALT, "Salt"),
        product(GARLIC, "Garlic"),
        product(TOMATOES, "Tomatoes"),
        product(MILK, "Milk"),
    ];
    Session::new(units, products)
}

fn unit(id: u64, name: &str, plural: Option<&str>) -> QuantityUnit {
    QuantityUnit {
        id,
        name: name.to_string(),
        name_plural: plural.map(str::to_string),
    }
}

fn product(id: u64, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
    }
}

fn complete(line: &str, mode: ParseMode) -> ResolvedIngredient {
    match parse_line(line, mode, &session()) {
        Resolution::Complete(ingredient) => ingredient,
        other => panic!("\"{}\" did not resolve: {:?}", line, other),
    }
}

#[test]
fn test_plain_line_in_both_modes() {
    for mode in [ParseMode::Guess, ParseMode::Automatic] {
        let ingredient = complete("2 cups flour", mode);
        assert_eq!(
            ingredient,
            ResolvedIngredient {
                product_id: FLOUR,
                unit_id: CUP,
                amount: 2.0,
                note: None,
            }
        );
    }
}

#[test]
fn test_leading_decimal_point_in_both_modes() {
    for mode in [ParseMode::Guess, ParseMode::Automatic] {
        let ingredient = complete(".5 cup milk", mode);
        assert_eq!(
            ingredient,
            ResolvedIngredient {
                product_id: MILK,
                unit_id: CUP,
                amount: 0.5,
                note: None,
            }
        );
    }
}

#[test]
fn test_nickname_carries_its_note() {
    let ingredient = complete("1/2 tsp kosher salt", ParseMode::Automatic);
    assert_eq!(ingredient.amount, 0.5);
    assert_eq!(ingredient.unit_id, TEASPOON);
    assert_eq!(ingredient.product_id, SALT);
    assert_eq!(ingredient.note.as_deref(), Some("kosher"));
}

#[test]
fn test_garlic_counted_in_teaspoons() {
    let ingredient = complete("3 garlic cloves", ParseMode::Automatic);
    assert_eq!(ingredient.product_id, GARLIC);
    assert_eq!(ingredient.unit_id, TEASPOON);
    assert_ne!(ingredient.unit_id, COUNT);
    assert_eq!(ingredient.amount, 3.0);
}

#[test]
fn test_can_goods_use_the_inner_measure() {
    let ingredient = complete("2 (14.5 oz) cans diced tomatoes", ParseMode::Automatic);
    assert_eq!(ingredient.amount, 14.5);
    assert_eq!(ingredient.unit_id, OUNCE);
    assert_eq!(ingredient.product_id, TOMATOES);
    let note = ingredient.note.unwrap();
    assert!(note.contains("diced"));
    assert!(note.contains("2 cans"));
}

#[test]
fn test_unparseable_line_fails() {
    let session = session();
    for mode in [ParseMode::Guess, ParseMode::Automatic] {
        let resolution = parse_line("a pinch of magic", mode, &session);
        assert_eq!(resolution, Resolution::Failed);
        assert_eq!(
            resolution.missing(),
            vec![Field::Product, Field::Unit, Field::Amount]
        );
    }
}

#[test]
fn test_unknown_product_keeps_the_rest() {
    let resolution = parse_line("1 cup saffron threads", ParseMode::Automatic, &session());
    let Resolution::Incomplete {
        partial,
        missing,
        product_hint,
    } = resolution
    else {
        panic!("expected an incomplete ingredient");
    };
    assert_eq!(missing, vec![Field::Product]);
    assert_eq!(partial.unit_id, Some(CUP));
    assert_eq!(partial.amount, Some(1.0));
    assert_eq!(product_hint.as_deref(), Some("saffron threads"));
}
