//! Integration tests for navigating paths with optics.

use std::cell::Cell;

use railpath::control::Validated;
use railpath::effect::Failure;
use railpath::optics::{Affine, FunctionAffine, FunctionLens, Lens, Prism};
use railpath::path::{Mappable, Path};
use railpath::{lens, prism};
use rstest::rstest;

// =============================================================================
// Test Fixtures
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Payment {
    Card(String),
    Cash(u32),
}

#[derive(Clone, Debug, PartialEq)]
struct Customer {
    name: String,
    payment: Payment,
}

#[derive(Clone, Debug, PartialEq)]
struct Invoice {
    number: u32,
    customer: Customer,
}

fn card_customer() -> Invoice {
    Invoice {
        number: 17,
        customer: Customer {
            name: "Ada".to_string(),
            payment: Payment::Card("4111".to_string()),
        },
    }
}

fn cash_customer() -> Invoice {
    Invoice {
        number: 18,
        customer: Customer {
            name: "Grace".to_string(),
            payment: Payment::Cash(40),
        },
    }
}

// =============================================================================
// focus
// =============================================================================

#[rstest]
fn test_focus_composes_through_nested_structs() {
    let customer_name = lens!(Invoice, customer).compose(lens!(Customer, name));

    let named = Path::right::<String, _>(card_customer()).focus(&customer_name);
    assert_eq!(named.run(), Ok("Ada".to_string()));

    let missing = Path::nothing::<Invoice>().focus(&customer_name);
    assert!(missing.is_nothing());
}

#[rstest]
fn test_focus_never_reads_on_the_alternate_channel() {
    let reads = Cell::new(0);
    let counting = FunctionLens::new(
        |invoice: &Invoice| {
            reads.set(reads.get() + 1);
            &invoice.number
        },
        |mut invoice: Invoice, number| {
            invoice.number = number;
            invoice
        },
    );

    let failed = Path::left::<&str, Invoice>("lookup failed").focus(&counting);
    assert_eq!(failed.run(), Err("lookup failed"));
    assert_eq!(reads.get(), 0);

    let found = Path::right::<&str, _>(card_customer()).focus(&counting);
    assert_eq!(found.run(), Ok(17));
    assert_eq!(reads.get(), 1);
}

#[rstest]
fn test_focus_on_validation_keeps_errors() {
    let number = lens!(Invoice, number);
    let invalid = Path::invalid::<Vec<&str>, Invoice>(vec!["bad invoice"]).focus(&number);
    assert_eq!(invalid.run(), Validated::invalid(vec!["bad invoice"]));
}

// =============================================================================
// focus_optional
// =============================================================================

#[rstest]
#[case(card_customer(), Ok("4111".to_string()))]
#[case(cash_customer(), Err("not paid by card"))]
fn test_focus_optional_through_lens_and_prism(
    #[case] invoice: Invoice,
    #[case] expected: Result<String, &'static str>,
) {
    let card = lens!(Invoice, customer)
        .compose(lens!(Customer, payment))
        .compose_prism(prism!(Payment, Card));

    let result = Path::right(invoice).focus_optional(&card, "not paid by card");
    assert_eq!(result.run(), expected);
}

#[rstest]
fn test_focus_optional_with_builds_the_alternate_lazily() {
    let cash = lens!(Customer, payment).compose_prism(prism!(Payment, Cash));
    let built = Cell::new(false);

    let present = Path::success(cash_customer().customer).focus_optional_with(&cash, || {
        built.set(true);
        Failure::msg("no cash")
    });
    assert_eq!(present.get_or_else(0), 40);
    assert!(!built.get());

    let absent = Path::success(card_customer().customer).focus_optional_with(&cash, || {
        built.set(true);
        Failure::msg("no cash")
    });
    assert!(absent.is_failure());
    assert!(built.get());
}

#[rstest]
fn test_focus_optional_on_maybe_becomes_nothing() {
    let head = FunctionAffine::new(
        |items: &Vec<u8>| items.first(),
        |mut items: Vec<u8>, value: u8| {
            if let Some(first) = items.first_mut() {
                *first = value;
            }
            items
        },
    );

    assert_eq!(Path::just(vec![3, 4]).focus_optional(&head, ()).run(), Some(3));
    assert_eq!(Path::just(Vec::<u8>::new()).focus_optional(&head, ()).run(), None);
}

#[rstest]
fn test_affine_focus_set_back_rebuilds_equal_parent() {
    let card = lens!(Customer, payment).compose_prism(prism!(Payment, Card));
    let original = card_customer().customer;

    let rebuilt = Path::right::<&str, _>(original.clone())
        .focus_optional(&card, "no card")
        .map(|number| card.set(original.clone(), number));

    assert_eq!(rebuilt.run(), Ok(original));
}

#[derive(Clone, Debug, PartialEq)]
enum Slot {
    Filled(Option<u32>),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
struct Shelf {
    slot: Slot,
}

#[derive(Clone, Debug, PartialEq)]
struct Store {
    shelf: Shelf,
}

#[rstest]
#[case(Slot::Filled(Some(4)), Some(4))]
#[case(Slot::Filled(Some(0)), None)]
#[case(Slot::Filled(None), None)]
#[case(Slot::Empty, None)]
fn test_focus_optional_through_every_composition(
    #[case] slot: Slot,
    #[case] expected: Option<u32>,
) {
    let filled_count = prism!(Slot, Filled).compose(prism!(Option<u32>, Some));
    let count = lens!(Store, shelf)
        .compose(lens!(Shelf, slot))
        .compose_prism(filled_count);
    let non_zero = FunctionAffine::new(|n: &u32| (*n > 0).then_some(n), |_: u32, n: u32| n);
    let stocked = count.compose(non_zero);

    let store = Store { shelf: Shelf { slot: slot.clone() } };
    assert_eq!(Path::just(store.clone()).focus_optional(&stocked, ()).run(), expected);

    let slot_option = lens!(Store, shelf)
        .compose(lens!(Shelf, slot))
        .to_affine()
        .compose_prism(prism!(Slot, Filled));
    let expected_option = match slot {
        Slot::Filled(inner) => Ok(inner),
        Slot::Empty => Err("empty"),
    };
    assert_eq!(
        Path::right(store).focus_optional(&slot_option, "empty").run(),
        expected_option
    );
}

#[rstest]
fn test_focus_then_continue_on_the_rail() {
    let number = lens!(Invoice, number);
    let label = Path::valid::<Vec<String>, _>(cash_customer())
        .focus(&number)
        .map(|number| format!("INV-{number:04}"));
    assert_eq!(label.run(), Validated::valid("INV-0018".to_string()));
}

#[cfg(feature = "task")]
#[rstest]
fn test_task_focus_is_deferred() {
    let card = lens!(Customer, payment).compose_prism(prism!(Payment, Card));
    let path =
        Path::task(|| cash_customer().customer).focus_optional(card, Failure::msg("no card"));
    let outcome = path.run_safe();
    assert!(
        outcome
            .failure_ref()
            .is_some_and(|failure| failure.to_string().contains("no card"))
    );
}
