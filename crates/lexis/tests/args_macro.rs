use lexis::{Value, args};

#[test]
fn empty_args() {
    let a = args! {};
    assert!(a.is_empty());
}

#[test]
fn mixed_args() {
    let a = args! {
        "count" => 3,
        "name" => "Bob",
        "ratio" => 0.5_f64
    };
    assert_eq!(a.len(), 3);
    assert_eq!(a["count"], Value::Number(3));
    assert_eq!(a["name"].as_string(), Some("Bob"));
    assert_eq!(a["ratio"].as_number(), Some(0.5));
}

#[test]
fn trailing_comma() {
    let a = args! {
        "a" => 1,
        "b" => 2,
    };
    assert_eq!(a.len(), 2);
}

#[test]
fn various_integer_types() {
    let a = args! {
        "i32" => 10_i32,
        "i64" => 20_i64,
        "u32" => 30_u32,
        "u64" => 40_u64,
        "usize" => 50_usize
    };
    assert_eq!(a["i32"], Value::Number(10));
    assert_eq!(a["u64"], Value::Number(40));
    assert_eq!(a["usize"].as_number(), Some(50.0));
}

#[test]
fn owned_string_keys() {
    let key = String::from("user");
    let a = args! { key => String::from("Alice") };
    assert_eq!(a["user"].as_string(), Some("Alice"));
}

#[test]
fn string_arguments_coerce_to_numbers() {
    let a = args! { "n" => " 4.5 ", "bad" => "four" };
    assert_eq!(a["n"].to_number(), Some(4.5));
    assert_eq!(a["bad"].to_number(), None);
    assert_eq!(Value::Float(f64::NAN).to_number(), None);
}

#[test]
fn oversized_unsigned_counts_become_floats() {
    let a = args! { "big" => u64::MAX, "fits" => i64::MAX as u64 };
    assert_eq!(a["big"], Value::Float(u64::MAX as f64));
    assert_eq!(a["fits"], Value::Number(i64::MAX));
}
