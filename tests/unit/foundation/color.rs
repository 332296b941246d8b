use super::*;

#[test]
fn hex_is_lowercase_and_zero_padded() {
    assert_eq!(CATEGORY20[2].to_hex(), "#ff7f0e");
    assert_eq!(Rgb8::new(0, 10, 255).to_hex(), "#000aff");
}

#[test]
fn palette_follows_domain_order() {
    let p = CategoryPalette::with_domain(["rock", "pop", "rock"]);
    assert_eq!(p.domain(), &["rock".to_string(), "pop".to_string()]);
    assert_eq!(p.get("rock"), Some(CATEGORY20[0]));
    assert_eq!(p.get("pop"), Some(CATEGORY20[1]));
    assert_eq!(p.get("jazz"), None);
}

#[test]
fn unknown_category_is_appended() {
    let mut p = CategoryPalette::with_domain(["a"]);
    assert_eq!(p.color("b"), CATEGORY20[1]);
    assert_eq!(p.domain().len(), 2);
    assert_eq!(p.color("a"), CATEGORY20[0]);
}

#[test]
fn palette_wraps_after_twenty() {
    let names: Vec<String> = (0..21).map(|i| format!("c{i}")).collect();
    let p = CategoryPalette::with_domain(names);
    assert_eq!(p.get("c20"), Some(CATEGORY20[0]));
}
