use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VisError::not_found("a")
            .to_string()
            .contains("not found: no item with id 'a'")
    );
    assert!(
        VisError::integrity("x")
            .to_string()
            .contains("data integrity error:")
    );
    assert!(
        VisError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        VisError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(VisError::render("x").to_string().contains("render error:"));
}

#[test]
fn out_of_range_names_index_and_len() {
    let err = VisError::SectionOutOfRange { index: 7, len: 5 };
    let s = err.to_string();
    assert!(s.contains('7'));
    assert!(s.contains("section count 5"));
}

#[test]
fn json_errors_convert_to_serde_variant() {
    let err: VisError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, VisError::Serde(_)));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VisError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
