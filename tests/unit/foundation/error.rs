use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ArchiveError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ArchiveError::asset("x").to_string().contains("asset error:"));
    assert!(
        ArchiveError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        ArchiveError::config("x")
            .to_string()
            .contains("config error:")
    );
}

#[test]
fn empty_input_names_the_set() {
    let err = ArchiveError::EmptyInput("caption set");
    assert_eq!(
        err.to_string(),
        "empty input: cannot pick from an empty caption set"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ArchiveError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
