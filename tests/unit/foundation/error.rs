use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScenecutError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ScenecutError::scheduling("x")
            .to_string()
            .contains("scheduling error:")
    );
    assert!(
        ScenecutError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        ScenecutError::export("x")
            .to_string()
            .contains("export error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScenecutError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: ScenecutError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ScenecutError::Serde(_)));
}
