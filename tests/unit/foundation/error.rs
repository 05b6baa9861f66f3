use anyhow::Context as _;

use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ShapeError::transport("x")
            .to_string()
            .contains("transport error:")
    );
    assert!(
        ShapeError::persistence("x")
            .to_string()
            .contains("persistence error:")
    );
    assert!(ShapeError::decode("x").to_string().contains("decode error:"));
    assert!(ShapeError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ShapeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn context_chain_is_kept_in_message() {
    let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
    let err = persistence(res.context("write 'resized/a.png'").unwrap_err());
    let msg = err.to_string();
    assert!(msg.starts_with("persistence error:"));
    assert!(msg.contains("resized/a.png"));
    assert!(msg.contains("disk full"));
}
