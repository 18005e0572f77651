//! Unit tests for `AppError` display format.

use pr_approve_bot::AppError;

#[test]
fn display_prefixes_identify_the_variant() {
    let cases = [
        (AppError::Config("x".into()), "config: x"),
        (AppError::Slack("x".into()), "slack: x"),
        (AppError::GitHub("x".into()), "github: x"),
        (AppError::Http("x".into()), "http: x"),
        (AppError::Signature("x".into()), "signature: x"),
        (AppError::Io("x".into()), "io: x"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn toml_errors_convert_to_config() {
    let err: AppError = toml::from_str::<toml::Value>("= broken")
        .expect_err("invalid toml")
        .into();
    assert!(err.to_string().starts_with("config: invalid config"));
}

#[test]
fn io_errors_convert_to_io() {
    let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert_eq!(err.to_string(), "io: gone");
}

#[test]
fn implements_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&AppError::GitHub("boom".into()));
}
