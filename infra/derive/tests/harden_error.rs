use harden_derive::harden_error;
use std::borrow::Cow;

#[harden_error]
pub enum ProbeError {
    #[error("Open failed{}: {source}", format_context(.context))]
    Open { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Write failed{}: {source}", format_context(.context))]
    Write { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Slot {index} rejected{}: {source}", format_context(.context))]
    Slot { index: u32, source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal probe error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn failing_io() -> Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
}

#[test]
fn harden_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/harden_error_pass.rs");
}

#[test]
fn first_variant_per_source_type_receives_conversion() {
    let err: ProbeError = std::io::Error::other("boom").into();
    assert!(matches!(err, ProbeError::Open { context: None, .. }));
}

#[test]
fn source_context_wraps_into_first_variant() {
    let err = failing_io().context("Opening slot list").unwrap_err();
    match &err {
        ProbeError::Open { context, .. } => {
            assert_eq!(context.as_deref(), Some("Opening slot list"));
        },
        other => panic!("unexpected variant: {other:?}"),
    }
    assert_eq!(err.to_string(), "Open failed (Opening slot list): missing");
}

#[test]
fn context_overrides_existing_error_context() {
    let result: Result<(), ProbeError> = Err(ProbeError::Write {
        source: std::io::Error::other("disk"),
        context: None,
    });
    let err = result.context("Rewriting slot 2").unwrap_err();
    assert_eq!(err.to_string(), "Write failed (Rewriting slot 2): disk");
}

#[test]
fn variants_with_extra_fields_are_built_explicitly() {
    let err = ProbeError::Slot { index: 7, source: std::io::Error::other("denied"), context: None };
    assert_eq!(err.to_string(), "Slot 7 rejected: denied");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn internal_variant_accepts_strings() {
    let from_static: ProbeError = "static fault".into();
    let from_owned: ProbeError = String::from("owned fault").into();
    assert_eq!(from_static.to_string(), "Internal probe error: static fault");
    assert_eq!(from_owned.to_string(), "Internal probe error: owned fault");
}
