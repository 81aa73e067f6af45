use harden_derive::harden_error;
use std::borrow::Cow;

#[harden_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected {path}{}: {source}", format_context(.context))]
    Rejected { path: String, source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let _converted: DemoError = std::io::Error::other("boom").into();
    let _internal: DemoError = "fault".into();
}
