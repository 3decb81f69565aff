use std::borrow::Cow;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// An error whose message is meant to be shown to the user as-is.
#[derive(Debug)]
pub struct UserError {
    msg: Cow<'static, str>,
}
impl UserError {
    pub fn new<T: Into<Cow<'static, str>>>(msg: T) -> Self {
        Self { msg: msg.into() }
    }
}
impl std::error::Error for UserError {}
impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.msg)
    }
}

/// Returns the user-facing message if `err` carries a `UserError` anywhere in its chain.
pub fn user_message(err: &anyhow::Error) -> Option<String> {
    err.chain()
        .find_map(|e| e.downcast_ref::<UserError>())
        .map(|u| u.to_string())
}
