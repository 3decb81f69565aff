// These may or may not be used in libapexbot itself, but modules use them; declaring them here
// makes the compiler put them in libapexbot.so instead of duplicating them into each module
extern crate log;
extern crate reqwest;
extern crate serde_json;
extern crate toml;

pub mod error;
pub mod types;


pub mod prelude {
    pub use crate::bail_user;
    pub use crate::error::*;
    pub use crate::types::*;
    pub use anyhow::Context as AnyhowContext; // would conflict with types::Context, but we just need the trait in scope here and don't care about names
    pub use anyhow::{anyhow, bail, Error};
    pub use log::{debug, error, info, trace, warn};
}

// This is roughly equivalent to anyhow's bail!(), but returns a UserError inside the Error so that the user sees the message.
#[macro_export]
macro_rules! bail_user {
    ($msg:literal $(,)?) => {
      return Err($crate::error::UserError::new($msg).into())
    };
    ($fmt:literal, $($arg:tt)*) => {
        return Err($crate::error::UserError::new(format!($fmt, $($arg)*)).into())
    };
}
