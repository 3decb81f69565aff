#![allow(non_upper_case_globals)]

use bitflags::bitflags;
use std::borrow::Cow;
use std::sync::Arc;

use super::error::Result;

pub type CommandFn = dyn Fn(&dyn Context, &str) -> Result<()> + Send + Sync;
#[derive(Clone)]
pub struct Command {
    pub function: Arc<CommandFn>,
}

impl Command {
    pub fn new<F: 'static + Fn(&dyn Context, &str) -> Result<()> + Send + Sync>(f: F) -> Self {
        Self { function: Arc::new(f) }
    }
    pub fn call(&self, ctx: &dyn Context, args: &str) -> Result<()> {
        (self.function)(ctx, args)
    }
}

bitflags! {
    pub struct HandleType: u64 {
        const None       = 0x0000_0000;

        const Command    = 0x0000_0001;
        const PlainMsg   = 0x0000_0002;

        const All        = 0xFFFF_FFFF;
    }
}

pub type MsgHandlerFn = dyn Fn(&dyn Context, HandleType, &str) -> Result<()> + Send + Sync;

pub trait Meta {
    fn cmd(&mut self, name: &str, cmd: Command);

    fn handle(&mut self, typ: HandleType, f: Box<MsgHandlerFn>);
}

pub trait Context {
    fn config_id(&self) -> &str;
    fn say(&self, _: &str) -> Result<()>;
    fn reply(&self, _: Message) -> Result<()>;
    fn source(&self) -> &dyn Source;
}

pub trait Source {
    fn user_string(&self) -> Cow<str>;
    fn channel_string(&self) -> Cow<str>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Simple(String),
    // Reply for hosts that display an outcome next to the text
    Status {
        success: bool,
        tag: Cow<'static, str>,
        text: String,
    },
}
