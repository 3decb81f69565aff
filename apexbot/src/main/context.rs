use crate::bot;
use crate::message;
use apexbot::prelude::*;
use apexbot::types;
use std::borrow::Cow;

pub struct Context<'a> {
    pub bot: &'a bot::Apexbot,
    pub config: String,
    pub source: Source,
}

impl<'a> types::Context for Context<'a> {
    fn config_id(&self) -> &str {
        &self.config
    }

    fn source(&self) -> &dyn types::Source {
        &self.source
    }

    fn say(&self, message: &str) -> Result<()> {
        self.reply(Message::Simple(message.to_string()))
    }

    fn reply(&self, message: Message) -> Result<()> {
        for line in message::format_console(&message) {
            self.bot.output(&self.source, &line)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Source {
    pub nick: String,
}

impl types::Source for Source {
    fn user_string(&self) -> Cow<str> {
        (&self.nick).into()
    }

    fn channel_string(&self) -> Cow<str> {
        "console".into()
    }
}
