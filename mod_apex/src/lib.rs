#[macro_use]
extern crate lazy_static;

mod client;
mod command;
mod config;
mod model;
mod render;
#[cfg(test)]
mod tests;

use apexbot::prelude::*;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::sync::Arc;

use client::{HttpUpstream, Upstream};
use command::{Invocation, Target};
use config::{Config, API_KEY_ENV};

const USAGE_TAG: &str = "apex";

#[no_mangle]
pub fn get_meta_conf(meta: &mut dyn Meta, config: toml::Value) -> Result<()> {
    let config = Config::from_toml(config)?;
    let upstream = HttpUpstream::new(&config)?;
    let apex = Arc::new(Apex::new(config, Box::new(upstream)));

    let a = Arc::clone(&apex);
    meta.cmd("apex", Command::new(move |ctx: &dyn Context, args: &str| a.command(ctx, args)));

    meta.handle(
        HandleType::PlainMsg,
        Box::new(move |ctx: &dyn Context, _: HandleType, msg: &str| apex.message(ctx, msg)),
    );
    Ok(())
}

lazy_static! {
    static ref APEX_RE: Regex = Regex::new(r"(?i)^\s*apex(\s|$)").unwrap();
}

/// What a host shows for one `apex` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayResult {
    pub success: bool,
    pub message: String,
    pub tag: &'static str,
}

pub struct Apex {
    api_key: Option<String>,
    upstream: Box<dyn Upstream>,
}

impl Apex {
    pub fn new(config: Config, upstream: Box<dyn Upstream>) -> Self {
        if config.api_key.is_none() {
            warn!("{} is not set; apex commands other than help will not work", API_KEY_ENV);
        } else {
            info!("apex module loaded, api key configured");
        }

        Self {
            api_key: config.api_key,
            upstream,
        }
    }

    /// Handles a full `apex ...` line. Never fails: every problem becomes an unsuccessful result.
    pub fn handle(&self, text: &str) -> DisplayResult {
        let invocation = match command::parse(text) {
            Ok(i) => i,
            Err(e) => return failure(USAGE_TAG, e),
        };

        let tag = invocation.subcommand().name();
        match self.run(&invocation) {
            Ok(message) => DisplayResult {
                success: true,
                message,
                tag,
            },
            Err(e) => failure(tag, e),
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<String> {
        match invocation {
            Invocation::Help => Ok(render::HELP.to_string()),
            Invocation::Leaderboard => render::leaderboard(&self.get("/leaderboard", None)?),
            Invocation::Map => render::map_rotation(&self.get("/maprotation", None)?),
            Invocation::Store => render::store(&self.get("/store", None)?),
            Invocation::Crafting => {
                render::crafting(&self.get_list::<model::CraftingItem>("/crafting")?)
            }
            Invocation::News => render::news(&self.get_list::<model::NewsItem>("/news")?),
            Invocation::Status => {
                render::server_status(&self.get_list::<model::ServerStatus>("/servers")?)
            }
            Invocation::Predator => render::predator(&self.get("/predator", None)?),
            Invocation::Player(t) => render::player(&self.get("/bridge", Some(t))?, t),
            Invocation::Uid(t) => render::uid(&self.get("/nametouid", Some(t))?, t),
            Invocation::Matches(t) => render::matches(&self.get("/bridge", Some(t))?, t),
        }
    }

    /// Fetches an endpoint whose body is a single JSON object.
    fn get<T: DeserializeOwned>(&self, path: &str, target: Option<&Target>) -> Result<T> {
        let body = client::fetch(self.upstream.as_ref(), self.api_key.as_deref(), path, target)?;
        render::decode_object(&body)
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let body = client::fetch(self.upstream.as_ref(), self.api_key.as_deref(), path, None)?;
        render::decode(&body)
    }

    fn command(&self, ctx: &dyn Context, args: &str) -> Result<()> {
        let result = self.handle(&format!("apex {}", args));
        ctx.reply(Message::Simple(result.message))
    }

    fn message(&self, ctx: &dyn Context, msg: &str) -> Result<()> {
        if !APEX_RE.is_match(msg) {
            return Ok(());
        }

        let result = self.handle(msg);
        ctx.reply(Message::Status {
            success: result.success,
            tag: Cow::Borrowed(result.tag),
            text: result.message,
        })
    }
}

fn failure(tag: &'static str, e: Error) -> DisplayResult {
    let message = match user_message(&e) {
        Some(msg) => msg,
        None => {
            error!("apex {} failed: {:?}", tag, e);
            format!("查询出错：{}", e)
        }
    };

    DisplayResult {
        success: false,
        message,
        tag,
    }
}
