use libloading::{Library, Symbol};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

use crate::config::Config;
use crate::context::{Context, Source};
use apexbot::prelude::*;
use apexbot::types::Context as TypesContext; // trait

type GetMetaConf = fn(&mut dyn Meta, toml::Value) -> Result<()>;

const CONSOLE_CONFIG_ID: &str = "console";

struct Module {
    // keeps the module's code mapped while its commands are registered
    _lib: Library,
    commands: Vec<String>,
}

impl Module {
    fn describe(&self) -> String {
        self.commands.join(", ")
    }
}

#[derive(Default)]
struct ModuleMeta {
    commands: BTreeMap<String, Command>,
    handlers: Vec<(HandleType, Box<MsgHandlerFn>)>,
}

impl Meta for ModuleMeta {
    fn cmd(&mut self, name: &str, cmd: Command) {
        self.commands.insert(name.to_string(), cmd);
    }

    fn handle(&mut self, typ: HandleType, f: Box<MsgHandlerFn>) {
        self.handlers.push((typ, f));
    }
}

pub struct Apexbot {
    cmdchars: String,
    nick: String,

    modules: RwLock<BTreeMap<String, Module>>,
    commands: RwLock<BTreeMap<String, Command>>,
    handlers: RwLock<Vec<(String, HandleType, Arc<MsgHandlerFn>)>>,
}

impl Apexbot {
    pub fn new(config: &Config) -> Self {
        Self {
            cmdchars: config.cmdchars.clone(),
            nick: config.nick.clone(),
            modules: RwLock::new(BTreeMap::new()),
            commands: RwLock::new(BTreeMap::new()),
            handlers: RwLock::new(vec![]),
        }
    }

    pub fn load_module(&self, name: &str, config: toml::Value) -> Result<()> {
        if self.modules.read().contains_key(name) {
            bail_user!("module {} is already loaded", name);
        }

        let libpath = if cfg!(debug_assertions) {
            format!("libmod_{name}.so")
        } else {
            format!("target/release/libmod_{name}.so")
        };
        let lib = unsafe { Library::new(&libpath) }.with_context(|| format!("loading {libpath}"))?;

        let mut meta = ModuleMeta::default();
        {
            let get_meta_conf: Symbol<GetMetaConf> = unsafe { lib.get(b"get_meta_conf") }?;
            get_meta_conf(&mut meta, config).with_context(|| format!("configuring module {name}"))?;
        }

        let names: Vec<String> = meta.commands.keys().cloned().collect();
        self.commands.write().extend(meta.commands);
        self.handlers.write().extend(
            meta.handlers
                .into_iter()
                .map(|(typ, f)| (name.to_string(), typ, Arc::<MsgHandlerFn>::from(f))),
        );

        let module = Module {
            _lib: lib,
            commands: names,
        };
        info!("loaded module {} (commands: {})", name, module.describe());
        self.modules.write().insert(name.to_string(), module);
        Ok(())
    }

    pub fn handle(&self, line: &str) {
        let ctx = Context {
            bot: self,
            config: CONSOLE_CONFIG_ID.to_string(),
            source: Source {
                nick: self.nick.clone(),
            },
        };

        let mut chars = line.chars();
        if let Some(c) = chars.next() {
            if self.cmdchars.contains(c) {
                let rest = chars.as_str();
                let (name, args) = match rest.split_once(char::is_whitespace) {
                    Some((name, args)) => (name, args.trim()),
                    None => (rest, ""),
                };

                let command = self.commands.read().get(name).cloned();
                match command {
                    Some(command) => {
                        debug!("command {:?} from {}", name, ctx.source.nick);
                        if let Err(e) = command.call(&ctx, args) {
                            report(&ctx, e);
                        }
                    }
                    None => trace!("no command {:?}", name),
                }

                self.dispatch(&ctx, HandleType::Command, line);
                return;
            }
        }

        self.dispatch(&ctx, HandleType::PlainMsg, line);
    }

    fn dispatch(&self, ctx: &Context, typ: HandleType, line: &str) {
        let handlers: Vec<_> = self
            .handlers
            .read()
            .iter()
            .filter(|(_, t, _)| t.intersects(typ))
            .map(|(owner, _, f)| (owner.clone(), Arc::clone(f)))
            .collect();

        for (owner, f) in handlers {
            if let Err(e) = f(ctx, typ, line) {
                warn!("handler from {} failed", owner);
                report(ctx, e);
            }
        }
    }

    pub fn output(&self, _source: &Source, line: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

fn report(ctx: &Context, e: Error) {
    let msg = match user_message(&e) {
        Some(msg) => msg,
        None => {
            error!("command failed: {:?}", e);
            format!("command failed: {}", e)
        }
    };
    if let Err(e) = ctx.say(&msg) {
        error!("failed to handle error: {}", e);
    }
}
