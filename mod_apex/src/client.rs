use apexbot::prelude::*;
use reqwest::blocking::Client;

use crate::command::Target;
use crate::config::Config;

pub const NOT_CONFIGURED: &str = "未配置 API key，请在插件配置中添加";
pub const BAD_KEY: &str = "API key 无效或未授权";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// One GET against the stats API. Errors mean the request never produced a response.
pub trait Upstream: Send + Sync {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response>;
}

pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }
}

impl Upstream for HttpUpstream {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        // the url carries the api key; keep it out of error messages
        let result = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .map_err(|e| e.without_url())?;

        let status = result.status().as_u16();
        let body = result.text().map_err(|e| e.without_url())?;
        Ok(Response { status, body })
    }
}

/// Runs one request and maps every non-200 outcome to the message the user sees. `target` is
/// set for player-scoped endpoints, which report 404 as an unknown player.
pub fn fetch(
    upstream: &dyn Upstream,
    api_key: Option<&str>,
    path: &str,
    target: Option<&Target>,
) -> Result<String> {
    let key = match api_key {
        Some(k) => k,
        None => bail_user!("{}", NOT_CONFIGURED),
    };

    let mut query = vec![("auth", key)];
    if let Some(t) = target {
        query.push(("player", t.player.as_str()));
        query.push(("platform", t.platform.as_str()));
    }

    debug!(
        "GET {} {}",
        path,
        target.map_or_else(String::new, |t| format!("{} ({})", t.player, t.platform))
    );

    let response = match upstream.get(path, &query) {
        Ok(r) => r,
        Err(e) => {
            warn!("request to {} failed: {}", path, e);
            bail_user!("网络请求失败：{}", e)
        }
    };

    match (response.status, target) {
        (200, _) => Ok(response.body),
        (404, Some(t)) => bail_user!("未找到玩家：{} (平台: {})", t.player, t.platform),
        (403, _) => bail_user!("{}", BAD_KEY),
        // one wording for every endpoint, player lookups included
        (code, _) => {
            debug!("{} answered {}", path, code);
            bail_user!("查询失败：{}", code)
        }
    }
}
