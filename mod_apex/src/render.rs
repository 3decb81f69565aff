use apexbot::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write;

use crate::command::Target;
use crate::model::*;

const MATCH_LIMIT: usize = 5;
const BOARD_LIMIT: usize = 5;
const STORE_LIMIT: usize = 10;
const CRAFTING_LIMIT: usize = 10;
const NEWS_LIMIT: usize = 5;

pub const HELP: &str = "Apex Legends 查询插件帮助

可用指令：
• apex help - 显示帮助信息
• apex player <玩家名> <平台> - 查询玩家统计信息
• apex uid <玩家名> <平台> - 查询玩家 UID
• apex matches <玩家名> <平台> - 查询匹配历史
• apex leaderboard - 查询排行榜
• apex map - 查询地图轮换
• apex store - 查询商店
• apex crafting - 查询制造轮换
• apex news - 查询新闻
• apex status - 查询服务器状态
• apex predator - 查询猎杀者排行榜

平台选项：PC, PS4, X1
注意：使用前需要配置 API key
获取 API key：https://apexlegendsapi.com/";

/// Parses a 200 body into the endpoint's model; a shape mismatch is shown to the user.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    match serde_json::from_str(body) {
        Ok(v) => Ok(v),
        Err(e) => {
            debug!("failed to unmarshal response: {}:\n{}", e, body);
            bail_user!("数据解析失败：{}", e)
        }
    }
}

/// Like `decode`, for endpoints that answer with a single object. Derived struct
/// deserializers also accept arrays, so the top-level type is checked first.
pub fn decode_object<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = decode(body)?;
    if !value.is_object() {
        debug!("expected an object, got {}", body);
        bail_user!("数据解析失败：expected an object, found {}", kind(&value));
    }

    match T::deserialize(value) {
        Ok(v) => Ok(v),
        Err(e) => {
            debug!("failed to unmarshal response: {}:\n{}", e, body);
            bail_user!("数据解析失败：{}", e)
        }
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "是"
    } else {
        "否"
    }
}

pub fn player(data: &Player, target: &Target) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "【Apex Legends 玩家统计】")?;
    writeln!(out, "玩家：{} ({})", target.player, target.platform)?;
    writeln!(out, "UID：{}", data.uid())?;
    writeln!(out)?;

    if let Some(rt) = &data.realtime {
        writeln!(out, "【实时状态】")?;
        writeln!(out, "在线：{}", yes_no(rt.online()))?;
        writeln!(out, "游戏中：{}", yes_no(rt.in_game()))?;
        if let Some(state) = rt.state() {
            writeln!(out, "状态：{}", state)?;
        }
        writeln!(out)?;
    }

    if let Some(global) = &data.global {
        if let Some(level) = global.level() {
            writeln!(out, "等级：{}", level)?;
        }

        if let Some(rank) = &global.rank {
            writeln!(out, "排位等级：{} {}", rank.name(), rank.div())?;
            writeln!(out, "排位分数：{}", rank.score())?;
        }

        if let Some(total) = &global.total {
            writeln!(out, "\n【总数据】")?;
            writeln!(out, "总击杀：{}", total.kills())?;
            writeln!(out, "总伤害：{}", total.damage())?;
            writeln!(out, "总游戏数：{}", total.games_played())?;
        }

        if let Some(season) = &global.season {
            writeln!(out, "\n【本赛季数据】")?;
            writeln!(out, "击杀：{}", season.kills())?;
            writeln!(out, "伤害：{}", season.damage())?;
            writeln!(out, "游戏数：{}", season.games_played())?;
        }
    }

    Ok(out)
}

pub fn uid(data: &NameToUid, target: &Target) -> Result<String> {
    Ok(format!(
        "玩家 {} ({}) 的 UID：{}",
        target.player,
        target.platform,
        data.uid()
    ))
}

pub fn matches(data: &Player, target: &Target) -> Result<String> {
    let matches = data.matches();
    if matches.is_empty() {
        return Ok(format!("玩家 {} 暂无匹配历史", target.player));
    }

    let mut out = String::new();
    writeln!(out, "【{} 最近匹配记录】\n", target.player)?;
    for (i, m) in matches.iter().take(MATCH_LIMIT).enumerate() {
        writeln!(out, "第 {} 场：", i + 1)?;
        writeln!(out, "  模式：{}", m.game_mode())?;
        writeln!(out, "  击杀：{}", m.kills())?;
        writeln!(out, "  伤害：{}", m.damage())?;
        writeln!(out, "  排名：{}", m.rank())?;
        writeln!(out)?;
    }
    Ok(out)
}

fn boards(title: &str, data: &Boards) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "【{}】\n", title)?;
    for (platform, entries) in data.platforms() {
        writeln!(out, "【{} 平台】", platform)?;
        for (i, entry) in entries.iter().take(BOARD_LIMIT).enumerate() {
            writeln!(out, "{}. {} - {} 分", i + 1, entry.name(), entry.score())?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

pub fn leaderboard(data: &Boards) -> Result<String> {
    boards("Apex Legends 排行榜", data)
}

pub fn predator(data: &Boards) -> Result<String> {
    boards("Apex Legends 猎杀者排行榜", data)
}

pub fn map_rotation(data: &MapRotation) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "【Apex Legends 地图轮换】\n")?;

    if let Some(br) = &data.battle_royale {
        writeln!(out, "【大逃杀模式】")?;
        writeln!(out, "当前地图：{}", br.current_map())?;
        writeln!(out, "剩余时间：{}", br.remaining())?;
        writeln!(out, "下一张地图：{}\n", br.next_map())?;
    }

    if let Some(arenas) = &data.arenas {
        writeln!(out, "【竞技场模式】")?;
        writeln!(out, "当前地图：{}", arenas.current_map())?;
        writeln!(out, "剩余时间：{}", arenas.remaining())?;
        writeln!(out, "下一张地图：{}", arenas.next_map())?;
    }

    Ok(out)
}

pub fn store(data: &Store) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "【Apex Legends 商店】\n")?;
    for (i, item) in data.items().iter().take(STORE_LIMIT).enumerate() {
        writeln!(out, "{}. {}", i + 1, item.name())?;
        writeln!(out, "   价格：{} {}\n", item.amount(), item.currency())?;
    }
    Ok(out)
}

pub fn crafting(data: &[CraftingItem]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "【Apex Legends 制造轮换】\n")?;
    for (i, item) in data.iter().take(CRAFTING_LIMIT).enumerate() {
        writeln!(out, "{}. {}", i + 1, item.name())?;
        writeln!(out, "   成本：{} 材料", item.cost())?;
        writeln!(out, "   结束时间：{}\n", item.end_date())?;
    }
    Ok(out)
}

pub fn news(data: &[NewsItem]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "【Apex Legends 新闻】\n")?;
    for (i, item) in data.iter().take(NEWS_LIMIT).enumerate() {
        writeln!(out, "{}. {}", i + 1, item.title())?;
        writeln!(out, "   {}", item.short_desc())?;
        writeln!(out, "   链接：{}\n", item.link())?;
    }
    Ok(out)
}

pub fn server_status(data: &[ServerStatus]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "【Apex Legends 服务器状态】\n")?;
    for server in data {
        writeln!(out, "【{}】", server.server())?;
        writeln!(out, "状态：{}", server.status())?;
        writeln!(out, "响应时间：{}\n", server.response_time())?;
    }
    Ok(out)
}
