use crate::client::{Response, Upstream, BAD_KEY, NOT_CONFIGURED};
use crate::command::{self, Invocation, Target, USAGE};
use crate::config::{Config, Settings};
use crate::model::Scalar;
use crate::{Apex, DisplayResult};
use apexbot::prelude::*;
use std::borrow::Cow;
use std::cell::RefCell;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Call {
    path: String,
    query: Vec<(String, String)>,
}

type Calls = Arc<Mutex<Vec<Call>>>;

struct FakeUpstream {
    reply: std::result::Result<Response, String>,
    calls: Calls,
}

impl Upstream for FakeUpstream {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
        match &self.reply {
            Ok(r) => Ok(r.clone()),
            Err(e) => Err(anyhow!("{}", e)),
        }
    }
}

fn config(key: Option<&str>) -> Config {
    Config::resolve(
        None,
        Settings {
            api_key: key.map(|k| k.to_string()),
            base_url: None,
        },
    )
}

fn apex_replying(reply: std::result::Result<Response, String>, key: Option<&str>) -> (Apex, Calls) {
    let calls = Calls::default();
    let upstream = FakeUpstream {
        reply,
        calls: Arc::clone(&calls),
    };
    (Apex::new(config(key), Box::new(upstream)), calls)
}

fn apex_with(status: u16, body: &str) -> (Apex, Calls) {
    apex_replying(
        Ok(Response {
            status,
            body: body.to_string(),
        }),
        Some("secret"),
    )
}

fn call_count(calls: &Calls) -> usize {
    calls.lock().unwrap().len()
}

const NETWORK_COMMANDS: &[&str] = &[
    "apex player Wraith123 PC",
    "apex uid Wraith123",
    "apex matches Wraith123 PC",
    "apex leaderboard",
    "apex map",
    "apex store",
    "apex crafting",
    "apex news",
    "apex status",
    "apex predator",
];

#[test]
fn test_parse() {
    let target = |p: &str, pf: &str| Target {
        player: p.to_string(),
        platform: pf.to_string(),
    };

    assert_eq!(command::parse("apex help").unwrap(), Invocation::Help);
    assert_eq!(command::parse("apex LB").unwrap(), Invocation::Leaderboard);
    assert_eq!(command::parse("  apex   maps  ").unwrap(), Invocation::Map);
    assert_eq!(
        command::parse("apex p Wraith123 ps4").unwrap(),
        Invocation::Player(target("Wraith123", "PS4"))
    );
    assert_eq!(
        command::parse("apex m Wraith123 x1 extra").unwrap(),
        Invocation::Matches(target("Wraith123", "X1"))
    );
    assert_eq!(
        command::parse("apex uid Wraith123").unwrap(),
        Invocation::Uid(target("Wraith123", "PC"))
    );

    assert_eq!(command::parse("apex").unwrap_err().to_string(), USAGE);
    assert_eq!(command::parse("").unwrap_err().to_string(), USAGE);
    assert_eq!(
        command::parse("apex Dance").unwrap_err().to_string(),
        "未知指令：dance\n输入 'apex help' 查看帮助"
    );
}

#[test]
fn test_usage_never_hits_network() {
    let cases = &[
        ("apex", USAGE),
        ("apex player", "用法：apex player <玩家名> <平台(PC/PS4/X1)>"),
        ("apex player Wraith123", "用法：apex player <玩家名> <平台(PC/PS4/X1)>"),
        ("apex p Wraith123", "用法：apex player <玩家名> <平台(PC/PS4/X1)>"),
        ("apex matches Wraith123", "用法：apex matches <玩家名> <平台(PC/PS4/X1)>"),
        ("apex m", "用法：apex matches <玩家名> <平台(PC/PS4/X1)>"),
        ("apex uid", "用法：apex uid <玩家名> <平台(PC/PS4/X1)>"),
    ];

    let (apex, calls) = apex_with(200, "{}");
    for (input, usage) in cases {
        assert_eq!(
            apex.handle(input),
            DisplayResult {
                success: false,
                message: usage.to_string(),
                tag: "apex",
            },
            "input {:?}",
            input
        );
    }
    assert_eq!(call_count(&calls), 0);
}

#[test]
fn test_unknown_command() {
    let (apex, calls) = apex_with(200, "{}");
    let result = apex.handle("apex foo bar");
    assert!(!result.success);
    assert_eq!(result.message, "未知指令：foo\n输入 'apex help' 查看帮助");
    assert_eq!(call_count(&calls), 0);
}

#[test]
fn test_help_without_key() {
    let (apex, calls) = apex_replying(Err("unreachable".to_string()), None);

    let result = apex.handle("apex HELP");
    assert!(result.success);
    assert_eq!(result.tag, "help");
    assert!(result.message.starts_with("Apex Legends 查询插件帮助"));
    assert!(result.message.contains("• apex predator - 查询猎杀者排行榜"));

    for input in NETWORK_COMMANDS {
        let result = apex.handle(input);
        assert!(!result.success);
        assert_eq!(result.message, NOT_CONFIGURED, "input {:?}", input);
    }
    assert_eq!(call_count(&calls), 0);
}

#[test]
fn test_forbidden_for_every_operation() {
    let (apex, calls) = apex_with(403, "Forbidden");
    for input in NETWORK_COMMANDS {
        assert_eq!(apex.handle(input).message, BAD_KEY, "input {:?}", input);
    }
    assert_eq!(call_count(&calls), NETWORK_COMMANDS.len());
}

#[test]
fn test_not_found() {
    let (apex, _) = apex_with(404, "");
    for input in &["apex player Wraith123 PC", "apex uid Wraith123", "apex matches Wraith123 pc"] {
        let result = apex.handle(input);
        assert!(!result.success);
        assert_eq!(result.message, "未找到玩家：Wraith123 (平台: PC)", "input {:?}", input);
    }

    // not player-scoped: just a failed query
    assert_eq!(apex.handle("apex news").message, "查询失败：404");
}

#[test]
fn test_other_status_and_transport_errors() {
    let (apex, _) = apex_with(500, "oops");
    let result = apex.handle("apex store");
    assert_eq!(result.message, "查询失败：500");
    assert_eq!(result.tag, "store");

    let (apex, _) = apex_replying(Err("connection reset".to_string()), Some("secret"));
    let result = apex.handle("apex map");
    assert!(!result.success);
    assert_eq!(result.message, "网络请求失败：connection reset");
}

#[test]
fn test_query_params() {
    let (apex, calls) = apex_with(200, "{}");
    apex.handle("apex p Wraith123 ps4");
    apex.handle("apex lb");

    let calls = calls.lock().unwrap();
    assert_eq!(
        calls[0],
        Call {
            path: "/bridge".to_string(),
            query: vec![
                ("auth".to_string(), "secret".to_string()),
                ("player".to_string(), "Wraith123".to_string()),
                ("platform".to_string(), "PS4".to_string()),
            ],
        }
    );
    assert_eq!(
        calls[1],
        Call {
            path: "/leaderboard".to_string(),
            query: vec![("auth".to_string(), "secret".to_string())],
        }
    );
}

#[test]
fn test_player() {
    let (apex, _) = apex_with(200, r#"{"global": {"level": 300}}"#);
    let result = apex.handle("apex player Wraith123 PC");
    assert!(result.success);
    assert_eq!(result.tag, "player");
    assert!(result.message.contains("等级：300"));

    let (apex, _) = apex_with(
        200,
        r#"{
            "global": {
                "uid": "1000",
                "level": 300,
                "rank": {"rankName": "Gold", "rankDiv": 2, "rankScore": 5000},
                "season": {"kills": {"value": 12}, "damage": {"value": 3400.5}}
            },
            "realtime": {"isOnline": 1, "isInGame": 0, "currentStateAsText": "In lobby"}
        }"#,
    );
    assert_eq!(
        apex.handle("apex player Wraith123 pc").message,
        "【Apex Legends 玩家统计】
玩家：Wraith123 (PC)
UID：1000

【实时状态】
在线：是
游戏中：否
状态：In lobby

等级：300
排位等级：Gold 2
排位分数：5000

【本赛季数据】
击杀：12
伤害：3400.5
游戏数：0
"
    );
}

#[test]
fn test_player_empty_sections() {
    let (apex, _) = apex_with(200, r#"{"global": {"level": 0, "rank": {}}, "realtime": {}}"#);
    assert_eq!(
        apex.handle("apex player Wraith123 PC").message,
        "【Apex Legends 玩家统计】\n玩家：Wraith123 (PC)\nUID：N/A\n\n"
    );
}

#[test]
fn test_uid() {
    let (apex, _) = apex_with(200, r#"{"uid": 1234567}"#);
    assert_eq!(apex.handle("apex uid Wraith123").message, "玩家 Wraith123 (PC) 的 UID：1234567");

    let (apex, _) = apex_with(200, "{}");
    assert_eq!(apex.handle("apex uid Wraith123 x1").message, "玩家 Wraith123 (X1) 的 UID：N/A");
}

#[test]
fn test_matches() {
    let (apex, _) = apex_with(200, r#"{"recentMatches": []}"#);
    assert_eq!(apex.handle("apex matches Wraith123 PC").message, "玩家 Wraith123 暂无匹配历史");

    let (apex, _) = apex_with(200, "{}");
    assert_eq!(apex.handle("apex m Wraith123 PC").message, "玩家 Wraith123 暂无匹配历史");

    let matches: Vec<String> = (1..=7)
        .map(|i| format!(r#"{{"gameMode": "mode{}", "kills": {}, "rank": {}}}"#, i, i, i))
        .collect();
    let (apex, _) = apex_with(200, &format!(r#"{{"recentMatches": [{}]}}"#, matches.join(",")));
    let out = apex.handle("apex m Wraith123 PC").message;
    assert!(out.starts_with("【Wraith123 最近匹配记录】\n\n第 1 场：\n  模式：mode1\n  击杀：1\n  伤害：0\n  排名：1\n\n"));
    assert!(out.contains("第 5 场："));
    assert!(!out.contains("第 6 场："));
}

#[test]
fn test_leaderboard_and_predator() {
    let entries: Vec<String> = (1..=6)
        .map(|i| format!(r#"{{"name": "p{}", "rank": {{"rankScore": {}}}}}"#, i, 1000 - i))
        .collect();
    let body = format!(r#"{{"X1": [{{"name": "x"}}], "PC": [{}]}}"#, entries.join(","));

    let (apex, _) = apex_with(200, &body);
    let out = apex.handle("apex lb").message;
    assert_eq!(
        out,
        "【Apex Legends 排行榜】

【PC 平台】
1. p1 - 999 分
2. p2 - 998 分
3. p3 - 997 分
4. p4 - 996 分
5. p5 - 995 分

【X1 平台】
1. x - 0 分

"
    );

    let out = apex.handle("apex predator").message;
    assert!(out.starts_with("【Apex Legends 猎杀者排行榜】\n\n【PC 平台】\n1. p1 - 999 分\n"));
    assert!(!out.contains("PS4"));
}

#[test]
fn test_map() {
    let (apex, _) = apex_with(
        200,
        r#"{"battle_royale": {"current": {"map": "Olympus", "remainingTimer": "00:10:00"}, "next": {"map": "Kings Canyon"}},
            "arenas": {"current": {"map": "Party Crasher"}}}"#,
    );
    assert_eq!(
        apex.handle("apex maps").message,
        "【Apex Legends 地图轮换】

【大逃杀模式】
当前地图：Olympus
剩余时间：00:10:00
下一张地图：Kings Canyon

【竞技场模式】
当前地图：Party Crasher
剩余时间：N/A
下一张地图：N/A
"
    );
}

#[test]
fn test_store_missing_currency() {
    let (apex, _) = apex_with(
        200,
        r#"{"bundleContent": [{"item": {"name": "Skin"}, "cost": {"amount": 500}}, {"cost": {"currency": "Apex Coins"}}]}"#,
    );
    let result = apex.handle("apex store");
    assert!(result.success);
    assert_eq!(
        result.message,
        "【Apex Legends 商店】\n\n1. Skin\n   价格：500 \n\n2. N/A\n   价格：0 Apex Coins\n\n"
    );
}

#[test]
fn test_crafting() {
    let (apex, _) = apex_with(
        200,
        r#"[{"itemType": {"name": "Extended Mag"}, "cost": 35, "endDate": {"date": "2024-01-02"}}, {}]"#,
    );
    assert_eq!(
        apex.handle("apex crafting").message,
        "【Apex Legends 制造轮换】\n\n1. Extended Mag\n   成本：35 材料\n   结束时间：2024-01-02\n\n2. N/A\n   成本：0 材料\n   结束时间：N/A\n\n"
    );
}

#[test]
fn test_news_truncation() {
    let items: Vec<String> = (1..=7)
        .map(|i| format!(r#"{{"title": "t{}", "short_desc": "d{}", "link": "https://n/{}"}}"#, i, i, i))
        .collect();
    let (apex, _) = apex_with(200, &format!("[{}]", items.join(",")));
    let out = apex.handle("apex news").message;

    assert_eq!(out.matches("链接：").count(), 5);
    let positions: Vec<usize> = (1..=5).map(|i| out.find(&format!("{}. t{}\n", i, i)).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!out.contains("t6"));

    let (apex, _) = apex_with(200, r#"[{"title": "only"}]"#);
    assert_eq!(
        apex.handle("apex news").message,
        "【Apex Legends 新闻】\n\n1. only\n   \n   链接：N/A\n\n"
    );
}

#[test]
fn test_server_status() {
    let (apex, _) = apex_with(
        200,
        r#"[{"Server": "EU-West", "Status": "UP", "ResponseTime": 42}, {"Server": "US-East"}]"#,
    );
    assert_eq!(
        apex.handle("apex status").message,
        "【Apex Legends 服务器状态】\n\n【EU-West】\n状态：UP\n响应时间：42\n\n【US-East】\n状态：N/A\n响应时间：N/A\n\n"
    );
}

#[test]
fn test_parse_failures() {
    let (apex, _) = apex_with(200, "<html>");
    let result = apex.handle("apex player Wraith123 PC");
    assert!(!result.success);
    assert!(result.message.starts_with("数据解析失败："), "{}", result.message);

    // list endpoints answering with an object
    let (apex, _) = apex_with(200, r#"{"error": "bad"}"#);
    assert!(apex.handle("apex news").message.starts_with("数据解析失败："));

    // a section of the wrong type
    let (apex, _) = apex_with(200, r#"{"global": "nope"}"#);
    assert!(apex.handle("apex player Wraith123 PC").message.starts_with("数据解析失败："));
}

#[test]
fn test_array_body_for_object_endpoint() {
    let object_commands = [
        "apex player Wraith123 PC",
        "apex uid Wraith123",
        "apex map",
        "apex store",
        "apex lb",
        "apex predator",
    ];
    for cmd in &object_commands {
        let (apex, _) = apex_with(200, "[]");
        let result = apex.handle(cmd);
        assert!(!result.success, "{}", cmd);
        assert_eq!(result.message, "数据解析失败：expected an object, found an array", "{}", cmd);
    }

    // object sections answering with something else
    for body in &[r#"{"global": []}"#, r#"{"realtime": [1]}"#, r#"{"global": {"rank": []}}"#] {
        let (apex, _) = apex_with(200, body);
        let result = apex.handle("apex player Wraith123 PC");
        assert!(!result.success, "{}", body);
        assert!(result.message.starts_with("数据解析失败："), "{}", result.message);
    }

    let (apex, _) = apex_with(200, r#"{"battle_royale": []}"#);
    assert!(apex.handle("apex map").message.starts_with("数据解析失败："));

    // null sections are still just absent
    let (apex, _) = apex_with(200, r#"{"global": null, "realtime": null}"#);
    assert_eq!(
        apex.handle("apex player Wraith123 PC").message,
        "【Apex Legends 玩家统计】\n玩家：Wraith123 (PC)\nUID：N/A\n\n"
    );
}

#[test]
fn test_scalar() {
    let v: Vec<Scalar> = serde_json::from_str(r#"["a", 1, 1.5, true, [1]]"#).unwrap();
    assert_eq!(
        v.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        vec!["a", "1", "1.5", "true", "[1]"]
    );
    assert!(v[1].is_one());
    assert!(v[3].is_one());
    assert!(!v[0].is_one());
    assert!(!Scalar::Text(String::new()).is_truthy());
    assert!(!serde_json::from_str::<Scalar>("0").unwrap().is_truthy());
}

struct TestContext {
    replies: RefCell<Vec<Message>>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            replies: RefCell::new(vec![]),
        }
    }
}

impl Context for TestContext {
    fn config_id(&self) -> &str {
        "test"
    }
    fn say(&self, s: &str) -> Result<()> {
        self.reply(Message::Simple(s.to_string()))
    }
    fn reply(&self, m: Message) -> Result<()> {
        self.replies.borrow_mut().push(m);
        Ok(())
    }
    fn source(&self) -> &dyn Source {
        self
    }
}

impl Source for TestContext {
    fn user_string(&self) -> Cow<str> {
        "tester".into()
    }
    fn channel_string(&self) -> Cow<str> {
        "test".into()
    }
}

#[test]
fn test_command_adapter() {
    let (apex, _) = apex_with(200, r#"{"uid": 7}"#);
    let ctx = TestContext::new();

    apex.command(&ctx, "uid Wraith123").unwrap();
    apex.command(&ctx, "").unwrap();

    assert_eq!(
        *ctx.replies.borrow(),
        vec![
            Message::Simple("玩家 Wraith123 (PC) 的 UID：7".to_string()),
            Message::Simple(USAGE.to_string()),
        ]
    );
}

#[test]
fn test_message_adapter() {
    let (apex, calls) = apex_with(403, "");
    let ctx = TestContext::new();

    apex.message(&ctx, "hello there").unwrap();
    apex.message(&ctx, "apexes are cool").unwrap();
    assert!(ctx.replies.borrow().is_empty());

    apex.message(&ctx, "APEX help").unwrap();
    apex.message(&ctx, "apex news").unwrap();
    apex.message(&ctx, "apex").unwrap();

    let replies = ctx.replies.borrow();
    assert_eq!(replies.len(), 3);
    match &replies[0] {
        Message::Status { success, tag, .. } => {
            assert!(*success);
            assert_eq!(tag, "help");
        }
        other => panic!("unexpected reply {:?}", other),
    }
    assert_eq!(
        replies[1],
        Message::Status {
            success: false,
            tag: "news".into(),
            text: BAD_KEY.to_string(),
        }
    );
    assert_eq!(
        replies[2],
        Message::Status {
            success: false,
            tag: "apex".into(),
            text: USAGE.to_string(),
        }
    );
    assert_eq!(call_count(&calls), 1);
}
