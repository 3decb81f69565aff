use apexbot::prelude::Message::*;
use apexbot::prelude::*;

pub fn format_console(m: &Message) -> Vec<String> {
    let text = match m {
        Simple(s) => s.clone(),
        Status {
            success: true,
            tag,
            text,
        } => format!("[{}] {}", tag, text),
        Status {
            success: false,
            tag,
            text,
        } => format!("[{}:error] {}", tag, text),
    };

    text.trim_end().split('\n').map(|l| l.to_string()).collect()
}
