//! Room CLI commands: history, send, post, log.

use anyhow::{Context, Result};
use chrono::DateTime;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use roomrelay_core::storage::permanent_log::PermanentLog;
use roomrelay_types::message::{AI_IDENTITY, Message, NewMessage};

use crate::state::AppState;

/// Longest text shown in a table cell before truncating.
const PREVIEW_CHARS: usize = 80;

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Print a room's pruned history.
pub async fn show_history(state: &AppState, room: &str, json: bool) -> Result<()> {
    let history = state
        .rooms
        .history(room)
        .await
        .with_context(|| format!("Failed to load history for room '{room}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!();
        println!(
            "  {} No messages in '{}' in the last 7 days.",
            style("i").blue().bold(),
            style(room).cyan(),
        );
        println!("     Post one with: roomrelay post --room {room} <text>");
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  History for '{}' ({} messages)",
        style(room).cyan(),
        history.len(),
    );
    println!();
    println!("{}", history_table(&history));
    println!();

    Ok(())
}

fn history_table(history: &[Message]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time (UTC)").fg(Color::White),
        Cell::new("Sender").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);

    for message in history {
        let sender_color = if message.is_ai() {
            Color::Magenta
        } else {
            Color::Cyan
        };
        table.add_row(vec![
            Cell::new(format_timestamp(message.timestamp)).fg(Color::DarkGrey),
            Cell::new(&message.sender).fg(sender_color),
            Cell::new(preview(&message.text)),
        ]);
    }

    table
}

/// Submit a message and print the AI reply.
pub async fn send_message(
    state: &AppState,
    room: &str,
    sender: &str,
    text: &str,
    json: bool,
) -> Result<()> {
    let reply = state.rooms.submit_message(room, sender, text).await?;

    if json {
        let result = serde_json::json!({
            "room": room,
            "reply": reply,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} {}",
            style(format!("{AI_IDENTITY}:")).magenta().bold(),
            reply,
        );
        println!();
    }

    Ok(())
}

/// Append a message without requesting a reply.
pub async fn post_message(
    state: &AppState,
    room: &str,
    sender: &str,
    text: &str,
    json: bool,
) -> Result<()> {
    let message = state
        .rooms
        .record_message(room, NewMessage::new(sender, text))
        .await?;

    if json {
        let result = serde_json::json!({
            "room": room,
            "message": message,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Posted to '{}' as {}",
            style("ok").green(),
            style(room).cyan(),
            style(&message.sender).cyan(),
        );
        println!();
    }

    Ok(())
}

/// Print the most recent permanent log records for a room.
pub async fn show_log(state: &AppState, room: &str, limit: u32, json: bool) -> Result<()> {
    let records = state
        .permanent_log
        .recent(room, limit)
        .await
        .with_context(|| format!("Failed to read permanent log for room '{room}'"))?;

    if json {
        let result = serde_json::json!({
            "room": room,
            "records": records,
            "count": records.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} Nothing logged for '{}' yet.",
            style("i").blue().bold(),
            style(room).cyan(),
        );
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  Permanent log for '{}' (newest first, {} records)",
        style(room).cyan(),
        records.len(),
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Written At (UTC)").fg(Color::White),
        Cell::new("Written By").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);
    for record in &records {
        table.add_row(vec![
            Cell::new(&record.written_at).fg(Color::DarkGrey),
            Cell::new(&record.sender).fg(Color::Cyan),
            Cell::new(preview(&record.text)),
        ]);
    }
    println!("{table}");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "あ".repeat(100);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS);
        assert!(shown.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_history_table_has_row_per_message() {
        let history = vec![
            Message {
                sender: "alice".to_string(),
                text: "hello".to_string(),
                timestamp: 0,
            },
            Message {
                sender: "AI".to_string(),
                text: "hi there".to_string(),
                timestamp: 1,
            },
        ];
        let rendered = history_table(&history).to_string();
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("hi there"));
    }
}
