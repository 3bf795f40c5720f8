//! Message formatting utilities for client display.

use idobata_server::infrastructure::dto::websocket::OnlineUserDto;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the roster showing all online users
    ///
    /// # Arguments
    ///
    /// * `online_users` - The current roster, in first-join order
    /// * `my_user_id` - The current client's user id (to mark as "me")
    pub fn format_roster(online_users: &[OnlineUserDto], my_user_id: &str) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Online:\n");

        if online_users.is_empty() {
            output.push_str("(No one is online)\n");
        } else {
            for user in online_users {
                let is_me = user.user_id == my_user_id;
                let me_suffix = if is_me { " (me)" } else { "" };
                output.push_str(&format!("{}{}\n", user.display_name, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a user-joined notification
    pub fn format_user_joined(display_name: &str) -> String {
        format!("\n+ {} joined the chat\n", display_name)
    }

    /// Format a user-left notification
    pub fn format_user_left(display_name: &str) -> String {
        format!("\n- {} left the chat\n", display_name)
    }

    /// Format a chat message
    ///
    /// The timestamp is whatever the sender supplied; when it is empty the
    /// "sent at" line is omitted.
    pub fn format_chat_message(display_name: &str, content: &str, timestamp: &str) -> String {
        if timestamp.is_empty() {
            format!(
                "\n\n------------------------------------------------------------\n\
                 @{}: {}\n\
                 ------------------------------------------------------------\n",
                display_name, content
            )
        } else {
            format!(
                "\n\n------------------------------------------------------------\n\
                 @{}: {}\n\
                 sent at {}\n\
                 ------------------------------------------------------------\n",
                display_name, content, timestamp
            )
        }
    }

    /// Format the current typing state
    ///
    /// Returns an empty string when no one is typing.
    pub fn format_typing_status(typing_names: &[String]) -> String {
        match typing_names {
            [] => String::new(),
            [name] => format!("\n* {} is typing...\n", name),
            names => format!("\n* {} are typing...\n", names.join(", ")),
        }
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
