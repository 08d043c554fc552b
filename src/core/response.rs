//! Discord message size helpers
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Add fenced pagination for code-block replies
//! - 1.0.0: Line-aware splitting for the 2000 character message limit

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

const FENCE: &str = "```";

/// Split text into pieces of at most `max_size` bytes
///
/// Splits prefer line boundaries and never cut a UTF-8 character. Lines longer
/// than `max_size` are hard-wrapped. Each piece keeps its trailing newlines
/// except the last one.
pub fn split_message(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size || max_size == 0 {
        return vec![text.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if current.len() + line.len() <= max_size {
            current.push_str(line);
            continue;
        }

        if !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }

        if line.len() <= max_size {
            current.push_str(line);
        } else {
            for ch in line.chars() {
                if current.len() + ch.len_utf8() > max_size {
                    pieces.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Split `body` into code-fenced messages no longer than `max_size`
///
/// `lead` is placed on the first message only, directly before its opening
/// fence. Every message opens and closes its own fence so Discord renders
/// each page independently.
pub fn paginate_code_block(lead: &str, body: &str, max_size: usize) -> Vec<String> {
    // "```\n" + body + "```"
    let wrapper = FENCE.len() + 1 + FENCE.len();
    let first_overhead = lead.len() + wrapper;

    if first_overhead + body.len() <= max_size {
        return vec![format!("{lead}{FENCE}\n{body}{FENCE}")];
    }

    // Reserve the lead's space on every page so page sizes stay uniform,
    // plus the newline added to pages that don't end in one.
    let page_size = max_size.saturating_sub(first_overhead + 1).max(1);

    split_message(body, page_size)
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            let page = if page.ends_with('\n') {
                page
            } else {
                format!("{page}\n")
            };
            if i == 0 {
                format!("{lead}{FENCE}\n{page}{FENCE}")
            } else {
                format!("{FENCE}\n{page}{FENCE}")
            }
        })
        .collect()
}
