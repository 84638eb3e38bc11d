//! Cleanup of raw model output before it is treated as a query
//!
//! Models wrap queries in reasoning blocks and markdown fences more often than
//! they follow instructions, so every provider runs its output through
//! [`sanitize_generated_query`].

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";
const FENCE: &str = "```";

/// Strip reasoning blocks and code fences from a generated query.
///
/// The `LOG:`/`METRIC:` routing prefix is preserved; routing is the
/// orchestrator's job.
pub fn sanitize_generated_query(raw: &str) -> String {
    let without_thoughts = strip_think_blocks(raw.trim());
    unwrap_code_fence(&without_thoughts).trim().to_string()
}

fn strip_think_blocks(s: &str) -> String {
    let mut out = s.to_string();
    while let Some(start) = out.find(THINK_OPEN) {
        match out[start..].find(THINK_CLOSE) {
            Some(end) => out.replace_range(start..start + end + THINK_CLOSE.len(), ""),
            None => {
                // unterminated block: everything after it is reasoning
                out.truncate(start);
                break;
            },
        }
    }
    out.trim().to_string()
}

fn unwrap_code_fence(s: &str) -> String {
    let Some(open) = s.find(FENCE) else {
        return s.to_string();
    };
    let after = &s[open + FENCE.len()..];
    let body = match after.find(FENCE) {
        Some(close) => &after[..close],
        None => after,
    };

    let body = match body.split_once('\n') {
        Some((tag, rest)) if is_language_tag(tag) => rest,
        _ => body,
    };
    body.trim().to_string()
}

fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_query_is_trimmed() {
        assert_eq!(
            sanitize_generated_query("  METRIC: avg(cpu_usage_pct)\n"),
            "METRIC: avg(cpu_usage_pct)"
        );
    }

    #[test]
    fn test_think_blocks_are_removed() {
        let raw = "<think>the user wants cpu</think>\nMETRIC: avg(cpu_usage_pct)";
        assert_eq!(sanitize_generated_query(raw), "METRIC: avg(cpu_usage_pct)");

        let raw = "<think>a</think> <think>b</think>LOG: eventMessage:\"error\"";
        assert_eq!(sanitize_generated_query(raw), "LOG: eventMessage:\"error\"");
    }

    #[test]
    fn test_unterminated_think_block_drops_the_tail() {
        let raw = "METRIC: up <think>never closed";
        assert_eq!(sanitize_generated_query(raw), "METRIC: up");
    }

    #[test]
    fn test_fenced_query_with_language_tag() {
        let raw = "Here you go:\n```promql\nMETRIC: max(process_memory_mb)\n```\nDone.";
        assert_eq!(sanitize_generated_query(raw), "METRIC: max(process_memory_mb)");
    }

    #[test]
    fn test_inline_fence() {
        assert_eq!(
            sanitize_generated_query("```LOG: processName:\"wifid\"```"),
            "LOG: processName:\"wifid\""
        );
    }

    #[test]
    fn test_empty_output_stays_empty() {
        assert_eq!(sanitize_generated_query("<think>hmm</think>"), "");
        assert_eq!(sanitize_generated_query("   "), "");
    }
}
