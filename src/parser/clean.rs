use super::patterns::{ERROR_JSON, ERROR_PREFIX, PROCEDURAL_PHRASE, PROCESS_PHRASE, WHITESPACE};

fn clean_once(content: &str) -> String {
    let text = ERROR_JSON.replace_all(content, "");
    let text = ERROR_PREFIX.replace(&text, "");
    let text = PROCESS_PHRASE.replace(&text, "");
    let text = PROCEDURAL_PHRASE.replace(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Cleans an agent reply before it enters the transcript. Applied until
/// nothing changes, so `clean_reply(clean_reply(x)) == clean_reply(x)`.
/// A pass that changes the text always shortens it, so the loop ends.
pub fn clean_reply(content: &str) -> String {
    let mut current = clean_once(content);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_error_prefix_keeping_the_rest() {
        assert_eq!(clean_reply("Error: insufficient funds"), "insufficient funds");
        assert_eq!(clean_reply("unable to: reach RPC"), "reach RPC");
    }

    #[test]
    fn removes_error_json_entirely() {
        assert_eq!(
            clean_reply(r#"{"status":"error","message":"Insufficient balance"}"#),
            ""
        );
    }

    #[test]
    fn keeps_success_json() {
        let reply = r#"Balance: {"status":"success","balance":1.5,"wallet":"abc"}"#;
        assert_eq!(clean_reply(reply), reply);
    }

    #[test]
    fn repeated_prefixes_are_all_removed() {
        assert_eq!(clean_reply("Error: Failed: Error: nope"), "nope");
    }

    #[test]
    fn is_idempotent() {
        for input in [
            "Error: insufficient funds",
            "  Failed:\n\n  Let me proceed with the swap. Error: slippage   too high ",
            r#"{"status":"error","message":"x"} Error: I will use the tool to fetch it. Done"#,
            "plain text with   gaps",
            "",
        ] {
            let once = clean_reply(input);
            assert_eq!(clean_reply(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn long_prefix_stacks_clean_in_one_call() {
        let input = format!("{}done", "Error: ".repeat(40));
        let once = clean_reply(&input);
        assert_eq!(once, "done");
        assert_eq!(clean_reply(&once), once);
    }
}
