/// Derive a filesystem-safe folder name from a zone's display name.
///
/// ASCII alphanumerics, `-`, `_` and `.` are kept, whitespace runs become a
/// single `_`, everything else is dropped. Leading and trailing `.`/`_` are
/// trimmed so the result is never hidden or relative. Falls back to
/// `game_<id>` when nothing survives.
pub fn sanitize_folder_name(name: &str, id: i64) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            if pending_space && !out.is_empty() {
                out.push('_');
            }
            pending_space = false;
            out.push(c);
        }
    }
    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        format!("game_{id}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_spaces_and_drops_symbols() {
        assert_eq!(sanitize_folder_name("Math Blaster!", 1), "Math_Blaster");
        assert_eq!(sanitize_folder_name("  Tetris   99  ", 2), "Tetris_99");
        assert_eq!(sanitize_folder_name("Cut/The:Rope?", 3), "CutTheRope");
        assert_eq!(sanitize_folder_name("v1.2-beta", 4), "v1.2-beta");
    }

    #[test]
    fn never_hidden_or_relative() {
        assert_eq!(sanitize_folder_name("..", 5), "game_5");
        assert_eq!(sanitize_folder_name(".hidden", 6), "hidden");
        assert_eq!(sanitize_folder_name("___", 7), "game_7");
    }

    #[test]
    fn non_ascii_only_falls_back_to_id() {
        assert_eq!(sanitize_folder_name("ゲーム", 8), "game_8");
        assert_eq!(sanitize_folder_name("", 9), "game_9");
    }
}
