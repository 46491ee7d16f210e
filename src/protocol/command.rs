//! Line parser for the text control protocol.
//!
//! A command is one line of text: a keyword followed by optional parameters,
//! separated by a single space. [`parse_line`] never fails; a blank line
//! simply produces no command.

/// Maximum number of space-separated tokens considered on one line.
///
/// Tokens past this bound are silently discarded.
pub const MAX_TOKENS: usize = 50;

/// Maximum length of one incoming line in bytes, terminator included.
///
/// A transport closes the connection of a peer that exceeds it.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Maximum number of positional parameters kept on a [`Command`].
pub const MAX_PARAMS: usize = 2;

/// One parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    keyword: String,
    params: Vec<String>,
    tail: String,
}

impl Command {
    /// Creates a command from a keyword and positional parameters.
    ///
    /// Parameters past [`MAX_PARAMS`] are dropped; `tail` is rebuilt from
    /// the full parameter list.
    #[must_use]
    pub fn new(keyword: impl Into<String>, params: &[&str]) -> Self {
        Self {
            keyword: keyword.into(),
            params: params
                .iter()
                .take(MAX_PARAMS)
                .map(|p| (*p).to_string())
                .collect(),
            tail: params.join(" "),
        }
    }

    /// The command keyword (token 0). Never empty.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Positional parameter `index` (0-based), or `""` when the line was
    /// too short to carry it.
    #[must_use]
    pub fn param(&self, index: usize) -> &str {
        self.params.get(index).map_or("", String::as_str)
    }

    /// Number of positional parameters actually present (at most
    /// [`MAX_PARAMS`]).
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Everything after the keyword, re-joined with single spaces.
    ///
    /// Used by free-text commands such as `LogWriteLine`.
    #[must_use]
    pub fn tail(&self) -> &str {
        &self.tail
    }
}

/// Parses one protocol line.
///
/// Trailing line terminators are stripped. Returns `None` for a blank line
/// or a line whose first token is empty.
#[must_use]
pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return None;
    }

    let mut tokens = line.split(' ');
    let keyword = tokens.next().filter(|k| !k.is_empty())?;

    let rest: Vec<&str> = tokens.by_ref().take(MAX_TOKENS - 1).collect();
    if tokens.next().is_some() {
        tracing::trace!(keyword, limit = MAX_TOKENS, "tokens past limit discarded");
    }

    Some(Command::new(keyword, &rest))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        let Some(cmd) = parse_line(line) else {
            panic!("expected a command for {line:?}");
        };
        cmd
    }

    #[test]
    fn empty_line_is_noop() {
        assert!(parse_line("").is_none());
        assert!(parse_line("\r\n").is_none());
    }

    #[test]
    fn leading_space_has_no_keyword() {
        assert!(parse_line(" CalibrationStart").is_none());
    }

    #[test]
    fn keyword_only() {
        let cmd = parse("CalibrationStart");
        assert_eq!(cmd.keyword(), "CalibrationStart");
        assert_eq!(cmd.param_count(), 0);
        assert_eq!(cmd.param(0), "");
        assert_eq!(cmd.param(1), "");
        assert_eq!(cmd.tail(), "");
    }

    #[test]
    fn two_params() {
        let cmd = parse("CalibrationAreaSize 800 600\r\n");
        assert_eq!(cmd.keyword(), "CalibrationAreaSize");
        assert_eq!(cmd.param(0), "800");
        assert_eq!(cmd.param(1), "600");
    }

    #[test]
    fn missing_second_param_reads_empty() {
        let cmd = parse("CalibrationAreaSize 800");
        assert_eq!(cmd.param(0), "800");
        assert_eq!(cmd.param(1), "");
        assert_eq!(cmd.param_count(), 1);
    }

    #[test]
    fn extra_tokens_kept_in_tail_only() {
        let cmd = parse("LogWriteLine trial 3 started ok");
        assert_eq!(cmd.param_count(), MAX_PARAMS);
        assert_eq!(cmd.param(0), "trial");
        assert_eq!(cmd.param(1), "3");
        assert_eq!(cmd.param(2), "");
        assert_eq!(cmd.tail(), "trial 3 started ok");
    }

    #[test]
    fn double_space_yields_empty_token() {
        let cmd = parse("CalibrationAreaSize  600");
        assert_eq!(cmd.param(0), "");
        assert_eq!(cmd.param(1), "600");
    }

    #[test]
    fn tokens_past_limit_are_dropped() {
        let words: Vec<String> = (0..60).map(|i| format!("w{i}")).collect();
        let line = format!("LogWriteLine {}", words.join(" "));
        let cmd = parse(&line);

        let kept: Vec<&str> = cmd.tail().split(' ').collect();
        assert_eq!(kept.len(), MAX_TOKENS - 1);
        assert_eq!(kept.last().copied(), Some("w48"));
        assert!(!cmd.tail().contains("w49"));
    }
}
