use lazy_static::lazy_static;
use owo_colors::OwoColorize;
use regex::Regex;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use sexpr::engine::special_forms::is_special_form;
use std::borrow::Cow::{self, Borrowed, Owned};

lazy_static! {
    // One alternative per token class, tried left to right at each position.
    static ref TOKEN_RE: Regex = Regex::new(
        r"(?P<bool>#[tf])|(?P<number>[+-]?\d+)|(?P<symbol>[A-Za-z<=>*/#+-][A-Za-z0-9<=>*/#?!+-]*)|(?P<paren>[()])|(?P<quote>')"
    )
    .unwrap();
}

#[derive(Default)]
pub struct SexprHighlighter {
    matching_bracket_highlighter: MatchingBracketHighlighter,
}

impl SexprHighlighter {
    fn colorize(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() * 2);
        let mut last = 0;
        for caps in TOKEN_RE.captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&line[last..whole.start()]);
            let text = whole.as_str();
            if caps.name("bool").is_some() {
                out.push_str(&text.yellow().to_string());
            } else if caps.name("number").is_some() {
                out.push_str(&text.magenta().to_string());
            } else if caps.name("symbol").is_some() && is_special_form(text) {
                out.push_str(&text.cyan().bold().to_string());
            } else if caps.name("paren").is_some() {
                out.push_str(&text.blue().to_string());
            } else if caps.name("quote").is_some() {
                out.push_str(&text.green().to_string());
            } else {
                out.push_str(text);
            }
            last = whole.end();
        }
        out.push_str(&line[last..]);
        out
    }
}

impl Highlighter for SexprHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Borrowed(line);
        }
        Owned(self.colorize(line))
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        // Any edit can change the colours, so the whole line is redrawn.
        self.matching_bracket_highlighter
            .highlight_char(line, pos, forced)
            || !line.is_empty()
    }
}

#[derive(Helper, Completer, Hinter, Validator)]
pub struct ReplHelper {
    highlighter: SexprHighlighter,
}

impl ReplHelper {
    pub fn new() -> Self {
        Self {
            highlighter: SexprHighlighter::default(),
        }
    }
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}
