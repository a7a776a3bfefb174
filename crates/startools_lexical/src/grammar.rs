//! Contains the [`Grammar`]: the ordered alternatives that recognize each
//! [`Kind`] of token.
//!
//! A token may only start at the beginning of the span, after a whitespace
//! character or at the start of a line. At such a position the alternatives
//! are tried in the order of their [`Kind::code`] and the first one that
//! matches wins. Unless noted otherwise an alternative must be followed by
//! whitespace, a line terminator or the end of the span.
//!
//! Whitespace is the ASCII set ` \t\n\x0B\x0C\r`. Line terminators are `\n`,
//! `\r`, `\r\n`, `\u{85}`, `\u{2028}` and `\u{2029}`; the last three are not
//! whitespace, so they can end a token but never separate two tokens.
//!
//! Reserved words are matched with ASCII case folding only, so `ſave_` is not
//! a save frame.

use std::ops::Range;

use lazy_static::lazy_static;

use crate::token::Kind;

/// A successful match of one alternative of the [`Grammar`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    /// The alternative that matched.
    pub kind: Kind,

    /// The byte range of the whole match.
    pub range: Range<usize>,

    /// The byte range of the decoded value; a sub-range of [`Self::range`].
    pub value: Range<usize>,
}

/// The result of a scan function: where the match ends and where its value
/// lies.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scan {
    end: usize,
    value: Range<usize>,
}

impl Scan {
    const fn whole(start: usize, end: usize) -> Self {
        Self { end, value: start..end }
    }
}

/// One alternative of the grammar.
#[derive(Debug, Clone, Copy)]
struct Rule {
    kind: Kind,

    /// The match must be followed by whitespace, a line terminator or the
    /// end of the span.
    delimited: bool,

    scan: fn(&str, usize) -> Option<Scan>,
}

impl Rule {
    const fn new(
        kind: Kind,
        delimited: bool,
        scan: fn(&str, usize) -> Option<Scan>,
    ) -> Self {
        Self { kind, delimited, scan }
    }
}

/// The ordered list of alternatives recognizing every kind of token.
///
/// The grammar holds no mutable state; a single instance obtained from
/// [`Grammar::global`] is shared by every tokenizer.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
}

lazy_static! {
    static ref GRAMMAR: Grammar = Grammar::new();
}

impl Grammar {
    fn new() -> Self {
        Self {
            rules: vec![
                Rule::new(Kind::Multiline, false, multiline),
                Rule::new(Kind::Comment, false, comment),
                Rule::new(Kind::Global, true, global),
                Rule::new(Kind::SaveFrame, true, save_frame),
                Rule::new(Kind::SaveFrameRef, true, save_frame_ref),
                Rule::new(Kind::LoopStop, true, loop_stop),
                Rule::new(Kind::DataBlock, true, data_block),
                Rule::new(Kind::Loop, true, loop_keyword),
                Rule::new(Kind::BadConstruct, true, bad_construct),
                Rule::new(Kind::DataName, true, data_name),
                Rule::new(Kind::SquoteString, true, |text, start| {
                    quoted(text, start, '\'')
                }),
                Rule::new(Kind::DquoteString, true, |text, start| {
                    quoted(text, start, '"')
                }),
                Rule::new(Kind::Null, true, |text, start| {
                    single(text, start, '.')
                }),
                Rule::new(Kind::Unknown, true, |text, start| {
                    single(text, start, '?')
                }),
                Rule::new(Kind::SquareBracket, true, square_bracket),
                Rule::new(Kind::String, true, string),
                Rule::new(Kind::BadToken, true, bad_token),
            ],
        }
    }

    /// Gets the shared instance of the grammar.
    #[must_use]
    pub fn global() -> &'static Self { &GRAMMAR }

    /// Gets the kinds of the alternatives in the order they are tried.
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.rules.iter().map(|x| x.kind)
    }

    /// Finds the first match in `text` starting at or after the byte offset
    /// `from`.
    ///
    /// Returns `None` when the rest of the text holds no token, that is when
    /// it is empty or only whitespace.
    ///
    /// # Panics
    ///
    /// `from` is past the end of `text` or not on a character boundary.
    #[must_use]
    pub fn find(&self, text: &str, from: usize) -> Option<Match> {
        let mut position = from;

        while let Some(character) = text[position..].chars().next() {
            if !is_whitespace(character) && is_token_start(text, position) {
                if let Some(found) = self.match_at(text, position) {
                    return Some(found);
                }
            }

            position += character.len_utf8();
        }

        None
    }

    /// Tries every alternative at exactly the byte offset `start` and returns
    /// the first that matches.
    ///
    /// Unlike [`Grammar::find`] this does not check whether a token may start
    /// at `start`.
    #[must_use]
    pub fn match_at(&self, text: &str, start: usize) -> Option<Match> {
        self.rules.iter().find_map(|rule| {
            let scan = (rule.scan)(text, start)?;

            (!rule.delimited || is_boundary(text, scan.end)).then(|| Match {
                kind: rule.kind,
                range: start..scan.end,
                value: scan.value,
            })
        })
    }
}

/// Returns `true` if the character separates tokens.
#[must_use]
pub const fn is_whitespace(character: char) -> bool {
    matches!(character, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Returns `true` if the character ends a line.
#[must_use]
pub const fn is_line_terminator(character: char) -> bool {
    matches!(character, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn previous_char(text: &str, position: usize) -> Option<char> {
    text[..position].chars().next_back()
}

fn next_char(text: &str, position: usize) -> Option<char> {
    text[position..].chars().next()
}

/// A line starts at the beginning of the text and after every line
/// terminator, except between `\r` and `\n` and at the very end of the text.
fn is_line_start(text: &str, position: usize) -> bool {
    if position >= text.len() {
        return false;
    }

    match previous_char(text, position) {
        None => true,
        Some('\r') => next_char(text, position) != Some('\n'),
        Some(character) => is_line_terminator(character),
    }
}

/// A line ends at the end of the text and before every line terminator,
/// except between `\r` and `\n`.
fn is_line_end(text: &str, position: usize) -> bool {
    match next_char(text, position) {
        None => true,
        Some('\n') => previous_char(text, position) != Some('\r'),
        Some(character) => is_line_terminator(character),
    }
}

fn is_boundary(text: &str, position: usize) -> bool {
    next_char(text, position)
        .map_or(true, |x| is_whitespace(x) || is_line_terminator(x))
}

fn is_token_start(text: &str, position: usize) -> bool {
    previous_char(text, position).map_or(true, is_whitespace)
        || is_line_start(text, position)
}

/// Gets the end of the run of non-whitespace characters starting at
/// `start`.
fn run_end(text: &str, start: usize) -> usize {
    text[start..].find(is_whitespace).map_or(text.len(), |x| start + x)
}

fn starts_with_word(text: &str, start: usize, word: &str) -> bool {
    text.get(start..start + word.len())
        .is_some_and(|x| x.eq_ignore_ascii_case(word))
}

fn multiline(text: &str, start: usize) -> Option<Scan> {
    if !text[start..].starts_with(';') || !is_line_start(text, start) {
        return None;
    }

    let content = start + 1;
    let mut position = content;

    // the field is closed by the first `;` that starts a line and is followed
    // by a boundary
    loop {
        let terminator = position + text[position..].find(['\n', '\r'])?;
        let closing = if text[terminator..].starts_with("\r\n") {
            terminator + 2
        } else {
            terminator + 1
        };

        if text[closing..].starts_with(';') && is_boundary(text, closing + 1) {
            return Some(Scan { end: closing + 1, value: content..terminator });
        }

        position = terminator + 1;
    }
}

fn comment(text: &str, start: usize) -> Option<Scan> {
    if !text[start..].starts_with('#') {
        return None;
    }

    let value_end = text[start..]
        .find(is_line_terminator)
        .map_or(text.len(), |x| start + x);

    // a lone `\r` at the end of the line belongs to the match
    let end = if text[value_end..].starts_with('\r')
        && is_line_end(text, value_end + 1)
    {
        value_end + 1
    } else {
        value_end
    };

    Some(Scan { end, value: start..value_end })
}

fn global(text: &str, start: usize) -> Option<Scan> {
    starts_with_word(text, start, "global_")
        .then(|| Scan::whole(start, start + "global_".len()))
}

fn save_frame(text: &str, start: usize) -> Option<Scan> {
    starts_with_word(text, start, "save_")
        .then(|| Scan::whole(start, run_end(text, start)))
}

fn save_frame_ref(text: &str, start: usize) -> Option<Scan> {
    let end = run_end(text, start);

    (text[start..].starts_with('$') && end > start + 1)
        .then(|| Scan::whole(start, end))
}

fn loop_stop(text: &str, start: usize) -> Option<Scan> {
    starts_with_word(text, start, "stop_")
        .then(|| Scan::whole(start, start + "stop_".len()))
}

fn data_block(text: &str, start: usize) -> Option<Scan> {
    let end = run_end(text, start);

    (starts_with_word(text, start, "data_") && end > start + "data_".len())
        .then(|| Scan::whole(start, end))
}

fn loop_keyword(text: &str, start: usize) -> Option<Scan> {
    starts_with_word(text, start, "loop_")
        .then(|| Scan::whole(start, start + "loop_".len()))
}

fn bad_construct(text: &str, start: usize) -> Option<Scan> {
    let end = run_end(text, start);
    let extended = |word: &str| {
        starts_with_word(text, start, word) && end > start + word.len()
    };

    if extended("global_") || extended("stop_") || extended("loop_") {
        Some(Scan::whole(start, end))
    } else {
        starts_with_word(text, start, "data_")
            .then(|| Scan::whole(start, start + "data_".len()))
    }
}

fn data_name(text: &str, start: usize) -> Option<Scan> {
    let end = run_end(text, start);

    (text[start..].starts_with('_') && end > start + 1)
        .then(|| Scan::whole(start, end))
}

/// A quoted string is closed by the first matching quote that is followed by
/// a boundary. It never spans lines.
fn quoted(text: &str, start: usize, quote: char) -> Option<Scan> {
    if !text[start..].starts_with(quote) {
        return None;
    }

    let content = start + quote.len_utf8();

    for (offset, character) in text[content..].char_indices() {
        if is_line_terminator(character) {
            return None;
        }

        let position = content + offset;
        if character == quote && is_boundary(text, position + quote.len_utf8())
        {
            return Some(Scan {
                end: position + quote.len_utf8(),
                value: content..position,
            });
        }
    }

    None
}

fn single(text: &str, start: usize, character: char) -> Option<Scan> {
    text[start..]
        .starts_with(character)
        .then(|| Scan::whole(start, start + character.len_utf8()))
}

fn square_bracket(text: &str, start: usize) -> Option<Scan> {
    text[start..]
        .starts_with(['[', ']'])
        .then(|| Scan::whole(start, run_end(text, start)))
}

fn string(text: &str, start: usize) -> Option<Scan> {
    let allowed = match next_char(text, start)? {
        '\'' | '"' | '_' | '$' => false,
        ';' => !is_line_start(text, start),
        character => !is_whitespace(character),
    };

    allowed.then(|| Scan::whole(start, run_end(text, start)))
}

fn bad_token(text: &str, start: usize) -> Option<Scan> {
    let end = run_end(text, start);

    (end > start).then(|| Scan::whole(start, end))
}
