use crate::error::{Diagnostic, DiagnosticKind, Position, Reporter};
use crate::frontend::lexer::token::{Token, TokenKind};
use codespan::{ByteIndex, FileId, Span};

/// one line of input plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    pub file_id: FileId,
    pub line: usize,
    pub offset: usize, // byte offset of the line in its file
}

/// split a whole file into numbered lines
pub fn split_lines(source: &str, file_id: FileId) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for (i, text) in source.split('\n').enumerate() {
        lines.push(SourceLine {
            text: text.trim_end_matches('\r').to_string(),
            file_id,
            line: i + 1,
            offset,
        });
        offset += text.len() + 1;
    }
    lines
}

const TWO_CHAR_SYMBOLS: [(&str, TokenKind); 6] = [
    ("&&", TokenKind::AmpAmp),
    ("||", TokenKind::PipePipe),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
];

fn single_char_symbol(c: u8) -> Option<TokenKind> {
    let kind = match c {
        b';' => TokenKind::Semicolon,
        b',' => TokenKind::Comma,
        b'(' => TokenKind::OpenParen,
        b')' => TokenKind::CloseParen,
        b'{' => TokenKind::OpenBrace,
        b'}' => TokenKind::CloseBrace,
        b'[' => TokenKind::OpenBracket,
        b']' => TokenKind::CloseBracket,
        b'+' => TokenKind::Plus,
        b'-' => TokenKind::Minus,
        b'*' => TokenKind::Star,
        b'/' => TokenKind::Slash,
        b'&' => TokenKind::Amp,
        b'=' => TokenKind::Equals,
        b'!' => TokenKind::Bang,
        _ => return None,
    };
    Some(kind)
}

pub struct Lexer<'a> {
    lines: Vec<SourceLine>,
    reporter: &'a mut Reporter,
    tokens: Vec<Token>,
    open_comment: Option<Position>, // start of an unclosed /* */
}

impl<'a> Lexer<'a> {
    pub fn new(source: &str, file_id: FileId, reporter: &'a mut Reporter) -> Self {
        Self::from_lines(split_lines(source, file_id), reporter)
    }

    pub fn from_lines(lines: Vec<SourceLine>, reporter: &'a mut Reporter) -> Self {
        Self {
            lines,
            reporter,
            tokens: Vec::new(),
            open_comment: None,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let lines = std::mem::take(&mut self.lines);
        for line in &lines {
            self.lex_line(line);
        }
        if let Some(pos) = self.open_comment.take() {
            self.error(pos, "unterminated comment".to_string());
        }
        tracing::debug!(count = self.tokens.len(), "lexed tokens");
        std::mem::take(&mut self.tokens)
    }

    fn lex_line(&mut self, line: &SourceLine) {
        let bytes = line.text.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if self.open_comment.is_some() {
                match find(bytes, i, b"*/") {
                    Some(end) => {
                        self.open_comment = None;
                        i = end + 2;
                    }
                    None => return,
                }
                continue;
            }

            let c = bytes[i];
            if c.is_ascii_whitespace() {
                i += 1;
            } else if bytes[i..].starts_with(b"//") {
                return;
            } else if bytes[i..].starts_with(b"/*") {
                self.open_comment = Some(position(line, i, i + 2));
                i += 2;
            } else if c.is_ascii_alphabetic() || c == b'_' {
                i = self.lex_word(line, i);
            } else if c.is_ascii_digit() || (c == b'-' && self.starts_negative_number(bytes, i)) {
                i = self.lex_number(line, i);
            } else if c == b'\'' || c == b'"' {
                i = self.lex_quoted(line, i);
            } else if let Some((text, kind)) =
                TWO_CHAR_SYMBOLS.iter().find(|(text, _)| bytes[i..].starts_with(text.as_bytes()))
            {
                self.push(*kind, *text, position(line, i, i + 2));
                i += 2;
            } else if let Some(kind) = single_char_symbol(c) {
                self.push(kind, kind.text(), position(line, i, i + 1));
                i += 1;
            } else {
                let len = utf8_len(c);
                let end = (i + len).min(bytes.len());
                let text = String::from_utf8_lossy(&bytes[i..end]).into_owned();
                self.error(position(line, i, end), format!("unrecognized token at '{}'", text));
                i = end;
            }
        }
    }

    fn lex_word(&mut self, line: &SourceLine, start: usize) -> usize {
        let bytes = line.text.as_bytes();
        let mut end = start;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
            end += 1;
        }
        let word = &line.text[start..end];
        let kind = TokenKind::keyword_from_str(word).unwrap_or(TokenKind::Identifier);
        self.push(kind, word, position(line, start, end));
        end
    }

    /// a '-' glued to a digit is a sign unless it follows an operand
    fn starts_negative_number(&self, bytes: &[u8], i: usize) -> bool {
        let digit_follows = bytes.get(i + 1).map(|b| b.is_ascii_digit()).unwrap_or(false);
        let after_operand = self
            .tokens
            .last()
            .map(|t| t.kind.ends_operand())
            .unwrap_or(false);
        digit_follows && !after_operand
    }

    fn lex_number(&mut self, line: &SourceLine, start: usize) -> usize {
        let bytes = line.text.as_bytes();
        let mut end = start;
        if bytes[end] == b'-' {
            end += 1;
        }

        let is_bin_digit = |b: &u8| *b == b'0' || *b == b'1';
        if bytes[end..].starts_with(b"0b") || bytes[end..].starts_with(b"0B") {
            let digits = bytes[end + 2..].iter().take_while(|b| is_bin_digit(b)).count();
            if digits > 0 {
                end += 2 + digits;
                self.push(TokenKind::Number, &line.text[start..end], position(line, start, end));
                return end;
            }
        }

        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        // binary suffix form, 101b
        let all_binary = bytes[digits_start..end].iter().all(is_bin_digit);
        let suffix = bytes.get(end).map(|b| *b == b'b' || *b == b'B').unwrap_or(false);
        let after_suffix_is_word = bytes
            .get(end + 1)
            .map(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .unwrap_or(false);
        if all_binary && suffix && !after_suffix_is_word {
            end += 1;
        }

        self.push(TokenKind::Number, &line.text[start..end], position(line, start, end));
        end
    }

    fn lex_quoted(&mut self, line: &SourceLine, start: usize) -> usize {
        let bytes = line.text.as_bytes();
        let quote = bytes[start];
        let mut content = Vec::new();
        let mut i = start + 1;

        while i < bytes.len() && bytes[i] != quote {
            if bytes[i] == b'\\' && i + 1 < bytes.len() {
                content.push(unescape(bytes[i + 1]));
                i += 2;
            } else {
                content.push(bytes[i]);
                i += 1;
            }
        }

        if i >= bytes.len() {
            let msg = if quote == b'\'' {
                "missing terminating quote"
            } else {
                "missing terminating double quote"
            };
            self.error(position(line, start, bytes.len()), msg.to_string());
            return bytes.len();
        }

        let kind = if quote == b'\'' {
            TokenKind::CharConstant
        } else {
            TokenKind::StringLiteral
        };
        let text = String::from_utf8_lossy(&content).into_owned();
        self.push(kind, text, position(line, start, i + 1));
        i + 1
    }

    fn push(&mut self, kind: TokenKind, content: impl Into<String>, position: Position) {
        self.tokens.push(Token::new(kind, content, position));
    }

    fn error(&mut self, position: Position, message: String) {
        self.reporter.add_diagnostic(Diagnostic::error(
            DiagnosticKind::LexicalError,
            Some(position),
            message,
        ));
    }
}

fn position(line: &SourceLine, start: usize, end: usize) -> Position {
    Position::new(
        line.file_id,
        line.line,
        Span::new(
            ByteIndex((line.offset + start) as u32),
            ByteIndex((line.offset + end) as u32),
        ),
    )
}

fn find(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn unescape(c: u8) -> u8 {
    match c {
        b'n' => b'\n',
        b't' => b'\t',
        b'r' => b'\r',
        b'0' => 0,
        other => other, // \\ \' \" and unknown escapes
    }
}

fn utf8_len(first: u8) -> usize {
    match first {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}
