//! # FIGlet fonts
//!
//! Parses `.flf` font definitions and lays text out the way `figlet` does:
//! full width, kerning or smushing according to the font's layout bits,
//! word wrapping at a maximum width and optional alignment.
//!
//! ```text
//!  _
//! | |__   ___ __      __ ___
//! | '_ \ / _ \\ \ /\ / // _ \
//! | | | | (_) |\ V  V /|  __/
//! |_| |_|\___/  \_/\_/  \___|
//! ```

use crate::{CoreError, Result};
use std::collections::HashMap;

/// File extension of FIGlet font files
pub const FONT_EXTENSION: &str = "flf";

const SIGNATURE: &str = "flf2a";

/// Characters every font defines after the printable ASCII range
const DEUTSCH: [i64; 7] = [196, 214, 220, 228, 246, 252, 223];

/// Horizontal layout bits
pub mod smush {
    pub const EQUAL: i32 = 1;
    pub const LOWLINE: i32 = 2;
    pub const HIERARCHY: i32 = 4;
    pub const PAIR: i32 = 8;
    pub const BIGX: i32 = 16;
    pub const HARDBLANK: i32 = 32;
    pub const KERN: i32 = 64;
    pub const SMUSH: i32 = 128;
}

/// Direction glyphs are laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Horizontal alignment of each output row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    fn index(self) -> usize {
        match self {
            Alignment::Left => 0,
            Alignment::Center => 1,
            Alignment::Right => 2,
        }
    }
}

/// Layout settings a font ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Combination of [`smush`] bits
    pub smush_mode: i32,
    pub direction: PrintDirection,
}

impl Layout {
    fn from_header(old_layout: i32, full_layout: Option<i32>, print_direction: i32) -> Self {
        // Fonts without a full layout field encode everything in the old one
        let smush_mode = match full_layout {
            Some(full) => full,
            None if old_layout == 0 => smush::KERN,
            None if old_layout < 0 => 0,
            None => (old_layout & 31) | smush::SMUSH,
        };
        let direction = if print_direction == 1 {
            PrintDirection::RightToLeft
        } else {
            PrintDirection::LeftToRight
        };
        Self {
            smush_mode,
            direction,
        }
    }

    pub fn is_smushing(&self) -> bool {
        self.smush_mode & smush::SMUSH != 0
    }

    pub fn is_kerning(&self) -> bool {
        !self.is_smushing() && self.smush_mode & smush::KERN != 0
    }
}

/// A parsed FIGlet font
#[derive(Debug, Clone)]
pub struct FigletFont {
    hardblank: char,
    height: usize,
    baseline: usize,
    max_length: usize,
    layout: Layout,
    comment: String,
    glyphs: HashMap<i64, Vec<Vec<char>>>,
}

impl FigletFont {
    /// Parse a font from raw file bytes (UTF-8, or Latin-1 as a fallback)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match std::str::from_utf8(bytes) {
            Ok(content) => Self::parse(content),
            Err(_) => {
                let content: String = bytes.iter().map(|&b| b as char).collect();
                Self::parse(&content)
            }
        }
    }

    /// Parse a font from its text content
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines();
        let header = lines
            .next()
            .ok_or_else(|| CoreError::FontParse("empty font file".to_string()))?;
        let header = Header::parse(header)?;

        // Header counts are untrusted; nothing is sized from them directly
        let mut remaining = content.lines().count() - 1;
        let mut comment = Vec::new();
        for _ in 0..header.comment_lines {
            match lines.next() {
                Some(line) => comment.push(line),
                None => {
                    return Err(CoreError::FontParse(
                        "font ends inside its comment block".to_string(),
                    ))
                }
            }
        }

        remaining -= comment.len();
        if header.height > remaining {
            return Err(CoreError::FontParse(
                "font ends before character 32".to_string(),
            ));
        }

        let mut glyphs = HashMap::new();
        // Unknown characters render as this zero-width glyph
        glyphs.insert(0, vec![Vec::new(); header.height]);

        for code in 32..=126 {
            let glyph = read_glyph(&mut lines, header.height).ok_or_else(|| {
                CoreError::FontParse(format!("font ends before character {}", code))
            })?;
            glyphs.insert(code, glyph);
        }

        let mut complete = true;
        for code in DEUTSCH {
            match read_glyph(&mut lines, header.height) {
                Some(glyph) => {
                    glyphs.insert(code, glyph);
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }

        while complete {
            let Some(tag) = lines.next() else { break };
            let Some(code) = parse_code(tag) else {
                continue;
            };
            match read_glyph(&mut lines, header.height) {
                Some(glyph) => {
                    glyphs.insert(code, glyph);
                }
                None => break,
            }
        }

        Ok(Self {
            hardblank: header.hardblank,
            height: header.height,
            baseline: header.baseline,
            max_length: header.max_length,
            layout: Layout::from_header(
                header.old_layout,
                header.full_layout,
                header.print_direction,
            ),
            comment: comment.join("\n"),
            glyphs,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn hardblank(&self) -> char {
        self.hardblank
    }

    /// Layout settings declared by the font
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&(ch as u32 as i64))
    }

    fn glyph(&self, ch: char) -> &[Vec<char>] {
        self.glyphs
            .get(&(ch as u32 as i64))
            .or_else(|| self.glyphs.get(&0))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

struct Header {
    hardblank: char,
    height: usize,
    baseline: usize,
    max_length: usize,
    old_layout: i32,
    comment_lines: usize,
    print_direction: i32,
    full_layout: Option<i32>,
}

impl Header {
    fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let signature = fields.next().unwrap_or_default();
        if !signature.starts_with(SIGNATURE) {
            return Err(CoreError::FontParse("not a FIGlet font".to_string()));
        }
        let hardblank = signature
            .chars()
            .nth(SIGNATURE.len())
            .ok_or_else(|| CoreError::FontParse("missing hardblank".to_string()))?;

        let numbers = fields
            .map(|f| f.parse::<i32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| CoreError::FontParse(format!("invalid header: {}", e)))?;
        if numbers.len() < 5 {
            return Err(CoreError::FontParse(
                "header needs at least five numeric fields".to_string(),
            ));
        }
        if numbers[0] < 1 {
            return Err(CoreError::FontParse("font height must be positive".to_string()));
        }

        Ok(Self {
            hardblank,
            height: numbers[0] as usize,
            baseline: numbers[1].max(0) as usize,
            max_length: numbers[2].max(0) as usize,
            old_layout: numbers[3],
            comment_lines: numbers[4].max(0) as usize,
            print_direction: numbers.get(5).copied().unwrap_or(0),
            full_layout: numbers.get(6).copied(),
        })
    }
}

fn read_glyph<'a>(lines: &mut impl Iterator<Item = &'a str>, height: usize) -> Option<Vec<Vec<char>>> {
    let mut rows = Vec::new();
    for _ in 0..height {
        rows.push(strip_endmarks(lines.next()?));
    }
    Some(rows)
}

/// Drop trailing whitespace, then every copy of the endmark character
fn strip_endmarks(line: &str) -> Vec<char> {
    let mut chars: Vec<char> = line.trim_end().chars().collect();
    if let Some(&endmark) = chars.last() {
        while chars.last() == Some(&endmark) {
            chars.pop();
        }
    }
    chars
}

/// Parse a code tag: decimal, `0x` hex or leading-zero octal, optionally signed
fn parse_code(tag: &str) -> Option<i64> {
    let token = tag.split_whitespace().next()?;
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let value = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse().ok()?
    };
    Some(if negative { -value } else { value })
}

/// Render `text` with `font`, wrapping at `max_width` columns.
///
/// Every output row ends with a newline.
pub fn render(
    text: &str,
    font: &FigletFont,
    max_width: usize,
    layout: Layout,
    alignment: Alignment,
) -> String {
    let mut renderer = Renderer::new(font, max_width, layout, alignment);
    renderer.feed(text);
    renderer.finish()
}

struct Renderer<'a> {
    font: &'a FigletFont,
    layout: Layout,
    alignment: Alignment,
    output_width: usize,
    line_limit: usize,
    input_limit: usize,
    rows: Vec<Vec<char>>,
    input: Vec<char>,
    current: &'a [Vec<char>],
    current_width: usize,
    previous_width: usize,
    out: String,
}

impl<'a> Renderer<'a> {
    fn new(font: &'a FigletFont, max_width: usize, layout: Layout, alignment: Alignment) -> Self {
        Self {
            font,
            layout,
            alignment,
            output_width: max_width,
            line_limit: max_width.saturating_sub(1),
            input_limit: max_width * 4 + 100,
            rows: vec![Vec::new(); font.height],
            input: Vec::new(),
            current: &[],
            current_width: 0,
            previous_width: 0,
            out: String::new(),
        }
    }

    fn feed(&mut self, text: &str) {
        // Word-break state: -1 just broke a line, 0 line start,
        // 1 in a word, 2 after a word's trailing blanks, 3 in a later word
        let mut word_break: i8 = 0;

        for c in text.chars() {
            let c = match c {
                ' ' | '\t' => ' ',
                '\n' | '\r' | '\x0b' | '\x0c' => '\n',
                c => c,
            };
            if (c > '\0' && c < ' ' && c != '\n') || c == '\x7f' {
                continue;
            }

            loop {
                let mut retry = false;
                if word_break == -1 {
                    if c == ' ' {
                        break;
                    }
                    if c == '\n' {
                        word_break = 0;
                        break;
                    }
                    word_break = 0;
                }

                if c == '\n' {
                    self.print_line();
                    word_break = 0;
                } else if self.add_char(c) {
                    word_break = if c != ' ' {
                        if word_break >= 2 {
                            3
                        } else {
                            1
                        }
                    } else if word_break > 0 {
                        2
                    } else {
                        0
                    };
                } else if self.line_len() == 0 {
                    // Glyph wider than the whole line: print it clipped
                    for row in self.current {
                        put_row(&mut self.out, row, self.font.hardblank, self.output_width, self.alignment);
                    }
                    word_break = -1;
                } else if c == ' ' {
                    if word_break == 2 {
                        self.split_line();
                    } else {
                        self.print_line();
                    }
                    word_break = -1;
                } else {
                    if word_break >= 2 {
                        self.split_line();
                    } else {
                        self.print_line();
                    }
                    word_break = if word_break == 3 { 1 } else { 0 };
                    retry = true;
                }

                if !retry {
                    break;
                }
            }
        }
    }

    fn finish(mut self) -> String {
        if self.line_len() != 0 {
            self.print_line();
        }
        self.out
    }

    fn line_len(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn load_glyph(&mut self, c: char) {
        self.current = self.font.glyph(c);
        self.previous_width = self.current_width;
        self.current_width = self.current.first().map_or(0, Vec::len);
    }

    fn glyph_row(&self, row: usize) -> &'a [char] {
        let current: &'a [Vec<char>] = self.current;
        current.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    fn add_char(&mut self, c: char) -> bool {
        self.load_glyph(c);
        let amount = self.smush_amount();
        let line_len = self.line_len();

        if line_len + self.current_width > self.line_limit + amount
            || self.input.len() + 1 > self.input_limit
        {
            return false;
        }

        for row in 0..self.font.height {
            let glyph = self.glyph_row(row);
            match self.layout.direction {
                PrintDirection::LeftToRight => {
                    for k in 0..amount {
                        let Some(idx) = (line_len + k).checked_sub(amount) else {
                            continue;
                        };
                        let Some(left) = self.rows[row].get(idx).copied() else {
                            continue;
                        };
                        let right = glyph.get(k).copied().unwrap_or(' ');
                        let merged = self.smush_char(left, right).unwrap_or(left);
                        self.rows[row][idx] = merged;
                    }
                    self.rows[row].extend(glyph.iter().skip(amount));
                }
                PrintDirection::RightToLeft => {
                    let mut line = glyph.to_vec();
                    for k in 0..amount {
                        let Some(idx) = (self.current_width + k).checked_sub(amount) else {
                            continue;
                        };
                        let Some(left) = line.get(idx).copied() else {
                            continue;
                        };
                        let right = self.rows[row].get(k).copied().unwrap_or(' ');
                        line[idx] = self.smush_char(left, right).unwrap_or(left);
                    }
                    line.extend(self.rows[row].iter().skip(amount));
                    self.rows[row] = line;
                }
            }
        }

        self.input.push(c);
        true
    }

    /// How many columns the current glyph can slide into the line
    fn smush_amount(&self) -> usize {
        if self.layout.smush_mode & (smush::SMUSH | smush::KERN) == 0 {
            return 0;
        }

        let mut max = self.current_width as isize;
        for row in 0..self.font.height {
            let line = &self.rows[row];
            let glyph = self.glyph_row(row);
            // `near` is the left-hand side of the join, `far` the right-hand side
            let (near, far, span) = match self.layout.direction {
                PrintDirection::LeftToRight => (line.as_slice(), glyph, self.line_len()),
                PrintDirection::RightToLeft => (glyph, line.as_slice(), self.current_width),
            };

            // Last visible column of the left-hand side
            let mut bound = near.len();
            let mut ch1 = near.get(bound).copied();
            while bound > 0 && is_blank(ch1) {
                bound -= 1;
                ch1 = near.get(bound).copied();
            }

            // First visible column of the right-hand side
            let lead = far.iter().take_while(|&&c| c == ' ').count();
            let ch2 = far.get(lead).copied();

            let mut amount = lead as isize + span as isize - 1 - bound as isize;
            match (ch1, ch2) {
                (left, _) if is_blank(left) => amount += 1,
                (Some(left), Some(right)) if self.smush_char(left, right).is_some() => amount += 1,
                _ => {}
            }
            max = max.min(amount);
        }
        max.max(0) as usize
    }

    fn smush_char(&self, left: char, right: char) -> Option<char> {
        if left == ' ' {
            return Some(right);
        }
        if right == ' ' {
            return Some(left);
        }
        if self.previous_width < 2 || self.current_width < 2 {
            return None;
        }

        let mode = self.layout.smush_mode;
        if mode & smush::SMUSH == 0 {
            return None;
        }

        let hardblank = self.font.hardblank;
        if mode & 63 == 0 {
            // Universal smushing: the later glyph wins
            if left == hardblank {
                return Some(right);
            }
            if right == hardblank {
                return Some(left);
            }
            return Some(match self.layout.direction {
                PrintDirection::LeftToRight => right,
                PrintDirection::RightToLeft => left,
            });
        }

        if mode & smush::HARDBLANK != 0 && left == hardblank && right == hardblank {
            return Some(left);
        }
        if left == hardblank || right == hardblank {
            return None;
        }

        if mode & smush::EQUAL != 0 && left == right {
            return Some(left);
        }

        if mode & smush::LOWLINE != 0 {
            const REPLACES_LOWLINE: &str = "|/\\[]{}()<>";
            if left == '_' && REPLACES_LOWLINE.contains(right) {
                return Some(right);
            }
            if right == '_' && REPLACES_LOWLINE.contains(left) {
                return Some(left);
            }
        }

        if mode & smush::HIERARCHY != 0 {
            const CLASSES: [&str; 6] = ["|", "/\\", "[]", "{}", "()", "<>"];
            for (i, class) in CLASSES.iter().enumerate() {
                let later = &CLASSES[i + 1..];
                if class.contains(left) && later.iter().any(|c| c.contains(right)) {
                    return Some(right);
                }
                if class.contains(right) && later.iter().any(|c| c.contains(left)) {
                    return Some(left);
                }
            }
        }

        if mode & smush::PAIR != 0 {
            if matches!(
                (left, right),
                ('[', ']') | (']', '[') | ('{', '}') | ('}', '{') | ('(', ')') | (')', '(')
            ) {
                return Some('|');
            }
        }

        if mode & smush::BIGX != 0 {
            match (left, right) {
                ('/', '\\') => return Some('|'),
                ('\\', '/') => return Some('Y'),
                ('>', '<') => return Some('X'),
                _ => {}
            }
        }

        None
    }

    fn print_line(&mut self) {
        let rows = std::mem::replace(&mut self.rows, vec![Vec::new(); self.font.height]);
        for row in &rows {
            put_row(&mut self.out, row, self.font.hardblank, self.output_width, self.alignment);
        }
        self.input.clear();
    }

    fn clear_line(&mut self) {
        self.rows = vec![Vec::new(); self.font.height];
        self.input.clear();
    }

    /// Break the line at its last blank and carry the trailing word over
    fn split_line(&mut self) {
        let input = std::mem::take(&mut self.input);
        let (head, tail) = match input.iter().rposition(|&c| c == ' ') {
            Some(space) => {
                let end = input[..space]
                    .iter()
                    .rposition(|&c| c != ' ')
                    .map_or(0, |p| p + 1);
                (&input[..end], &input[space + 1..])
            }
            None => (&input[..0], &input[..0]),
        };

        self.clear_line();
        for &c in head {
            self.add_char(c);
        }
        self.print_line();
        for &c in tail {
            self.add_char(c);
        }
    }
}

fn is_blank(c: Option<char>) -> bool {
    c.map_or(true, |c| c == ' ')
}

fn put_row(out: &mut String, row: &[char], hardblank: char, width: usize, alignment: Alignment) {
    let mut len = row.len();
    if width > 1 {
        len = len.min(width - 1);
        let justify = alignment.index();
        if justify > 0 {
            let mut i = 1;
            while (3 - justify) * i + len + justify < width + 2 {
                out.push(' ');
                i += 1;
            }
        }
    }
    out.extend(
        row[..len]
            .iter()
            .map(|&c| if c == hardblank { ' ' } else { c }),
    );
    out.push('\n');
}
