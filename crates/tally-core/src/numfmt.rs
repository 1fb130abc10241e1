//! Number format rendering
//!
//! Format codes are a small language. A code has up to four sections
//! separated by `;`:
//!
//! - `positive;negative;zero;text`
//! - `positive;negative` (zero uses the first)
//! - `positive` (every number uses it, negatives get a leading `-`)
//!
//! Sections may carry a condition (`[>100]`), which replaces the sign rules,
//! and a color (`[Red]`), which is ignored here. Rendering is locale-free.

use crate::datetime::Calendar;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Render a number through a format code
pub fn format_number(value: f64, code: &str, calendar: Calendar) -> String {
    FormatCode::parse(code).format_number(value, calendar)
}

/// Render text through a format code
pub fn format_text(text: &str, code: &str) -> String {
    FormatCode::parse(code).format_text(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElapsedUnit {
    Hours,
    Minutes,
    Seconds,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    General,
    /// `0`, `#` or `?`
    Digit(char),
    Point,
    Comma,
    Percent,
    Exponent { plus: bool },
    Slash,
    /// `@`
    Text,
    /// Unresolved run of a date letter
    DatePart(char, usize),
    Year(usize),
    Month(usize),
    Day(usize),
    Hour(usize),
    Minute(usize),
    Second(usize),
    /// `.0`, `.00`, `.000` after seconds
    SubSecond(usize),
    AmPm { am: String, pm: String },
    Elapsed(ElapsedUnit, usize),
}

impl Token {
    fn is_digit(&self) -> bool {
        matches!(self, Token::Digit(_))
    }

    fn is_date(&self) -> bool {
        matches!(
            self,
            Token::DatePart(..)
                | Token::Year(_)
                | Token::Month(_)
                | Token::Day(_)
                | Token::Hour(_)
                | Token::Minute(_)
                | Token::Second(_)
                | Token::SubSecond(_)
                | Token::AmPm { .. }
                | Token::Elapsed(..)
        )
    }

    /// Output of the token when nothing fills it in
    fn fixed_text(&self) -> String {
        match self {
            Token::Literal(s) => s.clone(),
            Token::Point => ".".to_string(),
            Token::Percent => "%".to_string(),
            Token::Slash => "/".to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Condition {
    op: Comparison,
    operand: f64,
}

impl Condition {
    fn parse(s: &str) -> Option<Self> {
        let (op, rest) = if let Some(rest) = s.strip_prefix("<=") {
            (Comparison::Le, rest)
        } else if let Some(rest) = s.strip_prefix(">=") {
            (Comparison::Ge, rest)
        } else if let Some(rest) = s.strip_prefix("<>") {
            (Comparison::Ne, rest)
        } else if let Some(rest) = s.strip_prefix('<') {
            (Comparison::Lt, rest)
        } else if let Some(rest) = s.strip_prefix('>') {
            (Comparison::Gt, rest)
        } else if let Some(rest) = s.strip_prefix('=') {
            (Comparison::Eq, rest)
        } else {
            return None;
        };
        let operand = rest.trim().parse().ok()?;
        Some(Self { op, operand })
    }

    fn matches(&self, value: f64) -> bool {
        match self.op {
            Comparison::Lt => value < self.operand,
            Comparison::Le => value <= self.operand,
            Comparison::Gt => value > self.operand,
            Comparison::Ge => value >= self.operand,
            Comparison::Eq => value == self.operand,
            Comparison::Ne => value != self.operand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    General,
    Number,
    Date,
    Text,
    Literal,
}

#[derive(Debug, Clone, PartialEq)]
struct Section {
    condition: Option<Condition>,
    tokens: Vec<Token>,
    kind: SectionKind,
}

/// A parsed format code, ready to render values
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCode {
    sections: Vec<Section>,
}

impl FormatCode {
    pub fn parse(code: &str) -> Self {
        let sections = split_sections(code)
            .into_iter()
            .map(|s| Section::parse(&s))
            .collect();
        Self { sections }
    }

    /// True when the first section renders dates or times
    pub fn is_date(&self) -> bool {
        self.sections
            .first()
            .is_some_and(|s| s.kind == SectionKind::Date)
    }

    pub fn format_number(&self, value: f64, calendar: Calendar) -> String {
        if !value.is_finite() {
            return "#NUM!".to_string();
        }
        let Some((section, negate)) = self.pick_numeric(value) else {
            return format_general(value);
        };
        match section.kind {
            SectionKind::Date => section.render_number(value, calendar),
            SectionKind::Literal => section.render_number(0.0, calendar),
            _ => {
                let body = section.render_number(value.abs(), calendar);
                if value < 0.0 && !negate {
                    format!("-{body}")
                } else {
                    body
                }
            }
        }
    }

    pub fn format_text(&self, text: &str) -> String {
        let section = if self.sections.len() >= 4 {
            self.sections.get(3)
        } else {
            self.sections.iter().find(|s| s.kind == SectionKind::Text)
        };
        match section {
            Some(section) => section.render_text(text),
            None => text.to_string(),
        }
    }

    /// Section for a number, and whether that section already conveys the
    /// sign (so the value is shown unsigned)
    fn pick_numeric(&self, value: f64) -> Option<(&Section, bool)> {
        let numeric = match self.sections.len() {
            0 => return None,
            4.. => &self.sections[..3],
            _ => &self.sections[..],
        };

        if numeric.iter().any(|s| s.condition.is_some()) {
            for section in numeric {
                match section.condition {
                    Some(c) if c.matches(value) => return Some((section, false)),
                    Some(_) => continue,
                    None => return Some((section, false)),
                }
            }
            return None;
        }

        match numeric {
            [only] => Some((only, false)),
            [pos, neg] => Some(if value < 0.0 { (neg, true) } else { (pos, false) }),
            [pos, neg, zero, ..] => Some(if value < 0.0 {
                (neg, true)
            } else if value == 0.0 {
                (zero, false)
            } else {
                (pos, false)
            }),
            [] => None,
        }
    }
}

/// Split on `;` outside quotes, brackets and escapes
fn split_sections(code: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut in_bracket = false;
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => in_quote = !in_quote,
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            '\\' | '_' | '*' if !in_quote => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                continue;
            }
            ';' if !in_quote && !in_bracket => {
                sections.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    sections.push(current);
    sections
}

fn starts_with_ignore_case(chars: &[char], at: usize, needle: &str) -> bool {
    let mut i = at;
    for n in needle.chars() {
        match chars.get(i) {
            Some(c) if c.eq_ignore_ascii_case(&n) => i += 1,
            _ => return false,
        }
    }
    true
}

enum Bracket {
    Condition(Condition),
    Elapsed(ElapsedUnit, usize),
    Literal(String),
    Ignored,
}

fn classify_bracket(content: &str) -> Bracket {
    if let Some(condition) = Condition::parse(content) {
        return Bracket::Condition(condition);
    }
    let lower = content.to_ascii_lowercase();
    if let Some(first) = lower.chars().next() {
        if lower.chars().all(|c| c == first) {
            let unit = match first {
                'h' => Some(ElapsedUnit::Hours),
                'm' => Some(ElapsedUnit::Minutes),
                's' => Some(ElapsedUnit::Seconds),
                _ => None,
            };
            if let Some(unit) = unit {
                return Bracket::Elapsed(unit, lower.len());
            }
        }
    }
    if let Some(currency) = content.strip_prefix('$') {
        let symbol = currency.split('-').next().unwrap_or_default();
        return Bracket::Literal(symbol.to_string());
    }
    Bracket::Ignored
}

impl Section {
    fn parse(code: &str) -> Self {
        let chars: Vec<char> = code.chars().collect();
        let mut tokens = Vec::new();
        let mut condition = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            i += 1;
            match c {
                '"' => {
                    let start = i;
                    while i < chars.len() && chars[i] != '"' {
                        i += 1;
                    }
                    tokens.push(Token::Literal(chars[start..i].iter().collect()));
                    i += 1;
                }
                '\\' => {
                    if let Some(&next) = chars.get(i) {
                        tokens.push(Token::Literal(next.to_string()));
                        i += 1;
                    }
                }
                '_' => {
                    tokens.push(Token::Literal(" ".to_string()));
                    i += 1;
                }
                '*' => i += 1,
                '[' => {
                    let start = i;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    let content: String = chars[start..i].iter().collect();
                    i += 1;
                    match classify_bracket(&content) {
                        Bracket::Condition(c) => condition = Some(c),
                        Bracket::Elapsed(unit, width) => tokens.push(Token::Elapsed(unit, width)),
                        Bracket::Literal(s) => tokens.push(Token::Literal(s)),
                        Bracket::Ignored => {}
                    }
                }
                '0' | '#' | '?' => tokens.push(Token::Digit(c)),
                '.' => tokens.push(Token::Point),
                ',' => tokens.push(Token::Comma),
                '%' => tokens.push(Token::Percent),
                '/' => tokens.push(Token::Slash),
                '@' => tokens.push(Token::Text),
                'E' | 'e' if matches!(chars.get(i), Some('+' | '-')) => {
                    tokens.push(Token::Exponent {
                        plus: chars[i] == '+',
                    });
                    i += 1;
                }
                'G' | 'g' if starts_with_ignore_case(&chars, i - 1, "general") => {
                    tokens.push(Token::General);
                    i += 6;
                }
                'A' | 'a' if starts_with_ignore_case(&chars, i - 1, "am/pm") => {
                    tokens.push(Token::AmPm {
                        am: chars[i - 1..i + 1].iter().collect(),
                        pm: chars[i + 2..i + 4].iter().collect(),
                    });
                    i += 4;
                }
                'A' | 'a' if starts_with_ignore_case(&chars, i - 1, "a/p") => {
                    tokens.push(Token::AmPm {
                        am: c.to_string(),
                        pm: chars[i + 1].to_string(),
                    });
                    i += 2;
                }
                'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => {
                    let letter = c.to_ascii_lowercase();
                    let mut count = 1;
                    while chars
                        .get(i)
                        .is_some_and(|n| n.to_ascii_lowercase() == letter)
                    {
                        count += 1;
                        i += 1;
                    }
                    tokens.push(Token::DatePart(letter, count));
                }
                other => tokens.push(Token::Literal(other.to_string())),
            }
        }

        let kind = if tokens.iter().any(Token::is_date) {
            tokens = resolve_date_tokens(tokens);
            SectionKind::Date
        } else if tokens.contains(&Token::General) {
            SectionKind::General
        } else if tokens.iter().any(Token::is_digit) {
            SectionKind::Number
        } else if tokens.contains(&Token::Text) {
            SectionKind::Text
        } else {
            SectionKind::Literal
        };

        Self {
            condition,
            tokens,
            kind,
        }
    }

    fn render_number(&self, value: f64, calendar: Calendar) -> String {
        match self.kind {
            SectionKind::General => self.render_around(&format_general(value)),
            SectionKind::Text => self.render_around(&format_general(value)),
            SectionKind::Number => render_numeric(&self.tokens, value),
            SectionKind::Date => render_date(&self.tokens, value, calendar),
            SectionKind::Literal => self.render_around(""),
        }
    }

    fn render_text(&self, text: &str) -> String {
        self.tokens
            .iter()
            .map(|t| match t {
                Token::Text => text.to_string(),
                Token::Literal(s) => s.clone(),
                _ => String::new(),
            })
            .collect()
    }

    /// Literals with `General` or `@` replaced by `inner`
    fn render_around(&self, inner: &str) -> String {
        self.tokens
            .iter()
            .map(|t| match t {
                Token::General | Token::Text => inner.to_string(),
                other => other.fixed_text(),
            })
            .collect()
    }
}

/// Turn raw date letters into typed fields. `m` means minutes right after
/// hours or right before seconds, months otherwise.
fn resolve_date_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut tokens: Vec<Token> = tokens
        .into_iter()
        .map(|t| match t {
            Token::DatePart('y', n) => Token::Year(n),
            Token::DatePart('d', n) => Token::Day(n),
            Token::DatePart('h', n) => Token::Hour(n),
            Token::DatePart('s', n) => Token::Second(n),
            other => other,
        })
        .collect();

    for i in 0..tokens.len() {
        let Token::DatePart('m', n) = tokens[i] else {
            continue;
        };
        let prev = tokens[..i].iter().rev().find(|t| t.is_date());
        let next = tokens[i + 1..].iter().find(|t| t.is_date());
        let minute = n <= 2
            && (matches!(prev, Some(Token::Hour(_) | Token::Elapsed(ElapsedUnit::Hours, _)))
                || matches!(
                    next,
                    Some(Token::Second(_) | Token::Elapsed(ElapsedUnit::Seconds, _))
                ));
        tokens[i] = if minute {
            Token::Minute(n)
        } else {
            Token::Month(n)
        };
    }

    // `.000` after seconds is a fraction of a second
    let mut resolved = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        let after_seconds = matches!(
            resolved.iter().rev().find(|t: &&Token| t.is_date()),
            Some(Token::Second(_) | Token::Elapsed(ElapsedUnit::Seconds, _))
        );
        if token == Token::Point && after_seconds && iter.peek() == Some(&Token::Digit('0')) {
            let mut width = 0;
            while iter.peek() == Some(&Token::Digit('0')) {
                iter.next();
                width += 1;
            }
            resolved.push(Token::SubSecond(width));
        } else {
            resolved.push(token);
        }
    }
    resolved
}

/// Excel's General format: integers as-is, up to ten significant digits
/// otherwise, scientific for very large or very small magnitudes
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return "#NUM!".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    // eleven characters wide: small magnitudes lose digits in fixed notation
    if !(1e-5..1e11).contains(&abs) {
        let mut exp = abs.log10().floor() as i32;
        let mut mantissa = format!("{:.5}", abs / 10f64.powi(exp));
        if mantissa.starts_with("10") {
            exp += 1;
            mantissa = format!("{:.5}", abs / 10f64.powi(exp));
        }
        let mantissa = trim_decimal(&mantissa);
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}E{exp_sign}{:02}", exp.abs());
    }

    let int_digits = if abs >= 1.0 {
        abs.log10().floor() as i32 + 1
    } else {
        1
    };
    let decimals = (10 - int_digits).max(0) as usize;
    let text = format!("{abs:.decimals$}");
    format!("{sign}{}", trim_decimal(&text))
}

fn trim_decimal(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

struct FractionLayout {
    whole: Vec<usize>,
    numerator: Vec<usize>,
    denominator: Vec<usize>,
    /// A literal denominator such as the `8` in `# ?/8`
    fixed: Option<u32>,
}

struct NumberLayout {
    int_slots: Vec<usize>,
    frac_slots: Vec<usize>,
    exp_slots: Vec<usize>,
    exponent: Option<(usize, bool)>,
    point: Option<usize>,
    grouping: bool,
    scale: i32,
    percent: i32,
    fraction: Option<FractionLayout>,
}

impl NumberLayout {
    fn analyze(tokens: &[Token]) -> Self {
        let exponent = tokens.iter().enumerate().find_map(|(i, t)| match t {
            Token::Exponent { plus } => Some((i, *plus)),
            _ => None,
        });
        let mantissa_end = exponent.map_or(tokens.len(), |(i, _)| i);
        let point = tokens[..mantissa_end].iter().position(|t| *t == Token::Point);
        let int_end = point.unwrap_or(mantissa_end);

        let digits_in = |from: usize, to: usize| -> Vec<usize> {
            (from..to).filter(|&i| tokens[i].is_digit()).collect()
        };
        let int_slots = digits_in(0, int_end);
        let frac_slots = point.map_or_else(Vec::new, |p| digits_in(p + 1, mantissa_end));
        let exp_slots = exponent.map_or_else(Vec::new, |(e, _)| digits_in(e + 1, tokens.len()));

        let mut grouping = false;
        let mut scale = 0;
        for (i, token) in tokens[..mantissa_end].iter().enumerate() {
            if *token != Token::Comma {
                continue;
            }
            let digit_before = tokens[..i].iter().any(Token::is_digit);
            let digit_after_int = i < int_end && tokens[i + 1..int_end].iter().any(Token::is_digit);
            let digit_after = tokens[i + 1..mantissa_end].iter().any(Token::is_digit);
            if digit_before && digit_after_int {
                grouping = true;
            } else if digit_before && !digit_after {
                scale += 1;
            }
        }

        let percent = tokens.iter().filter(|t| **t == Token::Percent).count() as i32;
        let fraction = if point.is_none() && exponent.is_none() {
            Self::fraction_layout(tokens)
        } else {
            None
        };

        Self {
            int_slots,
            frac_slots,
            exp_slots,
            exponent,
            point,
            grouping,
            scale,
            percent,
            fraction,
        }
    }

    fn fraction_layout(tokens: &[Token]) -> Option<FractionLayout> {
        let slash = tokens.iter().position(|t| *t == Token::Slash)?;

        let mut num_start = slash;
        while num_start > 0 && tokens[num_start - 1].is_digit() {
            num_start -= 1;
        }
        if num_start == slash {
            return None;
        }
        let numerator: Vec<usize> = (num_start..slash).collect();
        let whole: Vec<usize> = (0..num_start).filter(|&i| tokens[i].is_digit()).collect();

        let mut end = slash + 1;
        while tokens.get(end).is_some_and(Token::is_digit) {
            end += 1;
        }
        if end > slash + 1 {
            return Some(FractionLayout {
                whole,
                numerator,
                denominator: (slash + 1..end).collect(),
                fixed: None,
            });
        }

        let mut fixed = String::new();
        while let Some(Token::Literal(s)) = tokens.get(end) {
            if !s.chars().all(|c| c.is_ascii_digit()) {
                break;
            }
            fixed.push_str(s);
            end += 1;
        }
        let fixed: u32 = fixed.parse().ok().filter(|&d| d > 0)?;
        Some(FractionLayout {
            whole,
            numerator,
            denominator: Vec::new(),
            fixed: Some(fixed),
        })
    }
}

fn render_numeric(tokens: &[Token], value: f64) -> String {
    let layout = NumberLayout::analyze(tokens);
    let mut out: Vec<String> = tokens.iter().map(Token::fixed_text).collect();
    let scaled = value * 100f64.powi(layout.percent) / 1000f64.powi(layout.scale);

    if let Some(fraction) = &layout.fraction {
        render_fraction(&mut out, tokens, fraction, scaled);
    } else if let Some((exp_at, plus)) = layout.exponent {
        let int_n = layout.int_slots.len() as i32;
        let engineering = int_n > 1
            && layout
                .int_slots
                .iter()
                .any(|&i| tokens[i] == Token::Digit('#'));
        let (step, limit) = if engineering {
            (int_n, 10f64.powi(int_n))
        } else {
            (1, 10f64.powi(int_n.max(0)))
        };

        let mut exp = 0;
        let mut mantissa = scaled;
        if scaled != 0.0 {
            let magnitude = scaled.log10().floor() as i32;
            exp = if engineering {
                magnitude.div_euclid(int_n) * int_n
            } else {
                magnitude - (int_n - 1)
            };
            mantissa = scaled / 10f64.powi(exp);
            let decimals = layout.frac_slots.len();
            let rounded: f64 = format!("{mantissa:.decimals$}").parse().unwrap_or(mantissa);
            if rounded >= limit {
                exp += step;
                mantissa = scaled / 10f64.powi(exp);
            }
        }

        fill_mantissa(&mut out, tokens, &layout, mantissa);
        let exp_sign = if exp < 0 {
            "-"
        } else if plus {
            "+"
        } else {
            ""
        };
        out[exp_at] = format!("E{exp_sign}");
        fill_right(
            &mut out,
            tokens,
            &layout.exp_slots,
            &exp.unsigned_abs().to_string(),
            false,
        );
    } else {
        fill_mantissa(&mut out, tokens, &layout, scaled);
    }
    out.concat()
}

fn fill_mantissa(out: &mut [String], tokens: &[Token], layout: &NumberLayout, value: f64) {
    let decimals = layout.frac_slots.len();
    let text = format!("{value:.decimals$}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((&text, ""));
    let int_digits = if int_part == "0" { "" } else { int_part };

    if layout.int_slots.is_empty() {
        // digits with nowhere to go still get shown
        if let Some(at) = layout.point.or(layout.frac_slots.first().copied()) {
            out[at] = format!("{int_digits}{}", out[at]);
        }
    } else {
        fill_right(out, tokens, &layout.int_slots, int_digits, layout.grouping);
    }

    let mut keep = frac_part.len();
    while keep > 0
        && frac_part.as_bytes()[keep - 1] == b'0'
        && tokens[layout.frac_slots[keep - 1]] != Token::Digit('0')
    {
        keep -= 1;
    }
    fill_left(out, tokens, &layout.frac_slots, &frac_part[..keep]);
}

/// Denominator search stops at this many digits however many `?` ask for more
const MAX_DENOMINATOR_DIGITS: u32 = 5;

fn render_fraction(out: &mut [String], tokens: &[Token], layout: &FractionLayout, value: f64) {
    let has_whole = !layout.whole.is_empty();
    let whole = if has_whole { value.trunc() } else { 0.0 };
    let rest = value - whole;

    let (mut numerator, denominator) = match layout.fixed {
        Some(d) => ((rest * d as f64).round() as u64, d as u64),
        None => {
            let digits = (layout.denominator.len() as u32).min(MAX_DENOMINATOR_DIGITS);
            let max = 10u64.pow(digits) - 1;
            let (n, d) = approximate(rest.fract(), max);
            (n.saturating_add((rest.trunc() as u64).saturating_mul(d)), d)
        }
    };
    let mut whole = whole as u64;
    if has_whole && numerator == denominator {
        whole = whole.saturating_add(1);
        numerator = 0;
    }

    let whole_digits = match (whole, numerator) {
        (0, 0) => "0".to_string(),
        (0, _) => String::new(),
        (w, _) => w.to_string(),
    };
    fill_right(out, tokens, &layout.whole, &whole_digits, false);
    fill_right(out, tokens, &layout.numerator, &numerator.to_string(), false);
    fill_left(out, tokens, &layout.denominator, &denominator.to_string());

    if has_whole && numerator == 0 {
        let start = layout.numerator[0];
        let end = layout
            .denominator
            .last()
            .map_or(start + layout.numerator.len() + 1, |&d| d);
        for slot in out.iter_mut().take(end + 1).skip(start) {
            *slot = " ".repeat(slot.chars().count());
        }
    }
}

/// Closest fraction to `x` in [0, 1) with denominator at most `max_denom`
fn approximate(x: f64, max_denom: u64) -> (u64, u64) {
    if x <= 0.0 || max_denom == 0 {
        return (0, 1);
    }
    let (mut lo_n, mut lo_d, mut hi_n, mut hi_d) = (0u64, 1u64, 1u64, 1u64);
    loop {
        let (mid_n, mid_d) = (lo_n + hi_n, lo_d + hi_d);
        if mid_d > max_denom {
            break;
        }
        let mid = mid_n as f64 / mid_d as f64;
        if (mid - x).abs() < 1e-12 {
            return (mid_n, mid_d);
        }
        if mid < x {
            (lo_n, lo_d) = (mid_n, mid_d);
        } else {
            (hi_n, hi_d) = (mid_n, mid_d);
        }
    }
    let lo_err = (lo_n as f64 / lo_d as f64 - x).abs();
    let hi_err = (hi_n as f64 / hi_d as f64 - x).abs();
    if lo_err <= hi_err {
        (lo_n, lo_d)
    } else {
        (hi_n, hi_d)
    }
}

fn push_digit(s: &mut String, digits: &[u8], j: usize, grouping: bool) {
    s.push(digits[j] as char);
    let remaining = digits.len() - 1 - j;
    if grouping && remaining > 0 && remaining % 3 == 0 {
        s.push(',');
    }
}

/// Right-align `digits` into placeholder slots. Overflow goes to the first
/// slot, `0` slots pad with zeros, `?` slots with spaces.
fn fill_right(out: &mut [String], tokens: &[Token], slots: &[usize], digits: &str, grouping: bool) {
    let n = slots.len();
    if n == 0 {
        return;
    }
    let first_zero = slots.iter().position(|&i| tokens[i] == Token::Digit('0'));
    let min_len = first_zero.map_or(0, |p| n - p);
    let padded = format!("{digits:0>min_len$}");
    let bytes = padded.as_bytes();
    let len = bytes.len();

    for (k, &slot) in slots.iter().enumerate() {
        let mut s = String::new();
        if len >= n {
            let start = if k == 0 { 0 } else { k + len - n };
            for j in start..=k + len - n {
                push_digit(&mut s, bytes, j, grouping);
            }
        } else if k >= n - len {
            push_digit(&mut s, bytes, k - (n - len), grouping);
        } else if tokens[slot] == Token::Digit('?') {
            s.push(' ');
        }
        out[slot] = s;
    }
}

/// Left-align `digits` into placeholder slots; overflow goes to the last slot
fn fill_left(out: &mut [String], tokens: &[Token], slots: &[usize], digits: &str) {
    let n = slots.len();
    for (k, &slot) in slots.iter().enumerate() {
        out[slot] = if k < digits.len() {
            if k == n - 1 {
                digits[k..].to_string()
            } else {
                digits[k..k + 1].to_string()
            }
        } else {
            match tokens[slot] {
                Token::Digit('0') => "0".to_string(),
                Token::Digit('?') => " ".to_string(),
                _ => String::new(),
            }
        };
    }
}

fn render_date(tokens: &[Token], value: f64, calendar: Calendar) -> String {
    let precision = tokens
        .iter()
        .filter_map(|t| match t {
            Token::SubSecond(n) => Some(*n as u32),
            _ => None,
        })
        .max()
        .unwrap_or(0)
        .min(3);
    let Some(parts) = calendar.serial_to_parts(value, precision) else {
        return "#".repeat(11);
    };
    let twelve_hour = tokens.iter().any(|t| matches!(t, Token::AmPm { .. }));

    tokens
        .iter()
        .map(|t| match t {
            Token::Year(n) if *n <= 2 => format!("{:02}", parts.year.rem_euclid(100)),
            Token::Year(_) => format!("{:04}", parts.year),
            Token::Month(1) => parts.month.to_string(),
            Token::Month(2) => format!("{:02}", parts.month),
            Token::Month(n) => {
                let name = MONTH_NAMES[(parts.month as usize + 11) % 12];
                match *n {
                    3 => name[..3].to_string(),
                    4 => name.to_string(),
                    _ => name[..1].to_string(),
                }
            }
            Token::Day(1) => parts.day.to_string(),
            Token::Day(2) => format!("{:02}", parts.day),
            Token::Day(3) => DAY_NAMES[parts.weekday as usize % 7][..3].to_string(),
            Token::Day(_) => DAY_NAMES[parts.weekday as usize % 7].to_string(),
            Token::Hour(n) => {
                let hour = if twelve_hour {
                    (parts.hour + 11) % 12 + 1
                } else {
                    parts.hour
                };
                pad(hour as i64, *n)
            }
            Token::Minute(n) => pad(parts.minute as i64, *n),
            Token::Second(n) => pad(parts.second as i64, *n),
            Token::SubSecond(n) => {
                let digits = format!("{:0width$}", parts.fraction, width = precision as usize);
                format!(".{}", &digits[..(*n).min(digits.len())])
            }
            Token::AmPm { am, pm } => {
                if parts.hour < 12 {
                    am.clone()
                } else {
                    pm.clone()
                }
            }
            Token::Elapsed(unit, width) => {
                let total = match unit {
                    ElapsedUnit::Hours => parts.total_seconds / 3600,
                    ElapsedUnit::Minutes => parts.total_seconds / 60,
                    ElapsedUnit::Seconds => parts.total_seconds,
                };
                pad(total, *width)
            }
            Token::Digit(c) => c.to_string(),
            Token::Comma => ",".to_string(),
            other => other.fixed_text(),
        })
        .collect()
}

fn pad(value: i64, width: usize) -> String {
    if width >= 2 {
        format!("{value:0width$}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fmt(value: f64, code: &str) -> String {
        format_number(value, code, Calendar::Windows1900)
    }

    #[test]
    fn test_general() {
        assert_eq!(format_general(42.0), "42");
        assert_eq!(format_general(3.14159), "3.14159");
        assert_eq!(format_general(1.0 / 3.0), "0.333333333");
        assert_eq!(format_general(-0.5), "-0.5");
        assert_eq!(format_general(123456789012.0), "1.23457E+11");
        assert_eq!(format_general(1e-10), "1E-10");
        assert_eq!(format_general(1e-7), "1E-07");
        assert_eq!(format_general(-0.0000123), "-1.23E-05");
        assert_eq!(format_general(0.00001), "0.00001");
        assert_eq!(format_general(0.0001234), "0.0001234");
        assert_eq!(fmt(-7.0, "General"), "-7");
    }

    #[test]
    fn test_decimals_and_thousands() {
        assert_eq!(fmt(1234.5, "0.00"), "1234.50");
        assert_eq!(fmt(1234567.891, "#,##0.00"), "1,234,567.89");
        assert_eq!(fmt(0.0, "#,##0"), "0");
        assert_eq!(fmt(0.5, "#.##"), ".5");
        assert_eq!(fmt(5.0, "000"), "005");
        assert_eq!(fmt(1.5, "0.0?"), "1.5 ");
        assert_eq!(fmt(12.5, ".00"), "12.50");
    }

    #[test]
    fn test_scaling_and_percent() {
        assert_eq!(fmt(0.1234, "0%"), "12%");
        assert_eq!(fmt(0.1234, "0.00%"), "12.34%");
        assert_eq!(fmt(1_500_000.0, "0.0,,\"M\""), "1.5M");
        assert_eq!(fmt(12_000.0, "#,##0,"), "12");
    }

    #[test]
    fn test_sections() {
        assert_eq!(fmt(-1234.0, "#,##0;(#,##0)"), "(1,234)");
        assert_eq!(fmt(1234.0, "#,##0;(#,##0)"), "1,234");
        assert_eq!(fmt(0.0, "0;-0;\"zero\""), "zero");
        assert_eq!(fmt(-3.0, "0.0"), "-3.0");
        assert_eq!(fmt(150.0, "[>100]\"big\";0"), "big");
        assert_eq!(fmt(50.0, "[>100]\"big\";0"), "50");
        assert_eq!(fmt(-5.0, "[Red]0;[Blue]0"), "5");
    }

    #[test]
    fn test_literals() {
        assert_eq!(fmt(3.0, "0\" units\""), "3 units");
        assert_eq!(fmt(3.0, "\\$0"), "$3");
        assert_eq!(fmt(3.0, "0_)"), "3 ");
        assert_eq!(fmt(3.0, "[$€-407]0"), "€3");
        assert_eq!(fmt(1234.5, "_(\"$\"* #,##0.00_)"), " $1,234.50 ");
    }

    #[test]
    fn test_scientific() {
        assert_eq!(fmt(1234567.0, "0.00E+00"), "1.23E+06");
        assert_eq!(fmt(0.000123, "0.00E+00"), "1.23E-04");
        assert_eq!(fmt(-1234567.0, "0.00E+00"), "-1.23E+06");
        assert_eq!(fmt(0.0, "0.00E+00"), "0.00E+00");
        assert_eq!(fmt(9.999, "0.00E+00"), "1.00E+01");
        assert_eq!(fmt(12345.0, "##0.0E+0"), "12.3E+3");
        assert_eq!(fmt(1234.0, "0.0E-0"), "1.2E3");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(fmt(1.5, "# ?/?"), "1 1/2");
        assert_eq!(fmt(0.75, "?/?"), "3/4");
        assert_eq!(fmt(1.75, "?/?"), "7/4");
        assert_eq!(fmt(0.333, "# ??/??"), "  1/3 ");
        assert_eq!(fmt(1.3, "# ?/8"), "1 2/8");
        assert_eq!(fmt(2.0, "# ?/?"), "2    ");
        assert_eq!(fmt(0.0, "# ?/?"), "0    ");

        let long = format!("# ?/{}", "?".repeat(24));
        assert_eq!(fmt(0.5, &long).trim(), "1/2");
        assert_eq!(fmt(12345.5, "?/???"), "24691/2  ");
        assert!(fmt(1e300, "?/???").contains('/'));
    }

    #[test]
    fn test_dates() {
        // 2016-06-30 13:45:30
        let serial = 42551.0 + (13.0 * 3600.0 + 45.0 * 60.0 + 30.0) / 86400.0;
        assert_eq!(fmt(serial, "yyyy-mm-dd"), "2016-06-30");
        assert_eq!(fmt(serial, "yyyy-mm-dd h:mm:ss"), "2016-06-30 13:45:30");
        assert_eq!(fmt(serial, "m/d/yy"), "6/30/16");
        assert_eq!(fmt(serial, "d-mmm-yy"), "30-Jun-16");
        assert_eq!(fmt(serial, "dddd, mmmm d"), "Thursday, June 30");
        assert_eq!(fmt(serial, "mmmmm"), "J");
        assert_eq!(fmt(serial, "h:mm AM/PM"), "1:45 PM");
        assert_eq!(fmt(serial, "h:mm a/p"), "1:45 p");
        assert_eq!(fmt(serial, "mm:ss"), "45:30");
        assert_eq!(fmt(60.0, "yyyy-mm-dd"), "1900-02-29");
        assert_eq!(fmt(-1.0, "yyyy-mm-dd"), "###########");
    }

    #[test]
    fn test_times_and_elapsed() {
        let t = (25.0 * 3600.0 + 0.6) / 86400.0;
        assert_eq!(fmt(t, "[hh]:mm:ss"), "25:00:01");
        assert_eq!(fmt(t, "[h]:mm:ss.0"), "25:00:00.6");
        assert_eq!(fmt(t, "[mm]:ss"), "1500:01");
        assert_eq!(fmt(t, "h:mm:ss"), "1:00:01");
        assert_eq!(fmt(0.75 / 86400.0, "mm:ss.00"), "00:00.75");
    }

    #[test]
    fn test_mac_calendar() {
        assert_eq!(format_number(0.0, "yyyy-mm-dd", Calendar::Mac1904), "1904-01-01");
    }

    #[test]
    fn test_text() {
        assert_eq!(format_text("abc", "General"), "abc");
        assert_eq!(format_text("abc", "@"), "abc");
        assert_eq!(format_text("abc", "\"<\"@\">\""), "<abc>");
        assert_eq!(format_text("abc", "0;0;0;\"t:\"@"), "t:abc");
        assert_eq!(format_text("abc", "0;0;0;\"fixed\""), "fixed");
        assert_eq!(fmt(5.0, "@"), "5");
    }

    #[test]
    fn test_is_date() {
        assert!(FormatCode::parse("yyyy-mm-dd").is_date());
        assert!(FormatCode::parse("[h]:mm").is_date());
        assert!(!FormatCode::parse("0.00").is_date());
        assert!(!FormatCode::parse("General").is_date());
    }
}
