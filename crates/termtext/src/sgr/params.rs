//! Parameter lists and the forward-only cursor handed to the interpreter.

/// Owned parameter tokens of one `ESC [ ... m` sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SgrParams {
    tokens: Vec<String>,
}

impl SgrParams {
    /// Split the text between `ESC [` and `m` on `;`.
    ///
    /// An empty string yields an empty list, which [`SgrInterpreter::apply`]
    /// treats as a single `0`.
    ///
    /// [`SgrInterpreter::apply`]: crate::sgr::SgrInterpreter::apply
    pub fn parse(params: &str) -> Self {
        if params.is_empty() {
            return Self::default();
        }
        Self {
            tokens: params.split(';').map(str::to_string).collect(),
        }
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Flatten a `vte` parameter list, sub-parameters included, into tokens.
    ///
    /// The colon form `38:2:<colorspace>:R:G:B` carries a colorspace id that
    /// the semicolon form lacks; it is dropped so both read as `38;2;R;G;B`.
    pub fn from_vte(params: &vte::Params) -> Self {
        let mut tokens = Vec::new();
        for group in params.iter() {
            match group {
                [code @ (38 | 48), 2, _colorspace, r, g, b] => {
                    tokens.extend([*code, 2, *r, *g, *b].map(|value| value.to_string()));
                }
                _ => tokens.extend(group.iter().map(u16::to_string)),
            }
        }
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Cursor positioned before the first token.
    pub fn cursor(&self) -> ParamCursor<'_> {
        ParamCursor::new(&self.tokens)
    }
}

/// Forward-only, peekable view over the remaining parameters of a sequence.
///
/// Extended color codes pull their selector and channel values from the same
/// cursor the outer loop reads codes from, so consumed parameters are never
/// reinterpreted as codes.
#[derive(Clone, Debug)]
pub struct ParamCursor<'a> {
    tokens: &'a [String],
    position: usize,
}

impl<'a> ParamCursor<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).map(String::as_str)
    }

    /// Number of tokens not yet consumed.
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }

    /// Consume the next token as a number.
    ///
    /// Returns `None` when the cursor is exhausted or the token is not a
    /// decimal integer; the token is consumed either way.
    pub fn next_value(&mut self) -> Option<u32> {
        self.next().and_then(parse_value)
    }
}

impl<'a> Iterator for ParamCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token.as_str())
    }
}

/// Parse one parameter token; an empty token reads as `0`.
pub fn parse_value(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() {
        return Some(0);
    }
    token.parse().ok()
}
