use crate::ast::Comment;
use crate::position::Position;
use crate::token::{Lexeme, Token};

/// Read cursor over the significant lexemes of one source.
///
/// Comment lexemes are split off at construction, so every lookahead and
/// consumption below sees code tokens only. The sequence always ends with
/// `Eof`, and the cursor never moves past it.
#[derive(Debug)]
pub(crate) struct Cursor {
    tokens: Vec<Lexeme>,
    index: usize,
}

impl Cursor {
    pub(crate) fn new(lexemes: Vec<Lexeme>) -> (Self, Vec<Comment>) {
        let mut comments = Vec::new();
        let mut tokens = Vec::with_capacity(lexemes.len());
        for lexeme in lexemes {
            if lexeme.token.is_comment() {
                comments.push(Comment {
                    pos: lexeme.pos,
                    token: lexeme.token,
                    text: lexeme.literal.unwrap_or_default(),
                });
            } else {
                tokens.push(lexeme);
            }
        }
        if tokens.last().map(|l| l.token) != Some(Token::Eof) {
            let pos = tokens.last().map(|l| l.pos.clone()).unwrap_or_default();
            tokens.push(Lexeme::new(Token::Eof, pos));
        }
        (Self { tokens, index: 0 }, comments)
    }

    pub(crate) fn empty() -> Self {
        Self::new(Vec::new()).0
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn peek(&self) -> &Lexeme {
        self.peek_ahead(0)
    }

    /// The `k`-th significant lexeme from the cursor; `Eof` past the end.
    #[inline]
    pub(crate) fn peek_ahead(&self, k: usize) -> &Lexeme {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.index + k).min(last)]
    }

    #[inline]
    pub(crate) fn pos(&self) -> Position {
        self.peek().pos.clone()
    }

    #[inline]
    pub(crate) fn at(&self, token: Token) -> bool {
        self.peek().token == token
    }

    #[inline]
    pub(crate) fn at_any(&self, tokens: &[Token]) -> bool {
        tokens.contains(&self.peek().token)
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.at(Token::Eof)
    }

    pub(crate) fn advance(&mut self) -> Lexeme {
        let lexeme = self.peek().clone();
        if lexeme.token != Token::Eof {
            self.index += 1;
        }
        lexeme
    }

    /// Scans forward until `till` (or `Eof`) and reports whether `needles`
    /// occur in that order before it. The cursor does not move.
    ///
    /// `till` only counts outside brackets, so `m[Key{1}]` does not end a scan
    /// for `{`. Needles inside braces are ignored, which keeps the statements
    /// of a function literal out of the match.
    pub(crate) fn check_ahead_till(&self, till: Token, needles: &[Token]) -> bool {
        let mut needles = needles.iter().peekable();
        let mut depth = 0usize;
        let mut braces = 0usize;
        for lexeme in &self.tokens[self.index..] {
            let Some(&&needle) = needles.peek() else {
                return true;
            };
            let t = lexeme.token;
            if t == Token::Eof || (t == till && depth == 0) {
                return false;
            }
            if t == needle && braces == 0 {
                needles.next();
            }
            match t {
                Token::LParen | Token::LBrack => depth += 1,
                Token::LBrace => {
                    depth += 1;
                    braces += 1;
                }
                Token::RParen | Token::RBrack => depth = depth.saturating_sub(1),
                Token::RBrace => {
                    depth = depth.saturating_sub(1);
                    braces = braces.saturating_sub(1);
                }
                _ => {}
            }
        }
        needles.peek().is_none()
    }

    /// Finds the `after` that closes the bracket at or ahead of the cursor and
    /// tests whether the token following it is one of `needles`.
    pub(crate) fn check_ahead_after(&self, after: Token, needles: &[Token]) -> bool {
        let open = match after {
            Token::RBrack => Some(Token::LBrack),
            Token::RParen => Some(Token::LParen),
            Token::RBrace => Some(Token::LBrace),
            _ => None,
        };
        let mut depth = 0usize;
        for (i, lexeme) in self.tokens.iter().enumerate().skip(self.index) {
            match lexeme.token {
                Token::Eof => return false,
                t if Some(t) == open => depth += 1,
                t if t == after => {
                    if depth <= 1 {
                        let next = self.tokens.get(i + 1).map_or(Token::Eof, |l| l.token);
                        return needles.contains(&next);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        false
    }
}
