use logos::{Lexer, Logos};

fn block_comment(lex: &mut Lexer<Token>) -> bool {
    // An unterminated comment runs to the end of the file.
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(i) => lex.bump(i + 2),
        None => lex.bump(rest.len()),
    }
    true
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub enum Token {
    // Keywords
    #[token("abstract")]
    Abstract,
    #[token("assert")]
    Assert,
    #[token("boolean")]
    Boolean,
    #[token("break")]
    Break,
    #[token("byte")]
    Byte,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("char")]
    Char,
    #[token("class")]
    Class,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("do")]
    Do,
    #[token("double")]
    Double,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("final")]
    Final,
    #[token("finally")]
    Finally,
    #[token("float")]
    Float,
    #[token("for")]
    For,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("implements")]
    Implements,
    #[token("import")]
    Import,
    #[token("instanceof")]
    Instanceof,
    #[token("int")]
    Int,
    #[token("interface")]
    Interface,
    #[token("long")]
    Long,
    #[token("native")]
    Native,
    #[token("new")]
    New,
    #[token("package")]
    Package,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("public")]
    Public,
    #[token("return")]
    Return,
    #[token("short")]
    Short,
    #[token("static")]
    Static,
    #[token("strictfp")]
    Strictfp,
    #[token("super")]
    Super,
    #[token("switch")]
    Switch,
    #[token("synchronized")]
    Synchronized,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("transient")]
    Transient,
    #[token("try")]
    Try,
    #[token("void")]
    Void,
    #[token("volatile")]
    Volatile,
    #[token("while")]
    While,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Literals. Unterminated strings and chars stop at the end of the line.
    #[regex(r"[0-9][0-9_]*[lLfFdD]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    #[regex(r"0[bB][01_]+[lL]?")]
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdD]?")]
    Number,
    #[regex(r#""([^"\\\n]|\\[^\n])*"?"#)]
    StringLit,
    #[regex(r#"'([^'\\\n]|\\[^\n])*'?"#)]
    CharLit,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,

    // Operators. `>>`, `>>>` and their compound forms are lexed as single
    // `>` tokens and recombined by the parser.
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("--")]
    MinusMinus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    Shl,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("@")]
    At,

    // Comments are split off into trivia by `lex`.
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    /// A character the lexer does not recognize.
    Unknown,
    /// End of input, appended by `lex`.
    Eof,
}

impl Token {
    pub fn is_comment(self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }

    pub fn is_keyword(self) -> bool {
        keyword_text(self).is_some()
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Token::Boolean
                | Token::Byte
                | Token::Char
                | Token::Short
                | Token::Int
                | Token::Long
                | Token::Float
                | Token::Double
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Token::Number | Token::StringLit | Token::CharLit | Token::True | Token::False | Token::Null
        )
    }
}

fn keyword_text(tok: Token) -> Option<&'static str> {
    let s = match tok {
        Token::Abstract => "abstract",
        Token::Assert => "assert",
        Token::Boolean => "boolean",
        Token::Break => "break",
        Token::Byte => "byte",
        Token::Case => "case",
        Token::Catch => "catch",
        Token::Char => "char",
        Token::Class => "class",
        Token::Const => "const",
        Token::Continue => "continue",
        Token::Default => "default",
        Token::Do => "do",
        Token::Double => "double",
        Token::Else => "else",
        Token::Enum => "enum",
        Token::Extends => "extends",
        Token::Final => "final",
        Token::Finally => "finally",
        Token::Float => "float",
        Token::For => "for",
        Token::Goto => "goto",
        Token::If => "if",
        Token::Implements => "implements",
        Token::Import => "import",
        Token::Instanceof => "instanceof",
        Token::Int => "int",
        Token::Interface => "interface",
        Token::Long => "long",
        Token::Native => "native",
        Token::New => "new",
        Token::Package => "package",
        Token::Private => "private",
        Token::Protected => "protected",
        Token::Public => "public",
        Token::Return => "return",
        Token::Short => "short",
        Token::Static => "static",
        Token::Strictfp => "strictfp",
        Token::Super => "super",
        Token::Switch => "switch",
        Token::Synchronized => "synchronized",
        Token::This => "this",
        Token::Throw => "throw",
        Token::Throws => "throws",
        Token::Transient => "transient",
        Token::Try => "try",
        Token::Void => "void",
        Token::Volatile => "volatile",
        Token::While => "while",
        Token::True => "true",
        Token::False => "false",
        Token::Null => "null",
        _ => return None,
    };
    Some(s)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(kw) = keyword_text(*self) {
            return f.write_str(kw);
        }
        let s = match self {
            Token::Number => "number",
            Token::StringLit => "string literal",
            Token::CharLit => "character literal",
            Token::Ident => "identifier",
            Token::PlusPlus => "++",
            Token::Plus => "+",
            Token::MinusMinus => "--",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::EqEq => "==",
            Token::BangEq => "!=",
            Token::LtEq => "<=",
            Token::GtEq => ">=",
            Token::Shl => "<<",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::AmpAmp => "&&",
            Token::PipePipe => "||",
            Token::Amp => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::Bang => "!",
            Token::Tilde => "~",
            Token::Question => "?",
            Token::Colon => ":",
            Token::Eq => "=",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::StarEq => "*=",
            Token::SlashEq => "/=",
            Token::PercentEq => "%=",
            Token::AmpEq => "&=",
            Token::PipeEq => "|=",
            Token::CaretEq => "^=",
            Token::ShlEq => "<<=",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Semi => ";",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Ellipsis => "...",
            Token::At => "@",
            Token::LineComment | Token::BlockComment => "comment",
            Token::Unknown => "unknown character",
            Token::Eof => "end of file",
            _ => unreachable!("keywords are handled above"),
        };
        f.write_str(s)
    }
}
