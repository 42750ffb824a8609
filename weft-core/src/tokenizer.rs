/// One piece of a tokenized string: verbatim text or a `{{ expression }}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Placeholder(String),
}

impl Token {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Token::Placeholder(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    BeginCurly,
    Part,
    EndCurly,
}

/// Split `input` into literal and placeholder tokens in document order.
///
/// The delimiters are exactly `{{` and `}}`; a lone brace is literal text.
/// A backslash escapes a following `{`, `}` or `\` and is dropped; any other
/// backslash is kept. Placeholder expressions are trimmed, literals are not.
/// Opening a placeholder always flushes the literal before it, even an empty
/// one. An unterminated `{{` contributes nothing. Never fails: a string with
/// no placeholders comes back as a single literal.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut state = State::Initial;
    let mut literal = String::new();
    let mut expression = String::new();
    let mut chars = input.chars().peekable();

    while let Some(mut ch) = chars.next() {
        let mut escaped = false;
        if ch == '\\' {
            if let Some(next) = chars.next_if(|c| matches!(c, '{' | '}' | '\\')) {
                ch = next;
                escaped = true;
            }
        }
        let delimiter = !escaped && (ch == '{' || ch == '}');

        state = match state {
            State::Initial if delimiter && ch == '{' => State::BeginCurly,
            State::Initial => {
                literal.push(ch);
                State::Initial
            }
            State::BeginCurly if delimiter && ch == '{' => {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
                State::Part
            }
            State::BeginCurly => {
                literal.push('{');
                literal.push(ch);
                State::Initial
            }
            State::Part if delimiter && ch == '}' => State::EndCurly,
            State::Part => {
                expression.push(ch);
                State::Part
            }
            State::EndCurly if delimiter && ch == '}' => {
                tokens.push(Token::Placeholder(expression.trim().to_string()));
                expression.clear();
                State::Initial
            }
            State::EndCurly => {
                expression.push('}');
                expression.push(ch);
                State::Part
            }
        };
    }

    if state == State::BeginCurly {
        literal.push('{');
    }
    if !literal.is_empty() || tokens.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}
