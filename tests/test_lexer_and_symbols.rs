use pretty_assertions::assert_eq;
use proptest::prelude::*;
use toy_lexer::{tokenize, Malformed, PushbackReader, Scanner};
use toy_symtab::SymbolClass;
use toy_token::{Token, TokenKind, TokenStream};

const PROGRAM: &str = "
class Stack extends Base implements Sized {
    int top;
    double[] items;

    // push a value, growing when full
    void push(double value) {
        if (top >= 0x10 && !full) {
            items[top] = value * 1.5e+2;
            top = top + 1;
        }
    }

    boolean empty() { return top == 0 || false; }

    /* entry
       point */
    int main() {
        string s;
        s = readln();
        println(\"read: \", s, 2.0E-1);
        while (top != 0) { top = top - 1 % 2; }
        for (;;) break;
        items = newarray(10, double);
    }
}
";

fn shapes(tokens: &TokenStream) -> Vec<(TokenKind, Option<String>)> {
    tokens.iter().map(|t| (t.kind, t.lexeme.clone())).collect()
}

#[test]
fn test_program_token_counts() {
    let mut scanner = Scanner::new(PushbackReader::new(PROGRAM.as_bytes())).unwrap();
    scanner.run().unwrap();

    let tokens = scanner.tokens();
    assert!(scanner.diagnostics().is_empty());
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);

    let count = |kind| tokens.iter().filter(|t| t.kind == kind).count();
    assert_eq!(count(TokenKind::DoubleConstant), 2);
    assert_eq!(count(TokenKind::IntConstant), 7);
    assert_eq!(count(TokenKind::StringConstant), 1);
    assert_eq!(count(TokenKind::BooleanConstant), 1);
    assert_eq!(count(TokenKind::And), 1);
    assert_eq!(count(TokenKind::Or), 1);
    for kind in [
        TokenKind::Class,
        TokenKind::Extends,
        TokenKind::Implements,
        TokenKind::Boolean,
        TokenKind::String,
        TokenKind::Readln,
        TokenKind::While,
        TokenKind::For,
        TokenKind::Break,
        TokenKind::NewArray,
        TokenKind::Return,
    ] {
        assert_eq!(count(kind), 1, "{} should appear once", kind);
    }
}

#[test]
fn test_program_lines() {
    let (tokens, _) = tokenize(PROGRAM).unwrap();
    let dump = tokens.to_string();
    let lines: Vec<&str> = dump.lines().collect();

    // the dump starts at the line of the first token
    assert_eq!(lines[0], "class id extends id implements id leftbrace");
    assert_eq!(lines[1], "int id semicolon");
    assert_eq!(lines[2], "double leftbracket rightbracket id semicolon");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "void id leftparen double id rightparen leftbrace");
    assert_eq!(
        lines[6],
        "if leftparen id greaterequal intconstant and not id rightparen leftbrace"
    );
    assert_eq!(
        lines[7],
        "id leftbracket id rightbracket assignop id multiplication doubleconstant semicolon"
    );
}

#[test]
fn test_symbols_after_scan() {
    let (tokens, symbols) = tokenize(PROGRAM).unwrap();

    for token in tokens.iter().filter(|t| t.kind == TokenKind::Id) {
        let name = token.lexeme.as_deref().unwrap();
        assert_eq!(symbols.lookup(name), Some(SymbolClass::Identifier), "{}", name);
    }
    for word in toy_token::reserved_words() {
        assert_eq!(symbols.lookup(word), Some(SymbolClass::Keyword), "{}", word);
    }

    let mut identifiers: Vec<String> = symbols
        .words()
        .into_iter()
        .filter(|(_, class)| *class == SymbolClass::Identifier)
        .map(|(word, _)| word)
        .collect();
    identifiers.sort();
    assert_eq!(
        identifiers,
        vec!["Base", "Sized", "Stack", "empty", "full", "items", "main", "push", "s", "top", "value"]
    );
}

#[test]
fn test_round_trip() {
    let (tokens, _) = tokenize(PROGRAM).unwrap();
    let rebuilt = tokens.reconstruct();
    assert!(!rebuilt.contains("//"));
    assert!(!rebuilt.contains("/*"));

    let (again, _) = tokenize(&rebuilt).unwrap();
    assert_eq!(shapes(&again), shapes(&tokens));
}

#[test]
fn test_recovers_from_errors() {
    let src = "x = 0x; y = a & b | c;\nz = \"open";
    let mut scanner = Scanner::new(PushbackReader::new(src.as_bytes())).unwrap();
    scanner.run().unwrap();

    assert_eq!(
        scanner.tokens().kinds(),
        vec![
            TokenKind::Id,
            TokenKind::AssignOp,
            TokenKind::Error,
            TokenKind::Semicolon,
            TokenKind::Id,
            TokenKind::AssignOp,
            TokenKind::Id,
            TokenKind::Error,
            TokenKind::Id,
            TokenKind::Error,
            TokenKind::Id,
            TokenKind::Semicolon,
            TokenKind::Id,
            TokenKind::AssignOp,
            TokenKind::Error,
            TokenKind::Eof,
        ]
    );

    let problems: Vec<(usize, Malformed)> = scanner
        .diagnostics()
        .iter()
        .map(|d| (d.line, d.problem))
        .collect();
    assert_eq!(
        problems,
        vec![
            (1, Malformed::MalformedHex),
            (1, Malformed::LoneAmpersand),
            (1, Malformed::LonePipe),
            (2, Malformed::UnterminatedString),
        ]
    );
    assert_eq!(
        scanner.diagnostics()[3].to_string(),
        "line 2: unterminated string literal: `\\\"open`"
    );
}

fn piece() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z][a-zA-Z0-9_]{0,6}",
        "[0-9]{1,4}",
        "0[xX][0-9a-fA-F]{1,4}",
        "[0-9]{1,3}\\.[0-9]{0,3}([eE][+-]?[0-9]{1,2})?",
        "\"[a-z ,;]{0,6}\"",
        prop::sample::select(vec![
            "+", "-", "*", "/", "%", ";", ",", ".", "(", ")", "[", "]", "{", "}", "<", "<=", ">", ">=",
            "==", "!=", "&&", "||", "!", "=",
        ])
        .prop_map(str::to_owned),
    ]
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![" ", "\n", "\t", " /* note */ ", " // note\n"])
}

proptest! {
    #[test]
    fn prop_reconstruct_is_token_equivalent(parts in prop::collection::vec((piece(), separator()), 0..30)) {
        let src: String = parts.iter().map(|(p, sep)| format!("{}{}", p, sep)).collect();
        let (tokens, _) = tokenize(&src).unwrap();
        prop_assert!(tokens.iter().all(|t: &Token| t.kind != TokenKind::Error));
        prop_assert_eq!(tokens.len(), parts.len() + 1);

        let (again, _) = tokenize(&tokens.reconstruct()).unwrap();
        prop_assert_eq!(shapes(&again), shapes(&tokens));
    }

    #[test]
    fn prop_keywords_never_identifiers(index in 0..toy_token::KEYWORDS.len(), pad in "[ \t\n]{0,3}") {
        let (word, kind) = toy_token::KEYWORDS[index];
        let (tokens, symbols) = tokenize(&format!("{}{}{}", pad, word, pad)).unwrap();
        prop_assert_eq!(tokens.kinds(), vec![kind, TokenKind::Eof]);
        prop_assert_eq!(symbols.lookup(word), Some(SymbolClass::Keyword));
    }
}
