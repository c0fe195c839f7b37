use toy_lexer::{PushbackReader, Scanner};

fn main() {
    let s = "class Counter {
    int count;
    /* bump by a hex step */
    void bump() { count = count + 0x1F; }
    double ratio() { return 2.5e-3 * count; }
}";
    let mut scanner = match Scanner::new(PushbackReader::new(s.as_bytes())) {
        Ok(scanner) => scanner,
        Err(e) => return eprintln!("{}", e),
    };

    println!("{}", s);
    while let Some(tok) = scanner.next() {
        match tok {
            Ok(tok) => println!("{:>3}  {}", tok.line, tok),
            Err(e) => return eprintln!("{}", e),
        }
    }

    println!("\n{}", scanner.symbols());
}
