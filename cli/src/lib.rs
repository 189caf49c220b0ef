//! Interactive query loop for the `gerp` binary.
//!
//! Kept in the library so the loop can be driven by tests over in-memory
//! readers and scratch output files.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

use anyhow::Result;
use gerp_core::{Index, QueryMode};

/// Whitespace-delimited token reader over any buffered input.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Tokens {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn next(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

/// Drive the query loop until `@q`/`@quit` or end of input; returns the
/// process exit code.
///
/// Commands: `@i <word>` / `@insensitive <word>` runs an insensitive query,
/// `@f <file>` redirects results to a fresh output file, any other token is
/// a sensitive query. End of input mid-command is fatal.
pub fn run(index: &Index, input: impl BufRead, out: impl Write + 'static) -> Result<i32> {
    let mut out: Box<dyn Write> = Box::new(out);
    let mut tokens = Tokens::new(input);

    loop {
        print!("Query? ");
        io::stdout().flush()?;
        let token = match tokens.next()? {
            Some(token) => token,
            None => break,
        };

        match token.as_str() {
            "@q" | "@quit" => break,
            "@f" => {
                let name = match tokens.next()? {
                    Some(name) => name,
                    None => {
                        println!("Unexpected EOF");
                        return Ok(1);
                    }
                };
                out.flush()?;
                match File::create(&name) {
                    Ok(file) => out = Box::new(BufWriter::new(file)),
                    Err(_) => {
                        println!("Could not open {name}");
                        return Ok(1);
                    }
                }
            }
            "@i" | "@insensitive" => {
                let word = match tokens.next()? {
                    Some(word) => word,
                    None => {
                        println!("Unexpected EOF");
                        return Ok(1);
                    }
                };
                index.query(&word, &mut out, QueryMode::Insensitive)?;
            }
            _ => index.query(&token, &mut out, QueryMode::Sensitive)?,
        }
    }

    println!("Goodbye! Thank you and have a nice day.");
    Ok(0)
}
