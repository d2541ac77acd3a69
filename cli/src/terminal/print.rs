use std::fmt::Display;
use std::io::{self, Write};

/// Prints one result per line on stdout.
///
/// A closed pipe (`scopr ips -x | head`) ends the output quietly.
pub fn lines<I, T>(lines: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in lines {
        if let Err(e) = writeln!(out, "{line}") {
            return ignore_broken_pipe(e);
        }
    }

    out.flush().or_else(ignore_broken_pipe)
}

fn ignore_broken_pipe(e: io::Error) -> anyhow::Result<()> {
    match e.kind() {
        io::ErrorKind::BrokenPipe => Ok(()),
        _ => Err(e.into()),
    }
}
