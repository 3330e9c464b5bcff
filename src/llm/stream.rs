use anyhow::Result;
use std::io::{BufRead, Write};

/// Read a streaming response line-by-line, echoing chunks to `echo` as they arrive.
pub fn read_stream_to_string<R, W, F>(reader: R, echo: &mut W, mut parse_line: F) -> Result<String>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<Option<String>>,
{
    let mut out = String::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(chunk) = parse_line(line)? {
            out.push_str(&chunk);
            write!(echo, "{}", chunk)?;
            echo.flush()?;
        }
    }

    if !out.is_empty() {
        writeln!(echo)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn concatenates_chunks_and_skips_blank_lines() {
        let input = Cursor::new("a\n\nb\nstop\n");
        let mut echoed = Vec::new();

        let out = read_stream_to_string(input, &mut echoed, |line| {
            Ok(match line {
                "stop" => None,
                other => Some(other.to_uppercase()),
            })
        })
        .unwrap();

        assert_eq!(out, "AB");
        assert_eq!(String::from_utf8(echoed).unwrap(), "AB\n");
    }
}
