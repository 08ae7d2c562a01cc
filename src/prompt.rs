//! Interactive column selection for fields header detection could not place

use crate::fields::Field;
use crate::mapping::ColumnChoice;
use crate::resolve::{normalize, Side};
use std::io::{self, BufRead, Write};

/// Ask the operator to pick a column for `field`.
///
/// Accepts `0`/`none`, a column number from the list, or a column name.
/// Unrecognised answers are asked again; end of input is an error.
pub fn select_column<R, W>(
    input: &mut R,
    output: &mut W,
    side: Side,
    field: Field,
    columns: &[&str],
) -> io::Result<ColumnChoice>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(
            output,
            "Select {} {} column:",
            side.name().to_uppercase(),
            field.label()
        )?;
        writeln!(output, "  0) None")?;
        for (i, name) in columns.iter().enumerate() {
            writeln!(output, "  {}) {}", i + 1, name)?;
        }
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no column chosen for {side} {field}"),
            ));
        }

        match parse_answer(line.trim(), columns) {
            Some(choice) => return Ok(choice),
            None => writeln!(output, "'{}' is not one of the listed columns", line.trim())?,
        }
    }
}

fn parse_answer(answer: &str, columns: &[&str]) -> Option<ColumnChoice> {
    if answer.is_empty() {
        return None;
    }
    if let Ok(n) = answer.parse::<usize>() {
        return match n {
            0 => Some(ColumnChoice::Absent),
            n => columns
                .get(n - 1)
                .map(|name| ColumnChoice::Named(name.to_string())),
        };
    }
    match ColumnChoice::from(answer.to_string()) {
        ColumnChoice::Absent => Some(ColumnChoice::Absent),
        ColumnChoice::Named(name) => {
            let wanted = normalize(&name);
            columns
                .iter()
                .find(|column| normalize(column) == wanted)
                .map(|column| ColumnChoice::Named(column.to_string()))
        }
    }
}
