use anyhow::Result;
use crossterm::{queue, style};
use std::{fmt, io::Write};

use crate::clist::CList;

/// Renders as `{v1, v2, ..., vn}`; an empty or uninitialized list renders as
/// `{}`.
impl<T: fmt::Display> fmt::Display for CList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t}")?;
        }
        f.write_str("}")
    }
}

/// Prints `list` followed by a newline and flushes `out`.
pub fn print_list<T: fmt::Display, W: Write>(out: &mut W, list: &CList<T>) -> Result<()> {
    queue!(out, style::Print(list), style::Print('\n'))?;
    out.flush()?;
    Ok(())
}
