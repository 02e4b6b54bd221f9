use anyhow::{Context, Result};
use std::io::stdout;

use ringlist::{clist::CList, display::print_list};

fn main() -> Result<()> {
    let mut list = CList::init().context("couldn't create a new list")?;
    list.add_to_end(10)?;
    list.add_to_end(11)?;
    print_list(&mut stdout(), &list)?;
    list.teardown()?;
    Ok(())
}
