mod arena;
pub mod circular_list;
mod error;
pub mod linked_list;

pub use circular_list::CircularList;
pub use error::{DequeError, DequeResult};
pub use linked_list::LinkedList;

/// the line written in place of any values when a deque holds nothing
pub const EMPTY_MESSAGE: &str = "Deque is empty";

/// write `values` front to back, one per line, or `EMPTY_MESSAGE` if there
/// are none
fn write_front_to_back<'a, T, W, I>(out: &mut W, values: I) -> core::fmt::Result
where
    T: core::fmt::Display + 'a,
    W: core::fmt::Write,
    I: Iterator<Item = &'a T>,
{
    let mut values = values.peekable();
    if values.peek().is_none() {
        return writeln!(out, "{EMPTY_MESSAGE}");
    }
    for value in values {
        writeln!(out, "{value}")?;
    }
    Ok(())
}
