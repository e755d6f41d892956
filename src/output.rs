use std::io::{self, Write};

use crate::model::Reply;

/// Writes the reply fragments back to back, then a single `\n` unless the
/// text already ends with one. An empty reply writes nothing.
pub fn write_reply<W: Write>(out: &mut W, reply: &Reply) -> io::Result<()> {
    let mut last = None;
    for fragment in reply.fragments() {
        out.write_all(fragment.as_bytes())?;
        if let Some(byte) = fragment.as_bytes().last() {
            last = Some(*byte);
        }
    }

    if matches!(last, Some(byte) if byte != b'\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}
