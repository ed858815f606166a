//! Log folding markers understood by the runner.

use std::io::{self, Write};

/// An open `::group::` section. Closed by [`LogGroup::end`] or on drop.
pub struct LogGroup<'a, W: Write + ?Sized> {
    out: &'a mut W,
    open: bool,
}

impl<'a, W: Write + ?Sized> LogGroup<'a, W> {
    /// Write the opening marker.
    ///
    /// Markers are flushed immediately so that they land before any output
    /// of child processes sharing the same stdout.
    pub fn start(out: &'a mut W, title: &str) -> io::Result<Self> {
        writeln!(out, "::group::{title}")?;
        out.flush()?;
        Ok(Self { out, open: true })
    }

    pub fn end(mut self) -> io::Result<()> {
        self.close()
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        writeln!(self.out, "::endgroup::")?;
        self.out.flush()
    }
}

impl<W: Write + ?Sized> Drop for LogGroup<'_, W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
