//! Line-oriented board for output that is not a terminal

use crate::tui::board::{StatusBoard, StatusLine};
use crate::Result;
use std::io::Write;

/// Writes every board update as its own line
pub struct PlainBoard<W: Write> {
    out: W,
    /// Skip "Running..." lines and only print settled probes
    settled_only: bool,
}

impl<W: Write> PlainBoard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            settled_only: true,
        }
    }

    /// Also print a line when each slot is dispatched
    pub fn with_running_lines(mut self) -> Self {
        self.settled_only = false;
        self
    }
}

impl<W: Write> StatusBoard for PlainBoard<W> {
    fn write_row(&mut self, line: &StatusLine) -> Result<()> {
        if self.settled_only && line.elapsed_ms.is_none() {
            return Ok(());
        }
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self, marker: &str) -> Result<()> {
        writeln!(self.out, "{}", marker)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::proxy::{ProbeOutcome, ProxyRecord};

    #[test]
    fn test_plain_board_output() {
        let proxy =
            ProxyRecord::with_auth("1.2.3.4".to_string(), 80, "u".to_string(), "p".to_string());
        let mut out = Vec::new();
        let mut board = PlainBoard::new(&mut out);

        board.write_row(&StatusLine::running(1, &proxy)).unwrap();
        let outcome = ProbeOutcome::success(1, 200, 42);
        board
            .write_row(&StatusLine::settled(&outcome, &proxy, &Thresholds::default()))
            .unwrap();
        board.reset().unwrap();
        board.finish("Done").unwrap();
        drop(board);

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output, "0001 - 1.2.3.4:80  0.042s  200\n\nDone\n");
    }

    #[test]
    fn test_plain_board_with_running_lines() {
        let proxy = ProxyRecord::new("1.2.3.4".to_string(), 80);
        let mut out = Vec::new();
        let mut board = PlainBoard::new(&mut out).with_running_lines();
        board.write_row(&StatusLine::running(2, &proxy)).unwrap();
        drop(board);
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output, "0002 - 1.2.3.4:80  Running...\n");
    }
}
