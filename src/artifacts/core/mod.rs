//! Core utilities and shared types
//!
//! This module contains shared utilities used across the application:
//!
//! - `error`: The repository error taxonomy
//! - `PagerWriter`: adapter letting long command output go through a pager

pub mod error;

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// `Write` adapter over a minus pager
///
/// `log` and `global-log` write through it when stdout is an interactive
/// terminal; the binary hands the pager to `minus::page_all` once the command
/// has written everything.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = std::str::from_utf8(buf)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        self.pager.push_str(text).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
