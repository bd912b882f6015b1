//! Logger setup.
//!
//! User-facing output goes through the `log` macros: plain messages at
//! `Info`, warnings and errors only with `--quiet`, timestamped debug output
//! with `--verbose`. `RUST_LOG` still overrides per module. With `--logfile`
//! every line is also appended to a file with ANSI colour codes removed.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

/// Level implied by the global flags.
pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(level_for(quiet, verbose));
    builder.parse_default_env();
    builder.write_style(WriteStyle::Never);

    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    let tee = match logfile {
        Some(path) => Some(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?,
        ),
        None => None,
    };
    builder.target(Target::Pipe(Box::new(TeeWriter::new(io::stdout(), tee))));

    builder
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

/// Writes everything to `out`, and an ANSI-stripped copy to `file`.
pub(crate) struct TeeWriter<W> {
    out: W,
    file: Option<File>,
}

impl<W: Write> TeeWriter<W> {
    pub(crate) fn new(out: W, file: Option<File>) -> Self {
        Self { out, file }
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_quiet() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(true, false), LevelFilter::Warn);
        assert_eq!(level_for(true, true), LevelFilter::Debug);
    }

    #[test]
    fn tee_strips_colour_from_file_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.log");
        let file = File::create(&path).unwrap();
        let mut tee = TeeWriter::new(Vec::new(), Some(file));

        tee.write_all(b"\x1b[32mok\x1b[0m done\n").unwrap();
        tee.flush().unwrap();

        assert_eq!(tee.out, b"\x1b[32mok\x1b[0m done\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "ok done\n");
    }
}
