//! Terminal progress for catalogue loads and mirror runs.
//!
//! A mirror run shows one spinner line per busy worker, keyed by zone id,
//! under a header bar counting finished zones.

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("/-\\|")
}

fn header_style() -> ProgressStyle {
    ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} zones {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// A single spinner for one-off waits such as loading the catalogue.
pub(crate) fn single(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(TICK);
    pb
}

/// Worker spinner lines plus a header progress bar.
pub(crate) struct SpinnerPool {
    mp: MultiProgress,
    /// Hidden until `set_total`
    header: ProgressBar,
    lines: Vec<ProgressBar>,
    /// Zone id occupying each line
    owners: Vec<Option<i64>>,
}

impl SpinnerPool {
    /// `workers` spinner lines; everything is drawn hidden when `quiet`.
    pub(crate) fn new(workers: usize, quiet: bool) -> Self {
        let mp = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        let style = spinner_style();
        let lines = (0..workers)
            .map(|_| {
                let pb = mp.add(ProgressBar::new_spinner());
                pb.set_style(style.clone());
                pb
            })
            .collect();

        Self {
            mp,
            header: ProgressBar::hidden(),
            lines,
            owners: vec![None; workers],
        }
    }

    /// Show the header once the number of entries is known.
    pub(crate) fn set_total(&mut self, total: usize) {
        let header = self.mp.insert(0, ProgressBar::new(total as u64));
        header.set_style(header_style());
        self.header = header;
    }

    /// Put `msg` on the first free line for `key`. Ignored when every line is busy.
    pub(crate) fn claim(&mut self, key: i64, msg: String) {
        let Some(slot) = self.owners.iter().position(Option::is_none) else {
            return;
        };
        let pb = &self.lines[slot];
        pb.reset();
        pb.set_message(msg);
        pb.enable_steady_tick(TICK);
        self.owners[slot] = Some(key);
    }

    /// Free the line held by `key`.
    pub(crate) fn release(&mut self, key: i64) {
        if let Some(slot) = self.owners.iter().position(|o| *o == Some(key)) {
            clear_line(&self.lines[slot]);
            self.owners[slot] = None;
        }
    }

    /// Free the line held by `key` and count one finished zone.
    pub(crate) fn finish(&mut self, key: i64) {
        self.release(key);
        self.header.inc(1);
    }

    pub(crate) fn clear_all(&mut self) {
        for pb in &self.lines {
            clear_line(pb);
        }
        self.header.finish_and_clear();
        self.owners.iter_mut().for_each(|o| *o = None);
    }
}

fn clear_line(pb: &ProgressBar) {
    pb.disable_steady_tick();
    pb.set_message("");
    pb.finish_and_clear();
}
