use std::io::Write;
use std::sync::Mutex;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TIP_DURATION: Duration = Duration::from_secs(3);
const MESSAGE_READ_TIME: Duration = Duration::from_secs(2);
const MIN_TIP_VISIBILITY: Duration = Duration::from_millis(750);
const TIPS: &[&str] = &[
    "Set RUST_LOG=debug to see the redacted command line",
    "Use 'nxpipe build' to preview a command without running it",
    "Captured output can be re-parsed later with 'nxpipe parse'",
];

/// The spinner currently drawn, if any. Log lines are routed through it so
/// they do not tear the animation.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

pub struct SpinnerHandle {
    spinner: ProgressBar,
    tx: Sender<String>,
}

impl SpinnerHandle {
    pub fn send_to_queue(&self, message: String) {
        let _ = self.tx.send(message);
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
        if let Ok(mut active) = ACTIVE.lock() {
            *active = None;
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.finish_and_clear();
        }
    }
}

pub fn start(message: String) -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    if let Ok(mut active) = ACTIVE.lock() {
        *active = Some(pb.clone());
    }

    let (tx, rx) = mpsc::channel::<String>();
    let pb_clone = pb.clone();

    thread::spawn(move || {
        let mut tip_index = 0;
        let mut next_action_time = Instant::now() + MESSAGE_READ_TIME;
        let mut is_showing_tip = false;
        let mut last_tip_time = Instant::now();

        loop {
            if pb_clone.is_finished() {
                break;
            }

            let wait_time = next_action_time.saturating_duration_since(Instant::now());

            match rx.recv_timeout(wait_time) {
                Ok(mut msg) => {
                    if is_showing_tip {
                        let elapsed = last_tip_time.elapsed();
                        if elapsed < MIN_TIP_VISIBILITY {
                            thread::sleep(MIN_TIP_VISIBILITY - elapsed);
                        }
                        is_showing_tip = false;
                    }
                    while let Ok(newer_msg) = rx.try_recv() {
                        msg = newer_msg;
                    }
                    pb_clone.set_message(msg);
                    next_action_time = Instant::now() + MESSAGE_READ_TIME;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let tip = TIPS[tip_index % TIPS.len()];
                    pb_clone.set_message(format!("{}", tip.italic().white()));

                    tip_index += 1;
                    is_showing_tip = true;
                    last_tip_time = Instant::now();

                    next_action_time = Instant::now() + TIP_DURATION;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    break;
                }
            }
        }
    });

    SpinnerHandle { spinner: pb, tx }
}

/// Log sink: above the active spinner, or straight to stderr.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();

        let active = ACTIVE.lock().ok().and_then(|guard| guard.clone());
        match active {
            Some(pb) => pb.println(msg),
            None => writeln!(std::io::stderr(), "{msg}")?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}
