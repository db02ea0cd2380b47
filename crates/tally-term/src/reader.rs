// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader — collects raw bytes from the terminal.
//
// A dedicated thread reads stdin in blocking mode and sends byte chunks
// through a standard channel. The main thread receives the chunks and
// feeds them to the input parser.
//
// Why a thread? `read()` on stdin blocks, and the event loop must stay
// responsive for rendering, resize handling, and the escape-sequence
// timeout. With a background reader the main loop can block on
// `recv_timeout()` instead.
//
// Shutdown: the thread uses `poll()` with a short timeout on stdin's
// file descriptor and checks an `AtomicBool` stop flag between polls, so
// it never gets stuck in a blocking `read()`.

#[cfg(unix)]
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Byte chunk read from stdin.
///
/// A keypress is 1–6 bytes; 256 leaves slack for a burst of key repeat.
const READ_BUF_SIZE: usize = 256;

/// How often the reader thread checks the stop flag (milliseconds).
const POLL_INTERVAL_MS: i32 = 50;

/// Background stdin reader thread.
///
/// Spawns a thread that reads raw bytes from stdin and sends them
/// through a channel. The thread runs until [`stop`](Self::stop) is
/// called (or the reader is dropped).
pub struct InputReader {
    /// The reader thread handle. `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    /// Shared flag signalling the thread to exit.
    stop: Arc<AtomicBool>,
}

impl InputReader {
    /// Spawn the background reader thread.
    ///
    /// Returns the reader handle and a channel receiver for byte chunks.
    /// Each received `Vec<u8>` is a non-empty chunk of raw stdin data.
    /// The channel closes when the reader is stopped or stdin hits EOF.
    ///
    /// # Panics
    ///
    /// Panics if the OS cannot spawn a new thread.
    #[must_use]
    pub fn spawn() -> (Self, Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                Self::reader_loop(&tx, &stop_flag);
            })
            .expect("failed to spawn stdin reader thread");

        (
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        )
    }

    /// Signal the reader thread to stop and wait for it to exit.
    ///
    /// Idempotent: calling `stop()` after the thread has already exited
    /// is a no-op.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// The reader thread's main loop.
    ///
    /// Polls stdin with a short timeout, reads available bytes, and sends
    /// them through the channel. Exits when the stop flag is set, stdin
    /// reaches EOF, or the channel is disconnected.
    #[cfg(unix)]
    fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            // Poll stdin for readability with a timeout.
            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&raw mut pfd, 1, POLL_INTERVAL_MS)
            };

            // Timeout or error: loop back to check the stop flag.
            if ready <= 0 {
                continue;
            }

            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };

            if n <= 0 {
                // EOF or error — exit the thread.
                break;
            }

            #[allow(clippy::cast_sign_loss)] // n > 0 guaranteed above.
            let chunk = buf[..n as usize].to_vec();

            if tx.send(chunk).is_err() {
                // Receiver dropped — nobody's listening.
                break;
            }
        }
    }

    /// Non-unix fallback using blocking reads with no poll.
    ///
    /// Less graceful shutdown (the thread can block in read), but
    /// functional.
    #[cfg(not(unix))]
    fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::io::Read;

        let stdin = std::io::stdin();
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            match stdin.lock().read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
