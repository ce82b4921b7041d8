use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{Port, PortCloser};

/// A serial character device (or any readable/writable path) on Unix.
///
/// Opening does not touch line settings. Configure baud rate and raw mode
/// beforehand, e.g. with `stty`.
///
/// Reads wait in `poll(2)` on the device and on an internal wake pipe, so a
/// [`PortCloser`] from [`Port::closer`] can end a read that is blocked on a
/// silent line.
pub struct TtyPort {
    file: File,
    path: PathBuf,
    wake: Arc<Wake>,
}

/// Self-pipe used to interrupt `poll`.
struct Wake {
    closed: AtomicBool,
    rx: OwnedFd,
    tx: OwnedFd,
}

impl Wake {
    fn new() -> io::Result<Self> {
        let mut fds = [0 as libc::c_int; 2];
        // SAFETY: `fds` has room for the two descriptors `pipe` writes.
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: `pipe` succeeded, so both descriptors are open and owned by
        // nothing else.
        let (rx, tx) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

        set_fd_flag(&rx, libc::F_GETFD, libc::F_SETFD, libc::FD_CLOEXEC)?;
        set_fd_flag(&tx, libc::F_GETFD, libc::F_SETFD, libc::FD_CLOEXEC)?;
        // A close must never block on a full pipe.
        set_fd_flag(&tx, libc::F_GETFL, libc::F_SETFL, libc::O_NONBLOCK)?;

        Ok(Self {
            closed: AtomicBool::new(false),
            rx,
            tx,
        })
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let byte = 1u8;
        // SAFETY: writes one byte from a live stack slot to a descriptor owned
        // by `self`. A full pipe (EAGAIN) already guarantees a pending wake-up.
        let _ = unsafe { libc::write(self.tx.as_raw_fd(), (&byte as *const u8).cast(), 1) };
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check(&self) -> io::Result<()> {
        if self.is_closed() {
            return Err(io::Error::new(ErrorKind::NotConnected, "port closed"));
        }
        Ok(())
    }
}

fn set_fd_flag(
    fd: &OwnedFd,
    get: libc::c_int,
    set: libc::c_int,
    flag: libc::c_int,
) -> io::Result<()> {
    // SAFETY: `fcntl` get/set of descriptor or status flags on an open
    // descriptor owned by the caller.
    unsafe {
        let current = libc::fcntl(fd.as_raw_fd(), get);
        if current < 0 || libc::fcntl(fd.as_raw_fd(), set, current | flag) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

impl TtyPort {
    /// Open `path` for reading and writing without making it the
    /// controlling terminal.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)
            .map_err(TransportError::Io)?;
        let wake = Arc::new(Wake::new().map_err(TransportError::Io)?);

        info!(?path, "opened port");
        Ok(Self { file, path, wake })
    }

    /// The path this port was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the descriptor refers to a terminal device.
    pub fn is_terminal(&self) -> bool {
        // SAFETY: `isatty` only inspects the descriptor, which `self.file` owns.
        unsafe { libc::isatty(self.file.as_raw_fd()) == 1 }
    }
}

impl Read for TtyPort {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            self.wake.check()?;

            let mut fds = [
                libc::pollfd {
                    fd: self.file.as_raw_fd(),
                    events: libc::POLLIN,
                    revents: 0,
                },
                libc::pollfd {
                    fd: self.wake.rx.as_raw_fd(),
                    events: libc::POLLIN,
                    revents: 0,
                },
            ];
            // SAFETY: `fds` is a live array of initialized `pollfd`s whose
            // descriptors stay open for the duration of the call.
            let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
            if rc < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }

            if fds[1].revents != 0 {
                // Only `Wake::close` writes to the pipe.
                self.wake.check()?;
            }
            if fds[0].revents != 0 {
                return self.file.read(buf);
            }
        }
    }
}

impl Write for TtyPort {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.wake.check()?;
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Port for TtyPort {
    fn discard_input(&mut self) -> std::io::Result<()> {
        // SAFETY: `tcflush` takes an open descriptor owned by `self.file` and
        // an in-range queue selector; it does not retain either.
        let rc = unsafe { libc::tcflush(self.file.as_raw_fd(), libc::TCIFLUSH) };
        if rc == 0 {
            return Ok(());
        }

        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ENOTTY) {
            // Plain files and FIFOs have no driver input queue.
            debug!(path = ?self.path, "port is not a terminal; nothing to flush");
            return Ok(());
        }
        Err(err)
    }

    fn closer(&self) -> Option<PortCloser> {
        let wake = Arc::clone(&self.wake);
        Some(PortCloser::new(move || wake.close()))
    }
}

impl std::fmt::Debug for TtyPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyPort")
            .field("path", &self.path)
            .field("closed", &self.wake.is_closed())
            .finish()
    }
}
