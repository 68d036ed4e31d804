use std::fmt;
use std::mem;
use std::ops::{BitOr, BitOrAssign};

use libc::tcflag_t;

/// A snapshot of the terminal attributes of one stream (a `termios` record)
///
/// Values are compared field by field, so a snapshot taken before a mode
/// change can be checked against what was written back afterwards.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    raw: libc::termios,
}

impl Attributes {
    pub fn from_raw(raw: libc::termios) -> Self {
        Self { raw }
    }

    pub fn as_raw(&self) -> &libc::termios {
        &self.raw
    }

    /// The local modes field (`c_lflag`)
    pub fn local_flags(&self) -> ModeFlags {
        ModeFlags(self.raw.c_lflag)
    }

    /// Returns a copy with `on` forced on and `off` forced off in the local
    /// modes. Every other field is copied unchanged.
    pub fn with_local_flags(&self, on: ModeFlags, off: ModeFlags) -> Self {
        let mut raw = self.raw;
        raw.c_lflag |= on.0;
        raw.c_lflag &= !off.0;
        Self { raw }
    }

    /// Returns a copy switched to raw mode: no echo, no line buffering, no
    /// signal keys, no output processing.
    pub fn raw_mode(&self) -> Self {
        let mut raw = self.raw;
        unsafe { libc::cfmakeraw(&mut raw) };
        Self { raw }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        // termios is plain integers and arrays, so all-zero is a valid value
        Self { raw: unsafe { mem::zeroed() } }
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attributes")
            .field("iflag", &format_args!("{:#o}", self.raw.c_iflag))
            .field("oflag", &format_args!("{:#o}", self.raw.c_oflag))
            .field("cflag", &format_args!("{:#o}", self.raw.c_cflag))
            .field("lflag", &format_args!("{:#o}", self.raw.c_lflag))
            .finish()
    }
}

/// A set of local mode flags (`ECHO`, `ICANON`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeFlags(tcflag_t);

impl ModeFlags {
    pub const ECHO: ModeFlags = ModeFlags(libc::ECHO);
    pub const ECHONL: ModeFlags = ModeFlags(libc::ECHONL);
    pub const ICANON: ModeFlags = ModeFlags(libc::ICANON);
    pub const ISIG: ModeFlags = ModeFlags(libc::ISIG);
    pub const IEXTEN: ModeFlags = ModeFlags(libc::IEXTEN);

    pub const fn empty() -> Self {
        ModeFlags(0)
    }

    pub const fn from_bits(bits: tcflag_t) -> Self {
        ModeFlags(bits)
    }

    pub const fn bits(&self) -> tcflag_t {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: ModeFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ModeFlags {
    type Output = ModeFlags;

    fn bitor(self, rhs: ModeFlags) -> ModeFlags {
        ModeFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModeFlags {
    fn bitor_assign(&mut self, rhs: ModeFlags) {
        self.0 |= rhs.0;
    }
}

/// When an attribute change takes effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    /// Immediately (`TCSANOW`)
    Now,
    /// After all pending output has been written (`TCSADRAIN`)
    Drain,
    /// After pending output is written, discarding pending input (`TCSAFLUSH`)
    Flush,
}

impl When {
    pub(crate) fn as_raw(self) -> libc::c_int {
        match self {
            When::Now => libc::TCSANOW,
            When::Drain => libc::TCSADRAIN,
            When::Flush => libc::TCSAFLUSH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Attributes {
        let mut raw = *Attributes::default().as_raw();
        raw.c_iflag = libc::ICRNL | libc::IXON;
        raw.c_oflag = libc::OPOST;
        raw.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG;
        Attributes::from_raw(raw)
    }

    #[test]
    fn test_off_clears_only_local_flags() {
        let attrs = sample();
        let quiet = attrs.with_local_flags(ModeFlags::empty(), ModeFlags::ECHO);

        assert!(!quiet.local_flags().contains(ModeFlags::ECHO));
        assert!(quiet.local_flags().contains(ModeFlags::ICANON | ModeFlags::ISIG));
        assert_eq!(quiet.as_raw().c_iflag, attrs.as_raw().c_iflag);
        assert_eq!(quiet.as_raw().c_oflag, attrs.as_raw().c_oflag);
        assert_ne!(quiet, attrs);
    }

    #[test]
    fn test_on_sets_flags() {
        let attrs = Attributes::default();
        let loud = attrs.with_local_flags(ModeFlags::ECHO | ModeFlags::ECHONL, ModeFlags::empty());
        assert!(loud.local_flags().contains(ModeFlags::ECHO));
        assert!(loud.local_flags().contains(ModeFlags::ECHONL));
    }

    #[test]
    fn test_off_wins_over_on() {
        let attrs = Attributes::default();
        let flags = attrs.with_local_flags(ModeFlags::ECHO, ModeFlags::ECHO);
        assert!(!flags.local_flags().contains(ModeFlags::ECHO));
    }

    #[test]
    fn test_raw_mode_disables_echo_and_canonical() {
        let raw = sample().raw_mode();
        assert!(!raw.local_flags().contains(ModeFlags::ECHO));
        assert!(!raw.local_flags().contains(ModeFlags::ICANON));
        assert!(!raw.local_flags().contains(ModeFlags::ISIG));
    }

    #[test]
    fn test_mode_flags_set_operations() {
        let mut flags = ModeFlags::empty();
        assert!(flags.is_empty());
        flags |= ModeFlags::ECHO;
        assert!(flags.contains(ModeFlags::ECHO));
        assert!(!flags.contains(ModeFlags::ECHO | ModeFlags::ICANON));
        assert_eq!(ModeFlags::from_bits(flags.bits()), flags);
    }
}
