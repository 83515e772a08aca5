//! Template-driven buffer filler.
//!
//! [`BufferFiller`] appends text to a caller-supplied byte buffer and keeps a
//! write cursor. Its main entry point, [`BufferFiller::emit_p`], walks a
//! template of literal bytes and `$` directives and substitutes positional
//! arguments:
//!
//! | Directive | Argument          | Output                                  |
//! |-----------|-------------------|-----------------------------------------|
//! | `$D`      | [`Arg::Int`]      | signed decimal                          |
//! | `$L`      | [`Arg::ULong`]    | unsigned decimal                        |
//! | `$S`      | [`Arg::Str`]      | bytes up to the first NUL               |
//! | `$F`      | [`Arg::Flash`]    | bytes of a `'static` string, up to NUL  |
//! | `$E`      | [`Arg::Eeprom`]   | bytes read from a [`PersistentStore`]   |
//! | `$x`      | none              | the character `x` itself (`$$` -> `$`)  |
//!
//! Arguments are checked against the template before anything is written,
//! and every write is bounds-checked against the buffer.
//!
//! # Example
//!
//! ```
//! use webutil_proto::{Arg, BufferFiller};
//!
//! let mut buf = [0u8; 64];
//! let mut bfill = BufferFiller::new(&mut buf);
//! bfill
//!     .emit_p("Value=$D end", &[Arg::Int(42)])
//!     .unwrap();
//! assert_eq!(bfill.as_bytes(), b"Value=42 end");
//! assert_eq!(bfill.position(), 12);
//! ```

use crate::error::Error;
use crate::format::{cstr_len, write_i16, write_u32};
use crate::store::{NoStore, PersistentStore};

/// Marker byte that introduces a directive.
const DIRECTIVE_MARK: u8 = b'$';

/// Substitution directive recognised in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Directive {
    /// `$D`: signed decimal word.
    Int,
    /// `$L`: unsigned long, decimal.
    ULong,
    /// `$S`: NUL-terminated string from RAM.
    Str,
    /// `$F`: string resident in program memory.
    Flash,
    /// `$E`: NUL-terminated string in persistent storage.
    Eeprom,
}

impl Directive {
    /// Directive for the character following `$`, if it names one.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'D' => Some(Self::Int),
            b'L' => Some(Self::ULong),
            b'S' => Some(Self::Str),
            b'F' => Some(Self::Flash),
            b'E' => Some(Self::Eeprom),
            _ => None,
        }
    }

    /// The character that selects this directive.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Int => b'D',
            Self::ULong => b'L',
            Self::Str => b'S',
            Self::Flash => b'F',
            Self::Eeprom => b'E',
        }
    }
}

/// Positional template argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// Value for `$D`.
    Int(i16),
    /// Value for `$L`.
    ULong(u32),
    /// Value for `$S`. Copied up to the first NUL.
    Str(&'a [u8]),
    /// Value for `$F`. Copied up to the first NUL.
    Flash(&'static [u8]),
    /// Start address for `$E`.
    Eeprom(u16),
}

impl Arg<'_> {
    /// The directive this argument satisfies.
    #[must_use]
    pub const fn directive(&self) -> Directive {
        match self {
            Self::Int(_) => Directive::Int,
            Self::ULong(_) => Directive::ULong,
            Self::Str(_) => Directive::Str,
            Self::Flash(_) => Directive::Flash,
            Self::Eeprom(_) => Directive::Eeprom,
        }
    }
}

/// One step of a template walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'t> {
    /// Run of bytes copied as-is.
    Literal(&'t [u8]),
    /// `$` followed by a non-directive byte; emits that byte.
    Escaped(u8),
    Directive(Directive),
    /// `$` as the final byte.
    Dangling,
}

struct Pieces<'t> {
    rest: &'t [u8],
}

impl<'t> Iterator for Pieces<'t> {
    type Item = Piece<'t>;

    fn next(&mut self) -> Option<Piece<'t>> {
        let (&first, tail) = self.rest.split_first()?;
        if first != DIRECTIVE_MARK {
            let len = self
                .rest
                .iter()
                .position(|&b| b == DIRECTIVE_MARK)
                .unwrap_or(self.rest.len());
            let (literal, rest) = self.rest.split_at(len);
            self.rest = rest;
            return Some(Piece::Literal(literal));
        }

        let Some((&tag, rest)) = tail.split_first() else {
            self.rest = tail;
            return Some(Piece::Dangling);
        };
        self.rest = rest;
        Some(match Directive::from_tag(tag) {
            Some(directive) => Piece::Directive(directive),
            None => Piece::Escaped(tag),
        })
    }
}

/// A validated template.
///
/// The template is read up to its first NUL. Building one fails with
/// [`Error::TemplateMismatch`] if it ends in a lone `$`.
///
/// # Example
///
/// ```
/// use webutil_proto::{Arg, Directive, Template};
///
/// let tpl = Template::new(b"<b>$S</b> for $D min$$").unwrap();
/// assert_eq!(tpl.directive_count(), 2);
/// assert!(tpl.directives().eq([Directive::Str, Directive::Int]));
/// assert!(tpl.check(&[Arg::Str(b"Zone 1"), Arg::Int(15)]).is_ok());
/// assert!(tpl.check(&[Arg::Int(15)]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template<'t> {
    bytes: &'t [u8],
    directives: usize,
}

impl<'t> Template<'t> {
    /// Validate `fmt` and count its directives.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateMismatch`] if `fmt` ends in a lone `$`.
    pub fn new(fmt: &'t [u8]) -> Result<Self, Error> {
        let bytes = &fmt[..cstr_len(fmt)];
        let mut directives = 0;
        for piece in (Pieces { rest: bytes }) {
            match piece {
                Piece::Directive(_) => directives += 1,
                Piece::Dangling => return Err(Error::TemplateMismatch),
                Piece::Literal(_) | Piece::Escaped(_) => {}
            }
        }
        Ok(Self { bytes, directives })
    }

    /// Number of substitution directives in the template.
    #[must_use]
    pub fn directive_count(&self) -> usize {
        self.directives
    }

    /// Directives in template order.
    pub fn directives(&self) -> impl Iterator<Item = Directive> + 't {
        self.pieces().filter_map(|piece| match piece {
            Piece::Directive(directive) => Some(directive),
            _ => None,
        })
    }

    /// Check that `args` supply exactly one argument of the right kind per
    /// directive, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateMismatch`] on a count or kind mismatch.
    pub fn check(&self, args: &[Arg<'_>]) -> Result<(), Error> {
        if args.len() != self.directives
            || !self
                .directives()
                .zip(args)
                .all(|(directive, arg)| arg.directive() == directive)
        {
            return Err(Error::TemplateMismatch);
        }
        Ok(())
    }

    fn pieces(&self) -> Pieces<'t> {
        Pieces { rest: self.bytes }
    }
}

/// Appends formatted output to a byte buffer.
///
/// The cursor only moves forward. Operations that fail leave the cursor
/// where it was when they started; bytes past the cursor are scratch.
pub struct BufferFiller<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufferFiller<'a> {
    /// Create a filler that writes from the start of `buf`.
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the underlying buffer.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes still available after the cursor.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The whole underlying buffer, including unwritten bytes.
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buf[..]
    }

    /// The bytes written so far.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Append raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] without writing anything if `bytes`
    /// does not fit.
    pub fn emit_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let end = self.pos + bytes.len();
        self.buf
            .get_mut(self.pos..end)
            .ok_or(Error::BufferOverflow)?
            .copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Append a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if the buffer is full.
    #[inline]
    pub fn emit_byte(&mut self, byte: u8) -> Result<(), Error> {
        *self.buf.get_mut(self.pos).ok_or(Error::BufferOverflow)? = byte;
        self.pos += 1;
        Ok(())
    }

    /// Write a NUL at the cursor without advancing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if the buffer is full.
    pub fn terminate(&mut self) -> Result<(), Error> {
        *self.buf.get_mut(self.pos).ok_or(Error::BufferOverflow)? = 0;
        Ok(())
    }

    /// Render `fmt` with `args` and append the result.
    ///
    /// `$E` directives need a store; use [`BufferFiller::emit_p_with`] for
    /// those.
    ///
    /// # Errors
    ///
    /// - [`Error::TemplateMismatch`] if `fmt` ends in a lone `$` or `args` do
    ///   not line up with its directives. Nothing is written.
    /// - [`Error::BufferOverflow`] if the output does not fit.
    /// - [`Error::Storage`] if the template uses `$E`.
    ///
    /// On error the cursor is left where it was before the call.
    pub fn emit_p(&mut self, fmt: &str, args: &[Arg<'_>]) -> Result<(), Error> {
        self.emit_template(&Template::new(fmt.as_bytes())?, args, &mut NoStore)
    }

    /// Render `fmt` with `args`, reading `$E` strings from `store`.
    ///
    /// # Errors
    ///
    /// As [`BufferFiller::emit_p`], plus [`Error::Storage`] for failed or
    /// out-of-range store reads.
    pub fn emit_p_with<S>(
        &mut self,
        store: &mut S,
        fmt: &str,
        args: &[Arg<'_>],
    ) -> Result<(), Error>
    where
        S: PersistentStore + ?Sized,
    {
        self.emit_template(&Template::new(fmt.as_bytes())?, args, store)
    }

    /// Render an already validated template.
    ///
    /// # Errors
    ///
    /// As [`BufferFiller::emit_p_with`].
    pub fn emit_template<S>(
        &mut self,
        template: &Template<'_>,
        args: &[Arg<'_>],
        store: &mut S,
    ) -> Result<(), Error>
    where
        S: PersistentStore + ?Sized,
    {
        template.check(args)?;

        let mark = self.pos;
        let result = self.render(template, args, store);
        if result.is_err() {
            self.pos = mark;
        }
        result
    }

    fn render<S>(
        &mut self,
        template: &Template<'_>,
        args: &[Arg<'_>],
        store: &mut S,
    ) -> Result<(), Error>
    where
        S: PersistentStore + ?Sized,
    {
        let mut args = args.iter();
        for piece in template.pieces() {
            match piece {
                Piece::Literal(text) => self.emit_raw(text)?,
                Piece::Escaped(byte) => self.emit_byte(byte)?,
                Piece::Directive(_) => {
                    let arg = args.next().ok_or(Error::TemplateMismatch)?;
                    self.emit_arg(arg, store)?;
                }
                Piece::Dangling => return Err(Error::TemplateMismatch),
            }
        }
        Ok(())
    }

    fn emit_arg<S>(&mut self, arg: &Arg<'_>, store: &mut S) -> Result<(), Error>
    where
        S: PersistentStore + ?Sized,
    {
        match *arg {
            Arg::Int(value) => {
                let len = write_i16(&mut self.buf[self.pos..], value).ok_or(Error::BufferOverflow)?;
                self.pos += len;
            }
            Arg::ULong(value) => {
                let len =
                    write_u32(&mut self.buf[self.pos..], value, 10).ok_or(Error::BufferOverflow)?;
                self.pos += len;
            }
            Arg::Str(text) => self.emit_raw(&text[..cstr_len(text)])?,
            Arg::Flash(text) => self.emit_raw(&text[..cstr_len(text)])?,
            Arg::Eeprom(addr) => self.emit_stored(store, addr)?,
        }
        Ok(())
    }

    fn emit_stored<S>(&mut self, store: &mut S, start: u16) -> Result<(), Error>
    where
        S: PersistentStore + ?Sized,
    {
        let mut addr = start;
        loop {
            let byte = store.read_byte(addr)?;
            if byte == 0 {
                return Ok(());
            }
            self.emit_byte(byte)?;
            addr = addr.checked_add(1).ok_or(Error::Storage)?;
        }
    }
}

impl core::fmt::Write for BufferFiller<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.emit_raw(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

#[cfg(feature = "embedded-io")]
impl embedded_io::ErrorType for BufferFiller<'_> {
    type Error = Error;
}

#[cfg(feature = "embedded-io")]
impl embedded_io::Write for BufferFiller<'_> {
    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        if data.is_empty() {
            return Ok(0);
        }
        let len = data.len().min(self.remaining());
        if len == 0 {
            return Err(Error::BufferOverflow);
        }
        self.emit_raw(&data[..len])?;
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
