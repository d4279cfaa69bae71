//! Link over any blocking `Read + Write`

use std::io::{ErrorKind, Read, Write};

use crate::{Link, error::Result, idle_as_zero};

/// Adapts a `Read + Write` handle (pipe, pty, test double) into a [`Link`]
pub struct IoLink<IO: Read + Write + Send> {
    io: IO,
    name: String,
}

impl<IO: Read + Write + Send> IoLink<IO> {
    pub fn new(io: IO) -> Self {
        Self {
            io,
            name: "io".to_string(),
        }
    }

    /// Set the name shown in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn get_ref(&self) -> &IO {
        &self.io
    }

    pub fn get_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn into_inner(self) -> IO {
        self.io
    }
}

impl<IO: Read + Write + Send> Link for IoLink<IO> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.io.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return idle_as_zero(e),
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        loop {
            match self.io.write(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return idle_as_zero(e),
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.io.flush()?;
        Ok(())
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::io;

    /// Delivers queued read results one at a time, records writes
    #[derive(Default)]
    struct Scripted {
        reads: VecDeque<io::Result<Vec<u8>>>,
        written: Vec<u8>,
        max_write: Option<usize>,
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                Some(Ok(chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    Ok(n)
                }
                Some(Err(e)) => Err(e),
                None => Ok(0),
            }
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = self.max_write.map_or(buf.len(), |m| m.min(buf.len()));
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn link(reads: Vec<io::Result<Vec<u8>>>) -> IoLink<Scripted> {
        IoLink::new(Scripted {
            reads: reads.into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_read_exact_joins_short_reads() {
        let mut link = link(vec![
            Ok(vec![0xAA, 0x0E]),
            Ok(vec![0x0D]),
            Ok(vec![0x00, 0x00, 0x00]),
        ]);

        let mut buf = [0u8; 6];
        link.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0x0E, 0x0D, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_read_exact_retries_interrupted() {
        let mut link = link(vec![
            Ok(vec![0x01, 0x02]),
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(vec![0x03]),
        ]);

        let mut buf = [0u8; 3];
        link.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_idle_line_is_soft_timeout() {
        let mut link = link(vec![
            Ok(vec![0xAA]),
            Err(io::Error::from(io::ErrorKind::TimedOut)),
        ]);

        let mut buf = [0u8; 6];
        let err = link.read_exact(&mut buf).unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(err, Error::Timeout { expected: 6, received: 1 }));
        assert_eq!(buf[0], 0xAA);
    }

    #[test]
    fn test_empty_read_is_soft_timeout() {
        let mut link = link(vec![]);
        let mut buf = [0u8; 4];
        assert!(matches!(
            link.read_exact(&mut buf),
            Err(Error::Timeout { expected: 4, received: 0 })
        ));
    }

    #[test]
    fn test_hard_error_is_io() {
        let mut link = link(vec![Err(io::Error::from(io::ErrorKind::BrokenPipe))]);
        let mut buf = [0u8; 1];
        assert!(matches!(link.read_exact(&mut buf), Err(Error::Io(_))));
    }

    #[test]
    fn test_write_exact_joins_short_writes() {
        let mut link = IoLink::new(Scripted {
            max_write: Some(2),
            ..Default::default()
        })
        .with_name("scripted");

        link.write_exact(&[0xAA, 0x0D, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(link.get_ref().written, vec![0xAA, 0x0D, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(link.name(), "scripted");
    }

    #[test]
    fn test_baud_change_unsupported() {
        let mut link = link(vec![]);
        assert!(matches!(
            link.set_baud_rate(921_600),
            Err(Error::Unsupported("set_baud_rate"))
        ));
    }
}
