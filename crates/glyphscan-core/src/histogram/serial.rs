//! Histogram binary format
//!
//! # Format layout
//!
//! ```text
//! Offset       Size          Field
//! ------       ----          -----
//! 0            4             bin count n (i32, little-endian)
//! 4            4 * n         bin values (f32, little-endian)
//! ```
//!
//! There is no magic number or header. Only the bins are stored; derived
//! statistics are not restored by [`Histogram::read_from`].

use super::Histogram;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

fn corrupt(e: std::io::Error, what: &str) -> Error {
    if e.kind() == ErrorKind::UnexpectedEof {
        Error::CorruptData(format!("truncated histogram: missing {what}"))
    } else {
        Error::Io(e)
    }
}

impl Histogram {
    /// Serialize the bins to a writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let n = i32::try_from(self.num_bins())
            .map_err(|_| Error::InvalidParameter(format!("too many bins: {}", self.num_bins())))?;
        writer.write_all(&n.to_le_bytes())?;
        for b in self.bins() {
            writer.write_all(&b.to_le_bytes())?;
        }
        Ok(())
    }

    /// Serialize into a byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when the bin count does not fit
    /// in an `i32`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(4 + 4 * self.num_bins());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Deserialize from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptData`] for a negative bin count or a stream
    /// that ends before all bins are read. No partial histogram is returned.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Histogram> {
        let mut word = [0u8; 4];
        reader
            .read_exact(&mut word)
            .map_err(|e| corrupt(e, "bin count"))?;
        let n = i32::from_le_bytes(word);
        if n < 0 {
            return Err(Error::CorruptData(format!("negative bin count: {n}")));
        }

        let n = n as usize;
        let mut bins = Vec::with_capacity(n.min(1 << 16));
        for _ in 0..n {
            reader
                .read_exact(&mut word)
                .map_err(|e| corrupt(e, "bin values"))?;
            bins.push(f32::from_le_bytes(word));
        }
        Ok(Histogram::with_bins(bins))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Histogram> {
        let mut cursor = data;
        Self::read_from(&mut cursor)
    }

    /// Write to a file, replacing any existing content.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Histogram> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }
}
