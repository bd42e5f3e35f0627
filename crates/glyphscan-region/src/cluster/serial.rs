//! Cluster binary format
//!
//! # Format layout
//!
//! ```text
//! Field        Size          Notes
//! -----        ----          -----
//! class id     4             i32, little-endian
//! class name   1..5 + n      length as 7-bit groups (low first, high bit
//!                            = more), then n bytes of UTF-8
//! count        4             i32, little-endian
//! points       16 * count    (x, y) as f64, little-endian
//! ```
//!
//! Reading recomputes the data range.

use super::Cluster;
use crate::error::{RegionError, RegionResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

fn corrupt(e: std::io::Error, what: &str) -> RegionError {
    if e.kind() == ErrorKind::UnexpectedEof {
        RegionError::CorruptData(format!("truncated cluster: missing {what}"))
    } else {
        RegionError::Io(e)
    }
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> RegionResult<()> {
    let mut len = s.len();
    loop {
        let byte = (len & 0x7F) as u8;
        len >>= 7;
        if len == 0 {
            writer.write_all(&[byte])?;
            break;
        }
        writer.write_all(&[byte | 0x80])?;
    }
    writer.write_all(s.as_bytes())?;
    Ok(())
}

fn read_string<R: Read>(reader: &mut R) -> RegionResult<String> {
    let mut len: u32 = 0;
    let mut shift = 0;
    loop {
        let mut b = [0u8; 1];
        reader
            .read_exact(&mut b)
            .map_err(|e| corrupt(e, "class name length"))?;
        if shift == 28 && b[0] > 0x07 {
            return Err(RegionError::CorruptData(
                "class name length overflows".to_string(),
            ));
        }
        len |= ((b[0] & 0x7F) as u32) << shift;
        if b[0] & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    if len > i32::MAX as u32 {
        return Err(RegionError::CorruptData(format!(
            "class name length {} out of range",
            len
        )));
    }

    let mut bytes = Vec::new();
    reader
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut bytes)
        .map_err(RegionError::Io)?;
    if bytes.len() != len as usize {
        return Err(RegionError::CorruptData(
            "truncated cluster: missing class name".to_string(),
        ));
    }
    String::from_utf8(bytes)
        .map_err(|_| RegionError::CorruptData("class name is not UTF-8".to_string()))
}

impl Cluster {
    /// Serialize to a writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> RegionResult<()> {
        let count = i32::try_from(self.len()).map_err(|_| {
            RegionError::InvalidParameters(format!("too many points: {}", self.len()))
        })?;
        writer.write_all(&self.class_id.to_le_bytes())?;
        write_string(writer, &self.class_name)?;
        writer.write_all(&count.to_le_bytes())?;
        for (x, y) in self.points() {
            writer.write_all(&x.to_le_bytes())?;
            writer.write_all(&y.to_le_bytes())?;
        }
        Ok(())
    }

    /// Serialize into a byte vector.
    pub fn to_bytes(&self) -> RegionResult<Vec<u8>> {
        let mut out = Vec::with_capacity(9 + self.class_name.len() + 16 * self.len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Deserialize from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::CorruptData`] for a truncated stream, a
    /// negative point count or a class name that is not UTF-8.
    pub fn read_from<R: Read>(reader: &mut R) -> RegionResult<Cluster> {
        let mut word = [0u8; 4];
        reader
            .read_exact(&mut word)
            .map_err(|e| corrupt(e, "class id"))?;
        let class_id = i32::from_le_bytes(word);
        let class_name = read_string(reader)?;

        reader
            .read_exact(&mut word)
            .map_err(|e| corrupt(e, "point count"))?;
        let count = i32::from_le_bytes(word);
        if count < 0 {
            return Err(RegionError::CorruptData(format!(
                "negative point count: {}",
                count
            )));
        }

        let mut cluster = Cluster::new();
        let (mut x, mut y) = ([0u8; 8], [0u8; 8]);
        for _ in 0..count {
            reader.read_exact(&mut x).map_err(|e| corrupt(e, "points"))?;
            reader.read_exact(&mut y).map_err(|e| corrupt(e, "points"))?;
            let (x, y) = (f64::from_le_bytes(x), f64::from_le_bytes(y));
            cluster.push(x, y);
        }

        cluster.class_id = class_id;
        cluster.class_name = class_name;
        cluster.calc_data_range();
        Ok(cluster)
    }

    /// Deserialize from a byte slice.
    pub fn from_bytes(data: &[u8]) -> RegionResult<Cluster> {
        let mut reader = data;
        Self::read_from(&mut reader)
    }

    /// Write to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RegionResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> RegionResult<Cluster> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }
}
