//! Flight recordings on disk.
//!
//! A recording is a CSV file with a header row naming the codec fields and
//! one row per packet. Columns are matched by name when loading, so a file
//! written for any protocol version can be read back: unknown columns are
//! ignored and fields the file lacks stay at zero.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::packet::{Packet, PacketCodec, PacketField};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}, line {line}: invalid value '{value}' for {field}")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("{path} has no time_stamp column")]
    MissingTimeStamp { path: PathBuf },
}

/// Loads and saves packet sequences.
pub trait DataPersister: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<Packet>, PersistenceError>;

    /// Write the fields `codec` defines for each packet.
    fn save(&self, path: &Path, packets: &[Packet], codec: &PacketCodec)
        -> Result<(), PersistenceError>;
}

/// CSV recordings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvPersister;

impl CsvPersister {
    pub fn new() -> Self {
        Self
    }

    /// Write a recording to any writer.
    pub fn write_to<W: Write>(
        &self,
        writer: W,
        packets: &[Packet],
        codec: &PacketCodec,
    ) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(codec.field_names())?;

        for packet in packets {
            writer.write_record(
                codec
                    .fields()
                    .iter()
                    .map(|field| field.get(packet).to_string()),
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Read a recording from any reader. `path` is only used in errors.
    pub fn read_from<R: Read>(
        &self,
        reader: R,
        path: &Path,
    ) -> Result<Vec<Packet>, PersistenceError> {
        let csv_error = |source| PersistenceError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_reader(reader);
        let columns: Vec<Option<PacketField>> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|name| PacketField::from_name(name.trim()))
            .collect();

        if !columns.contains(&Some(PacketField::TimeStamp)) {
            return Err(PersistenceError::MissingTimeStamp {
                path: path.to_path_buf(),
            });
        }

        let mut packets = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let mut packet = Packet::default();

            for (column, cell) in columns.iter().zip(record.iter()) {
                let Some(field) = column else {
                    continue;
                };
                let invalid = || PersistenceError::InvalidValue {
                    path: path.to_path_buf(),
                    line,
                    field: field.name(),
                    value: cell.to_string(),
                };
                let value: f64 = cell.trim().parse().map_err(|_| invalid())?;
                if *field == PacketField::TimeStamp && !is_time_stamp(value) {
                    return Err(invalid());
                }
                field.set(&mut packet, value);
            }
            packets.push(packet);
        }

        Ok(packets)
    }
}

/// Time stamps are whole numbers that fit the wire's `u32`.
fn is_time_stamp(value: f64) -> bool {
    value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value)
}

impl DataPersister for CsvPersister {
    fn load(&self, path: &Path) -> Result<Vec<Packet>, PersistenceError> {
        let file = File::open(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let packets = self.read_from(file, path)?;
        info!(path = %path.display(), packets = packets.len(), "Recording loaded");
        Ok(packets)
    }

    fn save(
        &self,
        path: &Path,
        packets: &[Packet],
        codec: &PacketCodec,
    ) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_to(file, packets, codec)
            .map_err(|source| PersistenceError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            path = %path.display(),
            packets = packets.len(),
            version = %codec.version(),
            "Recording saved"
        );
        Ok(())
    }
}
