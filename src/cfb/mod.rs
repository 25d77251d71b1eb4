//! Compound binary container navigator.
//!
//! The container is a sector-chained structured storage format: a 512-byte
//! header, a File Allocation Table (FAT) mapping each sector to the next
//! sector of its chain, a directory of named entries, and a mini-FAT for
//! streams below a size cutoff whose data lives inside the root entry's
//! mini stream.
//!
//! The navigator is a pure leaf: it knows nothing about text semantics. It
//! owns the raw bytes for the duration of one load, exposes lookup-by-name
//! over an arena of directory entries, and hands out bounded [`StreamHandle`]
//! views. Every sector-chain walk is bounded by the container's maximum
//! possible sector count, so cyclic or out-of-range chains surface as
//! [`Error::Corrupted`] instead of looping.

pub mod consts;

use bytes::Bytes;
use zerocopy::{FromBytes, LE, U16, U32, U64};
use zerocopy_derive::FromBytes as DeriveFromBytes;

use crate::common::error::{Error, Result};
use consts::*;

/// Raw container header (512 bytes, little-endian).
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawHeader {
    /// Signature bytes
    magic: [u8; 8],
    /// Header CLSID (unused, always zero in practice)
    clsid: [u8; 16],
    /// Minor version
    minor_version: U16<LE>,
    /// Major version (3 = 512-byte sectors, 4 = 4096-byte sectors)
    major_version: U16<LE>,
    /// Byte order mark, must be 0xFFFE
    byte_order: U16<LE>,
    /// Sector size as a power of two
    sector_shift: U16<LE>,
    /// Mini sector size as a power of two
    mini_sector_shift: U16<LE>,
    reserved: [u8; 6],
    /// Number of directory sectors (version 4 only)
    num_dir_sectors: U32<LE>,
    /// Number of FAT sectors
    num_fat_sectors: U32<LE>,
    /// First sector of the directory chain
    first_dir_sector: U32<LE>,
    /// Transaction signature (unused)
    transaction_signature: U32<LE>,
    /// Streams smaller than this live in the mini stream
    mini_stream_cutoff: U32<LE>,
    /// First sector of the mini-FAT chain
    first_minifat_sector: U32<LE>,
    /// Number of mini-FAT sectors
    num_minifat_sectors: U32<LE>,
    /// First DIFAT sector (beyond the 109 header slots)
    first_difat_sector: U32<LE>,
    /// Number of DIFAT sectors
    num_difat_sectors: U32<LE>,
    /// First 109 FAT sector locations
    difat: [U32<LE>; 109],
}

/// Raw directory entry structure (128 bytes).
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawDirectoryEntry {
    /// Entry name in UTF-16LE (64 bytes, null-padded)
    name: [u8; 64],
    /// Length of name in bytes (including null terminator)
    name_len: U16<LE>,
    /// Entry type (1 = storage, 2 = stream, 5 = root)
    entry_type: u8,
    /// Node color (0 = red, 1 = black)
    node_color: u8,
    /// Left sibling SID
    sid_left: U32<LE>,
    /// Right sibling SID
    sid_right: U32<LE>,
    /// Child SID
    sid_child: U32<LE>,
    /// CLSID (16 bytes)
    clsid: [u8; 16],
    /// State bits
    state_bits: U32<LE>,
    /// Creation time (FILETIME)
    creation_time: U64<LE>,
    /// Modified time (FILETIME)
    modified_time: U64<LE>,
    /// Starting sector
    start_sector: U32<LE>,
    /// Stream size
    stream_size: U64<LE>,
}

/// A directory entry in the container's entry arena.
///
/// Entries are indexed by SID (their position in the directory stream); the
/// sibling/child SIDs are kept as plain integers rather than owning links.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Storage ID (index in the directory)
    pub sid: u32,
    /// Entry name (UTF-16 decoded, trailing nulls stripped)
    pub name: String,
    /// Entry type (stream, storage, root)
    pub entry_type: u8,
    /// Index of left sibling
    pub sid_left: u32,
    /// Index of right sibling
    pub sid_right: u32,
    /// Index of first child (for storages)
    pub sid_child: u32,
    /// First sector of the stream
    pub start_sector: u32,
    /// Size of the stream in bytes
    pub size: u64,
    /// Whether the stream data lives in the mini stream
    pub is_minifat: bool,
}

impl DirectoryEntry {
    /// Whether this entry is a stream (as opposed to a storage).
    pub fn is_stream(&self) -> bool {
        self.entry_type == STGTY_STREAM
    }
}

/// A parsed compound binary container.
///
/// Owns the raw input bytes for the duration of one load. All directory and
/// allocation state is recomputed per open; nothing is cached across loads.
#[derive(Debug)]
pub struct Container {
    /// The entire input byte sequence
    data: Bytes,
    /// Sector size (512 or 4096 bytes)
    sector_size: usize,
    /// Mini sector size (typically 64 bytes)
    mini_sector_size: usize,
    /// FAT - maps sector to next sector in chain
    fat: Vec<u32>,
    /// Mini-FAT - for streams smaller than the cutoff
    minifat: Vec<u32>,
    /// Directory entry arena indexed by SID (None for unallocated slots)
    entries: Vec<Option<DirectoryEntry>>,
    /// Materialized mini stream (root entry's data), if the container has one
    mini_stream: Option<Vec<u8>>,
    /// Upper bound on the number of sectors the file can hold
    max_sectors: usize,
}

/// A bounded, read-only view of one named stream.
///
/// Multiple handles may alias the same underlying bytes; none of them can
/// mutate the container.
#[derive(Debug, Clone, Copy)]
pub struct StreamHandle<'a> {
    container: &'a Container,
    entry: &'a DirectoryEntry,
}

impl<'a> StreamHandle<'a> {
    /// Stream size in bytes.
    pub fn len(&self) -> u64 {
        self.entry.size
    }

    /// Whether the stream is empty.
    pub fn is_empty(&self) -> bool {
        self.entry.size == 0
    }

    /// Stream name.
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    /// Materialize the stream bytes by following its sector chain.
    ///
    /// A broken chain (out-of-range index, cycle, chain longer than the
    /// container can hold) is a fatal [`Error::Corrupted`].
    pub fn read(&self) -> Result<Vec<u8>> {
        if self.entry.size == 0 {
            return Ok(Vec::new());
        }

        let mut data = if self.entry.is_minifat {
            self.container.read_mini_chain(self.entry.start_sector)?
        } else {
            self.container.read_chain(self.entry.start_sector)?
        };

        if (data.len() as u64) < self.entry.size {
            return Err(Error::Corrupted(format!(
                "stream '{}' chain yields {} bytes, directory declares {}",
                self.entry.name,
                data.len(),
                self.entry.size
            )));
        }
        data.truncate(self.entry.size as usize);
        Ok(data)
    }
}

impl Container {
    /// Open and parse a compound container from its raw bytes.
    pub fn open(data: Bytes) -> Result<Self> {
        if data.len() < HEADER_SIZE || &data[..8] != MAGIC {
            return Err(Error::NotCompoundFile);
        }

        let header = RawHeader::read_from_bytes(&data[..HEADER_SIZE])
            .map_err(|_| Error::InvalidFormat("malformed container header".to_string()))?;

        if header.byte_order.get() != 0xFFFE {
            return Err(Error::InvalidFormat("invalid byte order mark".to_string()));
        }

        let sector_shift = header.sector_shift.get();
        let mini_sector_shift = header.mini_sector_shift.get();
        if sector_shift >= 31 || mini_sector_shift >= 31 {
            return Err(Error::InvalidFormat("invalid sector shift".to_string()));
        }
        let sector_size = 1usize << sector_shift;
        let mini_sector_size = 1usize << mini_sector_shift;

        // Sector size must agree with the declared version
        let major = header.major_version.get();
        if (major == 3 && sector_size != 512) || (major == 4 && sector_size != 4096) {
            return Err(Error::InvalidFormat("sector size mismatch".to_string()));
        }

        let max_sectors = (data.len().saturating_sub(HEADER_SIZE)).div_ceil(sector_size);

        let mut container = Container {
            data,
            sector_size,
            mini_sector_size,
            fat: Vec::new(),
            minifat: Vec::new(),
            entries: Vec::new(),
            mini_stream: None,
            max_sectors,
        };

        container.load_fat(&header)?;
        container.load_directory(header.first_dir_sector.get(), header.mini_stream_cutoff.get())?;
        if header.num_minifat_sectors.get() > 0 {
            container.load_minifat(header.first_minifat_sector.get())?;
        }
        container.load_mini_stream()?;

        Ok(container)
    }

    /// Look up a stream by exact, case-sensitive name anywhere in the
    /// directory. Returns `None` when no such stream exists; a missing stream
    /// is not an error.
    pub fn find_stream(&self, name: &str) -> Option<StreamHandle<'_>> {
        self.entries
            .iter()
            .flatten()
            .find(|entry| entry.is_stream() && entry.name == name)
            .map(|entry| StreamHandle {
                container: self,
                entry,
            })
    }

    /// Names of all streams in the directory, in SID order.
    pub fn stream_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flatten()
            .filter(|entry| entry.is_stream())
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// The directory entry arena, indexed by SID.
    pub fn entries(&self) -> &[Option<DirectoryEntry>] {
        &self.entries
    }

    /// Load the FAT from the 109 header DIFAT slots plus any chained DIFAT
    /// sectors.
    fn load_fat(&mut self, header: &RawHeader) -> Result<()> {
        let mut fat_sectors = Vec::new();
        for slot in &header.difat {
            let sector = slot.get();
            if sector == FREESECT || sector == ENDOFCHAIN {
                break;
            }
            fat_sectors.push(sector);
        }

        // Additional FAT sector locations live in a chain of DIFAT sectors,
        // each ending with a pointer to the next
        let num_difat = header.num_difat_sectors.get();
        if num_difat > 0 {
            let entries_per_sector = self.sector_size / 4 - 1;
            let mut difat_sector = header.first_difat_sector.get();
            let mut hops = 0usize;

            while difat_sector != ENDOFCHAIN && difat_sector != FREESECT {
                hops += 1;
                if hops > self.max_sectors || hops > num_difat as usize {
                    return Err(Error::Corrupted("DIFAT chain too long".to_string()));
                }

                let sector_data = self.read_sector(difat_sector)?;
                for i in 0..entries_per_sector {
                    let sector = read_u32_le(sector_data, i * 4)?;
                    if sector == FREESECT || sector == ENDOFCHAIN {
                        break;
                    }
                    fat_sectors.push(sector);
                }
                difat_sector = read_u32_le(sector_data, entries_per_sector * 4)?;
            }
        }

        let entries_per_sector = self.sector_size / 4;
        let mut fat = Vec::with_capacity(fat_sectors.len() * entries_per_sector);
        for &sector_id in &fat_sectors {
            let sector_data = self.read_sector(sector_id)?;
            for i in 0..entries_per_sector {
                fat.push(read_u32_le(sector_data, i * 4)?);
            }
        }
        self.fat = fat;

        Ok(())
    }

    /// Load the mini-FAT by following its regular FAT chain.
    fn load_minifat(&mut self, first_minifat_sector: u32) -> Result<()> {
        let minifat_data = self.read_chain(first_minifat_sector)?;
        let mut minifat = Vec::with_capacity(minifat_data.len() / 4);
        for chunk in minifat_data.chunks_exact(4) {
            minifat.push(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        self.minifat = minifat;
        Ok(())
    }

    /// Materialize the directory entry arena from the directory sector chain.
    fn load_directory(&mut self, first_dir_sector: u32, mini_stream_cutoff: u32) -> Result<()> {
        let dir_data = self.read_chain(first_dir_sector)?;
        if dir_data.len() < DIRENTRY_SIZE {
            return Err(Error::Corrupted("directory stream is empty".to_string()));
        }

        let num_entries = dir_data.len() / DIRENTRY_SIZE;
        let mut entries = Vec::with_capacity(num_entries);
        for sid in 0..num_entries {
            let offset = sid * DIRENTRY_SIZE;
            let entry = parse_directory_entry(
                &dir_data[offset..offset + DIRENTRY_SIZE],
                sid as u32,
                self.sector_size,
                mini_stream_cutoff,
            )?;
            entries.push(entry);
        }

        match entries.first() {
            Some(Some(root)) if root.entry_type == STGTY_ROOT => {}
            _ => return Err(Error::Corrupted("missing root directory entry".to_string())),
        }
        self.entries = entries;

        Ok(())
    }

    /// Materialize the mini stream (the root entry's data chain) when the
    /// container has mini-FAT allocated streams.
    fn load_mini_stream(&mut self) -> Result<()> {
        if self.minifat.is_empty() {
            return Ok(());
        }
        let root = self.entries[0]
            .as_ref()
            .ok_or_else(|| Error::Corrupted("missing root directory entry".to_string()))?;
        if root.size == 0 {
            return Ok(());
        }
        let (start, size) = (root.start_sector, root.size);
        let mut data = self.read_chain(start)?;
        data.truncate(size as usize);
        self.mini_stream = Some(data);
        Ok(())
    }

    /// Slice a single sector out of the raw bytes.
    fn read_sector(&self, sector_id: u32) -> Result<&[u8]> {
        // Sector position in file: (sector_id + 1) * sector_size
        let position = (sector_id as usize + 1)
            .checked_mul(self.sector_size)
            .ok_or_else(|| Error::Corrupted(format!("sector {sector_id} out of range")))?;
        let end = position + self.sector_size;
        if end > self.data.len() {
            return Err(Error::Corrupted(format!(
                "sector {sector_id} extends past end of container"
            )));
        }
        Ok(&self.data[position..end])
    }

    /// Read a full sector chain from the FAT.
    ///
    /// Iteration is bounded by the container's maximum sector count; a cycle
    /// or an out-of-range index aborts the load.
    fn read_chain(&self, start_sector: u32) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        let mut sector = start_sector;
        let mut hops = 0usize;

        while sector != ENDOFCHAIN {
            hops += 1;
            if hops > self.max_sectors {
                return Err(Error::Corrupted(
                    "sector chain exceeds container capacity (cycle?)".to_string(),
                ));
            }
            if sector > MAXREGSECT || sector as usize >= self.fat.len() {
                return Err(Error::Corrupted(format!(
                    "sector index {sector:#x} not in FAT"
                )));
            }
            data.extend_from_slice(self.read_sector(sector)?);
            sector = self.fat[sector as usize];
        }

        Ok(data)
    }

    /// Read a full mini-sector chain from the mini-FAT and mini stream.
    fn read_mini_chain(&self, start_sector: u32) -> Result<Vec<u8>> {
        let mini_stream = self
            .mini_stream
            .as_deref()
            .ok_or_else(|| Error::Corrupted("mini stream missing".to_string()))?;

        let mut data = Vec::new();
        let mut sector = start_sector;
        let mut hops = 0usize;
        let max_mini_sectors = mini_stream.len() / self.mini_sector_size + 1;

        while sector != ENDOFCHAIN {
            hops += 1;
            if hops > max_mini_sectors || hops > self.minifat.len() {
                return Err(Error::Corrupted(
                    "mini sector chain exceeds mini stream capacity (cycle?)".to_string(),
                ));
            }
            if sector > MAXREGSECT || sector as usize >= self.minifat.len() {
                return Err(Error::Corrupted(format!(
                    "mini sector index {sector:#x} not in mini-FAT"
                )));
            }

            let position = sector as usize * self.mini_sector_size;
            let end = position + self.mini_sector_size;
            if end > mini_stream.len() {
                return Err(Error::Corrupted(format!(
                    "mini sector {sector} extends past end of mini stream"
                )));
            }
            data.extend_from_slice(&mini_stream[position..end]);
            sector = self.minifat[sector as usize];
        }

        Ok(data)
    }
}

/// Parse one 128-byte directory entry; unallocated slots become `None`.
fn parse_directory_entry(
    data: &[u8],
    sid: u32,
    sector_size: usize,
    mini_stream_cutoff: u32,
) -> Result<Option<DirectoryEntry>> {
    let raw = RawDirectoryEntry::read_from_bytes(data)
        .map_err(|_| Error::Corrupted("malformed directory entry".to_string()))?;

    if raw.entry_type == STGTY_EMPTY {
        return Ok(None);
    }

    // Name length includes the UTF-16 null terminator
    let name_len = raw.name_len.get() as usize;
    let name_bytes = &raw.name[..name_len.saturating_sub(2).min(64)];
    let name = decode_utf16le_name(name_bytes);

    // 512-byte-sector containers only use the low 32 bits of the size field
    let size = if sector_size == 512 {
        raw.stream_size.get() & 0xFFFF_FFFF
    } else {
        raw.stream_size.get()
    };

    // The root entry's data is the mini stream itself, always FAT-allocated
    let is_minifat = raw.entry_type == STGTY_STREAM && size < mini_stream_cutoff as u64;

    Ok(Some(DirectoryEntry {
        sid,
        name,
        entry_type: raw.entry_type,
        sid_left: raw.sid_left.get(),
        sid_right: raw.sid_right.get(),
        sid_child: raw.sid_child.get(),
        start_sector: raw.start_sector.get(),
        size,
        is_minifat,
    }))
}

/// Decode a UTF-16LE, null-padded entry name.
fn decode_utf16le_name(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_end_matches('\0')
        .to_string()
}

fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let end = offset + 4;
    if end > data.len() {
        return Err(Error::Corrupted("truncated sector data".to_string()));
    }
    Ok(u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]))
}
