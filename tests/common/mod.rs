//! In-memory compound-container fixture builder.
//!
//! Writes a minimal but structurally valid container: header, one FAT
//! sector, a directory chain, and stream data. Stream data sectors are laid
//! out first (starting at sector 0, file offset 512), so a chunk magic at
//! the start of the first stream lands inside the 1024-byte classification
//! prefix, as real writers of this family produce.
//!
//! Regular and mini streams cannot be mixed: with a zero cutoff everything
//! is FAT-allocated, with the standard 4096 cutoff every small stream must
//! be mini-FAT allocated or the reader would look for it in the mini stream.

use std::collections::BTreeMap;

const SECTOR: usize = 512;
const MINI_SECTOR: usize = 64;
const FATSECT: u32 = 0xFFFFFFFD;
const ENDOFCHAIN: u32 = 0xFFFFFFFE;
const FREESECT: u32 = 0xFFFFFFFF;
const NOSTREAM: u32 = 0xFFFFFFFF;

#[derive(Default)]
pub struct CfbBuilder {
    streams: Vec<(String, Vec<u8>)>,
    mini_streams: Vec<(String, Vec<u8>)>,
    fat_patches: BTreeMap<usize, u32>,
}

impl CfbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a FAT-allocated stream. The first stream added starts at sector 0
    /// (file offset 512).
    pub fn stream(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.streams.push((name.to_string(), data.into()));
        self
    }

    /// Add a mini-FAT-allocated stream (its data lives in the mini stream).
    pub fn mini_stream(mut self, name: &str, data: impl Into<Vec<u8>>) -> Self {
        self.mini_streams.push((name.to_string(), data.into()));
        self
    }

    /// Overwrite one FAT entry after layout, to corrupt a chain.
    pub fn patch_fat(mut self, sector: usize, value: u32) -> Self {
        self.fat_patches.insert(sector, value);
        self
    }

    pub fn build(self) -> Vec<u8> {
        assert!(
            self.streams.is_empty() || self.mini_streams.is_empty(),
            "fixture builder does not mix regular and mini streams"
        );

        let sectors_of = |len: usize| len.div_ceil(SECTOR);

        // Assign regular stream chains from sector 0
        let mut next_sector = 0u32;
        let mut stream_starts = Vec::new();
        for (_, data) in &self.streams {
            let n = sectors_of(data.len()) as u32;
            stream_starts.push(if n == 0 { ENDOFCHAIN } else { next_sector });
            next_sector += n;
        }

        // Mini stream: concatenation of mini-sector-padded stream data
        let mut ministream_buf = Vec::new();
        let mut mini_starts = Vec::new();
        let mut minifat: Vec<u32> = Vec::new();
        for (_, data) in &self.mini_streams {
            let n_mini = data.len().div_ceil(MINI_SECTOR);
            mini_starts.push(if n_mini == 0 {
                ENDOFCHAIN
            } else {
                minifat.len() as u32
            });
            for i in 0..n_mini {
                minifat.push(if i + 1 == n_mini {
                    ENDOFCHAIN
                } else {
                    minifat.len() as u32 + 1
                });
            }
            ministream_buf.extend_from_slice(data);
            ministream_buf.resize(minifat.len() * MINI_SECTOR, 0);
        }
        assert!(minifat.len() <= SECTOR / 4, "mini-FAT must fit one sector");

        let ministream_start = next_sector;
        let ministream_sectors = sectors_of(ministream_buf.len()) as u32;
        next_sector += ministream_sectors;

        let has_mini = !self.mini_streams.is_empty();
        let minifat_sector = next_sector;
        if has_mini {
            next_sector += 1;
        }

        let fat_sector = next_sector;
        next_sector += 1;

        let n_entries = 1 + self.streams.len() + self.mini_streams.len();
        let dir_sectors = n_entries.div_ceil(SECTOR / 128) as u32;
        let dir_start = next_sector;
        next_sector += dir_sectors;

        let total_sectors = next_sector as usize;
        assert!(total_sectors <= SECTOR / 4, "fixture must fit one FAT sector");

        // Build the FAT
        let mut fat = vec![FREESECT; SECTOR / 4];
        let mut chain = |start: u32, count: u32| {
            for i in 0..count {
                fat[(start + i) as usize] = if i + 1 == count {
                    ENDOFCHAIN
                } else {
                    start + i + 1
                };
            }
        };
        for (idx, (_, data)) in self.streams.iter().enumerate() {
            if stream_starts[idx] != ENDOFCHAIN {
                chain(stream_starts[idx], sectors_of(data.len()) as u32);
            }
        }
        if ministream_sectors > 0 {
            chain(ministream_start, ministream_sectors);
        }
        if has_mini {
            chain(minifat_sector, 1);
        }
        chain(dir_start, dir_sectors);
        fat[fat_sector as usize] = FATSECT;
        for (&sector, &value) in &self.fat_patches {
            fat[sector] = value;
        }

        // Header
        let mut header = vec![0u8; SECTOR];
        header[..8].copy_from_slice(b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1");
        put_u16(&mut header, 0x18, 0x003E); // minor version
        put_u16(&mut header, 0x1A, 3); // major version
        put_u16(&mut header, 0x1C, 0xFFFE); // byte order
        put_u16(&mut header, 0x1E, 9); // sector shift
        put_u16(&mut header, 0x20, 6); // mini sector shift
        put_u32(&mut header, 0x2C, 1); // number of FAT sectors
        put_u32(&mut header, 0x30, dir_start);
        let cutoff = if has_mini { 4096 } else { 0 };
        put_u32(&mut header, 0x38, cutoff);
        put_u32(
            &mut header,
            0x3C,
            if has_mini { minifat_sector } else { ENDOFCHAIN },
        );
        put_u32(&mut header, 0x40, u32::from(has_mini));
        put_u32(&mut header, 0x44, ENDOFCHAIN); // first DIFAT sector
        put_u32(&mut header, 0x48, 0); // number of DIFAT sectors
        put_u32(&mut header, 0x4C, fat_sector); // DIFAT slot 0
        for slot in 1..109 {
            put_u32(&mut header, 0x4C + slot * 4, FREESECT);
        }

        // Directory entries: root first, streams as a right-linked sibling list
        let mut dir_data = Vec::new();
        let root_child = if n_entries > 1 { 1 } else { NOSTREAM };
        dir_data.extend_from_slice(&dir_entry(
            "Root Entry",
            5,
            NOSTREAM,
            NOSTREAM,
            root_child,
            if has_mini { ministream_start } else { ENDOFCHAIN },
            if has_mini { ministream_buf.len() as u64 } else { 0 },
        ));
        let names_and_locs: Vec<(&str, u32, usize)> = self
            .streams
            .iter()
            .enumerate()
            .map(|(i, (name, data))| (name.as_str(), stream_starts[i], data.len()))
            .chain(
                self.mini_streams
                    .iter()
                    .enumerate()
                    .map(|(i, (name, data))| (name.as_str(), mini_starts[i], data.len())),
            )
            .collect();
        for (i, (name, start, size)) in names_and_locs.iter().enumerate() {
            let right = if i + 1 < names_and_locs.len() {
                (i + 2) as u32
            } else {
                NOSTREAM
            };
            dir_data.extend_from_slice(&dir_entry(
                name,
                2,
                NOSTREAM,
                right,
                NOSTREAM,
                *start,
                *size as u64,
            ));
        }
        dir_data.resize(dir_sectors as usize * SECTOR, 0);

        // Assemble the file: header, then sectors in layout order
        let mut file = header;
        for (_, data) in &self.streams {
            let mut padded = data.clone();
            padded.resize(sectors_of(data.len()) * SECTOR, 0);
            file.extend_from_slice(&padded);
        }
        let mut padded = ministream_buf.clone();
        padded.resize(ministream_sectors as usize * SECTOR, 0);
        file.extend_from_slice(&padded);
        if has_mini {
            let mut minifat_sector_data = vec![0u8; SECTOR];
            for (i, entry) in minifat.iter().enumerate() {
                minifat_sector_data[i * 4..i * 4 + 4].copy_from_slice(&entry.to_le_bytes());
            }
            for slot in minifat.len()..SECTOR / 4 {
                minifat_sector_data[slot * 4..slot * 4 + 4]
                    .copy_from_slice(&FREESECT.to_le_bytes());
            }
            file.extend_from_slice(&minifat_sector_data);
        }
        let mut fat_data = vec![0u8; SECTOR];
        for (i, entry) in fat.iter().enumerate() {
            fat_data[i * 4..i * 4 + 4].copy_from_slice(&entry.to_le_bytes());
        }
        file.extend_from_slice(&fat_data);
        file.extend_from_slice(&dir_data);

        file
    }
}

fn dir_entry(
    name: &str,
    entry_type: u8,
    left: u32,
    right: u32,
    child: u32,
    start: u32,
    size: u64,
) -> [u8; 128] {
    let mut entry = [0u8; 128];
    let units: Vec<u16> = name.encode_utf16().collect();
    assert!(units.len() <= 31, "entry name too long");
    for (i, unit) in units.iter().enumerate() {
        entry[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
    }
    let name_len = ((units.len() + 1) * 2) as u16;
    entry[64..66].copy_from_slice(&name_len.to_le_bytes());
    entry[66] = entry_type;
    entry[67] = 1; // black
    entry[68..72].copy_from_slice(&left.to_le_bytes());
    entry[72..76].copy_from_slice(&right.to_le_bytes());
    entry[76..80].copy_from_slice(&child.to_le_bytes());
    entry[116..120].copy_from_slice(&start.to_le_bytes());
    entry[120..128].copy_from_slice(&size.to_le_bytes());
    entry
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Encode a CONTENTS stream: chunk header plus text region.
pub fn contents_stream(magic: &[u8; 7], utf16: bool, text: &[u8]) -> Vec<u8> {
    let mut data = wpsread::wps::contents::encode_header(magic, utf16, text.len() as u32).to_vec();
    data.extend_from_slice(text);
    data
}

/// Encode a CHP stream from `(start, end, half_points, flags)` records.
pub fn chp_stream(runs: &[(u32, u32, u16, u16)]) -> Vec<u8> {
    let mut data = Vec::with_capacity(runs.len() * 12);
    for &(start, end, size, flags) in runs {
        data.extend_from_slice(&start.to_le_bytes());
        data.extend_from_slice(&end.to_le_bytes());
        data.extend_from_slice(&size.to_le_bytes());
        data.extend_from_slice(&flags.to_le_bytes());
    }
    data
}

/// Encode a Props stream with the given codepage.
pub fn props_stream(codepage: u16) -> Vec<u8> {
    let mut data = vec![1, 0];
    data.extend_from_slice(&codepage.to_le_bytes());
    data.extend_from_slice(&[0, 0, 0, 0]);
    data
}
