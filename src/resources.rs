use std::{
    fs::{self, File},
    io::{prelude::*, BufReader},
    path::Path,
};
use zip::read::ZipArchive;

use crate::{definitions::cpu, RomError};

/// Represents an archive of roms, any zip file that
/// contains the raw rom files as entries.
pub struct RomArchives<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl RomArchives<BufReader<File>> {
    /// Will open the rom archive at the given location
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RomError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> RomArchives<R> {
    /// Will generate a new rom archive object based of the given reader
    pub fn new(reader: R) -> Result<Self, RomError> {
        Ok(RomArchives {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Will return all the rom names available to be chosen
    pub fn file_names(&self) -> Vec<&'_ str> {
        self.archive.file_names().collect()
    }

    /// Will decompress the information from the zip archive
    pub fn get_file_data(&mut self, name: &str) -> Result<Rom, RomError> {
        let mut file = self.archive.by_name(name)?;
        // refuse oversized entries before inflating them
        if file.size() as usize > cpu::PROGRAM_SIZE {
            return Err(RomError::TooLarge {
                len: file.size() as usize,
                max: cpu::PROGRAM_SIZE,
            });
        }
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .map_err(|err| RomError::Archive(err.into()))?;
        Rom::new(name, data)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The program bytes, guaranteed to fit behind `0x200`
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data
    ///
    /// # Example
    /// ```rust
    /// # use chip::resources::Rom;
    /// let rom = Rom::new("jump", vec![0x12, 0x00]).expect("fits into memory");
    /// assert_eq!(rom.get_name(), "jump");
    /// assert_eq!(rom.get_data(), &[0x12, 0x00]);
    ///
    /// assert!(Rom::new("huge", vec![0; 0x1000]).is_err());
    /// ```
    pub fn new<D: Into<Vec<u8>>>(name: &str, data: D) -> Result<Self, RomError> {
        let data = data.into();
        if data.len() > cpu::PROGRAM_SIZE {
            return Err(RomError::TooLarge {
                len: data.len(),
                max: cpu::PROGRAM_SIZE,
            });
        }
        Ok(Rom {
            name: name.to_string(),
            data: data.into_boxed_slice(),
        })
    }

    /// Will read the rom from the file system, the file name is used as
    /// the rom name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| RomError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(&name, data)
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{build_opcode, Opcode};
    use std::io::Cursor;
    use zip::{write::FileOptions, CompressionMethod, ZipWriter};

    const RAW_ROM_DATA: [Opcode; 6] = [0x00E0, 0x6005, 0x610A, 0x8014, 0xA20A, 0x1200];

    fn raw_rom() -> Vec<u8> {
        RAW_ROM_DATA.iter().flat_map(|op| op.to_be_bytes()).collect()
    }

    fn build_archive(entries: &[(&str, Vec<u8>)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_rom_size_limit() {
        assert!(Rom::new("max", vec![0xAA; cpu::PROGRAM_SIZE]).is_ok());
        match Rom::new("too large", vec![0xAA; cpu::PROGRAM_SIZE + 1]) {
            Err(RomError::TooLarge { len, max }) => {
                assert_eq!(len, cpu::PROGRAM_SIZE + 1);
                assert_eq!(max, cpu::PROGRAM_SIZE);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(Rom::new("empty", Vec::new()).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = Rom::from_path("/this/rom/does/not/exist.ch8").unwrap_err();
        assert!(matches!(err, RomError::Unreadable { .. }));
    }

    #[test]
    fn test_rom_from_path() {
        let path = std::env::temp_dir().join("schip8-resources-test.ch8");
        fs::write(&path, raw_rom()).unwrap();

        let rom = Rom::from_path(&path).unwrap();
        assert_eq!(rom.get_name(), "schip8-resources-test.ch8");
        assert_eq!(rom.get_data(), &raw_rom()[..]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rom_extract() {
        let data = raw_rom();
        let mut ra = RomArchives::new(build_archive(&[("SCENARIO", data)])).unwrap();
        let rom = ra.get_file_data("SCENARIO").unwrap();
        let data = rom.get_data();

        for i in (0..data.len()).step_by(2) {
            let opcode = build_opcode(data, i).unwrap();
            assert_eq!(RAW_ROM_DATA[i / 2], opcode);
        }
    }

    #[test]
    fn test_file_names() {
        let entries = [("PONG", vec![0x12, 0x00]), ("MAZE", vec![0x00, 0xE0])];
        let ra = RomArchives::new(build_archive(&entries)).unwrap();
        let mut files = ra.file_names();
        files.sort_unstable();

        assert_eq!(&["MAZE", "PONG"], &files[..]);
    }

    #[test]
    fn test_archive_errors() {
        let mut ra = RomArchives::new(build_archive(&[("PONG", vec![0x12, 0x00])])).unwrap();
        assert!(matches!(
            ra.get_file_data("MISSING"),
            Err(RomError::Archive(_))
        ));

        let huge = vec![0u8; cpu::PROGRAM_SIZE + 2];
        let mut ra = RomArchives::new(build_archive(&[("HUGE", huge)])).unwrap();
        assert!(matches!(
            ra.get_file_data("HUGE"),
            Err(RomError::TooLarge { .. })
        ));

        assert!(matches!(
            RomArchives::new(Cursor::new(vec![1u8, 2, 3])),
            Err(RomError::Archive(_))
        ));
    }
}
