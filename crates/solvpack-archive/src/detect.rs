use std::io::{self, Read, Seek};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
}

pub fn detect_format(data: &[u8]) -> Option<ArchiveFormat> {
    match data {
        // local file header, or the end-of-central-directory record of an empty archive
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] => Some(ArchiveFormat::Zip),
        _ => None,
    }
}

pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<Option<ArchiveFormat>> {
    let mut header = Vec::with_capacity(4);
    (&mut *reader).take(4).read_to_end(&mut header)?;
    reader.rewind()?;
    Ok(detect_format(&header))
}
