use anyhow::{Context, Result, anyhow};
use flate2::read::MultiGzDecoder;
use gzp::deflate::{Bgzf, Mgzip};
use gzp::par::decompress::ParDecompressBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const GZIP_READ_BUF: usize = 8 * 1024 * 1024;

pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }.with_context(|| "mmap failed")?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

/// The whole summary file, mapped or decompressed into memory.
pub enum SummarySource {
    Mapped(MmapSource),
    Owned(Vec<u8>),
}

impl SummarySource {
    pub fn load(path: &Path, threads: usize) -> Result<(Self, InputKind)> {
        let kind = detect_input_kind(path)?;
        let source = match kind {
            InputKind::Plain => {
                let len = std::fs::metadata(path)
                    .with_context(|| format!("failed to stat {}", path.display()))?
                    .len();
                if len == 0 {
                    SummarySource::Owned(Vec::new())
                } else {
                    SummarySource::Mapped(MmapSource::open(path)?)
                }
            }
            InputKind::Gzip => {
                let mut reader = open_gzip_reader(path, threads)?;
                let mut out = Vec::new();
                let mut buf = vec![0u8; GZIP_READ_BUF];
                loop {
                    let n = reader.read(&mut buf).with_context(|| {
                        format!(
                            "gzip decompression error in {} (offset {})",
                            path.display(),
                            out.len()
                        )
                    })?;
                    if n == 0 {
                        break;
                    }
                    out.extend_from_slice(&buf[..n]);
                }
                SummarySource::Owned(out)
            }
        };
        Ok((source, kind))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            SummarySource::Mapped(m) => m.bytes(),
            SummarySource::Owned(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext == "gz" {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .with_context(|| "failed to read magic bytes")?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

#[derive(Clone, Copy, Debug)]
enum GzipVariant {
    Standard,
    Mgzip,
    Bgzf,
}

fn detect_gzip_variant(path: &Path) -> Result<GzipVariant> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut header = [0u8; 20];
    let n = file
        .read(&mut header)
        .with_context(|| "failed to read gzip header")?;
    if n < 14 || header[0] != 0x1f || header[1] != 0x8b || header[3] & 4 == 0 {
        return Ok(GzipVariant::Standard);
    }
    match (header[12], header[13]) {
        (b'B', b'C') => Ok(GzipVariant::Bgzf),
        (b'I', b'G') => Ok(GzipVariant::Mgzip),
        _ => Ok(GzipVariant::Standard),
    }
}

pub fn open_gzip_reader(path: &Path, threads: usize) -> Result<Box<dyn Read + Send>> {
    let variant = detect_gzip_variant(path)?;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let reader: Box<dyn Read + Send> = match variant {
        GzipVariant::Bgzf if threads > 1 => Box::new(
            ParDecompressBuilder::<Bgzf>::new()
                .num_threads(threads)
                .map_err(|e| anyhow!("invalid BGZF decompression thread count: {e}"))?
                .from_reader(reader),
        ),
        GzipVariant::Mgzip if threads > 1 => Box::new(
            ParDecompressBuilder::<Mgzip>::new()
                .num_threads(threads)
                .map_err(|e| anyhow!("invalid MGZIP decompression thread count: {e}"))?
                .from_reader(reader),
        ),
        _ => Box::new(MultiGzDecoder::new(reader)),
    };
    Ok(reader)
}
