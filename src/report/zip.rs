use anyhow::{Context, Result, anyhow};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const REPORT_FILES: [&str; 3] = ["nanoqc_data.txt", "summary.txt", "length_vs_quality.tsv"];

pub fn report_dir_name(sample_name: &str) -> String {
    format!("{}_nanoqc", sample_name)
}

pub fn write_zip(out_dir: &Path, sample_name: &str) -> Result<()> {
    let root = report_dir_name(sample_name);
    let zip_name = format!("{}.zip", root);
    let zip_path = out_dir.join(&zip_name);
    let tmp_path = out_dir.join(format!("{}.tmp", zip_name));

    let file = File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    let mut zip = ZipWriter::new(file);
    let result = write_zip_entries(&mut zip, out_dir, &root);

    match result.and_then(|_| zip.finish().with_context(|| "failed to finalize zip")) {
        Ok(_) => {
            fs::rename(&tmp_path, &zip_path)
                .with_context(|| format!("failed to move zip to {}", zip_path.display()))?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn write_zip_entries(zip: &mut ZipWriter<File>, out_dir: &Path, root: &str) -> Result<()> {
    // Fixed timestamp: identical reports give identical archives.
    let stamp = zip::DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
        .map_err(|_| anyhow!("invalid zip timestamp"))?;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(stamp);

    zip.add_directory(format!("{}/", root), options)
        .with_context(|| "failed to add directory entry to zip")?;

    for name in REPORT_FILES {
        let src_path = out_dir.join(root).join(name);
        let mut file = File::open(&src_path)
            .with_context(|| format!("failed to open {}", src_path.display()))?;
        zip.start_file(format!("{}/{}", root, name), options)
            .with_context(|| format!("failed to add {} to zip", name))?;
        io::copy(&mut file, zip).with_context(|| format!("failed to write {} to zip", name))?;
    }
    Ok(())
}
