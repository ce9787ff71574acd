pub mod nanoqc_txt;
pub mod points_tsv;
pub mod summary_txt;
pub mod zip;
