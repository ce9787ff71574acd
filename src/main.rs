fn main() -> anyhow::Result<()> {
    kira_nanoqc::cli::run::entry()
}
