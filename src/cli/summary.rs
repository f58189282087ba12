use crate::cli::CorpusArgs;
use crate::corpus::summary::{create_summary_file, summary_path};

pub fn execute(args: CorpusArgs) -> anyhow::Result<()> {
    let config = args.load_config()?;
    let base_dir = config.base_dir();
    let summary = create_summary_file(&base_dir)?;

    print!("{}", summary.content);
    eprintln!(
        "Wrote {} (sha256 {})",
        summary_path(&base_dir).display(),
        summary.digest()
    );
    Ok(())
}
