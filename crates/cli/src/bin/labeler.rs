use anyhow::Result;

fn main() -> Result<()> {
    labeler_cli::main_entry()
}
